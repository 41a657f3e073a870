//! The host-facing model interface.

use crate::brians_brain::BrainCell;
use crate::game_of_life::LifeCell;
use crate::schelling::Agent;
use lifegrid_core::{ModelKind, Position, Rgba};
use serde::{Deserialize, Serialize};

/// Snapshot of one cell, tagged by the model that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Life(LifeCell),
    Brain(BrainCell),
    Schelling(Agent),
    /// Index of the band in the active biome
    Terrain(usize),
}

/// External input sampled by the host once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Level of the pause button; pausing toggles on its rising edge
    pub pause_pressed: bool,
    /// One-shot request to switch to the next biome
    pub advance_biome: bool,
    /// Scroll delta; only its sign is used
    pub scroll_delta: f64,
    /// Cursor position in grid cells, if the cursor is over the grid
    pub cursor: Option<Position>,
}

impl InputFrame {
    pub fn pause_pressed() -> Self {
        Self {
            pause_pressed: true,
            ..Default::default()
        }
    }
}

/// Pause flag with rising-edge detection on a held button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseState {
    paused: bool,
    pressed: bool,
}

impl PauseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current button level. Toggles only on a released -> pressed
    /// transition and returns whether it toggled.
    pub fn update(&mut self, pressed: bool) -> bool {
        let toggled = pressed && !self.pressed;
        if toggled {
            self.paused = !self.paused;
        }
        self.pressed = pressed;
        toggled
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

/// A simulation variant driven by the host loop.
///
/// The host calls [`Model::handle_input`] and then [`Model::tick`] once per
/// frame, then reads cells back for rendering. Every read sees a fully
/// settled generation.
pub trait Model {
    fn kind(&self) -> ModelKind;

    /// Advance one step. Does nothing while paused.
    fn tick(&mut self);

    /// Current state of a cell, `None` outside the grid
    fn cell_at(&self, pos: Position) -> Option<CellState>;

    /// Display colour of a cell, `None` outside the grid
    fn color_at(&self, pos: Position) -> Option<Rgba>;

    /// Grid size as (width, height)
    fn dimensions(&self) -> (i32, i32);

    fn pause_state(&self) -> &PauseState;

    fn pause_state_mut(&mut self) -> &mut PauseState;

    fn is_paused(&self) -> bool {
        self.pause_state().is_paused()
    }

    /// Consume one frame of input. The default handles the pause edge only.
    fn handle_input(&mut self, input: &InputFrame) {
        self.pause_state_mut().update(input.pause_pressed);
    }

    /// One-line overlay text for the renderer
    fn status(&self) -> String {
        if self.is_paused() {
            "Paused".to_string()
        } else {
            String::new()
        }
    }
}
