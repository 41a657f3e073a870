//! Brian's Brain: a three-state automaton with a refractory phase.

use crate::grid::Grid;
use crate::model::{CellState, Model, PauseState};
use lifegrid_core::{BriansBrainConfig, ModelKind, Position, Result, Rgba};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrainCell {
    Off,
    /// Firing
    On,
    /// Refractory
    Dying,
}

impl BrainCell {
    pub fn is_on(&self) -> bool {
        *self == BrainCell::On
    }

    pub fn color(&self) -> Rgba {
        match self {
            BrainCell::Off => Rgba::BLACK,
            BrainCell::On => Rgba::WHITE,
            BrainCell::Dying => Rgba::MID_GRAY,
        }
    }
}

/// On -> Dying -> Off regardless of neighbours; Off fires on exactly two firing neighbours
pub fn brain_rule(current: BrainCell, firing_neighbors: usize) -> BrainCell {
    match current {
        BrainCell::On => BrainCell::Dying,
        BrainCell::Dying => BrainCell::Off,
        BrainCell::Off if firing_neighbors == 2 => BrainCell::On,
        BrainCell::Off => BrainCell::Off,
    }
}

pub struct BriansBrain {
    grid: Grid<BrainCell>,
    pause: PauseState,
    generation: u64,
}

impl BriansBrain {
    /// Create a board where each cell starts On or Off; none start Dying
    pub fn new(config: BriansBrainConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut grid = Grid::new(config.width, config.height, BrainCell::Off);
        grid.randomize(&mut rng, |rng| {
            if rng.gen_bool(config.on_probability) {
                BrainCell::On
            } else {
                BrainCell::Off
            }
        });

        debug!(
            event = "model_created",
            model = "brians_brain",
            width = config.width,
            height = config.height,
            seed = config.seed,
            "Seeded Brian's Brain board"
        );

        Ok(Self::from_grid(grid))
    }

    pub fn from_grid(grid: Grid<BrainCell>) -> Self {
        Self {
            grid,
            pause: PauseState::new(),
            generation: 0,
        }
    }

    pub fn grid(&self) -> &Grid<BrainCell> {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of cells in the given state
    pub fn census(&self, state: BrainCell) -> usize {
        self.grid.iter().filter(|(_, c)| **c == state).count()
    }
}

impl Model for BriansBrain {
    fn kind(&self) -> ModelKind {
        ModelKind::BriansBrain
    }

    fn tick(&mut self) {
        if self.pause.is_paused() {
            return;
        }

        self.grid.apply_rule(|pos, cell, previous| {
            brain_rule(*cell, previous.count_neighbors(pos, BrainCell::is_on))
        });

        self.generation += 1;
        trace!(
            generation = self.generation,
            firing = self.census(BrainCell::On),
            dying = self.census(BrainCell::Dying),
            "Brian's Brain tick"
        );
    }

    fn cell_at(&self, pos: Position) -> Option<CellState> {
        self.grid.get(pos).map(|cell| CellState::Brain(*cell))
    }

    fn color_at(&self, pos: Position) -> Option<Rgba> {
        self.grid.get(pos).map(BrainCell::color)
    }

    fn dimensions(&self) -> (i32, i32) {
        self.grid.dimensions()
    }

    fn pause_state(&self) -> &PauseState {
        &self.pause
    }

    fn pause_state_mut(&mut self) -> &mut PauseState {
        &mut self.pause
    }
}
