//! Configuration types for the simulation.

use crate::biomes::builtin_biomes;
use crate::error::{Error, Result};
use crate::types::{Biome, ModelKind, Rgba};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default grid width: a 1024 pixel window at 5 pixels per cell
pub const DEFAULT_WIDTH: i32 = 204;
/// Default grid height: a 512 pixel window at 5 pixels per cell
pub const DEFAULT_HEIGHT: i32 = 102;

fn check_dimensions(width: i32, height: i32) -> Result<()> {
    if width <= 0 || height <= 0 {
        return Err(Error::Validation(format!(
            "Grid dimensions must be positive, got {}x{}",
            width, height
        )));
    }
    if width.checked_mul(height).is_none() {
        return Err(Error::Validation(format!(
            "Grid of {}x{} cells is too large",
            width, height
        )));
    }
    Ok(())
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::Validation(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// How newly born Game of Life cells pick their lineage colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Every live cell is white
    BlackWhite,
    /// Each birth gets an arbitrary opaque colour
    RandomColor,
    /// Each birth picks uniformly from the configured palette
    SetColor,
}

/// Game of Life configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOfLifeConfig {
    pub width: i32,
    pub height: i32,
    /// Random seed for reproducibility
    pub seed: u64,
    pub mode: ColorMode,
    /// Colours used by [`ColorMode::SetColor`]
    pub palette: Vec<Rgba>,
    /// Chance that a cell starts alive (0.0 to 1.0)
    pub live_probability: f64,
}

impl Default for GameOfLifeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: 0,
            mode: ColorMode::BlackWhite,
            palette: vec![Rgba::RED, Rgba::GREEN, Rgba::BLUE],
            live_probability: 0.5,
        }
    }
}

impl GameOfLifeConfig {
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height)?;
        check_unit("live_probability", self.live_probability)?;
        if self.mode == ColorMode::SetColor && self.palette.is_empty() {
            return Err(Error::Validation(
                "SetColor mode requires a non-empty palette".to_string(),
            ));
        }
        if self.palette.contains(&Rgba::BLACK) {
            debug!("Palette contains black; live cells may render like dead ones");
        }
        Ok(())
    }
}

/// Brian's Brain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BriansBrainConfig {
    pub width: i32,
    pub height: i32,
    pub seed: u64,
    /// Chance that a cell starts firing (0.0 to 1.0)
    pub on_probability: f64,
}

impl Default for BriansBrainConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: 0,
            on_probability: 0.5,
        }
    }
}

impl BriansBrainConfig {
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height)?;
        check_unit("on_probability", self.on_probability)
    }
}

/// Schelling segregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchellingConfig {
    pub width: i32,
    pub height: i32,
    pub seed: u64,
    /// Minimum fraction of like neighbours an agent needs to stay put
    pub threshold: f64,
    /// Chance that a cell starts empty (0.0 to 1.0)
    pub empty_ratio: f64,
    /// One colour per agent group
    pub groups: Vec<Rgba>,
    /// Fraction of satisfied agents at which a tick counts as stable
    pub stable_limit: f64,
    /// Consecutive stable ticks before the threshold is raised
    pub max_stable_streak: u32,
    /// Amount added to the threshold on each escalation
    pub threshold_increment: f64,
}

impl Default for SchellingConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: 0,
            threshold: 0.1,
            empty_ratio: 0.05,
            groups: vec![Rgba::RED, Rgba::BLUE],
            stable_limit: 1.0,
            max_stable_streak: 5,
            threshold_increment: 0.1,
        }
    }
}

impl SchellingConfig {
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height)?;
        check_unit("threshold", self.threshold)?;
        check_unit("empty_ratio", self.empty_ratio)?;
        check_unit("stable_limit", self.stable_limit)?;
        if self.groups.is_empty() {
            return Err(Error::Validation(
                "Schelling needs at least one agent group".to_string(),
            ));
        }
        if self.groups.contains(&Rgba::BLACK) {
            return Err(Error::Validation(
                "Group colours must differ from the empty-cell colour".to_string(),
            ));
        }
        if self.max_stable_streak == 0 {
            return Err(Error::Validation(
                "max_stable_streak must be at least 1".to_string(),
            ));
        }
        if !(self.threshold_increment > 0.0) {
            return Err(Error::Validation(format!(
                "threshold_increment must be positive, got {}",
                self.threshold_increment
            )));
        }
        Ok(())
    }
}

/// Parameters handed to the noise source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Scale applied to grid coordinates before sampling
    pub frequency: f64,
    /// Number of summed octaves
    pub octaves: u32,
    /// Amplitude divisor between octaves
    pub alpha: f64,
    /// Frequency multiplier between octaves
    pub beta: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            frequency: 0.05,
            octaves: 3,
            alpha: 2.0,
            beta: 2.0,
        }
    }
}

/// Terrain generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub width: i32,
    pub height: i32,
    pub seed: u64,
    pub noise: NoiseParams,
    /// Noise time advanced per tick
    pub time_step: f64,
    /// Threshold change per unit of scroll
    pub threshold_step: f64,
    pub biomes: Vec<Biome>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: 0,
            noise: NoiseParams::default(),
            time_step: 0.01,
            threshold_step: 0.01,
            biomes: builtin_biomes(),
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height)?;
        if self.noise.octaves == 0 {
            return Err(Error::Validation("Noise needs at least one octave".to_string()));
        }
        if !(self.noise.frequency > 0.0) {
            return Err(Error::Validation(format!(
                "Noise frequency must be positive, got {}",
                self.noise.frequency
            )));
        }
        if !self.time_step.is_finite() {
            return Err(Error::Validation(format!(
                "Time step must be finite, got {}",
                self.time_step
            )));
        }
        if !(self.threshold_step.is_finite() && self.threshold_step > 0.0) {
            return Err(Error::Validation(format!(
                "Threshold step must be positive and finite, got {}",
                self.threshold_step
            )));
        }
        if self.biomes.is_empty() {
            return Err(Error::Validation("Terrain needs at least one biome".to_string()));
        }
        for biome in &self.biomes {
            if !biome.is_well_formed() {
                return Err(Error::Validation(format!(
                    "Biome '{}' must have non-decreasing thresholds ending at 1.0",
                    biome.name
                )));
            }
        }
        Ok(())
    }
}

/// Host configuration: which model to run and how
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub model: ModelKind,
    /// Number of ticks to run
    pub ticks: u64,
    /// Render a frame every N ticks (0 disables rendering)
    pub render_every: u64,
    /// Ticks after which the host presses pause (toggles on the rising edge)
    pub pause_at: Vec<u64>,
    pub game_of_life: GameOfLifeConfig,
    pub brians_brain: BriansBrainConfig,
    pub schelling: SchellingConfig,
    pub terrain: TerrainConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::Terrain,
            ticks: 100,
            render_every: 0,
            pause_at: Vec::new(),
            game_of_life: GameOfLifeConfig::default(),
            brians_brain: BriansBrainConfig::default(),
            schelling: SchellingConfig::default(),
            terrain: TerrainConfig::default(),
        }
    }
}

impl HostConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: HostConfig = serde_json::from_str(&text)?;
        debug!(path = %path.display(), model = %config.model, "Loaded host configuration");
        Ok(config)
    }

    /// Apply the same seed to every model
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.game_of_life.seed = seed;
        self.brians_brain.seed = seed;
        self.schelling.seed = seed;
        self.terrain.seed = seed;
        self
    }

    /// Apply the same grid size to every model
    pub fn with_dimensions(mut self, width: i32, height: i32) -> Self {
        self.game_of_life.width = width;
        self.game_of_life.height = height;
        self.brians_brain.width = width;
        self.brians_brain.height = height;
        self.schelling.width = width;
        self.schelling.height = height;
        self.terrain.width = width;
        self.terrain.height = height;
        self
    }
}
