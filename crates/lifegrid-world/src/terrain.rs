//! Animated noise terrain classified into biome bands.

use crate::grid::Grid;
use crate::model::{CellState, InputFrame, Model, PauseState};
use crate::noise::{NoiseSource, PerlinNoise};
use lifegrid_core::{Band, Biome, ModelKind, NoiseParams, Position, Result, Rgba, TerrainConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

/// Map a noise sample from [-1, 1] to [0, 1]
pub fn normalize(sample: f64) -> f64 {
    (sample + 1.0) / 2.0
}

pub struct Terrain<N = PerlinNoise> {
    grid: Grid<usize>,
    noise: N,
    params: NoiseParams,
    time: f64,
    time_step: f64,
    threshold_step: f64,
    biomes: Vec<Biome>,
    current_biome: usize,
    rng: ChaCha8Rng,
    pause: PauseState,
}

impl Terrain<PerlinNoise> {
    pub fn new(config: TerrainConfig) -> Result<Self> {
        let noise = PerlinNoise::new(&config.noise, config.seed);
        Self::with_noise(config, noise)
    }
}

impl<N: NoiseSource> Terrain<N> {
    /// Build a terrain over an arbitrary noise source
    pub fn with_noise(config: TerrainConfig, noise: N) -> Result<Self> {
        config.validate()?;

        let mut terrain = Self {
            grid: Grid::new(config.width, config.height, 0),
            noise,
            params: config.noise,
            time: 0.0,
            time_step: config.time_step,
            threshold_step: config.threshold_step,
            biomes: config.biomes,
            current_biome: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            pause: PauseState::new(),
        };
        terrain.generate();

        debug!(
            event = "model_created",
            model = "terrain",
            width = config.width,
            height = config.height,
            seed = config.seed,
            biome = %terrain.biome().name,
            "Generated initial terrain"
        );

        Ok(terrain)
    }

    pub fn grid(&self) -> &Grid<usize> {
        &self.grid
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn biome(&self) -> &Biome {
        &self.biomes[self.current_biome]
    }

    pub fn current_biome_index(&self) -> usize {
        self.current_biome
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    /// The band a cell is currently classified as
    pub fn band_at(&self, pos: Position) -> Option<&Band> {
        self.grid
            .get(pos)
            .and_then(|index| self.biome().bands.get(*index))
    }

    /// Reclassify every cell for the current time and biome
    fn generate(&mut self) {
        let biome = &self.biomes[self.current_biome];
        let noise = &self.noise;
        let freq = self.params.frequency;
        let time = self.time;

        self.grid.apply_rule(|pos, _, _| {
            let value = normalize(noise.sample(pos.x as f64 * freq, pos.y as f64 * freq, time));
            let index = biome.classify_or_last(value);
            if value > biome.bands[index].threshold {
                trace!(value, biome = %biome.name, "Noise value above every band");
            }
            index
        });
    }

    /// Switch to the next biome and reseed the noise source with a fresh random seed
    pub fn advance_biome(&mut self) {
        self.current_biome = (self.current_biome + 1) % self.biomes.len();
        let seed: u64 = self.rng.gen();
        self.noise.reseed(seed);
        self.generate();

        info!(
            event = "biome_changed",
            biome = %self.biome().name,
            index = self.current_biome,
            seed,
            "Switched biome"
        );
    }

    /// Nudge the upper threshold of the band under `cursor` by one step in
    /// the direction of `delta`, clamped to [0, 1].
    ///
    /// Returns false when the cursor is outside the grid or `delta` is zero.
    /// Band order is never re-sorted, so edits can leave a biome out of order.
    pub fn adjust_threshold(&mut self, delta: f64, cursor: Position) -> bool {
        if delta == 0.0 || delta.is_nan() {
            return false;
        }
        let Some(&band_index) = self.grid.get(cursor) else {
            return false;
        };

        let step = self.threshold_step.copysign(delta);
        let band = &mut self.biomes[self.current_biome].bands[band_index];
        band.threshold = (band.threshold + step).clamp(0.0, 1.0);

        debug!(
            event = "threshold_adjusted",
            band = %band.name,
            threshold = band.threshold,
            cursor = %cursor,
            "Adjusted band threshold"
        );
        true
    }
}

impl<N: NoiseSource> Model for Terrain<N> {
    fn kind(&self) -> ModelKind {
        ModelKind::Terrain
    }

    fn tick(&mut self) {
        if self.pause.is_paused() {
            return;
        }

        self.time += self.time_step;
        self.generate();
    }

    fn cell_at(&self, pos: Position) -> Option<CellState> {
        self.grid.get(pos).map(|index| CellState::Terrain(*index))
    }

    fn color_at(&self, pos: Position) -> Option<Rgba> {
        self.band_at(pos).map(|band| band.color)
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

    /// Biome and threshold stimuli are ignored while paused
    fn handle_input(&mut self, input: &InputFrame) {
        self.pause.update(input.pause_pressed);
        if self.pause.is_paused() {
            return;
        }

        if input.advance_biome {
            self.advance_biome();
        }
        if let Some(cursor) = input.cursor {
            self.adjust_threshold(input.scroll_delta, cursor);
        }
    }

    fn status(&self) -> String {
        let mut status = format!("Biome: {}", self.biome().name);
        if self.is_paused() {
            status.push_str(" | Paused");
        }
        status
    }
}
