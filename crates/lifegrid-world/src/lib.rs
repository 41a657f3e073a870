//! Grid update engine.
//!
//! This crate implements the bounded 2D grid and the four models that run on
//! it: Game of Life, Brian's Brain, Schelling segregation and noise terrain.

pub mod grid;
pub mod model;
pub mod noise;
pub mod game_of_life;
pub mod brians_brain;
pub mod schelling;
pub mod terrain;

pub use grid::Grid;
pub use model::{CellState, InputFrame, Model, PauseState};
pub use noise::{NoiseSource, PerlinNoise};
pub use game_of_life::{GameOfLife, LifeCell};
pub use brians_brain::{BrainCell, BriansBrain};
pub use schelling::{Agent, GroupId, Schelling, TickReport};
pub use terrain::Terrain;

use lifegrid_core::{HostConfig, ModelKind, Result};

/// Build the model selected by a host configuration
pub fn build_model(config: &HostConfig) -> Result<Box<dyn Model>> {
    let model: Box<dyn Model> = match config.model {
        ModelKind::GameOfLife => Box::new(GameOfLife::new(config.game_of_life.clone())?),
        ModelKind::BriansBrain => Box::new(BriansBrain::new(config.brians_brain.clone())?),
        ModelKind::Schelling => Box::new(Schelling::new(config.schelling.clone())?),
        ModelKind::Terrain => Box::new(Terrain::new(config.terrain.clone())?),
    };
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid_core::Position;

    #[test]
    fn test_build_every_model() {
        let config = HostConfig::default().with_dimensions(12, 8).with_seed(1);

        for kind in ModelKind::all() {
            let mut model = build_model(&HostConfig {
                model: kind,
                ..config.clone()
            })
            .unwrap();

            assert_eq!(model.kind(), kind);
            assert_eq!(model.dimensions(), (12, 8));
            model.tick();
            assert!(model.cell_at(Position::new(11, 7)).is_some());
            assert!(model.color_at(Position::new(12, 7)).is_none());
        }
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = HostConfig::default();
        config.model = ModelKind::Schelling;
        config.schelling.groups.clear();
        assert!(build_model(&config).is_err());
    }

    #[test]
    fn test_build_rejects_oversized_grid() {
        for kind in ModelKind::all() {
            let config = HostConfig {
                model: kind,
                ..HostConfig::default().with_dimensions(65536, 65537)
            };
            assert!(build_model(&config).is_err(), "{} accepted", kind);
        }
    }
}
