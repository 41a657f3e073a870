//! Conway's Game of Life with colour-coded lineages.

use crate::grid::Grid;
use crate::model::{CellState, Model, PauseState};
use lifegrid_core::{ColorMode, GameOfLifeConfig, ModelKind, Position, Result, Rgba};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A Game of Life cell. Live cells carry the colour of their lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeCell {
    Dead,
    Alive(Rgba),
}

impl LifeCell {
    pub fn is_alive(&self) -> bool {
        matches!(self, LifeCell::Alive(_))
    }

    pub fn color(&self) -> Rgba {
        match self {
            LifeCell::Dead => Rgba::BLACK,
            LifeCell::Alive(color) => *color,
        }
    }
}

/// B3/S23: survive on 2 or 3 live neighbours, be born on exactly 3.
///
/// `birth_color` is only called when a dead cell comes alive.
pub fn life_rule<F>(current: LifeCell, live_neighbors: usize, birth_color: F) -> LifeCell
where
    F: FnOnce() -> Rgba,
{
    match (current, live_neighbors) {
        (LifeCell::Alive(color), 2 | 3) => LifeCell::Alive(color),
        (LifeCell::Dead, 3) => LifeCell::Alive(birth_color()),
        _ => LifeCell::Dead,
    }
}

fn pick_color(mode: ColorMode, palette: &[Rgba], rng: &mut ChaCha8Rng) -> Rgba {
    match mode {
        ColorMode::BlackWhite => Rgba::WHITE,
        ColorMode::RandomColor => Rgba::random(rng),
        ColorMode::SetColor => palette.choose(rng).copied().unwrap_or(Rgba::WHITE),
    }
}

pub struct GameOfLife {
    grid: Grid<LifeCell>,
    mode: ColorMode,
    palette: Vec<Rgba>,
    rng: ChaCha8Rng,
    pause: PauseState,
    generation: u64,
}

impl GameOfLife {
    /// Create a randomly seeded board
    pub fn new(config: GameOfLifeConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut grid = Grid::new(config.width, config.height, LifeCell::Dead);
        grid.randomize(&mut rng, |rng| {
            if rng.gen_bool(config.live_probability) {
                LifeCell::Alive(pick_color(config.mode, &config.palette, rng))
            } else {
                LifeCell::Dead
            }
        });

        debug!(
            event = "model_created",
            model = "game_of_life",
            width = config.width,
            height = config.height,
            seed = config.seed,
            mode = ?config.mode,
            live_cells = grid.iter().filter(|(_, c)| c.is_alive()).count(),
            "Seeded Game of Life board"
        );

        Ok(Self {
            grid,
            mode: config.mode,
            palette: config.palette,
            rng,
            pause: PauseState::new(),
            generation: 0,
        })
    }

    /// Start from an explicit board. Width and height in `config` are ignored.
    pub fn from_grid(config: GameOfLifeConfig, grid: Grid<LifeCell>) -> Result<Self> {
        GameOfLifeConfig {
            width: grid.width(),
            height: grid.height(),
            ..config.clone()
        }
        .validate()?;

        Ok(Self {
            grid,
            mode: config.mode,
            palette: config.palette,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            pause: PauseState::new(),
            generation: 0,
        })
    }

    pub fn grid(&self) -> &Grid<LifeCell> {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn live_count(&self) -> usize {
        self.grid.iter().filter(|(_, c)| c.is_alive()).count()
    }
}

impl Model for GameOfLife {
    fn kind(&self) -> ModelKind {
        ModelKind::GameOfLife
    }

    fn tick(&mut self) {
        if self.pause.is_paused() {
            return;
        }

        let mode = self.mode;
        let palette = &self.palette;
        let rng = &mut self.rng;
        self.grid.apply_rule(|pos, cell, previous| {
            let live = previous.count_neighbors(pos, LifeCell::is_alive);
            life_rule(*cell, live, || pick_color(mode, palette, rng))
        });

        self.generation += 1;
        trace!(
            generation = self.generation,
            live_cells = self.live_count(),
            "Game of Life tick"
        );
    }

    fn cell_at(&self, pos: Position) -> Option<CellState> {
        self.grid.get(pos).map(|cell| CellState::Life(*cell))
    }

    fn color_at(&self, pos: Position) -> Option<Rgba> {
        self.grid.get(pos).map(LifeCell::color)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InputFrame;

    const ON: LifeCell = LifeCell::Alive(Rgba::WHITE);
    const OFF: LifeCell = LifeCell::Dead;

    fn board(rows: &[&str]) -> Grid<LifeCell> {
        let rows = rows
            .iter()
            .map(|row| row.chars().map(|c| if c == '#' { ON } else { OFF }).collect())
            .collect();
        Grid::from_rows(rows).unwrap()
    }

    fn snapshot(game: &GameOfLife) -> Vec<bool> {
        game.grid().iter().map(|(_, c)| c.is_alive()).collect()
    }

    #[test]
    fn test_rule_table() {
        let red = LifeCell::Alive(Rgba::RED);
        let born = || Rgba::GREEN;

        assert_eq!(life_rule(red, 1, born), OFF);
        assert_eq!(life_rule(red, 2, born), red);
        assert_eq!(life_rule(red, 3, born), red);
        assert_eq!(life_rule(red, 4, born), OFF);
        assert_eq!(life_rule(OFF, 2, born), OFF);
        assert_eq!(life_rule(OFF, 3, born), LifeCell::Alive(Rgba::GREEN));
        assert_eq!(life_rule(OFF, 4, born), OFF);
    }

    #[test]
    fn test_block_is_still_life() {
        let grid = board(&["......", ".##...", ".##...", "......", "......"]);
        let mut game = GameOfLife::from_grid(GameOfLifeConfig::default(), grid.clone()).unwrap();

        for _ in 0..10 {
            game.tick();
            assert_eq!(game.grid(), &grid);
        }
        assert_eq!(game.generation(), 10);
    }

    #[test]
    fn test_blinker_oscillates() {
        let horizontal = board(&[".....", ".....", ".###.", ".....", "....."]);
        let vertical = board(&[".....", "..#..", "..#..", "..#..", "....."]);
        let mut game = GameOfLife::from_grid(GameOfLifeConfig::default(), horizontal.clone()).unwrap();

        game.tick();
        assert_eq!(game.grid(), &vertical);
        game.tick();
        assert_eq!(game.grid(), &horizontal);
    }

    #[test]
    fn test_survivors_keep_lineage_color() {
        let mut grid = board(&["....", ".##.", ".##.", "...."]);
        grid.set(Position::new(1, 1), LifeCell::Alive(Rgba::RED));
        let mut game = GameOfLife::from_grid(GameOfLifeConfig::default(), grid).unwrap();

        game.tick();
        assert_eq!(
            game.cell_at(Position::new(1, 1)),
            Some(CellState::Life(LifeCell::Alive(Rgba::RED)))
        );
    }

    #[test]
    fn test_set_color_births_use_palette() {
        let config = GameOfLifeConfig {
            mode: ColorMode::SetColor,
            palette: vec![Rgba::RED, Rgba::BLUE],
            ..Default::default()
        };
        let mut game = GameOfLife::from_grid(config, board(&[".....", ".###.", "....."])).unwrap();

        game.tick();
        for pos in [Position::new(2, 0), Position::new(2, 2)] {
            let color = game.color_at(pos).unwrap();
            assert!(color == Rgba::RED || color == Rgba::BLUE);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = GameOfLifeConfig {
            width: 30,
            height: 20,
            seed: 42,
            mode: ColorMode::RandomColor,
            ..Default::default()
        };
        let mut a = GameOfLife::new(config.clone()).unwrap();
        let mut b = GameOfLife::new(config).unwrap();

        for _ in 0..5 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn test_initial_density_is_roughly_half() {
        let config = GameOfLifeConfig {
            width: 100,
            height: 100,
            seed: 1,
            ..Default::default()
        };
        let game = GameOfLife::new(config).unwrap();
        let live = game.live_count();
        assert!(live > 4_000 && live < 6_000, "live = {}", live);
    }

    #[test]
    fn test_seeded_ten_by_ten_first_tick() {
        let config = GameOfLifeConfig {
            width: 10,
            height: 10,
            seed: 2024,
            ..Default::default()
        };
        let mut game = GameOfLife::new(config).unwrap();
        let before = game.grid().clone();

        let expected = |pos: Position| {
            let alive = before.get(pos).unwrap().is_alive();
            let mut live = 0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if (dx, dy) == (0, 0) {
                        continue;
                    }
                    let (x, y) = (pos.x + dx, pos.y + dy);
                    if (0..10).contains(&x) && (0..10).contains(&y) {
                        if before.get(Position::new(x, y)).unwrap().is_alive() {
                            live += 1;
                        }
                    }
                }
            }
            if alive {
                live == 2 || live == 3
            } else {
                live == 3
            }
        };

        game.tick();

        // Interior, edge and corner cells
        for pos in [
            Position::new(4, 5),
            Position::new(0, 3),
            Position::new(9, 7),
            Position::new(6, 0),
            Position::new(0, 0),
        ] {
            let after = game.grid().get(pos).unwrap().is_alive();
            assert_eq!(after, expected(pos), "mismatch at {}", pos);
        }
    }

    #[test]
    fn test_paused_tick_is_a_no_op() {
        let config = GameOfLifeConfig {
            width: 16,
            height: 16,
            seed: 3,
            ..Default::default()
        };
        let mut game = GameOfLife::new(config).unwrap();
        let before = snapshot(&game);

        game.handle_input(&InputFrame::pause_pressed());
        assert!(game.is_paused());
        for _ in 0..20 {
            game.tick();
        }

        assert_eq!(snapshot(&game), before);
        assert_eq!(game.generation(), 0);
        assert_eq!(game.status(), "Paused");
    }

    #[test]
    fn test_out_of_bounds_lookup() {
        let game = GameOfLife::from_grid(GameOfLifeConfig::default(), board(&["#."])).unwrap();
        assert_eq!(game.dimensions(), (2, 1));
        assert_eq!(game.cell_at(Position::new(2, 0)), None);
        assert_eq!(game.color_at(Position::new(0, -1)), None);
        assert_eq!(game.color_at(Position::new(1, 0)), Some(Rgba::BLACK));
    }
}
