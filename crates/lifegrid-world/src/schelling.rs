//! Schelling segregation model with adaptive satisfaction threshold.
//!
//! Each tick visits every cell that held an agent when the tick started, in
//! row-major order. Unsatisfied agents move to a random empty cell straight
//! away, so agents visited later see the partially updated layout. Once the
//! whole population has stayed satisfied for `max_stable_streak` ticks in a
//! row the threshold is raised by a fixed increment, pushing the system out of
//! equilibrium again.

use crate::grid::Grid;
use crate::model::{CellState, Model, PauseState};
use lifegrid_core::{Error, ModelKind, Position, Result, Rgba, SchellingConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Slack for float accumulation when comparing the raised threshold to 1.0
const THRESHOLD_EPSILON: f64 = 1e-9;

/// Index into the configured list of agent groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Agent {
    Empty,
    Member(GroupId),
}

impl Agent {
    pub fn is_empty(&self) -> bool {
        *self == Agent::Empty
    }

    pub fn group(&self) -> Option<GroupId> {
        match self {
            Agent::Empty => None,
            Agent::Member(group) => Some(*group),
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Agents evaluated this tick
    pub total_agents: usize,
    pub satisfied_agents: usize,
    /// Unsatisfied agents that found an empty cell
    pub moved: usize,
    /// Unsatisfied agents left in place because no cell was empty
    pub blocked: usize,
    pub satisfaction_ratio: f64,
    /// Streak after this tick's bookkeeping
    pub stable_streak: u32,
    /// Threshold after this tick's bookkeeping
    pub threshold: f64,
    pub escalated: bool,
}

pub struct Schelling {
    grid: Grid<Agent>,
    groups: Vec<Rgba>,
    threshold: f64,
    stable_limit: f64,
    stable_streak: u32,
    max_stable_streak: u32,
    threshold_increment: f64,
    rng: ChaCha8Rng,
    pause: PauseState,
    ticks: u64,
    last_report: Option<TickReport>,
}

impl Schelling {
    /// Populate a grid where each cell is empty with probability `empty_ratio`
    /// and otherwise holds an agent from a uniformly chosen group
    pub fn new(config: SchellingConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let group_count = config.groups.len();
        let mut grid = Grid::new(config.width, config.height, Agent::Empty);
        grid.randomize(&mut rng, |rng| {
            if rng.gen_bool(config.empty_ratio) {
                Agent::Empty
            } else {
                Agent::Member(GroupId(rng.gen_range(0..group_count)))
            }
        });

        let empty = grid.iter().filter(|(_, a)| a.is_empty()).count();
        debug!(
            event = "model_created",
            model = "schelling",
            width = config.width,
            height = config.height,
            seed = config.seed,
            groups = group_count,
            empty_cells = empty,
            threshold = config.threshold,
            "Populated Schelling grid"
        );
        if empty == 0 {
            warn!("Schelling grid has no empty cells; unsatisfied agents cannot move");
        }

        Ok(Self::build(config, grid, rng))
    }

    /// Start from an explicit layout. Width and height in `config` are ignored.
    pub fn from_grid(config: SchellingConfig, grid: Grid<Agent>) -> Result<Self> {
        SchellingConfig {
            width: grid.width(),
            height: grid.height(),
            ..config.clone()
        }
        .validate()?;

        if let Some((pos, group)) = grid
            .iter()
            .filter_map(|(pos, agent)| agent.group().map(|g| (pos, g)))
            .find(|(_, group)| group.0 >= config.groups.len())
        {
            return Err(Error::Validation(format!(
                "Agent at {} belongs to unknown group {}",
                pos, group.0
            )));
        }

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self::build(config, grid, rng))
    }

    fn build(config: SchellingConfig, grid: Grid<Agent>, rng: ChaCha8Rng) -> Self {
        Self {
            grid,
            groups: config.groups,
            threshold: config.threshold,
            stable_limit: config.stable_limit,
            stable_streak: 0,
            max_stable_streak: config.max_stable_streak,
            threshold_increment: config.threshold_increment,
            rng,
            pause: PauseState::new(),
            ticks: 0,
            last_report: None,
        }
    }

    pub fn grid(&self) -> &Grid<Agent> {
        &self.grid
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn stable_streak(&self) -> u32 {
        self.stable_streak
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    pub fn group_color(&self, group: GroupId) -> Option<Rgba> {
        self.groups.get(group.0).copied()
    }

    /// Whether the occupant of `pos` has enough like neighbours.
    ///
    /// Empty cells, out-of-bounds positions and agents with no occupied
    /// neighbours are always satisfied.
    pub fn is_satisfied(&self, pos: Position) -> bool {
        let Some(group) = self.grid.get(pos).and_then(Agent::group) else {
            return true;
        };

        let (like, total) = self
            .grid
            .neighbors(pos)
            .filter_map(|(_, neighbor)| neighbor.group())
            .fold((0usize, 0usize), |(like, total), other| {
                (like + usize::from(other == group), total + 1)
            });

        if total == 0 {
            return true;
        }
        like as f64 / total as f64 >= self.threshold
    }

    /// Move the agent at `from` to a uniformly chosen empty cell.
    ///
    /// `empties` lists the currently empty cells and is kept in sync: the
    /// chosen slot is replaced by the vacated origin.
    fn relocate(&mut self, from: Position, empties: &mut [Position]) -> bool {
        if empties.is_empty() {
            return false;
        }

        let slot = self.rng.gen_range(0..empties.len());
        let to = empties[slot];
        self.grid.swap(from, to);
        empties[slot] = from;
        true
    }

    /// Streak bookkeeping and threshold escalation. Returns whether the
    /// threshold was raised.
    fn update_stability(&mut self, satisfaction_ratio: f64) -> bool {
        if satisfaction_ratio >= self.stable_limit {
            self.stable_streak += 1;
        } else {
            self.stable_streak = 0;
        }

        if self.stable_streak < self.max_stable_streak {
            return false;
        }

        self.stable_streak = 0;
        let raised = self.threshold + self.threshold_increment;
        if raised > 1.0 + THRESHOLD_EPSILON {
            debug!(
                threshold = self.threshold,
                "Stable at the highest threshold; not escalating"
            );
            return false;
        }

        let previous = self.threshold;
        self.threshold = raised.min(1.0);
        info!(
            event = "threshold_escalated",
            tick = self.ticks,
            previous,
            threshold = self.threshold,
            "Population settled; raising satisfaction threshold"
        );
        true
    }
}

impl Model for Schelling {
    fn kind(&self) -> ModelKind {
        ModelKind::Schelling
    }

    fn tick(&mut self) {
        if self.pause.is_paused() {
            return;
        }

        let occupied: Vec<Position> = self
            .grid
            .iter()
            .filter(|(_, agent)| !agent.is_empty())
            .map(|(pos, _)| pos)
            .collect();
        let mut empties: Vec<Position> = self
            .grid
            .iter()
            .filter(|(_, agent)| agent.is_empty())
            .map(|(pos, _)| pos)
            .collect();

        let mut report = TickReport {
            total_agents: occupied.len(),
            ..Default::default()
        };

        // Agents only ever move into cells that were empty at the time, so
        // every position in `occupied` still holds its original agent when
        // it is visited.
        for pos in occupied {
            if self.is_satisfied(pos) {
                report.satisfied_agents += 1;
            } else if self.relocate(pos, &mut empties) {
                report.moved += 1;
            } else {
                report.blocked += 1;
            }
        }

        report.satisfaction_ratio = if report.total_agents == 0 {
            1.0
        } else {
            report.satisfied_agents as f64 / report.total_agents as f64
        };

        self.ticks += 1;
        report.escalated = self.update_stability(report.satisfaction_ratio);
        report.stable_streak = self.stable_streak;
        report.threshold = self.threshold;

        if report.blocked > 0 {
            warn!(
                event = "relocation_blocked",
                tick = self.ticks,
                blocked = report.blocked,
                "No empty cell available; unsatisfied agents stayed put"
            );
        }
        debug!(
            event = "schelling_tick",
            tick = self.ticks,
            agents = report.total_agents,
            satisfied = report.satisfied_agents,
            moved = report.moved,
            ratio = report.satisfaction_ratio,
            streak = report.stable_streak,
            threshold = report.threshold,
            "Schelling tick"
        );

        self.last_report = Some(report);
    }

    fn cell_at(&self, pos: Position) -> Option<CellState> {
        self.grid.get(pos).map(|agent| CellState::Schelling(*agent))
    }

    fn color_at(&self, pos: Position) -> Option<Rgba> {
        self.grid.get(pos).map(|agent| match agent {
            Agent::Empty => Rgba::BLACK,
            Agent::Member(group) => self.group_color(*group).unwrap_or(Rgba::WHITE),
        })
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

    fn status(&self) -> String {
        let mut status = format!("Threshold: {:.2}", self.threshold);
        if self.is_paused() {
            status.push_str(" | Paused");
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InputFrame;

    const RED: Agent = Agent::Member(GroupId(0));
    const BLUE: Agent = Agent::Member(GroupId(1));
    const EMPTY: Agent = Agent::Empty;

    fn layout(rows: &[&str]) -> Grid<Agent> {
        let rows = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| match c {
                        'r' => RED,
                        'b' => BLUE,
                        _ => EMPTY,
                    })
                    .collect()
            })
            .collect();
        Grid::from_rows(rows).unwrap()
    }

    fn config(threshold: f64) -> SchellingConfig {
        SchellingConfig {
            threshold,
            ..Default::default()
        }
    }

    fn population(grid: &Grid<Agent>) -> (usize, usize) {
        let red = grid.iter().filter(|(_, a)| **a == RED).count();
        let blue = grid.iter().filter(|(_, a)| **a == BLUE).count();
        (red, blue)
    }

    #[test]
    fn test_satisfaction_fraction() {
        // Centre red sees 2 red and 3 blue neighbours: 2/5 = 0.4
        let grid = layout(&["rbr", "brb", "..."]);
        let centre = Position::new(1, 1);

        let model = Schelling::from_grid(config(0.4), grid.clone()).unwrap();
        assert!(model.is_satisfied(centre));

        let model = Schelling::from_grid(config(0.5), grid).unwrap();
        assert!(!model.is_satisfied(centre));
    }

    #[test]
    fn test_empty_and_isolated_cells_are_satisfied() {
        let model = Schelling::from_grid(config(1.0), layout(&["...", ".r.", "..."])).unwrap();
        assert!(model.is_satisfied(Position::new(1, 1)));
        assert!(model.is_satisfied(Position::new(0, 0)));
        assert!(model.is_satisfied(Position::new(5, 5)));
    }

    #[test]
    fn test_moves_happen_in_place() {
        // Red (0,0) is unhappy and takes the only empty cell at (2,0). Blue
        // is then visited against the updated row: its only occupied
        // neighbour is the red that just arrived, so it moves into (0,0).
        let mut model = Schelling::from_grid(config(1.0), layout(&["rb."])).unwrap();
        model.tick();

        assert_eq!(model.grid(), &layout(&["b.r"]));
        let report = model.last_report().unwrap();
        assert_eq!(report.total_agents, 2);
        assert_eq!(report.satisfied_agents, 0);
        assert_eq!(report.moved, 2);
        assert_eq!(report.blocked, 0);
    }

    #[test]
    fn test_population_is_conserved() {
        let cfg = SchellingConfig {
            width: 30,
            height: 20,
            seed: 77,
            threshold: 0.6,
            empty_ratio: 0.2,
            ..Default::default()
        };
        let mut model = Schelling::new(cfg).unwrap();
        let before = population(model.grid());

        for _ in 0..10 {
            model.tick();
            assert_eq!(population(model.grid()), before);
        }
    }

    #[test]
    fn test_full_grid_does_not_hang() {
        let grid = layout(&["rbrb", "brbr", "rbrb"]);
        let mut model = Schelling::from_grid(config(1.0), grid.clone()).unwrap();
        model.tick();

        assert_eq!(model.grid(), &grid);
        let report = model.last_report().unwrap();
        assert_eq!(report.moved, 0);
        assert_eq!(report.blocked, 12);
        assert_eq!(report.satisfaction_ratio, 0.0);
        assert_eq!(model.stable_streak(), 0);
    }

    #[test]
    fn test_empty_grid_is_trivially_stable() {
        let mut model = Schelling::from_grid(config(0.3), layout(&["...", "..."])).unwrap();
        model.tick();

        let report = model.last_report().unwrap();
        assert_eq!(report.total_agents, 0);
        assert_eq!(report.satisfaction_ratio, 1.0);
        assert_eq!(model.stable_streak(), 1);
    }

    #[test]
    fn test_threshold_escalates_after_max_streak() {
        // A single group is always fully satisfied
        let grid = layout(&["rrrr", "rr.r", "rrrr"]);
        let mut model = Schelling::from_grid(config(0.3), grid).unwrap();

        for tick in 1..=4 {
            model.tick();
            assert_eq!(model.stable_streak(), tick);
            assert_eq!(model.threshold(), 0.3);
            assert!(!model.last_report().unwrap().escalated);
        }

        model.tick();
        assert!((model.threshold() - 0.4).abs() < 1e-12);
        assert_eq!(model.stable_streak(), 0);
        assert!(model.last_report().unwrap().escalated);

        for _ in 0..5 {
            model.tick();
        }
        assert!((model.threshold() - 0.5).abs() < 1e-12);
        assert_eq!(model.status(), "Threshold: 0.50");
    }

    #[test]
    fn test_threshold_never_exceeds_one() {
        let grid = layout(&["rrr", "r.r"]);
        let cfg = SchellingConfig {
            threshold: 0.8,
            max_stable_streak: 1,
            ..Default::default()
        };
        let mut model = Schelling::from_grid(cfg, grid).unwrap();

        let mut previous = model.threshold();
        for _ in 0..10 {
            model.tick();
            assert!(model.threshold() >= previous);
            assert!(model.threshold() <= 1.0);
            assert_eq!(model.stable_streak(), 0);
            previous = model.threshold();
        }
        assert!((model.threshold() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unstable_tick_resets_streak() {
        // One empty cell, so every move has a single destination
        let cfg = SchellingConfig {
            threshold: 0.5,
            stable_limit: 0.75,
            max_stable_streak: 10,
            ..Default::default()
        };
        let mut model = Schelling::from_grid(cfg, layout(&["r.rrb"])).unwrap();

        // Only the blue at the end is unhappy: 3 of 4 satisfied
        model.tick();
        assert_eq!(model.grid(), &layout(&["rbrr."]));
        assert_eq!(model.last_report().unwrap().satisfaction_ratio, 0.75);
        assert_eq!(model.stable_streak(), 1);

        // The blue now unsettles the red beside it: 2 of 4 satisfied
        model.tick();
        assert_eq!(model.grid(), &layout(&["b.rrr"]));
        let report = model.last_report().unwrap();
        assert_eq!(report.satisfaction_ratio, 0.5);
        assert_eq!(report.moved, 2);
        assert_eq!(report.stable_streak, 0);
        assert_eq!(model.stable_streak(), 0);
        assert_eq!(model.threshold(), 0.5);
    }

    #[test]
    fn test_seeded_initial_layout() {
        let cfg = SchellingConfig {
            width: 50,
            height: 40,
            seed: 9,
            ..Default::default()
        };
        let model = Schelling::new(cfg.clone()).unwrap();
        let again = Schelling::new(cfg).unwrap();
        assert_eq!(model.grid(), again.grid());

        let empty = model.grid().iter().filter(|(_, a)| a.is_empty()).count();
        assert!(empty > 30 && empty < 200, "empty = {}", empty);

        let (red, blue) = population(model.grid());
        assert!(red > 0 && blue > 0);
    }

    #[test]
    fn test_rejects_unknown_group() {
        let grid = Grid::from_rows(vec![vec![Agent::Member(GroupId(5))]]).unwrap();
        assert!(Schelling::from_grid(config(0.3), grid).is_err());
    }

    #[test]
    fn test_paused_tick_is_a_no_op() {
        let mut model = Schelling::from_grid(config(1.0), layout(&["rb.", "b.r"])).unwrap();
        let before = model.grid().clone();

        model.handle_input(&InputFrame::pause_pressed());
        for _ in 0..5 {
            model.tick();
        }

        assert_eq!(model.grid(), &before);
        assert_eq!(model.ticks(), 0);
        assert!(model.last_report().is_none());
        assert_eq!(model.status(), "Threshold: 1.00 | Paused");
    }

    #[test]
    fn test_colors() {
        let model = Schelling::from_grid(config(0.3), layout(&["rb."])).unwrap();
        assert_eq!(model.color_at(Position::new(0, 0)), Some(Rgba::RED));
        assert_eq!(model.color_at(Position::new(1, 0)), Some(Rgba::BLUE));
        assert_eq!(model.color_at(Position::new(2, 0)), Some(Rgba::BLACK));
        assert_eq!(model.cell_at(Position::new(3, 0)), None);
    }
}
