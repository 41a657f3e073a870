//! 2D grid shared by every model.

use lifegrid_core::{Position, MOORE_NEIGHBORHOOD};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A bounded 2D grid of cells, stored row-major.
///
/// Coordinates outside `[0, width) x [0, height)` do not exist: lookups return
/// `None`, writes are ignored and neighbour queries skip them. There is no
/// wraparound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<C> {
    width: i32,
    height: i32,
    cells: Vec<C>,
}

impl<C: Clone> Grid<C> {
    /// Create a grid with every cell set to `fill`.
    ///
    /// Non-positive dimensions produce an empty grid.
    pub fn new(width: i32, height: i32, fill: C) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![fill; width as usize * height as usize],
        }
    }

    /// Create a grid from rows, top row first. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<C>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }

        Some(Self {
            width: width as i32,
            height: height as i32,
            cells: rows.into_iter().flatten().collect(),
        })
    }
}

impl<C> Grid<C> {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.within(self.width, self.height)
    }

    /// Get the cell at a position, `None` when out of bounds
    pub fn get(&self, pos: Position) -> Option<&C> {
        self.pos_to_index(pos).map(|index| &self.cells[index])
    }

    /// Set the cell at a position. Returns false (and does nothing) when out of bounds.
    pub fn set(&mut self, pos: Position, cell: C) -> bool {
        match self.pos_to_index(pos) {
            Some(index) => {
                self.cells[index] = cell;
                true
            }
            None => false,
        }
    }

    /// Swap the contents of two cells. Returns false when either is out of bounds.
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        match (self.pos_to_index(a), self.pos_to_index(b)) {
            (Some(i), Some(j)) => {
                self.cells.swap(i, j);
                true
            }
            _ => false,
        }
    }

    /// In-bounds Moore neighbours of a position
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = (Position, &C)> + '_ {
        MOORE_NEIGHBORHOOD.into_iter().filter_map(move |offset| {
            let neighbor_pos = pos.offset(offset)?;
            self.get(neighbor_pos).map(|cell| (neighbor_pos, cell))
        })
    }

    /// Count in-bounds Moore neighbours for which `is_live` holds
    pub fn count_neighbors<F>(&self, pos: Position, mut is_live: F) -> usize
    where
        F: FnMut(&C) -> bool,
    {
        self.neighbors(pos).filter(|(_, cell)| is_live(*cell)).count()
    }

    /// Replace every cell with `rule(pos, current, grid)`.
    ///
    /// All new states are computed from the previous generation before the
    /// grid swaps to the new one, so the rule never sees a half-updated grid.
    pub fn apply_rule<F>(&mut self, mut rule: F)
    where
        F: FnMut(Position, &C, &Grid<C>) -> C,
    {
        let next: Vec<C> = {
            let previous = &*self;
            previous
                .cells
                .iter()
                .enumerate()
                .map(|(i, cell)| rule(previous.index_to_pos(i), cell, previous))
                .collect()
        };
        self.cells = next;
    }

    /// Overwrite every cell with a freshly drawn value
    pub fn randomize<R, F>(&mut self, rng: &mut R, mut draw: F)
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R) -> C,
    {
        for cell in &mut self.cells {
            *cell = draw(rng);
        }
    }

    fn pos_to_index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    /// Iterator over all positions, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &C)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell))
    }
}
