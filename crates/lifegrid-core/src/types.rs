//! Core type definitions for the simulation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D position on the grid (column `x`, row `y`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Step by a neighbour offset. `None` when the step leaves the `i32` range.
    pub fn offset(&self, offset: NeighborOffset) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(offset.dx)?,
            y: self.y.checked_add(offset.dy)?,
        })
    }

    /// Whether the position lies inside a `width` x `height` plane anchored at the origin
    pub fn within(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < width && self.y < height
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A relative step to one of the eight surrounding cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeighborOffset {
    pub dx: i32,
    pub dy: i32,
}

impl NeighborOffset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// The Moore neighborhood, row by row from the top-left. Never contains (0, 0).
pub const MOORE_NEIGHBORHOOD: [NeighborOffset; 8] = [
    NeighborOffset::new(-1, -1),
    NeighborOffset::new(0, -1),
    NeighborOffset::new(1, -1),
    NeighborOffset::new(-1, 0),
    NeighborOffset::new(1, 0),
    NeighborOffset::new(-1, 1),
    NeighborOffset::new(0, 1),
    NeighborOffset::new(1, 1),
];

/// An 8-bit RGBA display colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const MID_GRAY: Rgba = Rgba::rgb(128, 128, 128);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const GREEN: Rgba = Rgba::rgb(0, 255, 0);
    pub const BLUE: Rgba = Rgba::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A uniformly random opaque colour
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::rgb(rng.gen(), rng.gen(), rng.gen())
    }

    /// Rec. 601 luma, used by text renderers to pick a shade
    pub fn luma(&self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One classification band of a biome: values up to and including
/// `threshold` fall into this band unless an earlier band claims them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub name: String,
    pub color: Rgba,
    pub threshold: f64,
}

impl Band {
    pub fn new(name: impl Into<String>, color: Rgba, threshold: f64) -> Self {
        Self {
            name: name.into(),
            color,
            threshold,
        }
    }
}

/// A named, ordered list of bands covering [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biome {
    pub name: String,
    pub bands: Vec<Band>,
}

impl Biome {
    pub fn new(name: impl Into<String>, bands: Vec<Band>) -> Self {
        Self {
            name: name.into(),
            bands,
        }
    }

    /// Index of the first band whose upper bound is >= `value`.
    ///
    /// Bands are scanned in order, so their order decides the result when
    /// thresholds have been edited out of ascending order.
    pub fn classify(&self, value: f64) -> Option<usize> {
        self.bands.iter().position(|band| value <= band.threshold)
    }

    /// Like [`Biome::classify`], falling back to the last band on a miss
    pub fn classify_or_last(&self, value: f64) -> usize {
        self.classify(value)
            .unwrap_or_else(|| self.bands.len().saturating_sub(1))
    }

    /// Thresholds are non-decreasing and the last one is exactly 1.0
    pub fn is_well_formed(&self) -> bool {
        let ascending = self
            .bands
            .windows(2)
            .all(|pair| pair[0].threshold <= pair[1].threshold);
        let covers = self
            .bands
            .last()
            .map(|band| band.threshold == 1.0)
            .unwrap_or(false);
        ascending && covers
    }
}

/// The simulation variants a host can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    GameOfLife,
    BriansBrain,
    Schelling,
    Terrain,
}

impl ModelKind {
    pub fn all() -> [ModelKind; 4] {
        [
            ModelKind::GameOfLife,
            ModelKind::BriansBrain,
            ModelKind::Schelling,
            ModelKind::Terrain,
        ]
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::GameOfLife => "game_of_life",
            ModelKind::BriansBrain => "brians_brain",
            ModelKind::Schelling => "schelling",
            ModelKind::Terrain => "terrain",
        };
        f.write_str(name)
    }
}
