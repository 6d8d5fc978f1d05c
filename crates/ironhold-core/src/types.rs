//! Fundamental geometric and simulation types.
//!
//! Positions are in device units with a top-left origin: x grows to the
//! right, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position of an entity center (device units).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// Velocity (device units per second).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

/// Stable, never-reused identifier assigned at construction.
///
/// Ordering on this id is the deterministic tie-breaker everywhere
/// (target selection, power shedding, collision order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StableId(pub u32);

/// Cell coordinate on the base grid.
/// Row 0 is the foundation row; rows grow upward. Columns may go negative
/// after sideways expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: u32,
    pub col: i32,
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of advanced (unpaused) ticks.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Squared distance to another position.
    pub fn distance_sq(&self, other: &Position) -> f32 {
        self.0.distance_squared(other.0)
    }
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Speed magnitude.
    pub fn speed(&self) -> f32 {
        self.0.length()
    }
}

impl GridPos {
    pub fn new(row: u32, col: i32) -> Self {
        Self { row, col }
    }

    /// The four orthogonal neighbors, skipping the (nonexistent) row below 0.
    /// Bounds against the grid are checked by the caller.
    pub fn orthogonal_neighbors(&self) -> impl Iterator<Item = GridPos> {
        let row = self.row;
        let col = self.col;
        let below = row.checked_sub(1).map(|r| GridPos::new(r, col));
        [
            Some(GridPos::new(row + 1, col)),
            below,
            Some(GridPos::new(row, col - 1)),
            Some(GridPos::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
    }

    /// Cell directly above.
    pub fn above(&self) -> GridPos {
        GridPos::new(self.row + 1, self.col)
    }

    /// Cell directly below, if any.
    pub fn below(&self) -> Option<GridPos> {
        self.row.checked_sub(1).map(|r| GridPos::new(r, self.col))
    }
}

impl Rect {
    /// Rectangle of `size` centered on `center`.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += f64::from(dt);
    }
}
