//! The buildable base grid.
//!
//! Row 0 is the reinforced foundation row and rows grow upward (toward
//! smaller screen y). The grid only ever grows: rows are appended at the
//! top and column blocks on both sides, so a cell's `GridPos` stays valid
//! for the lifetime of the run.

use glam::Vec2;
use hecs::Entity;

use ironhold_core::config::GridConfig;
use ironhold_core::enums::ExpandDirection;
use ironhold_core::scaler::Scaler;
use ironhold_core::types::{GridPos, Rect};

/// One buildable cell. Holds at most one building and, on a turret
/// platform, at most one turret.
#[derive(Debug, Clone)]
pub struct GridCell {
    pub pos: GridPos,
    pub reinforced: bool,
    pub building: Option<Entity>,
    pub turret: Option<Entity>,
}

#[derive(Debug, Clone)]
pub struct Grid {
    /// `rows[row][col - min_col]`.
    rows: Vec<Vec<GridCell>>,
    min_col: i32,
    cols: u32,
    tile_size: f32,
    origin_x: f32,
    ground_y: f32,
    expansions_up: u32,
    expansions_sideways: u32,
}

impl GridCell {
    fn new(pos: GridPos, reinforced: bool) -> Self {
        Self {
            pos,
            reinforced,
            building: None,
            turret: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.building.is_none() && self.turret.is_none()
    }
}

impl Grid {
    /// Lay out the initial grid in device units.
    pub fn new(config: &GridConfig, scaler: &Scaler) -> Self {
        let cols = config.cols.max(1);
        let rows = (0..config.rows.max(1))
            .map(|row| {
                (0..cols as i32)
                    .map(|col| GridCell::new(GridPos::new(row, col), row == 0))
                    .collect()
            })
            .collect();
        Self {
            rows,
            min_col: 0,
            cols,
            tile_size: scaler.tile_size(),
            origin_x: scaler.scale(config.origin_x),
            ground_y: scaler.scale(config.ground_y),
            expansions_up: 0,
            expansions_sideways: 0,
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn min_col(&self) -> i32 {
        self.min_col
    }

    pub fn max_col(&self) -> i32 {
        self.min_col + self.cols as i32 - 1
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    pub fn expansions(&self, direction: ExpandDirection) -> u32 {
        match direction {
            ExpandDirection::Up => self.expansions_up,
            ExpandDirection::Sideways => self.expansions_sideways,
        }
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.row < self.rows() && pos.col >= self.min_col && pos.col <= self.max_col()
    }

    fn index(&self, pos: GridPos) -> Option<(usize, usize)> {
        self.in_bounds(pos)
            .then(|| (pos.row as usize, (pos.col - self.min_col) as usize))
    }

    pub fn cell(&self, pos: GridPos) -> Option<&GridCell> {
        let (r, c) = self.index(pos)?;
        self.rows.get(r).and_then(|row| row.get(c))
    }

    pub fn cell_mut(&mut self, pos: GridPos) -> Option<&mut GridCell> {
        let (r, c) = self.index(pos)?;
        self.rows.get_mut(r).and_then(|row| row.get_mut(c))
    }

    /// All cells, bottom row first, columns left to right.
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.rows.iter().flat_map(|row| row.iter())
    }

    pub fn cell_center(&self, pos: GridPos) -> Vec2 {
        Vec2::new(
            self.origin_x + (pos.col as f32 + 0.5) * self.tile_size,
            self.ground_y - (pos.row as f32 + 0.5) * self.tile_size,
        )
    }

    pub fn cell_rect(&self, pos: GridPos) -> Rect {
        Rect::centered(self.cell_center(pos), Vec2::splat(self.tile_size))
    }

    /// Screen x of the defended boundary: the right edge of the grid.
    pub fn boundary_x(&self) -> f32 {
        self.origin_x + (self.max_col() + 1) as f32 * self.tile_size
    }

    /// Grow by one step in `direction`. New cells are never reinforced.
    pub fn expand(&mut self, direction: ExpandDirection, side_block_width: u32) {
        match direction {
            ExpandDirection::Up => {
                let row = self.rows();
                let new_row = (self.min_col..=self.max_col())
                    .map(|col| GridCell::new(GridPos::new(row, col), false))
                    .collect();
                self.rows.push(new_row);
                self.expansions_up += 1;
            }
            ExpandDirection::Sideways => {
                let width = side_block_width as i32;
                let old_min = self.min_col;
                let old_max = self.max_col();
                for (row_idx, row) in self.rows.iter_mut().enumerate() {
                    let row_idx = row_idx as u32;
                    let left = (old_min - width..old_min)
                        .map(|col| GridCell::new(GridPos::new(row_idx, col), false));
                    let right = (old_max + 1..=old_max + width)
                        .map(|col| GridCell::new(GridPos::new(row_idx, col), false));
                    let mut cells: Vec<GridCell> = left.collect();
                    cells.append(row);
                    cells.extend(right);
                    *row = cells;
                }
                self.min_col -= width;
                self.cols += 2 * side_block_width;
                self.expansions_sideways += 1;
            }
        }
    }
}
