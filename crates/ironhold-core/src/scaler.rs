//! Reference-to-device unit conversion.
//!
//! Every tuning value in the crate is authored at the reference resolution.
//! The scaler converts them once, when entities are constructed or the grid
//! is laid out; nothing is rescaled per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{REFERENCE_GRAVITY, REFERENCE_HEIGHT, REFERENCE_TILE_SIZE, REFERENCE_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    factor: f32,
}

impl Scaler {
    /// Scaler for a device surface. Uses the smaller axis ratio so the
    /// reference playfield always fits.
    pub fn new(device_width: f32, device_height: f32) -> Self {
        let fx = device_width / REFERENCE_WIDTH;
        let fy = device_height / REFERENCE_HEIGHT;
        let factor = fx.min(fy);
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            1.0
        };
        Self { factor }
    }

    /// Identity scaler (device units equal reference units).
    pub fn reference() -> Self {
        Self { factor: 1.0 }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn scale(&self, value: f32) -> f32 {
        value * self.factor
    }

    pub fn scale_size(&self, size: Vec2) -> Vec2 {
        size * self.factor
    }

    pub fn scale_point(&self, point: Vec2) -> Vec2 {
        point * self.factor
    }

    pub fn tile_size(&self) -> f32 {
        self.scale(REFERENCE_TILE_SIZE)
    }

    /// Gravity is an acceleration; lengths scale linearly and time does
    /// not, so it scales by the same factor.
    pub fn gravity(&self) -> f32 {
        self.scale(REFERENCE_GRAVITY)
    }
}

impl Default for Scaler {
    fn default() -> Self {
        Self::reference()
    }
}
