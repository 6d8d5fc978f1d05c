//! Firing solutions for IRONHOLD turrets.
//!
//! Pure functions only: no entity or world access. Inputs and outputs use
//! screen coordinates (top-left origin, y down). Angles use the turret
//! convention: radians counter-clockwise from +x as the player sees it,
//! so an angle of π/2 points straight up the screen.

pub mod aim;
pub mod arc;

pub use aim::{aim_angle, direct_velocity, direction, muzzle_point, position_at};
pub use arc::{arc_launch_velocity, solve_arc, FiringSolution};
