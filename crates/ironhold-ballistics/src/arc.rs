//! Arc-fire solver.
//!
//! Solves the projectile range equation for a fixed launch speed and
//! always picks the high (lobbed) root. Computation is done in f64 in a
//! y-up frame and converted back to screen conventions at the end.

use std::f64::consts::FRAC_PI_2;

use glam::Vec2;

use crate::aim::direct_velocity;

/// Horizontal separation below which the shot is treated as vertical.
const VERTICAL_EPSILON: f64 = 1e-3;

/// A lobbed firing solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiringSolution {
    /// Launch angle above the horizontal, in `[0, π/2]`.
    pub elevation: f32,
    /// Launch angle in the turret convention, facing the target side.
    pub aim_angle: f32,
    /// Seconds until the shell reaches the target point.
    pub time_of_flight: f32,
}

/// Solve for a launch from `origin` that passes through `target` with
/// launch speed `v0` under downward gravity `g`.
///
/// Returns `None` when the target is out of reach for this speed, or the
/// geometry yields no positive time of flight. A missing solution is a
/// normal outcome: the turret simply holds fire.
pub fn solve_arc(origin: Vec2, target: Vec2, v0: f32, g: f32) -> Option<FiringSolution> {
    let v0 = f64::from(v0);
    let g = f64::from(g);
    if !(v0 > 0.0 && g > 0.0) {
        return None;
    }

    let dx_signed = f64::from(target.x) - f64::from(origin.x);
    // Height of the target above the origin.
    let dy = f64::from(origin.y) - f64::from(target.y);
    let dx = dx_signed.abs();
    let v0_sq = v0 * v0;

    if dx < VERTICAL_EPSILON {
        let rest = v0_sq - 2.0 * g * dy;
        if rest < 0.0 {
            return None;
        }
        // Descending pass through the target height.
        let time = (v0 + rest.sqrt()) / g;
        return finite_positive(time).map(|time_of_flight| FiringSolution {
            elevation: FRAC_PI_2 as f32,
            aim_angle: FRAC_PI_2 as f32,
            time_of_flight,
        });
    }

    let discriminant = v0_sq * v0_sq - g * (g * dx * dx + 2.0 * dy * v0_sq);
    if discriminant < 0.0 {
        return None;
    }
    let elevation = ((v0_sq + discriminant.sqrt()) / (g * dx)).atan();
    let time = dx / (v0 * elevation.cos());
    let time_of_flight = finite_positive(time)?;

    let aim_angle = if dx_signed >= 0.0 {
        elevation
    } else {
        std::f64::consts::PI - elevation
    };

    Some(FiringSolution {
        elevation: elevation as f32,
        aim_angle: aim_angle as f32,
        time_of_flight,
    })
}

/// Initial screen-space velocity for a solution.
pub fn arc_launch_velocity(solution: &FiringSolution, v0: f32) -> Vec2 {
    direct_velocity(solution.aim_angle, v0)
}

fn finite_positive(time: f64) -> Option<f32> {
    let time = time as f32;
    (time.is_finite() && time > 0.0).then_some(time)
}
