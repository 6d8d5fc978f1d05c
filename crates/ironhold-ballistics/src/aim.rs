//! Aim geometry and direct-fire kinematics.

use glam::Vec2;

/// Angle from `from` to `to`. The y delta is negated because screen y
/// grows downward.
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    (-delta.y).atan2(delta.x)
}

/// Unit vector in screen space for an aim angle.
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), -angle.sin())
}

/// Muzzle tip of a barrel of `length` rotated to `angle` around `center`.
pub fn muzzle_point(center: Vec2, angle: f32, length: f32) -> Vec2 {
    center + direction(angle) * length
}

/// Constant velocity of a direct-fire projectile.
pub fn direct_velocity(angle: f32, speed: f32) -> Vec2 {
    direction(angle) * speed
}

/// Position after `t` seconds under constant downward acceleration
/// `gravity` (zero for direct fire).
pub fn position_at(origin: Vec2, velocity: Vec2, gravity: f32, t: f32) -> Vec2 {
    origin + velocity * t + Vec2::new(0.0, 0.5 * gravity * t * t)
}
