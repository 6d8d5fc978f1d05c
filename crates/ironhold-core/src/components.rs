//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components. Per-kind stats are copied
//! into components (already scaled to device units) when an entity is
//! constructed, so systems never go back to the stat tables.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::StableId;

/// Electricity participation, shared by buildings and turrets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Power {
    /// Units produced while functional.
    pub production: f32,
    /// Units drawn while functional.
    pub consumption: f32,
    /// Recomputed once per tick from the global power snapshot.
    pub functional: bool,
}

/// A building occupying one grid cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingState {
    pub kind: BuildingKind,
    pub iron_per_minute: f32,
    pub storage_increase: f32,
    pub adjacency_bonus_per_unit: f32,
    /// Current bonus from orthogonal same-kind neighbors.
    pub adjacency_bonus: f32,
    /// Whether turrets may mount on this building.
    pub turret_platform: bool,
}

/// Presentation-only stacking context for miners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerStack {
    pub miner_above: bool,
    pub miner_below: bool,
}

/// Turret behavior state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurretState {
    pub kind: TurretKind,
    pub mode: FireMode,
    pub phase: TurretPhase,
    /// Maximum engagement range (device units).
    pub max_range: f32,
    /// Minimum engagement range; zero for direct-fire weapons.
    pub min_range: f32,
    /// Seconds between shots.
    pub reload_secs: f32,
    /// Seconds until the next shot is allowed.
    pub cooldown: f32,
    /// Distance from the turret center to the muzzle.
    pub muzzle_length: f32,
    /// Launch speed for arc weapons, projectile speed for direct ones.
    pub launch_speed: f32,
    pub projectile: ProjectileKind,
    /// Damage carried by each projectile.
    pub damage: f32,
    /// Area-of-effect radius of each projectile; zero for single-target hits.
    pub aoe_radius: f32,
    /// Flight time limit for direct-fire projectiles.
    pub projectile_lifetime: f32,
    /// Current aim in radians, counter-clockwise from +x on screen.
    pub aim_angle: f32,
    /// Weak reference into the live enemy set; revalidated every tick.
    pub target: Option<StableId>,
}

/// A projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileState {
    pub kind: ProjectileKind,
    pub mode: FireMode,
    pub damage: f32,
    /// Zero for single-target hits.
    pub aoe_radius: f32,
    /// Seconds until expiry (arc shells detonate at expiry).
    pub lifetime: f32,
    /// Downward acceleration; zero for direct-fire projectiles.
    pub gravity: f32,
    /// Set once so damage is never applied twice.
    pub impacted: bool,
    /// Turret that fired this projectile.
    pub source: StableId,
}

/// An enemy unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyState {
    pub kind: EnemyKind,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub damage_to_city: f32,
    pub reward_money: u32,
    pub reward_score: u32,
    /// Wave this enemy was spawned by.
    pub wave: u32,
    /// `None` while active.
    pub fate: Option<EnemyFate>,
}

/// Visual bounds and the tighter collision box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Footprint {
    pub visual: Vec2,
    pub hitbox: Vec2,
}
