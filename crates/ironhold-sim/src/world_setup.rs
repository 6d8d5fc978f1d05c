//! Entity spawn factories.
//!
//! Builds the component bundle for each entity category from its stat
//! record. Reference-unit lengths and speeds are scaled to device units
//! here, once, so systems only ever see device units.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use ironhold_core::components::*;
use ironhold_core::enums::*;
use ironhold_core::scaler::Scaler;
use ironhold_core::stats::{placeholder_footprint, BuildingStats, EnemyStats, ProjectileStats, TurretStats};
use ironhold_core::types::{GridPos, Position, StableId, Velocity};
use ironhold_core::waves::VariantModifiers;

use crate::simulation::Playfield;

/// Spawn a building on a grid cell centered at `center`.
pub fn spawn_building(
    world: &mut World,
    id: StableId,
    kind: BuildingKind,
    pos: GridPos,
    center: Vec2,
    stats: &BuildingStats,
) -> Entity {
    world.spawn((
        id,
        pos,
        Position(center),
        BuildingState {
            kind,
            iron_per_minute: stats.iron_per_minute,
            storage_increase: stats.storage_increase,
            adjacency_bonus_per_unit: stats.adjacency_bonus_per_unit,
            adjacency_bonus: 0.0,
            turret_platform: stats.turret_platform,
        },
        Power {
            production: stats.power_production,
            consumption: stats.power_consumption,
            functional: true,
        },
        MinerStack::default(),
    ))
}

/// Spawn a turret mounted on the platform at `pos`.
#[allow(clippy::too_many_arguments)]
pub fn spawn_turret(
    world: &mut World,
    id: StableId,
    kind: TurretKind,
    pos: GridPos,
    center: Vec2,
    stats: &TurretStats,
    projectile: &ProjectileStats,
    scaler: &Scaler,
) -> Entity {
    let min_range = match stats.mode {
        FireMode::Direct => 0.0,
        FireMode::Arc => scaler.scale(stats.min_range),
    };
    world.spawn((
        id,
        pos,
        Position(center),
        TurretState {
            kind,
            mode: stats.mode,
            phase: TurretPhase::Idle,
            max_range: scaler.scale(stats.max_range),
            min_range,
            reload_secs: 1.0 / stats.fire_rate,
            cooldown: 0.0,
            muzzle_length: scaler.scale(stats.muzzle_length),
            launch_speed: scaler.scale(stats.launch_speed),
            projectile: stats.projectile,
            damage: projectile.damage,
            aoe_radius: scaler.scale(projectile.aoe_radius),
            projectile_lifetime: projectile.lifetime,
            aim_angle: 0.0,
            target: None,
        },
        Power {
            production: 0.0,
            consumption: stats.power_consumption,
            functional: true,
        },
    ))
}

/// Visual and collision bounds of an enemy kind in device units.
pub fn enemy_footprint(stats: &EnemyStats, scaler: &Scaler) -> Footprint {
    let visual = scaler.scale_size(stats.size.unwrap_or_else(placeholder_footprint));
    Footprint {
        visual,
        hitbox: visual * stats.hitbox_fraction,
    }
}

/// Entry point for a new enemy: just past the right edge, on a lane
/// jittered upward from the ground.
pub fn entry_position(rng: &mut ChaCha8Rng, playfield: &Playfield, footprint: &Footprint) -> Vec2 {
    let jitter = if playfield.spawn_band > 0.0 {
        rng.gen_range(0.0..playfield.spawn_band)
    } else {
        0.0
    };
    Vec2::new(
        playfield.spawn_x,
        playfield.ground_y - footprint.visual.y * 0.5 - jitter,
    )
}

/// Spawn an enemy walking left from `position`.
#[allow(clippy::too_many_arguments)]
pub fn spawn_enemy(
    world: &mut World,
    id: StableId,
    kind: EnemyKind,
    stats: &EnemyStats,
    variant: Option<VariantModifiers>,
    wave: u32,
    position: Vec2,
    scaler: &Scaler,
) -> Entity {
    let variant = variant.unwrap_or_default();
    let max_hp = stats.max_hp * variant.health_scale;
    let speed = scaler.scale(stats.speed) * variant.speed_scale;
    let reward = |value: u32| (value as f32 * variant.reward_scale).round() as u32;

    world.spawn((
        id,
        Position(position),
        Velocity::new(-speed, 0.0),
        EnemyState {
            kind,
            hp: max_hp,
            max_hp,
            speed,
            damage_to_city: stats.damage_to_city,
            reward_money: reward(stats.reward_money),
            reward_score: reward(stats.reward_score),
            wave,
            fate: None,
        },
        enemy_footprint(stats, scaler),
    ))
}

/// Spawn a projectile in flight.
pub fn spawn_projectile(
    world: &mut World,
    id: StableId,
    position: Vec2,
    velocity: Vec2,
    state: ProjectileState,
) -> Entity {
    world.spawn((id, Position(position), Velocity(velocity), state))
}
