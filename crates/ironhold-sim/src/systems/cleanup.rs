//! Cleanup system: prunes inactive enemies and spent projectiles.

use hecs::{Entity, World};

use ironhold_core::components::{EnemyState, ProjectileState};
use ironhold_core::types::Position;

use crate::simulation::Playfield;

/// Despawn enemies that are no longer active and projectiles that have
/// impacted, expired or left the playfield. Uses a pre-allocated buffer to
/// avoid per-tick allocation.
pub fn run(world: &mut World, playfield: &Playfield, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, enemy) in world.query_mut::<&EnemyState>() {
        if enemy.fate.is_some() {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (pos, projectile)) in world.query_mut::<(&Position, &ProjectileState)>() {
        if projectile.impacted
            || projectile.lifetime <= 0.0
            || playfield.is_outside(pos.0.x, pos.0.y)
        {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
