//! Projectile flight and impact resolution.
//!
//! Motion uses exact constant-acceleration kinematics, clipped to the
//! remaining lifetime. Direct-fire projectiles sweep the segment travelled
//! this tick against enemy hitboxes; arc shells fly over enemies and
//! detonate when their time of flight runs out or they reach the ground.

use glam::Vec2;
use hecs::{Entity, World};

use ironhold_ballistics::position_at;
use ironhold_core::components::{EnemyState, Footprint, ProjectileState};
use ironhold_core::enums::FireMode;
use ironhold_core::events::GameEvent;
use ironhold_core::types::{Position, Rect, StableId, Velocity};

use crate::economy::Ledger;
use crate::simulation::{Playfield, ScoreState};
use crate::systems::damage;

/// What a projectile struck this tick.
enum Impact {
    Enemy { point: Vec2, enemy: Entity },
    Point(Vec2),
}

/// Advance every projectile in ascending id order.
pub fn run(
    world: &mut World,
    dt: f32,
    playfield: &Playfield,
    ledger: &mut Ledger,
    score: &mut ScoreState,
    events: &mut Vec<GameEvent>,
) {
    let mut projectiles: Vec<(StableId, Entity)> = world
        .query_mut::<(&StableId, &ProjectileState)>()
        .into_iter()
        .map(|(entity, (id, _))| (*id, entity))
        .collect();
    projectiles.sort_by_key(|(id, _)| *id);

    let mut targets: Vec<(StableId, Entity, Rect)> = world
        .query_mut::<(&StableId, &Position, &Footprint, &EnemyState)>()
        .into_iter()
        .filter(|(_, (_, _, _, enemy))| enemy.fate.is_none())
        .map(|(entity, (id, pos, footprint, _))| {
            (*id, entity, Rect::centered(pos.0, footprint.hitbox))
        })
        .collect();
    targets.sort_by_key(|(id, _, _)| *id);

    for (projectile_id, entity) in projectiles {
        let Ok((position, velocity, state)) =
            world.query_one_mut::<(&mut Position, &mut Velocity, &mut ProjectileState)>(entity)
        else {
            continue;
        };
        if state.impacted || state.lifetime <= 0.0 {
            continue;
        }

        let start = position.0;
        let step = dt.min(state.lifetime);
        let mut end = position_at(start, velocity.0, state.gravity, step);
        velocity.0.y += state.gravity * step;
        state.lifetime -= step;

        let mode = state.mode;
        let expired = state.lifetime <= 0.0;
        if mode == FireMode::Arc && end.y >= playfield.ground_y {
            end.y = playfield.ground_y;
        }
        position.0 = end;

        let impact = match mode {
            FireMode::Direct => first_hit(world, &targets, start, end),
            FireMode::Arc => (expired || end.y >= playfield.ground_y).then_some(Impact::Point(end)),
        };
        let Some(impact) = impact else {
            continue;
        };

        let Ok(mut state) = world.get::<&mut ProjectileState>(entity) else {
            continue;
        };
        if state.impacted {
            continue;
        }
        state.impacted = true;
        let (damage, aoe_radius) = (state.damage, state.aoe_radius);
        drop(state);

        let point = match impact {
            Impact::Enemy { point, enemy } => {
                if aoe_radius <= 0.0 {
                    damage::apply_damage(world, enemy, damage, ledger, score, events);
                } else {
                    damage::trigger_aoe_damage(world, point, aoe_radius, damage, ledger, score, events);
                }
                point
            }
            Impact::Point(point) => {
                if aoe_radius > 0.0 {
                    damage::trigger_aoe_damage(world, point, aoe_radius, damage, ledger, score, events);
                }
                point
            }
        };
        if let Ok(mut position) = world.get::<&mut Position>(entity) {
            position.0 = point;
        }
        events.push(GameEvent::ProjectileImpact {
            projectile: projectile_id,
            position: point,
            aoe_radius,
        });
    }
}

/// Earliest active enemy hitbox entered along `start → end`; equal entry
/// points resolve to the lowest id.
fn first_hit(
    world: &World,
    targets: &[(StableId, Entity, Rect)],
    start: Vec2,
    end: Vec2,
) -> Option<Impact> {
    let mut best: Option<(f32, Entity)> = None;
    for (_, entity, hitbox) in targets {
        let active = world
            .get::<&EnemyState>(*entity)
            .map(|e| e.fate.is_none())
            .unwrap_or(false);
        if !active {
            continue;
        }
        let Some(t) = segment_entry(start, end, hitbox) else {
            continue;
        };
        if best.map_or(true, |(best_t, _)| t < best_t) {
            best = Some((t, *entity));
        }
    }
    best.map(|(t, enemy)| Impact::Enemy {
        point: start + (end - start) * t,
        enemy,
    })
}

/// Parameter in `[0, 1]` at which the segment `start → end` first touches
/// `rect` (slab test), or `None` if it misses.
pub fn segment_entry(start: Vec2, end: Vec2, rect: &Rect) -> Option<f32> {
    let delta = end - start;
    let (min, max) = (rect.min, rect.max());
    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;
    for axis in 0..2 {
        let (s, d) = (start[axis], delta[axis]);
        if d.abs() <= f32::EPSILON {
            if s < min[axis] || s > max[axis] {
                return None;
            }
            continue;
        }
        let mut t0 = (min[axis] - s) / d;
        let mut t1 = (max[axis] - s) / d;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }
    Some(t_enter)
}
