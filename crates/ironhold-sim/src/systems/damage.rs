//! Damage resolution against enemies, single-target and area-of-effect.
//!
//! A kill is credited immediately (reward money, score, event) and the
//! enemy becomes inactive on the spot, so later hits in the same tick skip
//! it.

use glam::Vec2;
use hecs::{Entity, World};
use tracing::debug;

use ironhold_core::components::EnemyState;
use ironhold_core::enums::EnemyFate;
use ironhold_core::events::GameEvent;
use ironhold_core::types::{Position, StableId};

use crate::economy::Ledger;
use crate::simulation::ScoreState;

/// Apply `damage` to one enemy. Returns `true` if this hit killed it.
pub fn apply_damage(
    world: &World,
    entity: Entity,
    damage: f32,
    ledger: &mut Ledger,
    score: &mut ScoreState,
    events: &mut Vec<GameEvent>,
) -> bool {
    let Ok(mut enemy) = world.get::<&mut EnemyState>(entity) else {
        return false;
    };
    if enemy.fate.is_some() {
        return false;
    }
    enemy.hp = (enemy.hp - damage).clamp(0.0, enemy.max_hp);
    if enemy.hp > 0.0 {
        return false;
    }

    enemy.fate = Some(EnemyFate::Killed);
    ledger.earn(enemy.reward_money, 0.0);
    score.points = score.points.saturating_add(enemy.reward_score);
    score.enemies_killed += 1;

    let id = world
        .get::<&StableId>(entity)
        .map(|id| *id)
        .unwrap_or(StableId(u32::MAX));
    debug!(id = id.0, kind = ?enemy.kind, "enemy killed");
    events.push(GameEvent::EnemyKilled {
        id,
        kind: enemy.kind,
        reward_money: enemy.reward_money,
    });
    true
}

/// Damage every active enemy whose position lies within `radius` of
/// `center` (boundary inclusive), in ascending id order. Returns the
/// number of enemies hit.
pub fn trigger_aoe_damage(
    world: &World,
    center: Vec2,
    radius: f32,
    damage: f32,
    ledger: &mut Ledger,
    score: &mut ScoreState,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let radius_sq = radius * radius;
    let mut victims: Vec<(StableId, Entity)> = world
        .query::<(&StableId, &Position, &EnemyState)>()
        .iter()
        .filter(|(_, (_, pos, enemy))| {
            enemy.fate.is_none() && pos.0.distance_squared(center) <= radius_sq
        })
        .map(|(entity, (id, _, _))| (*id, entity))
        .collect();
    victims.sort_by_key(|(id, _)| *id);

    for (_, entity) in &victims {
        apply_damage(world, *entity, damage, ledger, score, events);
    }
    victims.len() as u32
}
