//! Enemy movement and the defended-boundary check.

use hecs::{Entity, World};
use tracing::debug;

use ironhold_core::components::{EnemyState, Footprint};
use ironhold_core::enums::EnemyFate;
use ironhold_core::events::GameEvent;
use ironhold_core::types::{Position, StableId, Velocity};

use crate::simulation::{CityState, Playfield, ScoreState};

/// Move every active enemy. An enemy whose hitbox reaches `boundary_x`
/// damages the city and becomes inactive; one that leaves the playfield
/// is culled.
pub fn run(
    world: &mut World,
    dt: f32,
    boundary_x: f32,
    playfield: &Playfield,
    city: &mut CityState,
    score: &mut ScoreState,
    events: &mut Vec<GameEvent>,
) {
    let mut enemies: Vec<(StableId, Entity)> = world
        .query_mut::<(&StableId, &EnemyState)>()
        .into_iter()
        .filter(|(_, (_, enemy))| enemy.fate.is_none())
        .map(|(entity, (id, _))| (*id, entity))
        .collect();
    enemies.sort_by_key(|(id, _)| *id);

    for (id, entity) in enemies {
        let Ok((position, velocity, enemy, footprint)) = world
            .query_one_mut::<(&mut Position, &Velocity, &mut EnemyState, &Footprint)>(entity)
        else {
            continue;
        };
        position.0 += velocity.0 * dt;

        let leading_edge = position.0.x - footprint.hitbox.x * 0.5;
        if leading_edge <= boundary_x {
            enemy.fate = Some(EnemyFate::ReachedCity);
            city.hp = (city.hp - enemy.damage_to_city).max(0.0);
            score.enemies_leaked += 1;
            debug!(id = id.0, damage = enemy.damage_to_city, city_hp = city.hp, "enemy reached the city");
            events.push(GameEvent::EnemyReachedCity {
                id,
                damage: enemy.damage_to_city,
            });
        } else if playfield.is_outside(position.0.x, position.0.y) {
            enemy.fate = Some(EnemyFate::Culled);
        }
    }
}
