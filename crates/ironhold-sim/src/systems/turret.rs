//! Turret control: power gating, target validation and acquisition,
//! aiming and firing.
//!
//! Shots are collected into a fire buffer and only spawned once the
//! projectile pass of the same tick has run, so a projectile never moves
//! on the tick it was fired and turret order never changes what another
//! turret sees.

use glam::Vec2;
use hecs::{Entity, World};
use tracing::debug;

use ironhold_ballistics::{
    aim_angle, arc_launch_velocity, direct_velocity, muzzle_point, solve_arc, FiringSolution,
};
use ironhold_core::components::{EnemyState, Power, ProjectileState, TurretState};
use ironhold_core::enums::{FireMode, TurretKind, TurretPhase};
use ironhold_core::events::GameEvent;
use ironhold_core::types::{Position, StableId, Velocity};

use crate::simulation::{IdAllocator, ScoreState};
use crate::world_setup;

/// A live enemy as seen by the turrets this tick.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub id: StableId,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// A shot waiting to be spawned.
#[derive(Debug, Clone)]
pub struct FireOrder {
    turret: StableId,
    kind: TurretKind,
    position: Vec2,
    velocity: Vec2,
    projectile: ProjectileState,
}

/// Whether a target at squared distance `distance_sq` may be engaged.
pub fn in_range(turret: &TurretState, distance_sq: f32) -> bool {
    let max_sq = turret.max_range * turret.max_range;
    match turret.mode {
        FireMode::Direct => distance_sq <= max_sq,
        FireMode::Arc => {
            let min_sq = turret.min_range * turret.min_range;
            min_sq <= distance_sq && distance_sq <= max_sq
        }
    }
}

/// Nearest eligible candidate. `candidates` must be sorted by id so that
/// equidistant enemies resolve to the lowest id.
pub fn select_target(turret: &TurretState, center: Vec2, candidates: &[Candidate]) -> Option<Candidate> {
    let mut best: Option<(f32, Candidate)> = None;
    for candidate in candidates {
        let distance_sq = center.distance_squared(candidate.position);
        if !in_range(turret, distance_sq) {
            continue;
        }
        let precedes = match best {
            None => true,
            Some((best_sq, best_candidate)) => {
                distance_sq < best_sq || (distance_sq == best_sq && candidate.id < best_candidate.id)
            }
        };
        if precedes {
            best = Some((distance_sq, *candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}

/// Live enemies sorted by id.
pub fn collect_candidates(world: &World) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = world
        .query::<(&StableId, &Position, &Velocity, &EnemyState)>()
        .iter()
        .filter(|(_, (_, _, _, enemy))| enemy.fate.is_none())
        .map(|(_, (id, pos, vel, _))| Candidate {
            id: *id,
            position: pos.0,
            velocity: vel.0,
        })
        .collect();
    candidates.sort_by_key(|c| c.id);
    candidates
}

/// Run every turret for one tick and return the shots fired.
pub fn run(world: &mut World, dt: f32, gravity: f32) -> Vec<FireOrder> {
    let candidates = collect_candidates(world);

    let mut turrets: Vec<(StableId, Entity)> = world
        .query_mut::<(&StableId, &TurretState)>()
        .into_iter()
        .map(|(entity, (id, _))| (*id, entity))
        .collect();
    turrets.sort_by_key(|(id, _)| *id);

    let mut fire_buffer: Vec<FireOrder> = Vec::new();
    for (turret_id, entity) in turrets {
        let Ok((position, power, turret)) =
            world.query_one_mut::<(&Position, &Power, &mut TurretState)>(entity)
        else {
            continue;
        };
        let center = position.0;
        let functional = power.functional;
        if let Some(order) = step(turret, turret_id, center, functional, dt, gravity, &candidates) {
            fire_buffer.push(order);
        }
    }
    fire_buffer
}

/// Spawn buffered shots in firing order.
pub fn spawn_shots(
    world: &mut World,
    shots: Vec<FireOrder>,
    ids: &mut IdAllocator,
    score: &mut ScoreState,
    events: &mut Vec<GameEvent>,
) {
    for order in shots {
        let id = ids.next_id();
        world_setup::spawn_projectile(world, id, order.position, order.velocity, order.projectile);
        score.shots_fired += 1;
        debug!(turret = order.turret.0, projectile = id.0, "turret fired");
        events.push(GameEvent::TurretFired {
            turret: order.turret,
            projectile: id,
            kind: order.kind,
        });
    }
}

/// Advance one turret's state machine.
fn step(
    turret: &mut TurretState,
    turret_id: StableId,
    center: Vec2,
    functional: bool,
    dt: f32,
    gravity: f32,
    candidates: &[Candidate],
) -> Option<FireOrder> {
    if !functional {
        turret.phase = TurretPhase::Idle;
        turret.target = None;
        return None;
    }
    turret.cooldown = (turret.cooldown - dt).max(0.0);

    // The stored target is a weak reference: it must still be alive and in range.
    let current = turret
        .target
        .and_then(|id| {
            candidates
                .binary_search_by_key(&id, |c| c.id)
                .ok()
                .map(|idx| candidates[idx])
        })
        .filter(|c| in_range(turret, center.distance_squared(c.position)));

    let Some(target) = current.or_else(|| select_target(turret, center, candidates)) else {
        turret.target = None;
        turret.phase = TurretPhase::Scanning;
        return None;
    };
    turret.target = Some(target.id);

    let (muzzle, velocity, lifetime, shell_gravity) = match turret.mode {
        FireMode::Direct => {
            turret.aim_angle = aim_angle(center, target.position);
            let muzzle = muzzle_point(center, turret.aim_angle, turret.muzzle_length);
            let velocity = direct_velocity(turret.aim_angle, turret.launch_speed);
            (muzzle, velocity, turret.projectile_lifetime, 0.0)
        }
        FireMode::Arc => match arc_solution(turret, center, &target, gravity) {
            Some((muzzle, solution)) => {
                turret.aim_angle = solution.aim_angle;
                let velocity = arc_launch_velocity(&solution, turret.launch_speed);
                (muzzle, velocity, solution.time_of_flight, gravity)
            }
            None => {
                // No firing solution: keep tracking, hold fire.
                turret.aim_angle = aim_angle(center, target.position);
                turret.phase = TurretPhase::Tracking;
                return None;
            }
        },
    };

    if turret.cooldown > 0.0 {
        // A reload keeps its Cooldown phase until the timer runs out.
        if turret.phase != TurretPhase::Cooldown {
            turret.phase = TurretPhase::Tracking;
        }
        return None;
    }

    turret.cooldown = turret.reload_secs;
    turret.phase = TurretPhase::Cooldown;
    Some(FireOrder {
        turret: turret_id,
        kind: turret.kind,
        position: muzzle,
        velocity,
        projectile: ProjectileState {
            kind: turret.projectile,
            mode: turret.mode,
            damage: turret.damage,
            aoe_radius: turret.aoe_radius,
            lifetime,
            gravity: shell_gravity,
            impacted: false,
            source: turret_id,
        },
    })
}

/// Solve from the muzzle toward the target, leading it by the shell's
/// flight time. Falls back to the unled solution if the lead point is out
/// of reach.
fn arc_solution(
    turret: &TurretState,
    center: Vec2,
    target: &Candidate,
    gravity: f32,
) -> Option<(Vec2, FiringSolution)> {
    let unled = solve_from_muzzle(
        center,
        target.position,
        turret.launch_speed,
        turret.muzzle_length,
        gravity,
    )?;
    let lead = target.position + target.velocity * unled.1.time_of_flight;
    Some(solve_from_muzzle(center, lead, turret.launch_speed, turret.muzzle_length, gravity).unwrap_or(unled))
}

/// Firing solution launched from the barrel tip. The muzzle position
/// depends on the angle being solved for, so the solve is refined twice;
/// the barrel angle and the launch angle then agree to well under a
/// milliradian. The shell always starts at the returned muzzle, so its
/// trajectory ends on `point` exactly.
pub(crate) fn solve_from_muzzle(
    center: Vec2,
    point: Vec2,
    launch_speed: f32,
    muzzle_length: f32,
    gravity: f32,
) -> Option<(Vec2, FiringSolution)> {
    let mut solution = solve_arc(center, point, launch_speed, gravity)?;
    let mut muzzle = center;
    for _ in 0..2 {
        muzzle = muzzle_point(center, solution.aim_angle, muzzle_length);
        solution = solve_arc(muzzle, point, launch_speed, gravity)?;
    }
    Some((muzzle, solution))
}
