//! Tests for the engine, economy, placement rules, power allocation, wave
//! scheduling and the combat pipeline.

use glam::Vec2;
use proptest::prelude::*;

use ironhold_core::commands::PlayerCommand;
use ironhold_core::config::{GameConfig, TimingConfig};
use ironhold_core::enums::*;
use ironhold_core::error::{PlacementError, SimError};
use ironhold_core::events::GameEvent;
use ironhold_core::stats::Cost;
use ironhold_core::waves::{WaveDefinition, WaveGroup, WaveTable};

use crate::economy::Ledger;
use crate::engine::{SimConfig, SimulationEngine};
use crate::systems::projectile::segment_entry;
use crate::systems::wave_spawner::{flatten_wave, WaveSchedule, WaveScheduler};

const GENERATOR: BuildItem = BuildItem::Building(BuildingKind::Generator);
const FRAME: BuildItem = BuildItem::Building(BuildingKind::Frame);
const MINER: BuildItem = BuildItem::Building(BuildingKind::Miner);
const STORAGE: BuildItem = BuildItem::Building(BuildingKind::Storage);
const GATLING: BuildItem = BuildItem::Turret(TurretKind::Gatling);
const MORTAR: BuildItem = BuildItem::Turret(TurretKind::Mortar);

/// Default balance with the first wave pushed far into the future, so
/// tests control every enemy themselves.
fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.timing.preparation_time = 10_000.0;
    config
}

fn engine_with(config: GameConfig) -> SimulationEngine {
    SimulationEngine::new(SimConfig {
        game: config,
        ..Default::default()
    })
    .unwrap()
}

// ---- End-to-end combat ----

#[test]
fn test_gatling_kills_enemy_and_pays_reward() {
    let mut config = quiet_config();
    {
        let gatling = config.stats.turrets.get_mut(&TurretKind::Gatling).unwrap();
        gatling.fire_rate = 10.0;
        gatling.launch_speed = 1000.0;
    }
    let mut engine = engine_with(config);

    engine.place(GENERATOR, 0, 0).unwrap();
    engine.place(FRAME, 0, 3).unwrap();
    engine.place(GATLING, 0, 3).unwrap();

    // Rightmost foundation cell is centered at (368, 624); the boundary is x = 384.
    let ground = engine.grid().ground_y();
    let enemy = engine
        .spawn_enemy_at(EnemyKind::Basic, Vec2::new(440.0, ground - 14.0))
        .unwrap();

    // One 10-damage bullet per 0.1 s tick against a 50 hp enemy. A shot
    // only starts moving on the tick after it was fired.
    let first = engine.tick(0.1);
    assert_eq!(first.projectiles.len(), 1);
    assert_eq!(first.enemies[0].hp, 50.0);
    for _ in 0..4 {
        engine.tick(0.1);
    }
    let snap = engine.snapshot();
    let view = snap.enemies.iter().find(|e| e.id == enemy).unwrap();
    assert_eq!(view.hp, 10.0);

    let money_before = engine.ledger().money();
    let snap = engine.tick(0.1);
    assert!(snap.enemies.iter().all(|e| e.id != enemy), "killed enemy is pruned");
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyKilled { id, .. } if *id == enemy)));
    assert_eq!(snap.economy.money, money_before + 15, "kill pays the Basic reward");
    assert_eq!(snap.score.enemies_killed, 1);
    assert_eq!(snap.score.points, 10);
    assert_eq!(snap.score.enemies_leaked, 0);
    assert_eq!(snap.city.hp, snap.city.max_hp);
}

#[test]
fn test_equidistant_enemies_target_lowest_id() {
    let mut engine = engine_with(quiet_config());
    engine.place(GENERATOR, 0, 0).unwrap();
    engine.place(FRAME, 0, 3).unwrap();
    engine.place(GATLING, 0, 3).unwrap();

    let center = engine.grid().cell_center(ironhold_core::types::GridPos::new(0, 3));
    let first = engine
        .spawn_enemy_at(EnemyKind::Basic, center + Vec2::new(72.0, 10.0))
        .unwrap();
    let _second = engine
        .spawn_enemy_at(EnemyKind::Basic, center + Vec2::new(72.0, -10.0))
        .unwrap();

    let snap = engine.tick(0.01);
    assert_eq!(snap.turrets.len(), 1);
    assert_eq!(snap.turrets[0].target, Some(first));
}

#[test]
fn test_unpowered_turret_stays_idle() {
    let mut engine = engine_with(quiet_config());
    engine.place(FRAME, 0, 3).unwrap();
    engine.place(GATLING, 0, 3).unwrap();
    let ground = engine.grid().ground_y();
    engine
        .spawn_enemy_at(EnemyKind::Basic, Vec2::new(440.0, ground - 14.0))
        .unwrap();

    let snap = engine.tick(0.1);
    let turret = &snap.turrets[0];
    assert!(!turret.functional);
    assert_eq!(turret.phase, TurretPhase::Idle);
    assert_eq!(turret.target, None);
    assert!(snap.projectiles.is_empty());
    assert_eq!(snap.score.shots_fired, 0);
}

#[test]
fn test_mortar_shell_damages_moving_enemy() {
    let mut engine = engine_with(quiet_config());
    engine.place(GENERATOR, 0, 0).unwrap();
    engine.place(FRAME, 0, 3).unwrap();
    engine.place(MORTAR, 0, 3).unwrap();

    let ground = engine.grid().ground_y();
    let enemy = engine
        .spawn_enemy_at(EnemyKind::Basic, Vec2::new(700.0, ground - 14.0))
        .unwrap();

    let mut fired = false;
    let mut impacted = false;
    for _ in 0..60 {
        let snap = engine.tick(0.05);
        for event in &snap.events {
            match event {
                GameEvent::TurretFired { kind, .. } => {
                    assert_eq!(*kind, TurretKind::Mortar);
                    fired = true;
                }
                GameEvent::ProjectileImpact { aoe_radius, .. } => {
                    assert_eq!(*aoe_radius, 48.0);
                    impacted = true;
                }
                _ => {}
            }
        }
    }
    assert!(fired, "enemy within mortar range should be engaged");
    assert!(impacted, "shell should land within its time of flight");

    let snap = engine.snapshot();
    let view = snap.enemies.iter().find(|e| e.id == enemy).unwrap();
    assert_eq!(view.hp, 20.0, "one 30-damage shell should have hit");
}

#[test]
fn test_mortar_ignores_enemy_inside_minimum_range() {
    let mut engine = engine_with(quiet_config());
    engine.place(GENERATOR, 0, 0).unwrap();
    engine.place(FRAME, 0, 3).unwrap();
    engine.place(MORTAR, 0, 3).unwrap();

    let center = engine.grid().cell_center(ironhold_core::types::GridPos::new(0, 3));
    engine
        .spawn_enemy_at(EnemyKind::Basic, center + Vec2::new(60.0, 0.0))
        .unwrap();

    let snap = engine.tick(0.01);
    assert_eq!(snap.turrets[0].phase, TurretPhase::Scanning);
    assert_eq!(snap.turrets[0].target, None);
    assert_eq!(snap.score.shots_fired, 0);
}

#[test]
fn test_turret_reloads_in_cooldown_then_rescans() {
    let mut engine = engine_with(quiet_config());
    engine.place(GENERATOR, 0, 0).unwrap();
    engine.place(FRAME, 0, 3).unwrap();
    engine.place(GATLING, 0, 3).unwrap();
    let ground = engine.grid().ground_y();
    engine
        .spawn_enemy_at(EnemyKind::Basic, Vec2::new(440.0, ground - 14.0))
        .unwrap();

    // Reload is 0.25 s: one shot, then three ticks of reloading.
    let phases: Vec<_> = (0..4).map(|_| engine.tick(0.1).turrets[0].phase).collect();
    assert!(phases.iter().all(|p| *p == TurretPhase::Cooldown), "{phases:?}");
    assert_eq!(engine.snapshot().score.shots_fired, 2);

    let center = engine.snapshot().enemies[0].position;
    assert_eq!(engine.trigger_aoe_damage(center, 1.0, 1_000.0), 1);
    let snap = engine.tick(0.1);
    assert_eq!(snap.turrets[0].phase, TurretPhase::Scanning);
    assert_eq!(snap.turrets[0].target, None);
}

#[test]
fn test_arc_solution_from_muzzle_matches_barrel() {
    let center = Vec2::new(368.0, 624.0);
    let point = Vec2::new(760.0, 610.0);
    let (muzzle, solution) =
        crate::systems::turret::solve_from_muzzle(center, point, 500.0, 16.0, 400.0).unwrap();

    assert!((muzzle.distance(center) - 16.0).abs() < 1e-3);
    let barrel = ironhold_ballistics::aim_angle(center, muzzle);
    assert!((barrel - solution.aim_angle).abs() < 1e-3, "barrel {barrel} aim {}", solution.aim_angle);

    let velocity = ironhold_ballistics::arc_launch_velocity(&solution, 500.0);
    let landing =
        ironhold_ballistics::position_at(muzzle, velocity, 400.0, solution.time_of_flight);
    assert!(landing.distance(point) < 0.5, "landed at {landing:?}");
}

#[test]
fn test_enemy_reaching_boundary_damages_city() {
    let mut engine = engine_with(quiet_config());
    let boundary = engine.grid().boundary_x();
    let ground = engine.grid().ground_y();
    let enemy = engine
        .spawn_enemy_at(EnemyKind::Basic, Vec2::new(boundary + 16.0, ground - 14.0))
        .unwrap();

    let snap = engine.tick(0.25);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyReachedCity { id, damage } if *id == enemy && *damage == 10.0)));
    assert_eq!(snap.city.hp, 90.0);
    assert_eq!(snap.score.enemies_leaked, 1);
    assert!(snap.enemies.is_empty());
}

#[test]
fn test_defeat_ends_the_run() {
    let mut config = quiet_config();
    config.city_max_hp = 5.0;
    let mut engine = engine_with(config);
    let boundary = engine.grid().boundary_x();
    let ground = engine.grid().ground_y();
    engine
        .spawn_enemy_at(EnemyKind::Basic, Vec2::new(boundary + 16.0, ground - 14.0))
        .unwrap();

    let snap = engine.tick(0.25);
    assert_eq!(snap.phase, GamePhase::Defeated);
    assert_eq!(snap.city.hp, 0.0, "city hp clamps at zero");
    assert!(snap.events.iter().any(|e| matches!(e, GameEvent::Defeated)));

    // Frozen: time stands still and commands are refused.
    let elapsed = snap.time.elapsed_secs;
    engine.queue_command(PlayerCommand::PlaceItem {
        item: GENERATOR,
        row: 0,
        col: 0,
    });
    let snap = engine.tick(0.25);
    assert_eq!(snap.time.elapsed_secs, elapsed);
    assert_eq!(snap.rejections.len(), 1);
    assert_eq!(snap.rejections[0].reason, SimError::GameOver.to_string());
}

#[test]
fn test_empty_wave_table_is_immediate_victory() {
    let mut config = GameConfig::default();
    config.waves = WaveTable { waves: Vec::new() };
    let mut engine = engine_with(config);
    assert_eq!(engine.phase(), GamePhase::Victory);
    let snap = engine.tick(0.1);
    assert_eq!(snap.time.tick, 0);
}

#[test]
fn test_aoe_damage_boundary_is_inclusive() {
    let mut engine = engine_with(quiet_config());
    let inside = engine
        .spawn_enemy_at(EnemyKind::Basic, Vec2::new(100.0, 300.0))
        .unwrap();
    let edge = engine
        .spawn_enemy_at(EnemyKind::Basic, Vec2::new(130.0, 300.0))
        .unwrap();
    let outside = engine
        .spawn_enemy_at(EnemyKind::Basic, Vec2::new(131.0, 300.0))
        .unwrap();

    let hit = engine.trigger_aoe_damage(Vec2::new(100.0, 300.0), 30.0, 5.0);
    assert_eq!(hit, 2);

    let snap = engine.snapshot();
    let hp = |id| snap.enemies.iter().find(|e| e.id == id).unwrap().hp;
    assert_eq!(hp(inside), 45.0);
    assert_eq!(hp(edge), 45.0);
    assert_eq!(hp(outside), 50.0);
}

#[test]
fn test_aoe_kill_is_credited_once() {
    let mut engine = engine_with(quiet_config());
    engine
        .spawn_enemy_at(EnemyKind::Fast, Vec2::new(100.0, 300.0))
        .unwrap();
    let money = engine.ledger().money();

    assert_eq!(engine.trigger_aoe_damage(Vec2::new(100.0, 300.0), 10.0, 100.0), 1);
    // Already dead: no longer a valid victim.
    assert_eq!(engine.trigger_aoe_damage(Vec2::new(100.0, 300.0), 10.0, 100.0), 0);
    assert_eq!(engine.ledger().money(), money + 10);
}

#[test]
fn test_segment_entry() {
    use ironhold_core::types::Rect;
    let rect = Rect::centered(Vec2::new(10.0, 0.0), Vec2::new(4.0, 4.0));
    let t = segment_entry(Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0), &rect).unwrap();
    assert!((t - 0.4).abs() < 1e-6);
    assert!(segment_entry(Vec2::new(0.0, 5.0), Vec2::new(20.0, 5.0), &rect).is_none());
    assert!(segment_entry(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), &rect).is_none());
    // Starting inside counts as an immediate hit.
    assert_eq!(segment_entry(Vec2::new(10.0, 0.0), Vec2::new(30.0, 0.0), &rect), Some(0.0));
}

// ---- Power allocation ----

#[test]
fn test_power_shortage_sheds_largest_consumer_first() {
    let mut config = quiet_config();
    config.economy.starting_money = 2_000;
    config.economy.starting_iron = 100.0;
    let mut engine = engine_with(config);

    engine.place(GENERATOR, 0, 0).unwrap(); // +10
    engine.place(MINER, 0, 1).unwrap(); // -3
    engine.place(MINER, 0, 2).unwrap(); // -3
    engine.place(STORAGE, 0, 3).unwrap(); // -1
    engine.place(FRAME, 1, 0).unwrap();
    engine.place(GATLING, 1, 0).unwrap(); // -4, total demand 11

    let snap = engine.tick(0.1);
    assert!(!snap.turrets[0].functional, "gatling draws the most and goes first");
    assert!(snap.buildings.iter().all(|b| b.functional));
    assert_eq!(snap.economy.power_produced, 10.0);
    assert_eq!(snap.economy.power_consumed, 7.0);
    assert_eq!(snap.economy.iron_production, 24.0);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::PowerShortage { disabled: 1, .. })));
}

#[test]
fn test_power_shortage_ties_shed_lowest_id_first() {
    let mut config = quiet_config();
    config
        .stats
        .buildings
        .get_mut(&BuildingKind::Generator)
        .unwrap()
        .power_production = 5.0;
    let mut engine = engine_with(config);

    engine.place(GENERATOR, 0, 0).unwrap();
    let first = engine.place(MINER, 0, 1).unwrap();
    let second = engine.place(MINER, 0, 2).unwrap();
    let storage = engine.place(STORAGE, 0, 3).unwrap();

    let snap = engine.tick(0.1);
    let functional = |id| snap.buildings.iter().find(|b| b.id == id).unwrap().functional;
    assert!(!functional(first));
    assert!(functional(second));
    assert!(functional(storage));
    assert_eq!(snap.economy.iron_production, 12.0, "shed miner stops producing");
}

#[test]
fn test_power_restored_when_generator_added() {
    let mut engine = engine_with(quiet_config());
    engine.place(MINER, 0, 1).unwrap();
    let snap = engine.tick(0.1);
    assert!(!snap.buildings[0].functional);
    assert_eq!(snap.economy.iron_production, 0.0);

    engine.place(GENERATOR, 0, 0).unwrap();
    let snap = engine.tick(0.1);
    assert!(snap.buildings.iter().all(|b| b.functional));
    assert_eq!(snap.economy.iron_production, 12.0);
}

// ---- Placement, removal, expansion ----

#[test]
fn test_placement_rules() {
    let mut engine = engine_with(quiet_config());

    assert_eq!(
        engine.place(GATLING, 0, 0),
        Err(PlacementError::NoTurretPlatform.into()),
        "turrets need a frame"
    );
    engine.place(GENERATOR, 0, 0).unwrap();
    assert_eq!(
        engine.place(GATLING, 0, 0),
        Err(PlacementError::NoTurretPlatform.into()),
        "generators are not turret platforms"
    );
    assert_eq!(engine.place(FRAME, 0, 0), Err(PlacementError::Occupied.into()));
    assert_eq!(
        engine.place(BuildItem::Building(BuildingKind::Foundation), 1, 0),
        Err(PlacementError::NotReinforced.into())
    );
    assert_eq!(
        engine.place(FRAME, 0, 4),
        Err(PlacementError::OutOfBounds { row: 0, col: 4 }.into())
    );
    assert_eq!(
        engine.place(FRAME, 3, 0),
        Err(PlacementError::OutOfBounds { row: 3, col: 0 }.into())
    );

    engine.place(FRAME, 1, 1).unwrap();
    assert!(engine.can_place(GATLING, 1, 1));
    engine.place(GATLING, 1, 1).unwrap();
    assert_eq!(engine.place(MORTAR, 1, 1), Err(PlacementError::Occupied.into()));
    assert!(engine.can_place(BuildItem::Building(BuildingKind::Foundation), 0, 2));
}

#[test]
fn test_insufficient_funds_leaves_state_untouched() {
    let mut config = quiet_config();
    config.economy.starting_money = 50;
    let mut engine = engine_with(config);

    let err = engine.place(GENERATOR, 0, 0).unwrap_err();
    assert!(matches!(err, SimError::InsufficientFunds { money_needed: 120, .. }));
    assert_eq!(engine.ledger().money(), 50);
    assert_eq!(engine.ledger().iron(), 60.0);
    assert!(engine.grid().cells().all(|c| c.is_empty()));
    assert!(!engine.can_place(GENERATOR, 0, 0));
}

#[test]
fn test_place_then_remove_restores_balances() {
    let mut engine = engine_with(quiet_config());
    let (money, iron) = (engine.ledger().money(), engine.ledger().iron());

    engine.place(FRAME, 0, 2).unwrap();
    engine.place(GATLING, 0, 2).unwrap();
    assert_eq!(engine.ledger().money(), money - 120);

    // The mounted turret comes off first, then the frame.
    assert_eq!(engine.remove(0, 2), Ok(GATLING));
    assert_eq!(engine.remove(0, 2), Ok(FRAME));
    assert_eq!(engine.remove(0, 2), Err(PlacementError::Empty.into()));

    assert_eq!(engine.ledger().money(), money);
    assert_eq!(engine.ledger().iron(), iron);
    assert_eq!(engine.world().len(), 0);
}

#[test]
fn test_remove_of_stale_cell_changes_nothing() {
    use crate::placement;
    use crate::simulation::SimulationState;
    use ironhold_core::scaler::Scaler;
    use ironhold_core::types::GridPos;

    let config = quiet_config();
    let scaler = Scaler::reference();
    let mut state = SimulationState::new(&config, &scaler, 1);
    let pos = GridPos::new(0, 2);
    placement::place(&mut state, &config.stats, &scaler, FRAME, pos).unwrap();

    let entity = state.grid.cell(pos).unwrap().building.unwrap();
    state.world.despawn(entity).unwrap();
    let money = state.ledger.money();

    assert_eq!(
        placement::remove(&mut state, &config.stats, pos),
        Err(PlacementError::Empty.into())
    );
    assert_eq!(state.ledger.money(), money, "no refund for a missing entity");
    assert!(state.events.iter().all(|e| !matches!(e, GameEvent::ItemRemoved { .. })));
}

#[test]
fn test_storage_adjacency_bonus_tracks_neighbors() {
    let mut config = quiet_config();
    config.economy.starting_money = 2_000;
    config.economy.starting_iron = 100.0;
    let mut engine = engine_with(config);

    engine.place(GENERATOR, 0, 3).unwrap();
    let left = engine.place(STORAGE, 0, 0).unwrap();
    engine.place(STORAGE, 0, 1).unwrap();

    let snap = engine.tick(0.0);
    for building in snap.buildings.iter().filter(|b| b.kind == BuildingKind::Storage) {
        assert_eq!(building.adjacency_bonus, 25.0);
    }
    assert_eq!(snap.economy.iron_capacity, 100.0 + 125.0 + 125.0);

    engine.remove(0, 1).unwrap();
    let snap = engine.tick(0.0);
    let view = snap.buildings.iter().find(|b| b.id == left).unwrap();
    assert_eq!(view.adjacency_bonus, 0.0);
    assert_eq!(snap.economy.iron_capacity, 200.0);
}

#[test]
fn test_unpowered_storage_grants_no_adjacency_bonus() {
    let mut config = quiet_config();
    config.economy.starting_money = 2_000;
    config.economy.starting_iron = 100.0;
    config
        .stats
        .buildings
        .get_mut(&BuildingKind::Generator)
        .unwrap()
        .power_production = 1.0;
    let mut engine = engine_with(config);

    engine.place(GENERATOR, 0, 3).unwrap();
    let left = engine.place(STORAGE, 0, 0).unwrap();
    let right = engine.place(STORAGE, 0, 1).unwrap();

    // Two storages draw 1 each against a supply of 1: the lower id goes dark.
    let snap = engine.tick(0.0);
    let functional = |id| snap.buildings.iter().find(|b| b.id == id).unwrap().functional;
    assert!(!functional(left));
    assert!(functional(right));
    assert_eq!(snap.economy.iron_capacity, 100.0 + 100.0);
}

#[test]
fn test_miner_stacking_context() {
    let mut config = quiet_config();
    config.economy.starting_money = 2_000;
    config.economy.starting_iron = 100.0;
    let mut engine = engine_with(config);

    let bottom = engine.place(MINER, 0, 0).unwrap();
    let top = engine.place(MINER, 1, 0).unwrap();
    let snap = engine.snapshot();
    let view = |id| snap.buildings.iter().find(|b| b.id == id).unwrap().clone();
    assert!(view(bottom).miner_above && !view(bottom).miner_below);
    assert!(view(top).miner_below && !view(top).miner_above);

    engine.remove(1, 0).unwrap();
    let snap = engine.snapshot();
    assert!(!snap.buildings[0].miner_above);
}

#[test]
fn test_expansion_cost_escalates_until_limit() {
    let mut config = quiet_config();
    config.economy.starting_money = 2_000;
    let mut engine = engine_with(config);

    let mut spent = 0;
    for step in 0..6 {
        let price = engine.expand(ExpandDirection::Up, 1).unwrap();
        assert_eq!(price, 100 + 50 * step);
        spent += price;
    }
    assert_eq!(engine.grid().rows(), 9);
    assert_eq!(engine.ledger().money(), 2_000 - spent);

    assert_eq!(
        engine.expand(ExpandDirection::Up, 1),
        Err(SimError::ExpansionLimitReached {
            direction: ExpandDirection::Up,
            max: 6
        })
    );
    assert_eq!(engine.ledger().money(), 2_000 - spent, "rejected expansion is free");
    assert_eq!(engine.snapshot().grid.next_expand_up_cost, None);
}

#[test]
fn test_sideways_expansion_moves_boundary() {
    let mut engine = engine_with(quiet_config());
    let before = engine.grid().boundary_x();

    assert_eq!(engine.expand(ExpandDirection::Sideways, 1), Ok(150));
    let grid = engine.grid();
    assert_eq!(grid.cols(), 8);
    assert_eq!(grid.min_col(), -2);
    assert_eq!(grid.max_col(), 5);
    assert_eq!(grid.boundary_x(), before + 2.0 * grid.tile_size());
    // New cells are never reinforced.
    assert!(!grid.cell(ironhold_core::types::GridPos::new(0, -1)).unwrap().reinforced);
    assert!(engine.can_place(FRAME, 0, -2));
}

#[test]
fn test_expand_many_steps_is_all_or_nothing() {
    let mut config = quiet_config();
    config.economy.starting_money = 300;
    let mut engine = engine_with(config);

    // 100 + 150 + 200 = 450 > 300
    assert!(matches!(
        engine.expand(ExpandDirection::Up, 3),
        Err(SimError::InsufficientFunds { .. })
    ));
    assert_eq!(engine.grid().rows(), 3);
    assert_eq!(engine.expand(ExpandDirection::Up, 2), Ok(250));
    assert_eq!(engine.grid().rows(), 5);
    assert_eq!(engine.expand(ExpandDirection::Up, 0), Ok(0));
}

// ---- Commands, pause, frame pacing ----

#[test]
fn test_pause_freezes_simulation() {
    let mut engine = engine_with(quiet_config());
    let ground = engine.grid().ground_y();
    engine
        .spawn_enemy_at(EnemyKind::Basic, Vec2::new(800.0, ground - 14.0))
        .unwrap();
    engine.tick(0.1);

    engine.queue_command(PlayerCommand::TogglePause);
    let paused = engine.tick(0.1);
    assert_eq!(paused.phase, GamePhase::Paused);
    for _ in 0..10 {
        let snap = engine.tick(0.1);
        assert_eq!(snap.time, paused.time);
        assert_eq!(snap.enemies[0].position, paused.enemies[0].position);
    }

    engine.queue_commands([
        PlayerCommand::SelectBuildItem {
            item: Some(GENERATOR),
        },
        PlayerCommand::PlaceItem {
            item: GENERATOR,
            row: 0,
            col: 0,
        },
    ]);
    let snap = engine.tick(0.1);
    assert_eq!(snap.selected_item, Some(GENERATOR));
    assert_eq!(snap.rejections.len(), 1);
    assert_eq!(snap.rejections[0].reason, SimError::Paused.to_string());
    assert!(snap.buildings.is_empty());

    engine.queue_command(PlayerCommand::TogglePause);
    let snap = engine.tick(0.1);
    assert_eq!(snap.phase, GamePhase::Active);
    assert!(snap.enemies[0].position.x < paused.enemies[0].position.x);
}

#[test]
fn test_commands_apply_before_systems() {
    let mut engine = engine_with(quiet_config());
    engine.queue_commands([
        PlayerCommand::PlaceItem {
            item: GENERATOR,
            row: 0,
            col: 0,
        },
        PlayerCommand::ExpandGrid {
            direction: ExpandDirection::Up,
        },
        PlayerCommand::RemoveItem { row: 2, col: 2 },
    ]);
    let snap = engine.tick(0.1);
    assert_eq!(snap.buildings.len(), 1);
    assert!(snap.buildings[0].functional, "placed before the power pass");
    assert_eq!(snap.grid.rows, 4);
    assert_eq!(snap.rejections.len(), 1, "removing from an empty cell is rejected");
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::GridExpanded { rows: 4, .. })));
}

#[test]
fn test_frame_delta_is_clamped() {
    let mut engine = engine_with(quiet_config());
    let snap = engine.tick(10.0);
    assert_eq!(snap.time.elapsed_secs, 0.25);
    let snap = engine.tick(f32::NAN);
    assert_eq!(snap.time.elapsed_secs, 0.25);
    let snap = engine.tick(-1.0);
    assert_eq!(snap.time.elapsed_secs, 0.25);
    assert_eq!(snap.time.tick, 3);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = GameConfig::default();
    config.timing.max_frame_dt = 0.0;
    assert!(SimulationEngine::new(SimConfig {
        game: config,
        ..Default::default()
    })
    .is_err());
}

#[test]
fn test_device_scaling_applies_to_grid() {
    let engine = SimulationEngine::new(SimConfig {
        device_width: 2560.0,
        device_height: 1440.0,
        game: quiet_config(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(engine.scaler().factor(), 2.0);
    assert_eq!(engine.grid().tile_size(), 64.0);
    assert_eq!(engine.grid().boundary_x(), 2.0 * (256.0 + 4.0 * 32.0));
}

// ---- Waves ----

#[test]
fn test_flatten_single_group() {
    let wave = WaveDefinition {
        groups: vec![WaveGroup::new(3.0, EnemyKind::Basic, 5, 2.0)],
    };
    let delays: Vec<f32> = flatten_wave(&wave).iter().map(|e| e.delay).collect();
    assert_eq!(delays, vec![3.0, 2.0, 2.0, 2.0, 2.0]);
}

#[test]
fn test_flatten_overlapping_groups_interleave() {
    let wave = WaveDefinition {
        groups: vec![
            WaveGroup::new(0.0, EnemyKind::Basic, 3, 2.0),
            WaveGroup::new(1.0, EnemyKind::Fast, 2, 2.0),
        ],
    };
    let flat = flatten_wave(&wave);
    let kinds: Vec<EnemyKind> = flat.iter().map(|e| e.enemy).collect();
    let delays: Vec<f32> = flat.iter().map(|e| e.delay).collect();
    assert_eq!(
        kinds,
        vec![
            EnemyKind::Basic,
            EnemyKind::Fast,
            EnemyKind::Basic,
            EnemyKind::Fast,
            EnemyKind::Basic
        ]
    );
    assert_eq!(delays, vec![0.0, 1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_wave_clear_waits_for_live_enemies() {
    let table = WaveTable {
        waves: vec![
            WaveDefinition {
                groups: vec![WaveGroup::new(0.0, EnemyKind::Basic, 1, 1.0)],
            },
            WaveDefinition {
                groups: vec![WaveGroup::new(0.0, EnemyKind::Fast, 1, 1.0)],
            },
        ],
    };
    let timing = TimingConfig {
        preparation_time: 1.0,
        inter_wave_time: 5.0,
        max_frame_dt: 0.25,
    };
    let mut scheduler = WaveScheduler::new(WaveSchedule::from_table(&table), &timing);
    let mut events = Vec::new();

    assert!(scheduler.advance(0.5, 0, &mut events).is_empty());
    assert_eq!(scheduler.time_to_next_wave(), Some(0.5));

    let spawns = scheduler.advance(0.6, 0, &mut events);
    assert_eq!(spawns.len(), 1);
    assert_eq!(spawns[0].wave, 1);
    assert_eq!(scheduler.phase(), WavePhase::AwaitingClear);

    scheduler.advance(1.0, 1, &mut events);
    assert_eq!(scheduler.phase(), WavePhase::AwaitingClear, "an enemy is still alive");

    scheduler.advance(1.0, 0, &mut events);
    assert_eq!(scheduler.phase(), WavePhase::Intermission);
    assert_eq!(scheduler.time_to_next_wave(), Some(5.0));
    assert!(events.contains(&GameEvent::WaveCleared { wave: 1 }));

    let spawns = scheduler.advance(5.0, 0, &mut events);
    assert_eq!(spawns.len(), 1);
    assert_eq!(spawns[0].enemy, EnemyKind::Fast);
    scheduler.advance(0.1, 0, &mut events);
    assert!(scheduler.is_complete());
}

#[test]
fn test_long_frame_releases_every_due_spawn() {
    let table = WaveTable {
        waves: vec![WaveDefinition {
            groups: vec![WaveGroup::new(0.0, EnemyKind::Basic, 4, 0.5)],
        }],
    };
    let timing = TimingConfig {
        preparation_time: 0.0,
        ..Default::default()
    };
    let mut scheduler = WaveScheduler::new(WaveSchedule::from_table(&table), &timing);
    let mut events = Vec::new();

    // t = 0 and t = 0.5 are due after the first 0.6 s.
    assert_eq!(scheduler.advance(0.6, 0, &mut events).len(), 2);
    assert_eq!(scheduler.pending_spawns(), 2);
    assert_eq!(scheduler.advance(1.0, 2, &mut events).len(), 2);
    assert_eq!(scheduler.phase(), WavePhase::AwaitingClear);
}

#[test]
fn test_engine_spawns_scheduled_wave() {
    let mut config = GameConfig::default();
    config.timing.preparation_time = 0.5;
    let mut engine = engine_with(config);

    let snap = engine.tick(0.25);
    assert!(snap.enemies.is_empty());
    assert_eq!(snap.waves.current_wave, 0);

    let snap = engine.tick(0.25);
    assert_eq!(snap.waves.current_wave, 1);
    assert!(snap.waves.wave_in_progress);
    assert_eq!(snap.enemies.len(), 1);
    assert_eq!(snap.enemies[0].wave, 1);
    assert!(snap.events.contains(&GameEvent::WaveStarted { wave: 1 }));

    // Entry lanes hug the ground.
    let ground = engine.grid().ground_y();
    assert!(snap.enemies[0].rect.max().y <= ground + 1e-3);
}

// ---- Ledger ----

#[test]
fn test_ledger_production_per_minute() {
    let mut ledger = Ledger::new(0, 0.0, 100.0);
    ledger.set_rates(2.0, 100.0, 0.0, 0.0);
    for _ in 0..600 {
        ledger.tick_production(0.1);
    }
    assert!((ledger.iron() - 2.0).abs() < 1e-3);
}

#[test]
fn test_ledger_spend_and_capacity() {
    let mut ledger = Ledger::new(100, 50.0, 60.0);
    assert!(ledger.spend(Cost { money: 40, iron: 20 }).is_ok());
    assert_eq!((ledger.money(), ledger.iron()), (60, 30.0));
    assert!(ledger.spend(Cost { money: 61, iron: 0 }).is_err());
    assert_eq!(ledger.money(), 60);

    ledger.earn(0, 100.0);
    assert_eq!(ledger.iron(), 60.0, "iron above capacity is discarded");
    ledger.set_rates(0.0, 40.0, 0.0, 0.0);
    assert_eq!(ledger.iron(), 40.0);
}

proptest! {
    #[test]
    fn prop_iron_stays_within_capacity(
        capacity in 0.0f32..500.0,
        production in 0.0f32..600.0,
        ops in prop::collection::vec((0.0f32..200.0, 0.0f32..1.0), 1..64),
    ) {
        let mut ledger = Ledger::new(0, capacity * 0.5, capacity);
        ledger.set_rates(production, capacity, 0.0, 0.0);
        for (income, dt) in ops {
            ledger.earn(0, income);
            ledger.tick_production(dt);
            prop_assert!(ledger.iron() >= 0.0);
            prop_assert!(ledger.iron() <= ledger.iron_capacity());
        }
    }

    #[test]
    fn prop_flattened_wave_keeps_every_spawn_in_time_order(
        groups in prop::collection::vec((0u32..20, 1u32..8, 0u32..10), 1..6),
    ) {
        // Quarter-second steps keep the arithmetic exact.
        let wave = WaveDefinition {
            groups: groups
                .iter()
                .map(|&(start, count, interval)| {
                    WaveGroup::new(start as f32 * 0.25, EnemyKind::Basic, count, interval as f32 * 0.25)
                })
                .collect(),
        };
        let flat = flatten_wave(&wave);

        let expected_count: u32 = groups.iter().map(|g| g.1).sum();
        prop_assert_eq!(flat.len() as u32, expected_count);
        prop_assert!(flat.iter().all(|e| e.delay >= 0.0));

        let mut group_start = 0.0f32;
        let mut last_spawn = 0.0f32;
        for &(start, count, interval) in &groups {
            group_start += start as f32 * 0.25;
            last_spawn = last_spawn.max(group_start + (count - 1) as f32 * interval as f32 * 0.25);
        }
        let total: f32 = flat.iter().map(|e| e.delay).sum();
        prop_assert_eq!(total, last_spawn);
    }

    #[test]
    fn prop_money_never_negative(
        start in 0u32..1_000,
        costs in prop::collection::vec(0u32..400, 1..32),
    ) {
        let mut ledger = Ledger::new(start, 0.0, 0.0);
        let mut expected = start;
        for money in costs {
            if ledger.spend(Cost { money, iron: 0 }).is_ok() {
                expected -= money;
            }
            prop_assert_eq!(ledger.money(), expected);
        }
    }
}
