//! Snapshot system: builds a complete `GameStateSnapshot` from the run
//! state.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use ironhold_core::commands::CommandRejection;
use ironhold_core::components::*;
use ironhold_core::config::GridConfig;
use ironhold_core::enums::ExpandDirection;
use ironhold_core::events::GameEvent;
use ironhold_core::state::*;
use ironhold_core::types::{GridPos, Position, Rect, StableId, Velocity};

use crate::grid::Grid;
use crate::simulation::SimulationState;

/// Build the snapshot. `events` and `rejections` are the batches drained
/// from the state for this tick.
pub fn build_snapshot(
    state: &SimulationState,
    grid_config: &GridConfig,
    events: Vec<GameEvent>,
    rejections: Vec<CommandRejection>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: state.time,
        phase: state.phase,
        economy: EconomyView {
            money: state.ledger.money(),
            iron: state.ledger.iron(),
            iron_capacity: state.ledger.iron_capacity(),
            iron_production: state.ledger.iron_production(),
            power_produced: state.ledger.power_produced(),
            power_consumed: state.ledger.power_consumed(),
        },
        grid: build_grid(&state.world, &state.grid, grid_config),
        buildings: build_buildings(&state.world, &state.grid),
        turrets: build_turrets(&state.world),
        projectiles: build_projectiles(&state.world),
        enemies: build_enemies(&state.world),
        waves: WaveView {
            current_wave: state.scheduler.current_wave(),
            total_waves: state.scheduler.total_waves(),
            wave_in_progress: state.scheduler.wave_in_progress(),
            time_to_next_wave: state.scheduler.time_to_next_wave(),
            phase: state.scheduler.phase(),
        },
        city: CityView {
            hp: state.city.hp,
            max_hp: state.city.max_hp,
            boundary_x: state.grid.boundary_x(),
        },
        score: ScoreView {
            points: state.score.points,
            enemies_killed: state.score.enemies_killed,
            enemies_leaked: state.score.enemies_leaked,
            shots_fired: state.score.shots_fired,
        },
        selected_item: state.selected_item,
        events,
        rejections,
    }
}

fn next_cost(grid: &Grid, config: &GridConfig, direction: ExpandDirection) -> Option<u32> {
    let performed = grid.expansions(direction);
    (performed < config.max_expansions(direction))
        .then(|| config.expansion_cost(direction, performed))
}

fn build_grid(world: &World, grid: &Grid, config: &GridConfig) -> GridView {
    let cells = grid
        .cells()
        .map(|cell| CellView {
            pos: cell.pos,
            rect: grid.cell_rect(cell.pos),
            reinforced: cell.reinforced,
            building: cell
                .building
                .and_then(|e| world.get::<&BuildingState>(e).ok().map(|b| b.kind)),
            turret: cell
                .turret
                .and_then(|e| world.get::<&TurretState>(e).ok().map(|t| t.kind)),
        })
        .collect();

    GridView {
        rows: grid.rows(),
        cols: grid.cols(),
        min_col: grid.min_col(),
        tile_size: grid.tile_size(),
        expansions_up: grid.expansions(ExpandDirection::Up),
        expansions_sideways: grid.expansions(ExpandDirection::Sideways),
        next_expand_up_cost: next_cost(grid, config, ExpandDirection::Up),
        next_expand_sideways_cost: next_cost(grid, config, ExpandDirection::Sideways),
        cells,
    }
}

fn build_buildings(world: &World, grid: &Grid) -> Vec<BuildingView> {
    let mut buildings: Vec<BuildingView> = world
        .query::<(&StableId, &GridPos, &BuildingState, &Power, &MinerStack)>()
        .iter()
        .map(|(_, (id, pos, building, power, stack))| BuildingView {
            id: *id,
            kind: building.kind,
            pos: *pos,
            rect: grid.cell_rect(*pos),
            functional: power.functional,
            adjacency_bonus: building.adjacency_bonus,
            miner_above: stack.miner_above,
            miner_below: stack.miner_below,
        })
        .collect();
    buildings.sort_by_key(|b| b.id);
    buildings
}

fn build_turrets(world: &World) -> Vec<TurretView> {
    let mut turrets: Vec<TurretView> = world
        .query::<(&StableId, &GridPos, &Position, &TurretState, &Power)>()
        .iter()
        .map(|(_, (id, pos, center, turret, power))| TurretView {
            id: *id,
            kind: turret.kind,
            pos: *pos,
            center: center.0,
            aim_angle: turret.aim_angle,
            phase: turret.phase,
            functional: power.functional,
            target: turret.target,
            cooldown: turret.cooldown,
        })
        .collect();
    turrets.sort_by_key(|t| t.id);
    turrets
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&StableId, &Position, &Velocity, &ProjectileState)>()
        .iter()
        .map(|(_, (id, pos, vel, projectile))| ProjectileView {
            id: *id,
            kind: projectile.kind,
            position: pos.0,
            velocity: vel.0,
        })
        .collect();
    projectiles.sort_by_key(|p| p.id);
    projectiles
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&StableId, &Position, &EnemyState, &Footprint)>()
        .iter()
        .filter(|(_, (_, _, enemy, _))| enemy.fate.is_none())
        .map(|(_, (id, pos, enemy, footprint))| EnemyView {
            id: *id,
            kind: enemy.kind,
            position: pos.0,
            rect: Rect::centered(pos.0, footprint.visual),
            hp: enemy.hp,
            max_hp: enemy.max_hp,
            wave: enemy.wave,
        })
        .collect();
    enemies.sort_by_key(|e| e.id);
    enemies
}
