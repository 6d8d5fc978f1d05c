//! Placement, removal and grid expansion.
//!
//! Every operation validates first and mutates only on success, so a
//! rejected command leaves the ledger, grid and world untouched.

use hecs::World;
use tracing::debug;

use ironhold_core::components::{BuildingState, MinerStack, TurretState};
use ironhold_core::config::GridConfig;
use ironhold_core::enums::*;
use ironhold_core::error::{PlacementError, SimError};
use ironhold_core::events::GameEvent;
use ironhold_core::scaler::Scaler;
use ironhold_core::stats::{Cost, StatTables};
use ironhold_core::types::{GridPos, StableId};

use crate::grid::Grid;
use crate::simulation::SimulationState;
use crate::world_setup;

/// Validate a placement and return its price.
pub fn check_placement(
    state: &SimulationState,
    stats: &StatTables,
    item: BuildItem,
    pos: GridPos,
) -> Result<Cost, SimError> {
    let cell = state.grid.cell(pos).ok_or(PlacementError::OutOfBounds {
        row: pos.row,
        col: pos.col,
    })?;
    let cost = stats
        .cost_of(item)
        .ok_or(PlacementError::UnknownItem(item))?;

    match item {
        BuildItem::Building(kind) => {
            if cell.building.is_some() {
                return Err(PlacementError::Occupied.into());
            }
            let requires_reinforced = stats
                .building(kind)
                .map(|s| s.requires_reinforced)
                .unwrap_or(false);
            if requires_reinforced && !cell.reinforced {
                return Err(PlacementError::NotReinforced.into());
            }
        }
        BuildItem::Turret(_) => {
            if cell.turret.is_some() {
                return Err(PlacementError::Occupied.into());
            }
            let platform = cell
                .building
                .and_then(|b| state.world.get::<&BuildingState>(b).ok().map(|s| s.turret_platform))
                .unwrap_or(false);
            if !platform {
                return Err(PlacementError::NoTurretPlatform.into());
            }
        }
    }

    if !state.ledger.can_afford(cost) {
        return Err(SimError::InsufficientFunds {
            money_needed: cost.money,
            iron_needed: cost.iron,
            money_available: state.ledger.money(),
            iron_available: state.ledger.iron(),
        });
    }
    Ok(cost)
}

pub fn can_place(state: &SimulationState, stats: &StatTables, item: BuildItem, pos: GridPos) -> bool {
    check_placement(state, stats, item, pos).is_ok()
}

/// Buy and place `item` at `pos`.
pub fn place(
    state: &mut SimulationState,
    stats: &StatTables,
    scaler: &Scaler,
    item: BuildItem,
    pos: GridPos,
) -> Result<StableId, SimError> {
    let cost = check_placement(state, stats, item, pos)?;
    let center = state.grid.cell_center(pos);

    let (id, entity) = match item {
        BuildItem::Building(kind) => {
            let building = stats
                .building(kind)
                .ok_or(PlacementError::UnknownItem(item))?;
            state.ledger.spend(cost)?;
            let id = state.ids.next_id();
            let entity =
                world_setup::spawn_building(&mut state.world, id, kind, pos, center, building);
            (id, entity)
        }
        BuildItem::Turret(kind) => {
            let turret = stats.turret(kind).ok_or(PlacementError::UnknownItem(item))?;
            let projectile = stats
                .projectile(turret.projectile)
                .ok_or(PlacementError::UnknownItem(item))?;
            state.ledger.spend(cost)?;
            let id = state.ids.next_id();
            let entity = world_setup::spawn_turret(
                &mut state.world,
                id,
                kind,
                pos,
                center,
                turret,
                projectile,
                scaler,
            );
            (id, entity)
        }
    };

    if let Some(cell) = state.grid.cell_mut(pos) {
        match item {
            BuildItem::Building(_) => cell.building = Some(entity),
            BuildItem::Turret(_) => cell.turret = Some(entity),
        }
    }
    if matches!(item, BuildItem::Building(_)) {
        refresh_neighborhood(&state.world, &state.grid, pos);
    }

    debug!(?item, row = pos.row, col = pos.col, id = id.0, "placed");
    state.events.push(GameEvent::ItemPlaced { item, pos });
    Ok(id)
}

/// Remove the turret at `pos`, or the building if no turret is mounted,
/// refunding its full price.
pub fn remove(
    state: &mut SimulationState,
    stats: &StatTables,
    pos: GridPos,
) -> Result<BuildItem, SimError> {
    let cell = state.grid.cell(pos).ok_or(PlacementError::OutOfBounds {
        row: pos.row,
        col: pos.col,
    })?;

    let (entity, item) = if let Some(turret) = cell.turret {
        let kind = state
            .world
            .get::<&TurretState>(turret)
            .map(|t| t.kind)
            .map_err(|_| PlacementError::Empty)?;
        (turret, BuildItem::Turret(kind))
    } else if let Some(building) = cell.building {
        let kind = state
            .world
            .get::<&BuildingState>(building)
            .map(|b| b.kind)
            .map_err(|_| PlacementError::Empty)?;
        (building, BuildItem::Building(kind))
    } else {
        return Err(PlacementError::Empty.into());
    };

    if state.world.despawn(entity).is_err() {
        return Err(PlacementError::Empty.into());
    }
    if let Some(cell) = state.grid.cell_mut(pos) {
        match item {
            BuildItem::Turret(_) => cell.turret = None,
            BuildItem::Building(_) => cell.building = None,
        }
    }
    if let Some(cost) = stats.cost_of(item) {
        state.ledger.earn(cost.money, cost.iron as f32);
    }
    if matches!(item, BuildItem::Building(_)) {
        refresh_neighborhood(&state.world, &state.grid, pos);
    }

    debug!(?item, row = pos.row, col = pos.col, "removed");
    state.events.push(GameEvent::ItemRemoved { item, pos });
    Ok(item)
}

/// Total price of the next `steps` expansions in `direction`.
pub fn expansion_price(grid: &Grid, config: &GridConfig, direction: ExpandDirection, steps: u32) -> u32 {
    let performed = grid.expansions(direction);
    (0..steps)
        .map(|i| config.expansion_cost(direction, performed + i))
        .fold(0u32, u32::saturating_add)
}

/// Buy `steps` expansions in `direction`. Returns the money spent.
pub fn expand(
    state: &mut SimulationState,
    config: &GridConfig,
    direction: ExpandDirection,
    steps: u32,
) -> Result<u32, SimError> {
    let performed = state.grid.expansions(direction);
    let max = config.max_expansions(direction);
    if performed.saturating_add(steps) > max {
        return Err(SimError::ExpansionLimitReached { direction, max });
    }
    if steps == 0 {
        return Ok(0);
    }

    let price = expansion_price(&state.grid, config, direction, steps);
    state.ledger.spend(Cost { money: price, iron: 0 })?;
    for _ in 0..steps {
        state.grid.expand(direction, config.side_block_width);
    }

    debug!(?direction, steps, price, "grid expanded");
    state.events.push(GameEvent::GridExpanded {
        direction,
        rows: state.grid.rows(),
        cols: state.grid.cols(),
    });
    Ok(price)
}

/// Recompute derived per-building state around a changed cell: adjacency
/// bonuses for the cell and its orthogonal neighbors, and the miner
/// stacking context for the cell and its vertical neighbors.
fn refresh_neighborhood(world: &World, grid: &Grid, pos: GridPos) {
    for target in std::iter::once(pos).chain(pos.orthogonal_neighbors()) {
        refresh_adjacency(world, grid, target);
    }
    for target in [Some(pos.above()), Some(pos), pos.below()].into_iter().flatten() {
        refresh_miner_stack(world, grid, target);
    }
}

fn building_kind_at(world: &World, grid: &Grid, pos: GridPos) -> Option<BuildingKind> {
    let entity = grid.cell(pos)?.building?;
    let kind = world.get::<&BuildingState>(entity).ok()?.kind;
    Some(kind)
}

fn refresh_adjacency(world: &World, grid: &Grid, pos: GridPos) {
    let Some(entity) = grid.cell(pos).and_then(|c| c.building) else {
        return;
    };
    let Some((kind, per_unit)) = world
        .get::<&BuildingState>(entity)
        .ok()
        .map(|b| (b.kind, b.adjacency_bonus_per_unit))
    else {
        return;
    };
    let same_kind = pos
        .orthogonal_neighbors()
        .filter(|n| building_kind_at(world, grid, *n) == Some(kind))
        .count();
    if let Ok(mut building) = world.get::<&mut BuildingState>(entity) {
        building.adjacency_bonus = same_kind as f32 * per_unit;
    }
}

fn refresh_miner_stack(world: &World, grid: &Grid, pos: GridPos) {
    let Some(entity) = grid.cell(pos).and_then(|c| c.building) else {
        return;
    };
    if building_kind_at(world, grid, pos) != Some(BuildingKind::Miner) {
        return;
    }
    let is_miner = |p: Option<GridPos>| {
        p.and_then(|p| building_kind_at(world, grid, p)) == Some(BuildingKind::Miner)
    };
    let stack = MinerStack {
        miner_above: is_miner(Some(pos.above())),
        miner_below: is_miner(pos.below()),
    };
    if let Ok(mut current) = world.get::<&mut MinerStack>(entity) {
        *current = stack;
    }
}
