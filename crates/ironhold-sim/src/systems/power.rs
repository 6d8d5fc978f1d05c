//! Power allocation: recomputes functional flags and economy rates from a
//! single global production/consumption snapshot, once per tick.
//!
//! Under a shortage, consumers are switched off in a fixed order: highest
//! consumption first, ties broken by ascending `StableId`, until the
//! remaining demand fits the supply.
//!
//! A switched-off building grants nothing for the tick: no iron, no storage
//! and no adjacency bonus to its lit neighbors.

use hecs::{Entity, World};
use tracing::{info, warn};

use ironhold_core::components::{BuildingState, Power};
use ironhold_core::enums::BuildingKind;
use ironhold_core::events::GameEvent;
use ironhold_core::types::{GridPos, StableId};

use crate::economy::Ledger;
use crate::grid::Grid;

/// Run the power pass and install the derived rates in the ledger.
pub fn run(
    world: &mut World,
    grid: &Grid,
    ledger: &mut Ledger,
    base_iron_capacity: f32,
    shed_consumers: &mut u32,
    events: &mut Vec<GameEvent>,
) {
    let mut produced = 0.0f32;
    let mut demanded = 0.0f32;
    let mut consumers: Vec<(Entity, StableId, f32, f32)> = Vec::new();

    for (entity, (id, power)) in world.query_mut::<(&StableId, &mut Power)>() {
        power.functional = true;
        produced += power.production;
        if power.consumption > 0.0 {
            demanded += power.consumption;
            consumers.push((entity, *id, power.consumption, power.production));
        }
    }

    let deficit = demanded - produced;
    let mut consumed = demanded;
    let mut disabled = 0u32;
    if deficit > 0.0 {
        consumers.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.1.cmp(&b.1)));
        let mut remaining = deficit;
        for (entity, _, consumption, production) in &consumers {
            if remaining <= 0.0 {
                break;
            }
            if let Ok(mut power) = world.get::<&mut Power>(*entity) {
                power.functional = false;
            }
            // A switched-off consumer also stops producing.
            remaining -= consumption - production;
            consumed -= consumption;
            produced -= production;
            disabled += 1;
        }
    }

    if disabled != *shed_consumers {
        if disabled > 0 {
            warn!(deficit, disabled, "power shortage, consumers switched off");
            events.push(GameEvent::PowerShortage { deficit, disabled });
        } else {
            info!("power restored");
        }
        *shed_consumers = disabled;
    }

    let mut iron_production = 0.0f32;
    let mut capacity = base_iron_capacity;
    for (_entity, (pos, building, power)) in
        world.query::<(&GridPos, &BuildingState, &Power)>().iter()
    {
        if !power.functional {
            continue;
        }
        iron_production += building.iron_per_minute;
        let dark = if building.adjacency_bonus > 0.0 {
            dark_neighbors(world, grid, *pos, building.kind)
        } else {
            0
        };
        let bonus = (building.adjacency_bonus - dark as f32 * building.adjacency_bonus_per_unit)
            .max(0.0);
        capacity += building.storage_increase + bonus;
    }

    ledger.set_rates(iron_production, capacity, produced, consumed.max(0.0));
}

/// Switched-off same-kind buildings orthogonally adjacent to `pos`.
fn dark_neighbors(world: &World, grid: &Grid, pos: GridPos, kind: BuildingKind) -> usize {
    pos.orthogonal_neighbors()
        .filter_map(|n| grid.cell(n).and_then(|c| c.building))
        .filter(|&e| {
            let same = world.get::<&BuildingState>(e).is_ok_and(|b| b.kind == kind);
            same && world.get::<&Power>(e).is_ok_and(|p| !p.functional)
        })
        .count()
}
