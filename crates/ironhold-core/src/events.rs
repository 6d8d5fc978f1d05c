//! Events emitted by the simulation for audio and UI feedback.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{GridPos, StableId};

/// Something noteworthy that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A wave began releasing enemies (1-based).
    WaveStarted { wave: u32 },
    /// A wave finished spawning and all its enemies are gone.
    WaveCleared { wave: u32 },
    EnemySpawned {
        id: StableId,
        kind: EnemyKind,
        wave: u32,
    },
    EnemyKilled {
        id: StableId,
        kind: EnemyKind,
        reward_money: u32,
    },
    /// An enemy reached the defended boundary and damaged the city.
    EnemyReachedCity { id: StableId, damage: f32 },
    TurretFired {
        turret: StableId,
        projectile: StableId,
        kind: TurretKind,
    },
    ProjectileImpact {
        projectile: StableId,
        position: Vec2,
        aoe_radius: f32,
    },
    /// Consumers were switched off to cover a deficit.
    PowerShortage { deficit: f32, disabled: u32 },
    ItemPlaced { item: BuildItem, pos: GridPos },
    ItemRemoved { item: BuildItem, pos: GridPos },
    GridExpanded {
        direction: ExpandDirection,
        rows: u32,
        cols: u32,
    },
    Defeated,
    Victory,
}
