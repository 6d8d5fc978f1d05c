//! Game state snapshot: the complete visible state handed to the
//! presentation layer after each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::commands::CommandRejection;
use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{GridPos, Rect, SimTime, StableId};

/// Complete game state after a tick. All collections are sorted by id
/// (entities) or by position (cells).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub economy: EconomyView,
    pub grid: GridView,
    pub buildings: Vec<BuildingView>,
    pub turrets: Vec<TurretView>,
    pub projectiles: Vec<ProjectileView>,
    pub enemies: Vec<EnemyView>,
    pub waves: WaveView,
    pub city: CityView,
    pub score: ScoreView,
    pub selected_item: Option<BuildItem>,
    /// Events raised since the previous snapshot.
    pub events: Vec<GameEvent>,
    /// Commands rejected since the previous snapshot.
    pub rejections: Vec<CommandRejection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EconomyView {
    pub money: u32,
    pub iron: f32,
    pub iron_capacity: f32,
    /// Iron per minute from functional miners.
    pub iron_production: f32,
    pub power_produced: f32,
    pub power_consumed: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridView {
    pub rows: u32,
    pub cols: u32,
    /// Leftmost column index (negative after sideways expansion).
    pub min_col: i32,
    pub tile_size: f32,
    pub expansions_up: u32,
    pub expansions_sideways: u32,
    /// Price of the next expansion per direction; `None` at the limit.
    pub next_expand_up_cost: Option<u32>,
    pub next_expand_sideways_cost: Option<u32>,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellView {
    pub pos: GridPos,
    pub rect: Rect,
    pub reinforced: bool,
    pub building: Option<BuildingKind>,
    pub turret: Option<TurretKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingView {
    pub id: StableId,
    pub kind: BuildingKind,
    pub pos: GridPos,
    pub rect: Rect,
    pub functional: bool,
    pub adjacency_bonus: f32,
    pub miner_above: bool,
    pub miner_below: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurretView {
    pub id: StableId,
    pub kind: TurretKind,
    pub pos: GridPos,
    pub center: Vec2,
    pub aim_angle: f32,
    pub phase: TurretPhase,
    pub functional: bool,
    pub target: Option<StableId>,
    pub cooldown: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: StableId,
    pub kind: ProjectileKind,
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: StableId,
    pub kind: EnemyKind,
    pub position: Vec2,
    /// Visual bounds.
    pub rect: Rect,
    pub hp: f32,
    pub max_hp: f32,
    pub wave: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    /// 1-based number of the current (or most recent) wave; 0 before wave 1.
    pub current_wave: u32,
    pub total_waves: u32,
    pub wave_in_progress: bool,
    /// Countdown to the next wave start; `None` while a wave is in progress
    /// or once every wave is done.
    pub time_to_next_wave: Option<f32>,
    pub phase: WavePhase,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityView {
    pub hp: f32,
    pub max_hp: f32,
    /// Screen x of the defended boundary.
    pub boundary_x: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub points: u32,
    pub enemies_killed: u32,
    pub enemies_leaked: u32,
    pub shots_fired: u32,
}
