//! Explicit simulation state owned by the engine.
//!
//! Every piece of mutable run state lives here and is handed to systems as
//! disjoint field borrows; there are no ambient globals.

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ironhold_core::commands::CommandRejection;
use ironhold_core::config::GameConfig;
use ironhold_core::constants::*;
use ironhold_core::enums::{BuildItem, GamePhase};
use ironhold_core::events::GameEvent;
use ironhold_core::scaler::Scaler;
use ironhold_core::types::{SimTime, StableId};

use crate::economy::Ledger;
use crate::grid::Grid;
use crate::systems::wave_spawner::{WaveSchedule, WaveScheduler};

/// Hands out never-reused ids shared by every entity category.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> StableId {
        let id = StableId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityState {
    pub hp: f32,
    pub max_hp: f32,
}

/// Running score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub points: u32,
    pub enemies_killed: u32,
    pub enemies_leaked: u32,
    pub shots_fired: u32,
}

/// Playfield extents in device units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    pub ground_y: f32,
    /// Margin beyond the edges before entities are culled.
    pub margin: f32,
    /// Extra headroom above the top edge for lobbed shells.
    pub ceiling: f32,
    pub spawn_x: f32,
    pub spawn_band: f32,
}

impl Playfield {
    pub fn new(scaler: &Scaler, ground_y: f32) -> Self {
        Self {
            width: scaler.scale(REFERENCE_WIDTH),
            height: scaler.scale(REFERENCE_HEIGHT),
            ground_y: scaler.scale(ground_y),
            margin: scaler.scale(OOB_MARGIN),
            ceiling: scaler.scale(ARC_CEILING_MARGIN),
            spawn_x: scaler.scale(ENEMY_SPAWN_X),
            spawn_band: scaler.scale(ENEMY_SPAWN_BAND),
        }
    }

    /// Whether a point has left the area in which entities are kept alive.
    pub fn is_outside(&self, x: f32, y: f32) -> bool {
        x < -self.margin
            || x > self.width + self.margin
            || y > self.height + self.margin
            || y < -self.ceiling
    }
}

/// All mutable state of one run.
pub struct SimulationState {
    pub world: World,
    pub grid: Grid,
    pub ledger: Ledger,
    pub scheduler: WaveScheduler,
    pub city: CityState,
    pub score: ScoreState,
    pub ids: IdAllocator,
    pub rng: ChaCha8Rng,
    pub time: SimTime,
    pub phase: GamePhase,
    pub playfield: Playfield,
    pub selected_item: Option<BuildItem>,
    /// Consumers switched off by the last power pass.
    pub shed_consumers: u32,
    pub events: Vec<GameEvent>,
    pub rejections: Vec<CommandRejection>,
}

impl SimulationState {
    /// Fresh run state for an already validated configuration.
    pub fn new(config: &GameConfig, scaler: &Scaler, seed: u64) -> Self {
        let scheduler = WaveScheduler::new(WaveSchedule::from_table(&config.waves), &config.timing);
        let phase = if scheduler.is_complete() {
            GamePhase::Victory
        } else {
            GamePhase::Active
        };
        Self {
            world: World::new(),
            grid: Grid::new(&config.grid, scaler),
            ledger: Ledger::new(
                config.economy.starting_money,
                config.economy.starting_iron,
                config.economy.base_iron_capacity,
            ),
            scheduler,
            city: CityState {
                hp: config.city_max_hp,
                max_hp: config.city_max_hp,
            },
            score: ScoreState::default(),
            ids: IdAllocator::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            time: SimTime::default(),
            phase,
            playfield: Playfield::new(scaler, config.grid.ground_y),
            selected_item: None,
            shed_consumers: 0,
            events: Vec::new(),
            rejections: Vec::new(),
        }
    }
}
