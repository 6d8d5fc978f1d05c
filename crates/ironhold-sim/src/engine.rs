//! Simulation engine: the tick orchestrator.
//!
//! `SimulationEngine` owns the explicit `SimulationState`, processes player
//! commands, runs all systems in a fixed order and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic
//! testing.

use std::collections::VecDeque;

use glam::Vec2;
use hecs::{Entity, World};
use tracing::{info, warn};

use ironhold_core::commands::{CommandRejection, PlayerCommand};
use ironhold_core::config::GameConfig;
use ironhold_core::enums::{BuildItem, EnemyKind, ExpandDirection, GamePhase};
use ironhold_core::error::{ConfigError, SimError};
use ironhold_core::events::GameEvent;
use ironhold_core::scaler::Scaler;
use ironhold_core::state::GameStateSnapshot;
use ironhold_core::types::{GridPos, SimTime, StableId};

use crate::economy::Ledger;
use crate::grid::Grid;
use crate::placement;
use crate::simulation::SimulationState;
use crate::systems;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and inputs give the same run.
    pub seed: u64,
    /// Device surface size; reference units are scaled to fit it.
    pub device_width: f32,
    pub device_height: f32,
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            device_width: ironhold_core::constants::REFERENCE_WIDTH,
            device_height: ironhold_core::constants::REFERENCE_HEIGHT,
            game: GameConfig::default(),
        }
    }
}

/// The simulation engine. Owns the run state and the command queue.
pub struct SimulationEngine {
    config: GameConfig,
    scaler: Scaler,
    state: SimulationState,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
}

impl SimulationEngine {
    /// Validate the configuration and set up a fresh run.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let mut game = config.game;
        game.validate()?;
        let scaler = Scaler::new(config.device_width, config.device_height);
        let state = SimulationState::new(&game, &scaler, config.seed);
        info!(
            seed = config.seed,
            scale = scaler.factor(),
            waves = state.scheduler.total_waves(),
            "simulation initialized"
        );
        Ok(Self {
            config: game,
            scaler,
            state,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `dt` seconds and return the resulting
    /// snapshot. Queued commands are applied first. While paused or after
    /// the run has ended, time does not advance.
    pub fn tick(&mut self, dt: f32) -> GameStateSnapshot {
        self.process_commands();

        if self.state.phase == GamePhase::Active {
            let dt = self.clamp_dt(dt);
            self.run_systems(dt);
            self.state.time.advance(dt);
            self.check_outcome();
        }

        self.snapshot()
    }

    /// Snapshot of the current state, draining pending events and
    /// rejections.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.state.events);
        let rejections = std::mem::take(&mut self.state.rejections);
        systems::snapshot::build_snapshot(&self.state, &self.config.grid, events, rejections)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn time(&self) -> SimTime {
        self.state.time
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn ledger(&self) -> &Ledger {
        &self.state.ledger
    }

    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.state.world
    }

    /// Whether `item` could be placed at `(row, col)` right now.
    pub fn can_place(&self, item: BuildItem, row: u32, col: i32) -> bool {
        placement::can_place(&self.state, &self.config.stats, item, GridPos::new(row, col))
    }

    /// Place `item` immediately, bypassing the command queue.
    pub fn place(&mut self, item: BuildItem, row: u32, col: i32) -> Result<StableId, SimError> {
        placement::place(
            &mut self.state,
            &self.config.stats,
            &self.scaler,
            item,
            GridPos::new(row, col),
        )
    }

    /// Remove whatever is on top at `(row, col)` immediately.
    pub fn remove(&mut self, row: u32, col: i32) -> Result<BuildItem, SimError> {
        placement::remove(&mut self.state, &self.config.stats, GridPos::new(row, col))
    }

    /// Buy `steps` grid expansions immediately. Returns the money spent.
    pub fn expand(&mut self, direction: ExpandDirection, steps: u32) -> Result<u32, SimError> {
        placement::expand(&mut self.state, &self.config.grid, direction, steps)
    }

    /// Damage every active enemy within `radius` of `center` (device
    /// units, boundary inclusive). Returns the number of enemies hit.
    pub fn trigger_aoe_damage(&mut self, center: Vec2, radius: f32, damage: f32) -> u32 {
        let state = &mut self.state;
        systems::damage::trigger_aoe_damage(
            &state.world,
            center,
            radius,
            damage,
            &mut state.ledger,
            &mut state.score,
            &mut state.events,
        )
    }

    /// Spawn an enemy outside of the wave schedule at a device-unit
    /// position. It belongs to no wave.
    pub fn spawn_enemy_at(&mut self, kind: EnemyKind, position: Vec2) -> Result<StableId, SimError> {
        let stats = self
            .config
            .stats
            .enemy(kind)
            .ok_or(SimError::UnknownEnemy(kind))?;
        let id = self.state.ids.next_id();
        world_setup::spawn_enemy(
            &mut self.state.world,
            id,
            kind,
            stats,
            None,
            0,
            position,
            &self.scaler,
        );
        self.state.events.push(GameEvent::EnemySpawned { id, kind, wave: 0 });
        Ok(id)
    }

    fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.config.timing.max_frame_dt)
        } else {
            0.0
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(&command) {
                info!(?command, %err, "command rejected");
                self.state.rejections.push(CommandRejection {
                    command,
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: &PlayerCommand) -> Result<(), SimError> {
        if self.state.phase.is_over() {
            return Err(SimError::GameOver);
        }
        match *command {
            PlayerCommand::TogglePause => {
                self.state.phase = match self.state.phase {
                    GamePhase::Active => GamePhase::Paused,
                    _ => GamePhase::Active,
                };
                info!(phase = ?self.state.phase, "pause toggled");
                Ok(())
            }
            PlayerCommand::SelectBuildItem { item } => {
                self.state.selected_item = item;
                Ok(())
            }
            _ if self.state.phase == GamePhase::Paused => Err(SimError::Paused),
            PlayerCommand::PlaceItem { item, row, col } => self.place(item, row, col).map(|_| ()),
            PlayerCommand::RemoveItem { row, col } => self.remove(row, col).map(|_| ()),
            PlayerCommand::ExpandGrid { direction } => self.expand(direction, 1).map(|_| ()),
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f32) {
        let state = &mut self.state;

        // 1. Power flags and economy rates, from one global snapshot
        systems::power::run(
            &mut state.world,
            &state.grid,
            &mut state.ledger,
            self.config.economy.base_iron_capacity,
            &mut state.shed_consumers,
            &mut state.events,
        );
        // 2. Iron production
        state.ledger.tick_production(dt);
        // 3. Wave scheduler (may add enemies)
        systems::wave_spawner::run(
            &mut state.world,
            &mut state.scheduler,
            dt,
            &self.config.stats,
            &self.scaler,
            &state.playfield,
            &mut state.ids,
            &mut state.rng,
            &mut state.events,
        );
        // 4. Turrets (shots are buffered)
        let shots = systems::turret::run(&mut state.world, dt, self.scaler.gravity());
        // 5. Projectiles (impacts, AoE), then this tick's shots enter the world
        systems::projectile::run(
            &mut state.world,
            dt,
            &state.playfield,
            &mut state.ledger,
            &mut state.score,
            &mut state.events,
        );
        systems::turret::spawn_shots(
            &mut state.world,
            shots,
            &mut state.ids,
            &mut state.score,
            &mut state.events,
        );
        // 6. Enemies (movement, boundary)
        systems::enemy::run(
            &mut state.world,
            dt,
            state.grid.boundary_x(),
            &state.playfield,
            &mut state.city,
            &mut state.score,
            &mut state.events,
        );
        // 7. Prune inactive entities
        systems::cleanup::run(&mut state.world, &state.playfield, &mut self.despawn_buffer);
    }

    /// Transition to a terminal phase if the run has been decided.
    fn check_outcome(&mut self) {
        let state = &mut self.state;
        if state.city.hp <= 0.0 {
            state.phase = GamePhase::Defeated;
            warn!(
                tick = state.time.tick,
                wave = state.scheduler.current_wave(),
                "city destroyed, run lost"
            );
            state.events.push(GameEvent::Defeated);
        } else if state.scheduler.is_complete() {
            state.phase = GamePhase::Victory;
            info!(tick = state.time.tick, score = state.score.points, "all waves cleared");
            state.events.push(GameEvent::Victory);
        }
    }
}
