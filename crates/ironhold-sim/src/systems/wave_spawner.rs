//! Wave scheduling: flattens the declarative wave table into timed spawn
//! queues and releases enemies as simulation time passes.
//!
//! Group timing: the first group's `start_delay` counts from the wave
//! start, each later group's from the scheduled time of the previous
//! group's first spawn. Groups may therefore overlap; the flattened queue
//! is ordered by absolute spawn time (table order on ties) and stored as
//! delays since the previous spawn.

use std::collections::VecDeque;

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use ironhold_core::components::EnemyState;
use ironhold_core::config::TimingConfig;
use ironhold_core::enums::{EnemyKind, WavePhase};
use ironhold_core::events::GameEvent;
use ironhold_core::scaler::Scaler;
use ironhold_core::stats::StatTables;
use ironhold_core::waves::{VariantModifiers, WaveDefinition, WaveTable};

use crate::simulation::{IdAllocator, Playfield};
use crate::world_setup;

/// One flattened spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnEntry {
    /// Seconds after the previous spawn (or the wave start, for the first).
    pub delay: f32,
    pub enemy: EnemyKind,
    pub variant: Option<VariantModifiers>,
}

/// Flattened spawn queues for every wave. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveSchedule {
    pub waves: Vec<Vec<SpawnEntry>>,
}

/// An enemy the scheduler wants spawned this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub enemy: EnemyKind,
    pub variant: Option<VariantModifiers>,
    /// 1-based wave number.
    pub wave: u32,
}

/// Flatten one wave into its ordered spawn sequence.
pub fn flatten_wave(wave: &WaveDefinition) -> Vec<SpawnEntry> {
    let mut timed = Vec::new();
    let mut group_start = 0.0f32;
    for group in &wave.groups {
        group_start += group.start_delay;
        for i in 0..group.count {
            let at = group_start + i as f32 * group.spawn_interval;
            timed.push((at, group.enemy, group.variant));
        }
    }
    // Stable: keeps table order for simultaneous spawns.
    timed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut previous = 0.0f32;
    timed
        .into_iter()
        .map(|(at, enemy, variant)| {
            let delay = at - previous;
            previous = at;
            SpawnEntry {
                delay,
                enemy,
                variant,
            }
        })
        .collect()
}

impl WaveSchedule {
    pub fn from_table(table: &WaveTable) -> Self {
        Self {
            waves: table.waves.iter().map(flatten_wave).collect(),
        }
    }

    pub fn total_waves(&self) -> u32 {
        self.waves.len() as u32
    }

    /// Total number of enemies across all waves.
    pub fn total_enemies(&self) -> u32 {
        self.waves.iter().map(|w| w.len() as u32).sum()
    }
}

/// Runtime state of the scheduler.
#[derive(Debug, Clone)]
pub struct WaveScheduler {
    schedule: WaveSchedule,
    phase: WavePhase,
    /// 1-based; 0 before the first wave.
    current_wave: u32,
    time_until_next_wave: f32,
    pending: VecDeque<SpawnEntry>,
    time_until_next_spawn: f32,
    inter_wave_time: f32,
}

impl WaveScheduler {
    pub fn new(schedule: WaveSchedule, timing: &TimingConfig) -> Self {
        let phase = if schedule.waves.is_empty() {
            WavePhase::Complete
        } else {
            WavePhase::Intermission
        };
        Self {
            schedule,
            phase,
            current_wave: 0,
            time_until_next_wave: timing.preparation_time,
            pending: VecDeque::new(),
            time_until_next_spawn: 0.0,
            inter_wave_time: timing.inter_wave_time,
        }
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn total_waves(&self) -> u32 {
        self.schedule.total_waves()
    }

    pub fn schedule(&self) -> &WaveSchedule {
        &self.schedule
    }

    pub fn is_complete(&self) -> bool {
        self.phase == WavePhase::Complete
    }

    pub fn wave_in_progress(&self) -> bool {
        matches!(self.phase, WavePhase::Spawning | WavePhase::AwaitingClear)
    }

    /// Countdown to the next wave, only meaningful during an intermission.
    pub fn time_to_next_wave(&self) -> Option<f32> {
        (self.phase == WavePhase::Intermission).then_some(self.time_until_next_wave.max(0.0))
    }

    /// Spawns still queued for the active wave.
    pub fn pending_spawns(&self) -> usize {
        self.pending.len()
    }

    /// Advance by `dt` seconds. `active_in_current_wave` is the number of
    /// live enemies tagged with the current wave; a wave is cleared only
    /// once its queue is drained and that count is zero.
    pub fn advance(
        &mut self,
        dt: f32,
        active_in_current_wave: usize,
        events: &mut Vec<GameEvent>,
    ) -> Vec<SpawnRequest> {
        let mut spawns = Vec::new();
        match self.phase {
            WavePhase::Intermission => {
                self.time_until_next_wave -= dt;
                if self.time_until_next_wave <= 0.0 {
                    let overshoot = -self.time_until_next_wave;
                    self.start_next_wave(overshoot, events);
                    self.release_due(&mut spawns);
                }
            }
            WavePhase::Spawning => {
                self.time_until_next_spawn -= dt;
                self.release_due(&mut spawns);
            }
            WavePhase::AwaitingClear => {
                if active_in_current_wave == 0 {
                    self.finish_wave(events);
                }
            }
            WavePhase::Complete => {}
        }
        spawns
    }

    fn start_next_wave(&mut self, overshoot: f32, events: &mut Vec<GameEvent>) {
        self.current_wave += 1;
        let queue = self
            .schedule
            .waves
            .get(self.current_wave as usize - 1)
            .cloned()
            .unwrap_or_default();
        self.pending = queue.into();
        self.time_until_next_wave = 0.0;
        self.time_until_next_spawn =
            self.pending.front().map(|e| e.delay).unwrap_or(0.0) - overshoot;
        self.phase = WavePhase::Spawning;

        info!(
            wave = self.current_wave,
            enemies = self.pending.len(),
            "wave started"
        );
        events.push(GameEvent::WaveStarted {
            wave: self.current_wave,
        });
    }

    /// Release every spawn whose time has come. Overshoot carries into the
    /// next delay so long frames keep the schedule exact.
    fn release_due(&mut self, spawns: &mut Vec<SpawnRequest>) {
        while self.phase == WavePhase::Spawning && self.time_until_next_spawn <= 0.0 {
            let Some(entry) = self.pending.pop_front() else {
                self.phase = WavePhase::AwaitingClear;
                break;
            };
            spawns.push(SpawnRequest {
                enemy: entry.enemy,
                variant: entry.variant,
                wave: self.current_wave,
            });
            match self.pending.front() {
                Some(next) => self.time_until_next_spawn += next.delay,
                None => self.phase = WavePhase::AwaitingClear,
            }
        }
    }

    fn finish_wave(&mut self, events: &mut Vec<GameEvent>) {
        info!(wave = self.current_wave, "wave cleared");
        events.push(GameEvent::WaveCleared {
            wave: self.current_wave,
        });
        if self.current_wave >= self.total_waves() {
            self.phase = WavePhase::Complete;
        } else {
            self.phase = WavePhase::Intermission;
            self.time_until_next_wave = self.inter_wave_time;
        }
    }
}

/// Advance the scheduler and spawn whatever it releases.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    scheduler: &mut WaveScheduler,
    dt: f32,
    stats: &StatTables,
    scaler: &Scaler,
    playfield: &Playfield,
    ids: &mut IdAllocator,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<GameEvent>,
) {
    let wave = scheduler.current_wave();
    let active = world
        .query_mut::<&EnemyState>()
        .into_iter()
        .filter(|(_, enemy)| enemy.fate.is_none() && enemy.wave == wave)
        .count();

    for request in scheduler.advance(dt, active, events) {
        let Some(enemy_stats) = stats.enemy(request.enemy) else {
            warn!(enemy = ?request.enemy, "no stats for scheduled enemy, skipping spawn");
            continue;
        };
        let footprint = world_setup::enemy_footprint(enemy_stats, scaler);
        let position = world_setup::entry_position(rng, playfield, &footprint);
        let id = ids.next_id();
        world_setup::spawn_enemy(
            world,
            id,
            request.enemy,
            enemy_stats,
            request.variant,
            request.wave,
            position,
            scaler,
        );
        debug!(id = id.0, enemy = ?request.enemy, wave = request.wave, "enemy spawned");
        events.push(GameEvent::EnemySpawned {
            id,
            kind: request.enemy,
            wave: request.wave,
        });
    }
}
