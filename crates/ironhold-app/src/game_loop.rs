//! Game loop thread: advances the engine at a fixed step and publishes
//! snapshots.
//!
//! The engine is moved into the thread. Player commands arrive over an
//! `mpsc` channel; the latest snapshot is kept in shared state for polling.
//! In real-time mode the loop sleeps to hold `TICK_RATE`, otherwise it runs
//! as fast as it can. A paused run whose input has closed ends the loop.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use ironhold_core::commands::PlayerCommand;
use ironhold_core::enums::GamePhase;
use ironhold_core::state::GameStateSnapshot;
use ironhold_sim::SimulationEngine;

/// Nominal ticks per second.
pub const TICK_RATE: u32 = 30;

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the engine.
    Player(PlayerCommand),
    /// Stop the loop after the current tick.
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    /// Simulated seconds per tick.
    pub dt: f32,
    /// Sleep between ticks to run at wall-clock speed.
    pub realtime: bool,
    /// Stop once this much simulated time has passed.
    pub max_sim_secs: f64,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            dt: 1.0 / TICK_RATE as f32,
            realtime: false,
            max_sim_secs: 1_800.0,
        }
    }
}

/// Spawn the loop thread. The handle yields the final snapshot.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    settings: LoopSettings,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<GameStateSnapshot>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("ironhold-game-loop".into())
        .spawn(move || run_game_loop(engine, settings, cmd_rx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// Runs until the run is decided, the time limit passes, a Shutdown
/// arrives, or the run is left paused with no input.
fn run_game_loop(
    mut engine: SimulationEngine,
    settings: LoopSettings,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> GameStateSnapshot {
    let mut next_tick_time = Instant::now();
    let mut accepting = true;

    loop {
        // 1. Drain pending commands
        let mut shutdown = false;
        while accepting {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Player(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) => {
                    shutdown = true;
                    break;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                // Every sender is gone; keep simulating without input.
                Err(mpsc::TryRecvError::Disconnected) => accepting = false,
            }
        }

        // 2. Advance one tick
        let snapshot = engine.tick(settings.dt);
        for rejection in &snapshot.rejections {
            info!(command = ?rejection.command, reason = %rejection.reason, "command rejected");
        }

        // 3. Publish for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }

        if shutdown {
            debug!(tick = snapshot.time.tick, "game loop shut down");
            return snapshot;
        }
        if snapshot.phase.is_over() || snapshot.time.elapsed_secs >= settings.max_sim_secs {
            return snapshot;
        }
        if !accepting && snapshot.phase == GamePhase::Paused {
            // Nothing can unpause the run any more.
            info!(tick = snapshot.time.tick, "input closed while paused, stopping");
            return snapshot;
        }

        // 4. Pace to wall-clock time
        if settings.realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind; reset instead of spiralling.
                next_tick_time = now;
            }
        }
    }
}
