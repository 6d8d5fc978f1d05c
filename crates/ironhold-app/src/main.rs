//! Headless runner: loads a configuration, applies a build script and plays
//! the run out on the game loop thread.
//!
//! Usage: `ironhold [--config PATH] [--script PATH] [--seed N] [--dt SECS]
//! [--max-secs SECS] [--realtime] [--stdin] [--json]`
//!
//! With `--stdin`, each input line is parsed as a JSON `PlayerCommand` and
//! forwarded to the running simulation.

mod game_loop;

use std::io::BufRead;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ironhold_core::commands::PlayerCommand;
use ironhold_core::config::GameConfig;
use ironhold_core::enums::{BuildItem, BuildingKind, TurretKind};
use ironhold_core::state::GameStateSnapshot;
use ironhold_sim::{SimConfig, SimulationEngine};

use crate::game_loop::{GameLoopCommand, LoopSettings};

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    script: Option<String>,
    seed: Option<u64>,
    dt: Option<f32>,
    max_secs: Option<f64>,
    realtime: bool,
    stdin: bool,
    json: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = || it.next().ok_or_else(|| anyhow!("{arg} expects a value"));
        match arg.as_str() {
            "--config" => args.config = Some(value()?),
            "--script" => args.script = Some(value()?),
            "--seed" => args.seed = Some(value()?.parse().context("--seed")?),
            "--dt" => args.dt = Some(value()?.parse().context("--dt")?),
            "--max-secs" => args.max_secs = Some(value()?.parse().context("--max-secs")?),
            "--realtime" => args.realtime = true,
            "--stdin" => args.stdin = true,
            "--json" => args.json = true,
            other => warn!(arg = other, "ignoring unknown argument"),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&str>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    GameConfig::from_json(&json).with_context(|| format!("loading configuration from {path}"))
}

fn load_script(path: Option<&str>) -> Result<Vec<PlayerCommand>> {
    let Some(path) = path else {
        return Ok(default_build_order());
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&json).with_context(|| format!("parsing build script {path}"))
}

/// A small opening that holds the first waves: one generator and two
/// gatlings on frames next to the boundary.
fn default_build_order() -> Vec<PlayerCommand> {
    let place = |item, row, col| PlayerCommand::PlaceItem { item, row, col };
    vec![
        place(BuildItem::Building(BuildingKind::Generator), 0, 0),
        place(BuildItem::Building(BuildingKind::Frame), 0, 3),
        place(BuildItem::Turret(TurretKind::Gatling), 0, 3),
        place(BuildItem::Building(BuildingKind::Frame), 1, 3),
        place(BuildItem::Turret(TurretKind::Gatling), 1, 3),
    ]
}

/// Forward JSON commands from stdin until EOF.
fn spawn_stdin_reader(tx: std::sync::mpsc::Sender<GameLoopCommand>) -> Result<()> {
    std::thread::Builder::new()
        .name("ironhold-stdin".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<PlayerCommand>(&line) {
                    Ok(cmd) => {
                        if tx.send(GameLoopCommand::Player(cmd)).is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(%err, "unreadable command"),
                }
            }
        })
        .context("spawning stdin reader")?;
    Ok(())
}

fn print_summary(snap: &GameStateSnapshot) {
    println!(
        "Run over | phase: {:?} | time: {:.1}s ({} ticks) | wave: {}/{}",
        snap.phase,
        snap.time.elapsed_secs,
        snap.time.tick,
        snap.waves.current_wave,
        snap.waves.total_waves
    );
    println!(
        "Score | points: {} | killed: {} | leaked: {} | shots: {} | city: {:.0}/{:.0}",
        snap.score.points,
        snap.score.enemies_killed,
        snap.score.enemies_leaked,
        snap.score.shots_fired,
        snap.city.hp,
        snap.city.max_hp
    );
    println!(
        "Economy | money: {} | iron: {:.1}/{:.0} | power: {:.0}/{:.0}",
        snap.economy.money,
        snap.economy.iron,
        snap.economy.iron_capacity,
        snap.economy.power_consumed,
        snap.economy.power_produced
    );
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args()?;
    let game = load_config(args.config.as_deref())?;
    let script = load_script(args.script.as_deref())?;

    let defaults = SimConfig::default();
    let mut engine = SimulationEngine::new(SimConfig {
        seed: args.seed.unwrap_or(defaults.seed),
        game,
        ..defaults
    })
    .context("invalid configuration")?;
    info!(commands = script.len(), "applying build script");
    engine.queue_commands(script);

    let loop_defaults = LoopSettings::default();
    let settings = LoopSettings {
        dt: args.dt.unwrap_or(loop_defaults.dt),
        realtime: args.realtime,
        max_sim_secs: args.max_secs.unwrap_or(loop_defaults.max_sim_secs),
    };

    let latest = Arc::new(Mutex::new(None));
    let (tx, handle) =
        game_loop::spawn_game_loop(engine, settings, latest).context("spawning game loop")?;
    if args.stdin {
        spawn_stdin_reader(tx)?;
    } else {
        drop(tx);
    }

    let last = handle
        .join()
        .map_err(|_| anyhow!("game loop thread panicked"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&last)?);
    }
    print_summary(&last);
    Ok(())
}
