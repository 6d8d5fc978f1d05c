//! Simulation engine for IRONHOLD.
//!
//! Owns the hecs ECS world, the economy ledger, the buildable grid and the
//! wave scheduler; runs the combat systems in a fixed order each tick and
//! produces `GameStateSnapshot`s for the presentation layer.

pub mod economy;
pub mod engine;
pub mod grid;
pub mod placement;
pub mod simulation;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use ironhold_core as core;

#[cfg(test)]
mod tests;
