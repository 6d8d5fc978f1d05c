//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` plus whatever slices of
//! `SimulationState` they need. They do not own state.

pub mod cleanup;
pub mod damage;
pub mod enemy;
pub mod power;
pub mod projectile;
pub mod snapshot;
pub mod turret;
pub mod wave_spawner;
