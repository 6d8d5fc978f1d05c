//! Core types and definitions for the IRONHOLD simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, stat tables, configuration, state snapshots,
//! events, errors and constants. It has no simulation logic and no
//! dependency on any runtime or presentation framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod scaler;
pub mod state;
pub mod stats;
pub mod types;
pub mod waves;
