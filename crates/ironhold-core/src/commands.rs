//! Player commands sent from the input layer to the simulation.
//!
//! Commands are queued and applied at the start of the next tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Place a building or turret at a grid cell.
    PlaceItem { item: BuildItem, row: u32, col: i32 },
    /// Remove the turret (or, if none, the building) at a grid cell.
    RemoveItem { row: u32, col: i32 },
    /// Buy one grid expansion step.
    ExpandGrid { direction: ExpandDirection },
    /// Change the currently selected build item (presentation state only).
    SelectBuildItem { item: Option<BuildItem> },
    /// Pause or resume the simulation.
    TogglePause,
}

/// A command that was rejected, surfaced back to the issuer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRejection {
    pub command: PlayerCommand,
    pub reason: String,
}
