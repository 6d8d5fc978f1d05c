//! Error taxonomy for rejected commands and bad configuration.
//!
//! Every rejection is local: it leaves state untouched and never unwinds
//! a tick. A missing firing solution is not an error (the solver returns
//! `None`), and a missing visual asset is handled by substituting a
//! placeholder footprint during stat validation.

use thiserror::Error;

use crate::enums::{BuildItem, EnemyKind, ExpandDirection};

/// Rejection of a player command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error(
        "insufficient funds: need {money_needed} money and {iron_needed} iron, \
         have {money_available} and {iron_available:.1}"
    )]
    InsufficientFunds {
        money_needed: u32,
        iron_needed: u32,
        money_available: u32,
        iron_available: f32,
    },
    #[error("invalid placement: {0}")]
    InvalidPlacement(#[from] PlacementError),
    #[error("expansion limit reached: {direction:?} allows at most {max}")]
    ExpansionLimitReached { direction: ExpandDirection, max: u32 },
    #[error("no stats configured for enemy {0:?}")]
    UnknownEnemy(EnemyKind),
    #[error("simulation is paused")]
    Paused,
    #[error("the run is over")]
    GameOver,
}

/// Why a placement or removal was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: u32, col: i32 },
    #[error("cell is already occupied")]
    Occupied,
    #[error("cell holds nothing to remove")]
    Empty,
    #[error("turrets need a free turret platform")]
    NoTurretPlatform,
    #[error("this building needs a reinforced foundation cell")]
    NotReinforced,
    #[error("no stats configured for {0:?}")]
    UnknownItem(BuildItem),
}

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing stat entry for {0}")]
    MissingEntry(String),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
