//! Enumeration types used throughout the simulation.
//!
//! Kind enums double as the stable string identifiers used by the
//! externally editable stat and wave tables.

use serde::{Deserialize, Serialize};

/// Grid building category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    /// Structural frame; the only turret platform.
    Frame,
    /// Heavy base block, placeable only on reinforced foundation cells.
    Foundation,
    /// Produces electricity.
    Generator,
    /// Produces iron over time.
    Miner,
    /// Raises iron capacity; gains an adjacency bonus from storage neighbors.
    Storage,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 5] = [
        BuildingKind::Frame,
        BuildingKind::Foundation,
        BuildingKind::Generator,
        BuildingKind::Miner,
        BuildingKind::Storage,
    ];
}

/// Turret category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurretKind {
    /// Direct-fire, high rate, single target.
    Gatling,
    /// Arc-fire, minimum range, area damage.
    Mortar,
}

impl TurretKind {
    pub const ALL: [TurretKind; 2] = [TurretKind::Gatling, TurretKind::Mortar];
}

/// How a weapon's projectile travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireMode {
    /// Constant-velocity straight line along the aim angle.
    Direct,
    /// Gravity-affected parabola from a firing solution.
    Arc,
}

/// Projectile category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    Bullet,
    Shell,
}

/// Enemy tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank];
}

/// Something the player can place on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "kind", rename_all = "snake_case")]
pub enum BuildItem {
    Building(BuildingKind),
    Turret(TurretKind),
}

/// Grid expansion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpandDirection {
    /// Append rows at the top.
    Up,
    /// Append a column block on each side.
    Sideways,
}

/// Turret behavior phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurretPhase {
    /// Unpowered: no target, no fire.
    #[default]
    Idle,
    /// Powered, looking for an eligible enemy.
    Scanning,
    /// Holding a target while waiting for a firing solution or for a
    /// reload that began outside the engagement.
    Tracking,
    /// Reloading after a shot. Ends when the timer expires (the target is
    /// re-validated, else the turret re-scans) or when the target is lost.
    Cooldown,
}

/// Why an enemy stopped being active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyFate {
    Killed,
    ReachedCity,
    Culled,
}

/// Wave scheduler phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Counting down to the next wave.
    #[default]
    Intermission,
    /// Releasing the active wave's spawn queue.
    Spawning,
    /// Everything spawned; waiting for the wave's enemies to be gone.
    AwaitingClear,
    /// Every wave in the table has been cleared.
    Complete,
}

/// Top-level game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    Paused,
    /// City hit points reached zero.
    Defeated,
    /// All waves cleared.
    Victory,
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::Defeated | GamePhase::Victory)
    }
}
