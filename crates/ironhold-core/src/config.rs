//! Game configuration: stat tables, wave table and tuning parameters.
//!
//! Loadable from JSON; every section falls back to the built-in defaults
//! when omitted.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::ExpandDirection;
use crate::error::ConfigError;
use crate::stats::StatTables;
use crate::waves::WaveTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
    /// Left edge of column 0 (reference units).
    pub origin_x: f32,
    /// Bottom edge of the foundation row (reference units).
    pub ground_y: f32,
    pub expand_up_base_cost: u32,
    pub expand_sideways_base_cost: u32,
    /// Added per expansion already performed in the same direction.
    pub cost_growth: u32,
    pub max_expansions_up: u32,
    pub max_expansions_sideways: u32,
    /// Columns appended to each side per sideways step.
    pub side_block_width: u32,
}

impl GridConfig {
    /// Price of the next expansion after `performed` earlier ones in `direction`.
    /// Monotonically non-decreasing in `performed`.
    pub fn expansion_cost(&self, direction: ExpandDirection, performed: u32) -> u32 {
        let base = match direction {
            ExpandDirection::Up => self.expand_up_base_cost,
            ExpandDirection::Sideways => self.expand_sideways_base_cost,
        };
        base.saturating_add(self.cost_growth.saturating_mul(performed))
    }

    pub fn max_expansions(&self, direction: ExpandDirection) -> u32 {
        match direction {
            ExpandDirection::Up => self.max_expansions_up,
            ExpandDirection::Sideways => self.max_expansions_sideways,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: INITIAL_GRID_ROWS,
            cols: INITIAL_GRID_COLS,
            origin_x: GRID_ORIGIN_X,
            ground_y: GROUND_Y,
            expand_up_base_cost: EXPAND_UP_BASE_COST,
            expand_sideways_base_cost: EXPAND_SIDEWAYS_BASE_COST,
            cost_growth: EXPANSION_COST_GROWTH,
            max_expansions_up: MAX_EXPANSIONS_UP,
            max_expansions_sideways: MAX_EXPANSIONS_SIDEWAYS,
            side_block_width: SIDE_BLOCK_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_money: u32,
    pub starting_iron: f32,
    pub base_iron_capacity: f32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_money: STARTING_MONEY,
            starting_iron: STARTING_IRON,
            base_iron_capacity: BASE_IRON_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub preparation_time: f32,
    pub inter_wave_time: f32,
    pub max_frame_dt: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            preparation_time: PREPARATION_TIME,
            inter_wave_time: INTER_WAVE_TIME,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub stats: StatTables,
    #[serde(default)]
    pub waves: WaveTable,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default = "default_city_max_hp")]
    pub city_max_hp: f32,
}

fn default_city_max_hp() -> f32 {
    CITY_MAX_HP
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            stats: StatTables::default(),
            waves: WaveTable::default(),
            grid: GridConfig::default(),
            economy: EconomyConfig::default(),
            timing: TimingConfig::default(),
            city_max_hp: CITY_MAX_HP,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.stats.validate()?;
        self.waves.validate()?;

        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(ConfigError::invalid("grid", "needs at least one row and column"));
        }
        if !(self.economy.starting_iron.is_finite() && self.economy.starting_iron >= 0.0) {
            return Err(ConfigError::invalid("economy.starting_iron", "must be finite and >= 0"));
        }
        if !(self.economy.base_iron_capacity.is_finite() && self.economy.base_iron_capacity >= 0.0)
        {
            return Err(ConfigError::invalid(
                "economy.base_iron_capacity",
                "must be finite and >= 0",
            ));
        }
        for (name, value) in [
            ("timing.preparation_time", self.timing.preparation_time),
            ("timing.inter_wave_time", self.timing.inter_wave_time),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(name, "must be finite and >= 0"));
            }
        }
        if !(self.timing.max_frame_dt.is_finite() && self.timing.max_frame_dt > 0.0) {
            return Err(ConfigError::invalid("timing.max_frame_dt", "must be finite and > 0"));
        }
        if !(self.city_max_hp.is_finite() && self.city_max_hp > 0.0) {
            return Err(ConfigError::invalid("city_max_hp", "must be finite and > 0"));
        }
        Ok(())
    }
}
