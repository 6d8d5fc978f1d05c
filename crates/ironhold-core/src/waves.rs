//! Declarative wave table.
//!
//! A wave is an ordered list of groups. The first group's `start_delay`
//! counts from the wave start; each later group's `start_delay` counts from
//! the point at which the previous group's first spawn was scheduled.
//! Within a group, spawns follow each other every `spawn_interval` seconds.

use serde::{Deserialize, Serialize};

use crate::enums::EnemyKind;
use crate::error::ConfigError;

/// Per-spawn stat multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariantModifiers {
    #[serde(default = "unit_scale")]
    pub health_scale: f32,
    #[serde(default = "unit_scale")]
    pub speed_scale: f32,
    #[serde(default = "unit_scale")]
    pub reward_scale: f32,
}

fn unit_scale() -> f32 {
    1.0
}

impl Default for VariantModifiers {
    fn default() -> Self {
        Self {
            health_scale: 1.0,
            speed_scale: 1.0,
            reward_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveGroup {
    pub start_delay: f32,
    pub enemy: EnemyKind,
    pub count: u32,
    pub spawn_interval: f32,
    #[serde(default)]
    pub variant: Option<VariantModifiers>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveDefinition {
    pub groups: Vec<WaveGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveTable {
    pub waves: Vec<WaveDefinition>,
}

impl WaveGroup {
    pub fn new(start_delay: f32, enemy: EnemyKind, count: u32, spawn_interval: f32) -> Self {
        Self {
            start_delay,
            enemy,
            count,
            spawn_interval,
            variant: None,
        }
    }

    pub fn with_variant(mut self, variant: VariantModifiers) -> Self {
        self.variant = Some(variant);
        self
    }
}

impl WaveTable {
    /// Total number of enemies across all waves.
    pub fn total_enemies(&self) -> u32 {
        self.waves
            .iter()
            .flat_map(|w| w.groups.iter())
            .map(|g| g.count)
            .sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (wave_idx, wave) in self.waves.iter().enumerate() {
            for (group_idx, group) in wave.groups.iter().enumerate() {
                let field = format!("waves[{wave_idx}].groups[{group_idx}]");
                if !(group.start_delay.is_finite() && group.start_delay >= 0.0) {
                    return Err(ConfigError::invalid(
                        format!("{field}.start_delay"),
                        "must be finite and >= 0",
                    ));
                }
                if !(group.spawn_interval.is_finite() && group.spawn_interval >= 0.0) {
                    return Err(ConfigError::invalid(
                        format!("{field}.spawn_interval"),
                        "must be finite and >= 0",
                    ));
                }
                if let Some(v) = group.variant {
                    for (name, value) in [
                        ("health_scale", v.health_scale),
                        ("speed_scale", v.speed_scale),
                        ("reward_scale", v.reward_scale),
                    ] {
                        if !(value.is_finite() && value > 0.0) {
                            return Err(ConfigError::invalid(
                                format!("{field}.variant.{name}"),
                                "must be finite and > 0",
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for WaveTable {
    /// Five escalating waves.
    fn default() -> Self {
        let armored = VariantModifiers {
            health_scale: 1.5,
            speed_scale: 0.9,
            reward_scale: 1.5,
        };
        Self {
            waves: vec![
                WaveDefinition {
                    groups: vec![WaveGroup::new(0.0, EnemyKind::Basic, 5, 2.0)],
                },
                WaveDefinition {
                    groups: vec![
                        WaveGroup::new(0.0, EnemyKind::Basic, 6, 1.5),
                        WaveGroup::new(4.0, EnemyKind::Fast, 4, 1.0),
                    ],
                },
                WaveDefinition {
                    groups: vec![
                        WaveGroup::new(0.0, EnemyKind::Fast, 6, 0.8),
                        WaveGroup::new(6.0, EnemyKind::Tank, 2, 4.0),
                        WaveGroup::new(3.0, EnemyKind::Basic, 6, 1.0),
                    ],
                },
                WaveDefinition {
                    groups: vec![
                        WaveGroup::new(0.0, EnemyKind::Tank, 3, 3.0),
                        WaveGroup::new(2.0, EnemyKind::Basic, 8, 0.8).with_variant(armored),
                        WaveGroup::new(5.0, EnemyKind::Fast, 8, 0.5),
                    ],
                },
                WaveDefinition {
                    groups: vec![
                        WaveGroup::new(0.0, EnemyKind::Fast, 10, 0.4),
                        WaveGroup::new(3.0, EnemyKind::Tank, 5, 2.0).with_variant(armored),
                        WaveGroup::new(4.0, EnemyKind::Basic, 12, 0.6).with_variant(armored),
                    ],
                },
            ],
        }
    }
}
