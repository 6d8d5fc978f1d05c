//! Strongly typed per-kind stat records.
//!
//! One table per entity category, keyed by the kind enums. The tables are
//! the only externally editable balance data besides the wave table; all
//! values are in reference units.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{DEFAULT_HITBOX_FRACTION, PLACEHOLDER_FOOTPRINT};
use crate::enums::*;
use crate::error::ConfigError;

/// Price of a build item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub money: u32,
    #[serde(default)]
    pub iron: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingStats {
    pub cost: Cost,
    #[serde(default)]
    pub power_production: f32,
    #[serde(default)]
    pub power_consumption: f32,
    #[serde(default)]
    pub iron_per_minute: f32,
    #[serde(default)]
    pub storage_increase: f32,
    #[serde(default)]
    pub adjacency_bonus_per_unit: f32,
    #[serde(default)]
    pub turret_platform: bool,
    /// Only placeable on reinforced foundation cells.
    #[serde(default)]
    pub requires_reinforced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurretStats {
    pub cost: Cost,
    pub mode: FireMode,
    #[serde(default)]
    pub power_consumption: f32,
    #[serde(default)]
    pub min_range: f32,
    pub max_range: f32,
    /// Shots per second.
    pub fire_rate: f32,
    pub projectile: ProjectileKind,
    /// Projectile speed for direct fire, launch speed for arc fire.
    pub launch_speed: f32,
    #[serde(default = "default_muzzle_length")]
    pub muzzle_length: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileStats {
    pub damage: f32,
    #[serde(default)]
    pub aoe_radius: f32,
    /// Maximum flight time for direct fire. Arc shells use their solved
    /// time of flight instead.
    pub lifetime: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub max_hp: f32,
    pub speed: f32,
    pub damage_to_city: f32,
    pub reward_money: u32,
    #[serde(default)]
    pub reward_score: u32,
    /// Visual bounds. Absent when the sprite is missing; validation then
    /// substitutes `PLACEHOLDER_FOOTPRINT`.
    #[serde(default)]
    pub size: Option<Vec2>,
    #[serde(default = "default_hitbox_fraction")]
    pub hitbox_fraction: f32,
}

fn default_muzzle_length() -> f32 {
    12.0
}

fn default_hitbox_fraction() -> f32 {
    DEFAULT_HITBOX_FRACTION
}

/// All stat tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatTables {
    pub buildings: BTreeMap<BuildingKind, BuildingStats>,
    pub turrets: BTreeMap<TurretKind, TurretStats>,
    pub projectiles: BTreeMap<ProjectileKind, ProjectileStats>,
    pub enemies: BTreeMap<EnemyKind, EnemyStats>,
}

impl StatTables {
    pub fn building(&self, kind: BuildingKind) -> Option<&BuildingStats> {
        self.buildings.get(&kind)
    }

    pub fn turret(&self, kind: TurretKind) -> Option<&TurretStats> {
        self.turrets.get(&kind)
    }

    pub fn projectile(&self, kind: ProjectileKind) -> Option<&ProjectileStats> {
        self.projectiles.get(&kind)
    }

    pub fn enemy(&self, kind: EnemyKind) -> Option<&EnemyStats> {
        self.enemies.get(&kind)
    }

    /// Price of any build item.
    pub fn cost_of(&self, item: BuildItem) -> Option<Cost> {
        match item {
            BuildItem::Building(kind) => self.building(kind).map(|s| s.cost),
            BuildItem::Turret(kind) => self.turret(kind).map(|s| s.cost),
        }
    }

    /// Check required entries and value ranges, and apply explicit defaults
    /// for optional presentation data.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        for kind in BuildingKind::ALL {
            let stats = self
                .buildings
                .get(&kind)
                .ok_or_else(|| ConfigError::MissingEntry(format!("building {kind:?}")))?;
            let field = format!("building {kind:?}");
            non_negative(&field, "power_production", stats.power_production)?;
            non_negative(&field, "power_consumption", stats.power_consumption)?;
            non_negative(&field, "iron_per_minute", stats.iron_per_minute)?;
            non_negative(&field, "storage_increase", stats.storage_increase)?;
            non_negative(&field, "adjacency_bonus_per_unit", stats.adjacency_bonus_per_unit)?;
        }

        for kind in TurretKind::ALL {
            let stats = self
                .turrets
                .get(&kind)
                .ok_or_else(|| ConfigError::MissingEntry(format!("turret {kind:?}")))?;
            let field = format!("turret {kind:?}");
            non_negative(&field, "power_consumption", stats.power_consumption)?;
            non_negative(&field, "min_range", stats.min_range)?;
            positive(&field, "max_range", stats.max_range)?;
            positive(&field, "fire_rate", stats.fire_rate)?;
            positive(&field, "launch_speed", stats.launch_speed)?;
            non_negative(&field, "muzzle_length", stats.muzzle_length)?;
            if stats.min_range > stats.max_range {
                return Err(ConfigError::invalid(
                    format!("{field}.min_range"),
                    "must not exceed max_range",
                ));
            }
            if !self.projectiles.contains_key(&stats.projectile) {
                return Err(ConfigError::MissingEntry(format!(
                    "projectile {:?} (fired by {kind:?})",
                    stats.projectile
                )));
            }
        }

        for (kind, stats) in &self.projectiles {
            let field = format!("projectile {kind:?}");
            non_negative(&field, "damage", stats.damage)?;
            non_negative(&field, "aoe_radius", stats.aoe_radius)?;
            positive(&field, "lifetime", stats.lifetime)?;
        }

        for kind in EnemyKind::ALL {
            let stats = self
                .enemies
                .get_mut(&kind)
                .ok_or_else(|| ConfigError::MissingEntry(format!("enemy {kind:?}")))?;
            let field = format!("enemy {kind:?}");
            positive(&field, "max_hp", stats.max_hp)?;
            non_negative(&field, "speed", stats.speed)?;
            non_negative(&field, "damage_to_city", stats.damage_to_city)?;
            if !(stats.hitbox_fraction > 0.0 && stats.hitbox_fraction <= 1.0) {
                return Err(ConfigError::invalid(
                    format!("{field}.hitbox_fraction"),
                    "must be within (0, 1]",
                ));
            }
            match stats.size {
                Some(size) if size.is_finite() && size.x > 0.0 && size.y > 0.0 => {}
                _ => {
                    warn!(enemy = ?kind, "no visual size configured, using placeholder footprint");
                    stats.size = Some(placeholder_footprint());
                }
            }
        }

        Ok(())
    }
}

/// Footprint substituted for missing visual assets.
pub fn placeholder_footprint() -> Vec2 {
    Vec2::new(PLACEHOLDER_FOOTPRINT.0, PLACEHOLDER_FOOTPRINT.1)
}

fn non_negative(entry: &str, name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            format!("{entry}.{name}"),
            format!("expected a finite value >= 0, got {value}"),
        ))
    }
}

fn positive(entry: &str, name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            format!("{entry}.{name}"),
            format!("expected a finite value > 0, got {value}"),
        ))
    }
}

impl Default for StatTables {
    fn default() -> Self {
        let mut buildings = BTreeMap::new();
        buildings.insert(
            BuildingKind::Frame,
            BuildingStats {
                cost: Cost { money: 20, iron: 5 },
                power_production: 0.0,
                power_consumption: 0.0,
                iron_per_minute: 0.0,
                storage_increase: 0.0,
                adjacency_bonus_per_unit: 0.0,
                turret_platform: true,
                requires_reinforced: false,
            },
        );
        buildings.insert(
            BuildingKind::Foundation,
            BuildingStats {
                cost: Cost { money: 40, iron: 10 },
                power_production: 0.0,
                power_consumption: 0.0,
                iron_per_minute: 0.0,
                storage_increase: 0.0,
                adjacency_bonus_per_unit: 0.0,
                turret_platform: false,
                requires_reinforced: true,
            },
        );
        buildings.insert(
            BuildingKind::Generator,
            BuildingStats {
                cost: Cost {
                    money: 120,
                    iron: 20,
                },
                power_production: 10.0,
                power_consumption: 0.0,
                iron_per_minute: 0.0,
                storage_increase: 0.0,
                adjacency_bonus_per_unit: 0.0,
                turret_platform: false,
                requires_reinforced: false,
            },
        );
        buildings.insert(
            BuildingKind::Miner,
            BuildingStats {
                cost: Cost { money: 80, iron: 10 },
                power_production: 0.0,
                power_consumption: 3.0,
                iron_per_minute: 12.0,
                storage_increase: 0.0,
                adjacency_bonus_per_unit: 0.0,
                turret_platform: false,
                requires_reinforced: false,
            },
        );
        buildings.insert(
            BuildingKind::Storage,
            BuildingStats {
                cost: Cost { money: 60, iron: 10 },
                power_production: 0.0,
                power_consumption: 1.0,
                iron_per_minute: 0.0,
                storage_increase: 100.0,
                adjacency_bonus_per_unit: 25.0,
                turret_platform: false,
                requires_reinforced: false,
            },
        );

        let mut turrets = BTreeMap::new();
        turrets.insert(
            TurretKind::Gatling,
            TurretStats {
                cost: Cost {
                    money: 100,
                    iron: 15,
                },
                mode: FireMode::Direct,
                power_consumption: 4.0,
                min_range: 0.0,
                max_range: 320.0,
                fire_rate: 4.0,
                projectile: ProjectileKind::Bullet,
                launch_speed: 600.0,
                muzzle_length: 14.0,
            },
        );
        turrets.insert(
            TurretKind::Mortar,
            TurretStats {
                cost: Cost {
                    money: 180,
                    iron: 30,
                },
                mode: FireMode::Arc,
                power_consumption: 6.0,
                min_range: 120.0,
                max_range: 600.0,
                fire_rate: 0.5,
                projectile: ProjectileKind::Shell,
                launch_speed: 500.0,
                muzzle_length: 16.0,
            },
        );

        let mut projectiles = BTreeMap::new();
        projectiles.insert(
            ProjectileKind::Bullet,
            ProjectileStats {
                damage: 10.0,
                aoe_radius: 0.0,
                lifetime: 1.5,
            },
        );
        projectiles.insert(
            ProjectileKind::Shell,
            ProjectileStats {
                damage: 30.0,
                aoe_radius: 48.0,
                lifetime: 6.0,
            },
        );

        let mut enemies = BTreeMap::new();
        enemies.insert(
            EnemyKind::Basic,
            EnemyStats {
                max_hp: 50.0,
                speed: 40.0,
                damage_to_city: 10.0,
                reward_money: 15,
                reward_score: 10,
                size: Some(Vec2::new(28.0, 28.0)),
                hitbox_fraction: DEFAULT_HITBOX_FRACTION,
            },
        );
        enemies.insert(
            EnemyKind::Fast,
            EnemyStats {
                max_hp: 30.0,
                speed: 80.0,
                damage_to_city: 5.0,
                reward_money: 10,
                reward_score: 15,
                size: Some(Vec2::new(20.0, 20.0)),
                hitbox_fraction: DEFAULT_HITBOX_FRACTION,
            },
        );
        enemies.insert(
            EnemyKind::Tank,
            EnemyStats {
                max_hp: 200.0,
                speed: 20.0,
                damage_to_city: 25.0,
                reward_money: 40,
                reward_score: 50,
                size: Some(Vec2::new(40.0, 36.0)),
                hitbox_fraction: 0.7,
            },
        );

        Self {
            buildings,
            turrets,
            projectiles,
            enemies,
        }
    }
}
