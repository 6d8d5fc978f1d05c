//! Economy ledger: money, iron and the per-tick electricity snapshot.

use ironhold_core::error::SimError;
use ironhold_core::stats::Cost;

/// Money and iron balances plus the rates derived from the last power pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    money: u32,
    iron: f32,
    iron_capacity: f32,
    /// Iron per minute from functional producers.
    iron_production: f32,
    power_produced: f32,
    power_consumed: f32,
}

impl Ledger {
    /// Opening balances. Iron starts clamped to capacity.
    pub fn new(money: u32, iron: f32, iron_capacity: f32) -> Self {
        let iron_capacity = iron_capacity.max(0.0);
        Self {
            money,
            iron: iron.clamp(0.0, iron_capacity),
            iron_capacity,
            iron_production: 0.0,
            power_produced: 0.0,
            power_consumed: 0.0,
        }
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn iron(&self) -> f32 {
        self.iron
    }

    pub fn iron_capacity(&self) -> f32 {
        self.iron_capacity
    }

    pub fn iron_production(&self) -> f32 {
        self.iron_production
    }

    pub fn power_produced(&self) -> f32 {
        self.power_produced
    }

    pub fn power_consumed(&self) -> f32 {
        self.power_consumed
    }

    pub fn can_afford(&self, cost: Cost) -> bool {
        self.money >= cost.money && self.iron >= cost.iron as f32
    }

    /// Deduct `cost`, or leave balances untouched and report the shortfall.
    pub fn spend(&mut self, cost: Cost) -> Result<(), SimError> {
        if !self.can_afford(cost) {
            return Err(SimError::InsufficientFunds {
                money_needed: cost.money,
                iron_needed: cost.iron,
                money_available: self.money,
                iron_available: self.iron,
            });
        }
        self.money -= cost.money;
        self.iron -= cost.iron as f32;
        Ok(())
    }

    /// Credit money and iron. Iron above capacity is discarded.
    pub fn earn(&mut self, money: u32, iron: f32) {
        self.money = self.money.saturating_add(money);
        if iron > 0.0 {
            self.iron = (self.iron + iron).min(self.iron_capacity);
        }
    }

    /// Accrue iron for `dt` seconds at the current production rate.
    pub fn tick_production(&mut self, dt: f32) {
        if self.iron_production <= 0.0 || dt <= 0.0 {
            return;
        }
        let gained = self.iron_production / 60.0 * dt;
        self.iron = (self.iron + gained).min(self.iron_capacity);
    }

    /// Install the rates computed by the power pass. A lowered capacity
    /// discards the excess stock.
    pub fn set_rates(
        &mut self,
        iron_production: f32,
        iron_capacity: f32,
        power_produced: f32,
        power_consumed: f32,
    ) {
        self.iron_production = iron_production.max(0.0);
        self.iron_capacity = iron_capacity.max(0.0);
        self.iron = self.iron.min(self.iron_capacity);
        self.power_produced = power_produced;
        self.power_consumed = power_consumed;
    }
}
