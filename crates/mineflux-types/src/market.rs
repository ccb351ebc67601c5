// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

use serde::{Deserialize, Serialize};

use crate::error::{MinefluxError, Result};

/// Documented fallback BTC price when no live source is reachable (USD)
pub const FALLBACK_BTC_PRICE_USD: f64 = 60_000.0;

/// Documented fallback network difficulty when no live source is reachable
pub const FALLBACK_NETWORK_DIFFICULTY: f64 = 70_000_000_000_000.0;

/// Market inputs for one analysis run.
///
/// Values may come from a live source or from the fallback constants;
/// the engine computes identically with either and never distinguishes
/// provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketConditions {
    pub btc_price_usd: f64,
    pub network_difficulty: f64,
    /// Pool fee as a percentage in [0, 100]
    pub pool_fee_percent: f64,
    pub electricity_cost_usd_per_kwh: f64,
}

impl Default for MarketConditions {
    fn default() -> Self {
        Self {
            btc_price_usd: FALLBACK_BTC_PRICE_USD,
            network_difficulty: FALLBACK_NETWORK_DIFFICULTY,
            pool_fee_percent: 2.0,
            electricity_cost_usd_per_kwh: 0.10,
        }
    }
}

impl MarketConditions {
    pub fn validate(&self) -> Result<()> {
        if self.btc_price_usd <= 0.0 {
            return Err(MinefluxError::InvalidInput(format!(
                "BTC price must be positive, got {}",
                self.btc_price_usd
            )));
        }
        if self.network_difficulty <= 0.0 {
            return Err(MinefluxError::InvalidInput(format!(
                "network difficulty must be positive, got {}",
                self.network_difficulty
            )));
        }
        if !(0.0..=100.0).contains(&self.pool_fee_percent) {
            return Err(MinefluxError::InvalidInput(format!(
                "pool fee must be within [0, 100] percent, got {}",
                self.pool_fee_percent
            )));
        }
        if self.electricity_cost_usd_per_kwh < 0.0 {
            return Err(MinefluxError::InvalidInput(format!(
                "electricity cost must not be negative, got {}",
                self.electricity_cost_usd_per_kwh
            )));
        }
        Ok(())
    }
}

/// Bitcoin network economics the revenue model and projector run
/// against.
///
/// These are parameters rather than embedded literals so the same
/// engine can be tested against different network epochs (halvings,
/// other growth regimes) without code changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Block subsidy (BTC)
    pub block_reward_btc: f64,

    /// Long-run average blocks mined per day
    pub blocks_per_day: f64,

    /// Assumed compounding monthly difficulty growth (fraction, 0.03 = 3%)
    pub monthly_difficulty_growth: f64,

    /// Hardware cost heuristic used when no explicit cost is known (USD per TH/s)
    pub hardware_cost_usd_per_th: f64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            block_reward_btc: 6.25,
            blocks_per_day: 144.0,
            monthly_difficulty_growth: 0.03,
            hardware_cost_usd_per_th: 50.0,
        }
    }
}
