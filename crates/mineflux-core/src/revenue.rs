// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! Closed-form mining revenue model.
//!
//! Deterministic arithmetic, not a simulation: the uptime-adjusted
//! hashrate is assumed to participate in the network proportionally and
//! instantaneously, with no variance or luck modeling.

use mineflux_types::{MarketConditions, MinefluxError, NetworkParams, Result};
use serde::{Deserialize, Serialize};

/// Expected daily yield of a miner at a given uptime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    /// BTC mined per day after pool fees
    pub btc_mined: f64,

    /// Fiat value of the mined BTC (USD)
    pub revenue_usd: f64,
}

/// Expected BTC mined per day at 100% uptime.
///
/// `dailyBtc = hashrate_ghs * blocks_per_day * block_reward / (difficulty / 2^32)`
pub fn daily_btc_at_full_uptime(
    hashrate_ths: f64,
    difficulty: f64,
    network: &NetworkParams,
) -> Result<f64> {
    if hashrate_ths <= 0.0 {
        return Err(MinefluxError::InvalidInput(format!(
            "hashrate must be positive, got {hashrate_ths} TH/s"
        )));
    }
    if difficulty <= 0.0 {
        return Err(MinefluxError::InvalidInput(format!(
            "network difficulty must be positive, got {difficulty}"
        )));
    }

    let hashrate_ghs = hashrate_ths * 1000.0;
    let shares_per_block = difficulty / 2f64.powi(32);
    Ok(hashrate_ghs * network.blocks_per_day * network.block_reward_btc / shares_per_block)
}

/// Daily BTC yield and fiat revenue at an actual uptime.
///
/// Uptime scales the full-uptime yield linearly, the pool fee is taken
/// off the top, and the remainder is converted at the given BTC price.
pub fn daily_revenue(
    hashrate_ths: f64,
    uptime_percent: f64,
    market: &MarketConditions,
    network: &NetworkParams,
) -> Result<DailyRevenue> {
    market.validate()?;
    if !(0.0..=100.0).contains(&uptime_percent) {
        return Err(MinefluxError::InvalidInput(format!(
            "uptime must be within [0, 100] percent, got {uptime_percent}"
        )));
    }

    let at_full_uptime =
        daily_btc_at_full_uptime(hashrate_ths, market.network_difficulty, network)?;
    let at_actual_uptime = at_full_uptime * (uptime_percent / 100.0);
    let btc_mined = at_actual_uptime * (1.0 - market.pool_fee_percent / 100.0);

    Ok(DailyRevenue {
        btc_mined,
        revenue_usd: btc_mined * market.btc_price_usd,
    })
}
