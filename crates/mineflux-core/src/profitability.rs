// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! Profitability projection: daily economics of a miner configuration
//! plus a 24-month forward curve under compounding difficulty growth.

use mineflux_types::{CombinedMiner, MarketConditions, MinefluxError, NetworkParams, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::revenue;
use crate::utilization::UtilizationResult;

/// Months projected forward
pub const PROJECTION_MONTHS: u32 = 24;

/// Days until the hardware pays for itself, or never
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "days")]
pub enum Roi {
    Days(f64),
    /// Daily profit is zero or negative; the hardware never pays back
    Unbounded,
}

impl Roi {
    pub fn days(&self) -> Option<f64> {
        match *self {
            Self::Days(days) => Some(days),
            Self::Unbounded => None,
        }
    }
}

/// One month of the forward projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthProjection {
    /// 1-based month number
    pub month: u32,

    /// Profit for this month after the difficulty-growth discount (USD)
    pub monthly_profit_usd: f64,

    /// Running profit net of the upfront hardware cost (USD)
    pub cumulative_profit_usd: f64,

    /// Upfront hardware cost, repeated per row so a breakeven line can
    /// be drawn on the same axis (USD)
    pub hardware_cost_usd: f64,
}

/// Full profitability picture for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitabilityResult {
    /// BTC mined per day after pool fees, at the observed uptime
    pub daily_btc_mined: f64,
    pub daily_revenue_usd: f64,
    pub daily_energy_cost_usd: f64,
    pub daily_profit_usd: f64,

    // Linear extrapolations of the daily profit, not calendar-accurate
    pub weekly_profit_usd: f64,
    pub monthly_profit_usd: f64,
    pub yearly_profit_usd: f64,

    /// Explicit cost if supplied, otherwise the $/TH heuristic
    pub hardware_cost_usd: f64,

    pub roi: Roi,

    pub projection: Vec<MonthProjection>,
}

/// Combine a utilization result with the revenue model into daily
/// profit, ROI and a 24-month projection.
///
/// `hardware_cost_usd` falls back to
/// `hashrate × NetworkParams::hardware_cost_usd_per_th` when `None`.
pub fn project(
    utilization: &UtilizationResult,
    miner: &CombinedMiner,
    market: &MarketConditions,
    network: &NetworkParams,
    hardware_cost_usd: Option<f64>,
) -> Result<ProfitabilityResult> {
    if let Some(cost) = hardware_cost_usd {
        if cost < 0.0 {
            return Err(MinefluxError::InvalidInput(format!(
                "hardware cost must not be negative, got {cost}"
            )));
        }
    }

    let revenue = revenue::daily_revenue(
        miner.hashrate_ths,
        utilization.uptime_percent,
        market,
        network,
    )?;

    // Normalize the series-spanning energy cost back to a per-day rate.
    // A series shorter than 24 samples is costed as exactly one day.
    let days_spanned = (utilization.total_hours as f64 / 24.0).max(1.0);
    let daily_energy_cost_usd = utilization.miner_hourly_consumption_kwh
        * utilization.uptime_hours as f64
        * market.electricity_cost_usd_per_kwh
        / days_spanned;

    let daily_profit_usd = revenue.revenue_usd - daily_energy_cost_usd;

    let hardware_cost_usd =
        hardware_cost_usd.unwrap_or(miner.hashrate_ths * network.hardware_cost_usd_per_th);

    let roi = if daily_profit_usd > 0.0 {
        Roi::Days(hardware_cost_usd / daily_profit_usd)
    } else {
        Roi::Unbounded
    };

    let monthly_profit_usd = daily_profit_usd * 30.0;
    let projection = project_months(monthly_profit_usd, hardware_cost_usd, network);

    debug!(
        daily_profit_usd,
        hardware_cost_usd,
        roi_days = ?roi.days(),
        "profitability projection complete"
    );

    Ok(ProfitabilityResult {
        daily_btc_mined: revenue.btc_mined,
        daily_revenue_usd: revenue.revenue_usd,
        daily_energy_cost_usd,
        daily_profit_usd,
        weekly_profit_usd: daily_profit_usd * 7.0,
        monthly_profit_usd,
        yearly_profit_usd: daily_profit_usd * 365.0,
        hardware_cost_usd,
        roi,
        projection,
    })
}

/// 24-month curve: each month's profit shrinks by the compounding
/// difficulty growth factor, the cumulative sum is net of the upfront
/// hardware cost (subtracted once, at month 1).
fn project_months(
    monthly_profit_usd: f64,
    hardware_cost_usd: f64,
    network: &NetworkParams,
) -> Vec<MonthProjection> {
    let mut cumulative = -hardware_cost_usd;
    (1..=PROJECTION_MONTHS)
        .map(|month| {
            let difficulty_factor =
                (1.0 + network.monthly_difficulty_growth).powi(month as i32 - 1);
            let adjusted = monthly_profit_usd / difficulty_factor;
            cumulative += adjusted;
            MonthProjection {
                month,
                monthly_profit_usd: adjusted,
                cumulative_profit_usd: cumulative,
                hardware_cost_usd,
            }
        })
        .collect()
}
