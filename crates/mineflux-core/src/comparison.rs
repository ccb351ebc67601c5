// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! Grid-sell vs mining comparison from manually entered average
//! production figures.
//!
//! This is the coarse path for users without an hourly export series:
//! one daily-average production number, whole miners only, monthly
//! granularity. The uploaded-series path goes through
//! [`utilization`](crate::utilization) and
//! [`profitability`](crate::profitability) instead.

use mineflux_types::{MarketConditions, MinefluxError, MinerSpec, NetworkParams, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::profitability::PROJECTION_MONTHS;
use crate::revenue;

/// Manually entered inputs for the comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonParams {
    /// Average energy production per day (kWh)
    pub daily_production_kwh: f64,

    /// Feed-in tariff when selling to the grid (USD/kWh)
    pub grid_sell_price_usd_per_kwh: f64,

    /// Upfront hardware cost; 0 when hardware is already owned (USD)
    pub hardware_cost_usd: f64,

    /// Monthly incentives/subsidies added to mining revenue (USD)
    pub incentives_usd_per_month: f64,

    /// Tax on mining revenue, percent in [0, 100]
    pub tax_rate_percent: f64,
}

impl Default for ComparisonParams {
    fn default() -> Self {
        Self {
            daily_production_kwh: 0.0,
            grid_sell_price_usd_per_kwh: 0.0,
            hardware_cost_usd: 0.0,
            incentives_usd_per_month: 0.0,
            tax_rate_percent: 0.0,
        }
    }
}

/// Months until cumulative mining profit covers the hardware cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "months")]
pub enum Breakeven {
    Months(f64),
    /// Mining never recovers the hardware cost at this profit rate
    Never,
}

/// One row of the 24-month grid-vs-mining table. This is the shape the
/// projection CSV export mirrors field-for-field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyComparison {
    pub month: u32,
    pub grid_revenue_usd: f64,
    pub mining_profit_usd: f64,
    pub cumulative_grid_revenue_usd: f64,
    /// Net of the upfront hardware cost (subtracted once, at month 1)
    pub cumulative_mining_profit_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub grid_sell_monthly_usd: f64,
    pub mining_revenue_monthly_usd: f64,
    pub mining_costs_monthly_usd: f64,
    pub mining_profit_monthly_usd: f64,

    /// Mining profit minus grid revenue; negative means the grid wins
    pub net_difference_monthly_usd: f64,

    pub breakeven: Breakeven,

    /// Annual mining profit over hardware cost, percent; absent when no
    /// hardware cost was entered
    pub roi_percent: Option<f64>,

    /// Whole miners the daily production can feed around the clock
    pub max_miners: u32,

    pub energy_used_for_mining_kwh_per_day: f64,

    pub monthly: Vec<MonthlyComparison>,
}

/// Compare selling the production to the grid against running as many
/// whole units of `spec` as the daily average supports.
///
/// Zero supportable miners is not an error: the result then carries the
/// grid-only economics with `Breakeven::Never`.
pub fn compare(
    spec: &MinerSpec,
    params: &ComparisonParams,
    market: &MarketConditions,
    network: &NetworkParams,
) -> Result<ComparisonResult> {
    spec.validate()?;
    market.validate()?;
    if params.daily_production_kwh < 0.0 {
        return Err(MinefluxError::InvalidInput(format!(
            "daily production must not be negative, got {} kWh",
            params.daily_production_kwh
        )));
    }
    if !(0.0..=100.0).contains(&params.tax_rate_percent) {
        return Err(MinefluxError::InvalidInput(format!(
            "tax rate must be within [0, 100] percent, got {}",
            params.tax_rate_percent
        )));
    }

    let monthly_production_kwh = params.daily_production_kwh * 30.0;
    let grid_sell_monthly_usd = monthly_production_kwh * params.grid_sell_price_usd_per_kwh;

    // Whole miners only: each unit needs its full around-the-clock draw
    let miner_daily_kwh = spec.power_w / 1000.0 * 24.0;
    let max_miners = (params.daily_production_kwh / miner_daily_kwh).floor() as u32;

    if max_miners == 0 {
        debug!(
            daily_production_kwh = params.daily_production_kwh,
            miner_daily_kwh, "production cannot sustain a single unit, grid-only result"
        );
        return Ok(grid_only_result(grid_sell_monthly_usd));
    }

    let energy_used_kwh_per_day = f64::from(max_miners) * miner_daily_kwh;
    let fleet_hashrate_ths = f64::from(max_miners) * spec.hashrate_ths;

    let daily = revenue::daily_revenue(fleet_hashrate_ths, 100.0, market, network)?;
    let mining_revenue_monthly_usd = daily.revenue_usd * 30.0;

    // Hardware amortized over the projection window
    let mining_costs_monthly_usd = energy_used_kwh_per_day
        * 30.0
        * market.electricity_cost_usd_per_kwh
        + params.hardware_cost_usd / f64::from(PROJECTION_MONTHS);

    let after_tax_revenue = (mining_revenue_monthly_usd + params.incentives_usd_per_month)
        * (1.0 - params.tax_rate_percent / 100.0);
    let mining_profit_monthly_usd = after_tax_revenue - mining_costs_monthly_usd;

    let breakeven = if params.hardware_cost_usd <= 0.0 {
        Breakeven::Months(0.0)
    } else if mining_profit_monthly_usd > 0.0 {
        Breakeven::Months(params.hardware_cost_usd / mining_profit_monthly_usd)
    } else {
        Breakeven::Never
    };

    let roi_percent = if params.hardware_cost_usd > 0.0 {
        Some(mining_profit_monthly_usd * 12.0 / params.hardware_cost_usd * 100.0)
    } else {
        None
    };

    let monthly = (1..=PROJECTION_MONTHS)
        .map(|month| MonthlyComparison {
            month,
            grid_revenue_usd: grid_sell_monthly_usd,
            mining_profit_usd: mining_profit_monthly_usd,
            cumulative_grid_revenue_usd: grid_sell_monthly_usd * f64::from(month),
            cumulative_mining_profit_usd: mining_profit_monthly_usd * f64::from(month)
                - params.hardware_cost_usd,
        })
        .collect();

    Ok(ComparisonResult {
        grid_sell_monthly_usd,
        mining_revenue_monthly_usd,
        mining_costs_monthly_usd,
        mining_profit_monthly_usd,
        net_difference_monthly_usd: mining_profit_monthly_usd - grid_sell_monthly_usd,
        breakeven,
        roi_percent,
        max_miners,
        energy_used_for_mining_kwh_per_day: energy_used_kwh_per_day,
        monthly,
    })
}

fn grid_only_result(grid_sell_monthly_usd: f64) -> ComparisonResult {
    ComparisonResult {
        grid_sell_monthly_usd,
        mining_revenue_monthly_usd: 0.0,
        mining_costs_monthly_usd: 0.0,
        mining_profit_monthly_usd: 0.0,
        net_difference_monthly_usd: -grid_sell_monthly_usd,
        breakeven: Breakeven::Never,
        roi_percent: None,
        max_miners: 0,
        energy_used_for_mining_kwh_per_day: 0.0,
        monthly: (1..=PROJECTION_MONTHS)
            .map(|month| MonthlyComparison {
                month,
                grid_revenue_usd: grid_sell_monthly_usd,
                mining_profit_usd: 0.0,
                cumulative_grid_revenue_usd: grid_sell_monthly_usd * f64::from(month),
                cumulative_mining_profit_usd: 0.0,
            })
            .collect(),
    }
}
