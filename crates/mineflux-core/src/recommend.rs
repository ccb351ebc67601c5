// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! Greedy fleet composition under a power budget.
//!
//! Two passes over the catalog: first fill with the most efficient
//! models (J/TH), capped per model so one cheap workhorse cannot crowd
//! out everything else, then top the remainder up one unit at a time
//! by hashrate per dollar. The result is a good fleet, not a provably
//! optimal one; exact knapsack packing is out of scope.

use mineflux_types::{MinefluxError, MinerSelection, MinerSpec, Result};
use tracing::debug;

/// Models considered in the efficiency pass
const EFFICIENCY_PASS_CANDIDATES: usize = 10;

/// Per-model unit cap during the efficiency pass
const EFFICIENCY_PASS_MAX_UNITS: u32 = 3;

/// Leftover budget below this is not worth another unit (W)
const MIN_REMAINING_BUDGET_W: f64 = 500.0;

/// Compose a fleet from `catalog` that fits within `power_budget_w`.
///
/// Models without a hardware price are skipped; the top-up pass needs
/// a cost to rank by. Returns `NoViableConfiguration` when no priced
/// model fits the budget at all.
pub fn recommend_fleet(catalog: &[MinerSpec], power_budget_w: f64) -> Result<MinerSelection> {
    if power_budget_w <= 0.0 {
        return Err(MinefluxError::InvalidInput(format!(
            "power budget must be positive, got {power_budget_w} W"
        )));
    }

    let mut candidates: Vec<&MinerSpec> = catalog
        .iter()
        .filter(|spec| {
            spec.power_w > 0.0 && spec.hashrate_ths > 0.0 && spec.hardware_cost_usd.is_some()
        })
        .collect();

    if candidates.iter().all(|spec| spec.power_w > power_budget_w) {
        return Err(MinefluxError::NoViableConfiguration(format!(
            "no catalog model fits within {power_budget_w} W"
        )));
    }

    let mut selection = MinerSelection::default();
    let mut remaining_w = power_budget_w;

    // Pass 1: most efficient models first, a few units of each
    candidates.sort_by(|a, b| {
        a.efficiency()
            .partial_cmp(&b.efficiency())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for spec in candidates.iter().take(EFFICIENCY_PASS_CANDIDATES) {
        let fits = (remaining_w / spec.power_w).floor() as u32;
        let quantity = fits.min(EFFICIENCY_PASS_MAX_UNITS);
        if quantity > 0 {
            selection.add((*spec).clone(), quantity);
            remaining_w -= f64::from(quantity) * spec.power_w;
            debug!(
                model = %spec.name,
                quantity,
                remaining_w,
                "efficiency pass added units"
            );
        }
    }

    // Pass 2: top up by hashrate per dollar, one unit at a time
    candidates.sort_by(|a, b| {
        let value_a = a.hashrate_ths / a.hardware_cost_usd.unwrap_or(f64::INFINITY);
        let value_b = b.hashrate_ths / b.hardware_cost_usd.unwrap_or(f64::INFINITY);
        value_b
            .partial_cmp(&value_a)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for spec in &candidates {
        if remaining_w < MIN_REMAINING_BUDGET_W {
            break;
        }
        if spec.power_w <= remaining_w {
            selection.add((*spec).clone(), 1);
            remaining_w -= spec.power_w;
            debug!(model = %spec.name, remaining_w, "top-up pass added unit");
        }
    }

    if selection.unit_count() == 0 {
        return Err(MinefluxError::NoViableConfiguration(format!(
            "no combination of catalog models fits within {power_budget_w} W"
        )));
    }

    Ok(selection)
}
