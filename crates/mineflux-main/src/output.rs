// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! Terminal tables for analysis results.

use comfy_table::{Attribute, Cell, Table, presets::UTF8_FULL};
use mineflux_core::{
    Breakeven, ComparisonResult, EnergyProfile, ProfitabilityResult, Roi, UtilizationResult,
};
use mineflux_types::{MinerSelection, MinerSpec};

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

pub fn selection_table(selection: &MinerSelection) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&["Model", "Qty", "Power (W)", "Hashrate (TH/s)", "Cost (USD)"]));
    for entry in selection.entries() {
        table.add_row(vec![
            Cell::new(&entry.spec.name),
            Cell::new(entry.quantity),
            Cell::new(format!("{:.0}", entry.spec.power_w * f64::from(entry.quantity))),
            Cell::new(format!(
                "{:.1}",
                entry.spec.hashrate_ths * f64::from(entry.quantity)
            )),
            Cell::new(
                entry
                    .spec
                    .hardware_cost_usd
                    .map_or_else(|| "-".to_owned(), |c| format!("{:.0}", c * f64::from(entry.quantity))),
            ),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(selection.unit_count()),
        Cell::new(format!("{:.0}", selection.total_power_w())),
        Cell::new(format!("{:.1}", selection.total_hashrate_ths())),
        Cell::new(
            selection
                .total_hardware_cost_usd()
                .map_or_else(|| "-".to_owned(), |c| format!("{c:.0}")),
        ),
    ]);
    table
}

pub fn utilization_table(result: &UtilizationResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&["Metric", "Value"]));
    table.add_row(vec!["Samples", &result.total_hours.to_string()]);
    table.add_row(vec![
        "Uptime",
        &format!("{} h ({:.1}%)", result.uptime_hours, result.uptime_percent),
    ]);
    table.add_row(vec![
        "Energy available",
        &format!("{:.1} kWh", result.total_energy_available_kwh),
    ]);
    table.add_row(vec![
        "Energy used",
        &format!(
            "{:.1} kWh ({:.1}%)",
            result.total_energy_used_kwh, result.utilization_percent
        ),
    ]);
    table.add_row(vec![
        "Energy wasted",
        &format!("{:.1} kWh", result.total_energy_wasted_kwh),
    ]);
    table
}

pub fn profitability_table(result: &ProfitabilityResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&["Metric", "Value"]));
    table.add_row(vec![
        "BTC mined / day",
        &format!("{:.8}", result.daily_btc_mined),
    ]);
    table.add_row(vec![
        "Revenue / day",
        &format!("{:.2} USD", result.daily_revenue_usd),
    ]);
    table.add_row(vec![
        "Energy cost / day",
        &format!("{:.2} USD", result.daily_energy_cost_usd),
    ]);
    table.add_row(vec![
        "Profit / day",
        &format!("{:.2} USD", result.daily_profit_usd),
    ]);
    table.add_row(vec![
        "Profit / month",
        &format!("{:.2} USD", result.monthly_profit_usd),
    ]);
    table.add_row(vec![
        "Hardware cost",
        &format!("{:.2} USD", result.hardware_cost_usd),
    ]);
    table.add_row(vec![
        "ROI",
        &match result.roi {
            Roi::Days(days) => format!("{days:.0} days"),
            Roi::Unbounded => "never (not profitable)".to_owned(),
        },
    ]);
    table
}

pub fn comparison_table(result: &ComparisonResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&["Metric", "Grid sell", "Mining"]));
    table.add_row(vec![
        "Monthly revenue (USD)".to_owned(),
        format!("{:.2}", result.grid_sell_monthly_usd),
        format!("{:.2}", result.mining_revenue_monthly_usd),
    ]);
    table.add_row(vec![
        "Monthly costs (USD)".to_owned(),
        "0.00".to_owned(),
        format!("{:.2}", result.mining_costs_monthly_usd),
    ]);
    table.add_row(vec![
        "Monthly profit (USD)".to_owned(),
        format!("{:.2}", result.grid_sell_monthly_usd),
        format!("{:.2}", result.mining_profit_monthly_usd),
    ]);
    table.add_row(vec![
        "Breakeven".to_owned(),
        "-".to_owned(),
        match result.breakeven {
            Breakeven::Months(months) => format!("{months:.1} months"),
            Breakeven::Never => "never".to_owned(),
        },
    ]);
    table
}

pub fn profile_table(profile: &EnergyProfile) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&["Metric", "Value"]));
    table.add_row(vec!["Samples", &profile.sample_count.to_string()]);
    table.add_row(vec![
        "Total energy",
        &format!("{:.1} kWh", profile.total_energy_kwh),
    ]);
    table.add_row(vec![
        "Mean / max per sample",
        &format!(
            "{:.2} / {:.2} kWh",
            profile.mean_energy_kwh, profile.max_energy_kwh
        ),
    ]);
    table.add_row(vec![
        "Dead hours",
        &format!("{} ({:.1}%)", profile.zero_hours, profile.zero_hours_percent),
    ]);
    table.add_row(vec![
        "Mining potential",
        &format!("{:.1}% of samples", profile.mining_potential_percent),
    ]);
    table.add_row(vec![
        "Supported miners (mean/max)",
        &format!(
            "{:.1} / {}",
            profile.mean_supported_miners, profile.max_supported_miners
        ),
    ]);
    table
}

pub fn bands_table(profile: &EnergyProfile) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&["Band", "Samples", "Share"]));
    for band in &profile.bands {
        table.add_row(vec![
            band.label.clone(),
            band.sample_count.to_string(),
            format!("{:.1}%", band.percent_of_samples),
        ]);
    }
    table
}

pub fn catalog_table(specs: &[MinerSpec]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&[
        "ID",
        "Model",
        "Power (W)",
        "Hashrate (TH/s)",
        "J/TH",
        "Cost (USD)",
    ]));
    for spec in specs {
        table.add_row(vec![
            spec.id.clone(),
            spec.name.clone(),
            format!("{:.0}", spec.power_w),
            format!("{:.1}", spec.hashrate_ths),
            format!("{:.1}", spec.efficiency()),
            spec.hardware_cost_usd
                .map_or_else(|| "-".to_owned(), |c| format!("{c:.0}")),
        ]);
    }
    table
}
