// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! The MineFlux analysis engine.
//!
//! Everything in this crate is a pure, synchronous function of
//! in-memory inputs: an [`EnergySeries`](mineflux_types::EnergySeries),
//! a miner configuration and a market snapshot go in, derived result
//! structs come out. Results are recomputed from scratch whenever an
//! input is replaced; there is no incremental update model.

pub mod comparison;
pub mod export;
pub mod profile;
pub mod profitability;
pub mod recommend;
pub mod revenue;
pub mod utilization;

// Re-export the primary entry points
pub use comparison::{Breakeven, ComparisonParams, ComparisonResult, MonthlyComparison, compare};
pub use export::{read_projection_csv, write_projection_csv};
pub use profile::{EnergyProfile, MinerCountUtilization, survey};
pub use profitability::{MonthProjection, ProfitabilityResult, Roi, project};
pub use recommend::recommend_fleet;
pub use revenue::{DailyRevenue, daily_btc_at_full_uptime, daily_revenue};
pub use utilization::{SampleUtilization, UtilizationResult, analyze};
