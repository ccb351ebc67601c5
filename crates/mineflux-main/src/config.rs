// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! Application configuration loaded from a TOML file.
//!
//! Every field has a default, so a missing config file or an empty one
//! is fine; CLI flags override whatever the file provides.

use std::path::Path;

use anyhow::{Context, Result};
use mineflux_types::{MarketConditions, NetworkParams};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Market assumptions
    #[serde(default)]
    pub market: MarketSection,

    /// Bitcoin network constants
    #[serde(default)]
    pub network: NetworkSection,

    /// Analysis behaviour
    #[serde(default)]
    pub analysis: AnalysisSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSection {
    /// Pool fee in percent
    #[serde(default = "default_pool_fee")]
    pub pool_fee_percent: f64,

    /// Grid electricity price (USD/kWh), used for the energy the
    /// miners draw
    #[serde(default = "default_electricity_cost")]
    pub electricity_cost_usd_per_kwh: f64,

    /// Pin the BTC price instead of fetching it
    #[serde(default)]
    pub btc_price_usd: Option<f64>,

    /// Pin the network difficulty instead of fetching it
    #[serde(default)]
    pub network_difficulty: Option<f64>,
}

impl Default for MarketSection {
    fn default() -> Self {
        Self {
            pool_fee_percent: default_pool_fee(),
            electricity_cost_usd_per_kwh: default_electricity_cost(),
            btc_price_usd: None,
            network_difficulty: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSection {
    #[serde(default = "default_block_reward")]
    pub block_reward_btc: f64,

    #[serde(default = "default_blocks_per_day")]
    pub blocks_per_day: f64,

    /// Monthly difficulty growth assumed by the projection (0.03 = 3%)
    #[serde(default = "default_difficulty_growth")]
    pub monthly_difficulty_growth: f64,

    /// Heuristic hardware price for unpriced models (USD per TH/s)
    #[serde(default = "default_cost_per_th")]
    pub hardware_cost_usd_per_th: f64,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            block_reward_btc: default_block_reward(),
            blocks_per_day: default_blocks_per_day(),
            monthly_difficulty_growth: default_difficulty_growth(),
            hardware_cost_usd_per_th: default_cost_per_th(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSection {
    /// Skip all network calls and use fallbacks/pins
    #[serde(default)]
    pub offline: bool,

    /// Override the miner catalog feed URL
    #[serde(default)]
    pub catalog_url: Option<String>,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            offline: false,
            catalog_url: None,
        }
    }
}

fn default_pool_fee() -> f64 {
    2.0
}

fn default_electricity_cost() -> f64 {
    0.10
}

fn default_block_reward() -> f64 {
    6.25
}

fn default_blocks_per_day() -> f64 {
    144.0
}

fn default_difficulty_growth() -> f64 {
    0.03
}

fn default_cost_per_th() -> f64 {
    50.0
}

impl AppConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn network_params(&self) -> NetworkParams {
        NetworkParams {
            block_reward_btc: self.network.block_reward_btc,
            blocks_per_day: self.network.blocks_per_day,
            monthly_difficulty_growth: self.network.monthly_difficulty_growth,
            hardware_cost_usd_per_th: self.network.hardware_cost_usd_per_th,
        }
    }

    /// Market conditions without any network fetch: pinned values where
    /// present, fallbacks otherwise.
    pub fn offline_market_conditions(&self) -> MarketConditions {
        let defaults = MarketConditions::default();
        MarketConditions {
            btc_price_usd: self.market.btc_price_usd.unwrap_or(defaults.btc_price_usd),
            network_difficulty: self
                .market
                .network_difficulty
                .unwrap_or(defaults.network_difficulty),
            pool_fee_percent: self.market.pool_fee_percent,
            electricity_cost_usd_per_kwh: self.market.electricity_cost_usd_per_kwh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/mineflux.toml")).unwrap();
        assert!((config.market.pool_fee_percent - 2.0).abs() < 1e-9);
        assert!((config.network.block_reward_btc - 6.25).abs() < 1e-9);
        assert!(!config.analysis.offline);
    }

    #[test]
    fn test_partial_file_fills_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[market]\npool_fee_percent = 1.5\nbtc_price_usd = 72000.0\n"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert!((config.market.pool_fee_percent - 1.5).abs() < 1e-9);
        assert_eq!(config.market.btc_price_usd, Some(72000.0));
        // untouched sections keep their defaults
        assert!((config.network.blocks_per_day - 144.0).abs() < 1e-9);
    }

    #[test]
    fn test_offline_conditions_use_pins_over_fallbacks() {
        let mut config = AppConfig::default();
        config.market.btc_price_usd = Some(55000.0);
        let conditions = config.offline_market_conditions();
        assert!((conditions.btc_price_usd - 55000.0).abs() < 1e-9);
        assert!((conditions.network_difficulty - 7e13).abs() < 1.0);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[market\npool_fee_percent = oops").unwrap();
        assert!(AppConfig::load(file.path()).is_err());
    }
}
