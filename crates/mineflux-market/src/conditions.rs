// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! BTC price and network difficulty fetching.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use mineflux_types::{FALLBACK_BTC_PRICE_USD, FALLBACK_NETWORK_DIFFICULTY, MarketConditions};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the snapshot's numbers came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Live,
    /// One or both endpoints failed; defaults were substituted
    Fallback,
}

/// Market conditions plus their provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub conditions: MarketConditions,
    pub source: DataSource,
    pub fetched_at: DateTime<Utc>,
}

pub struct MarketDataClient {
    client: Client,
    price_url: String,
    /// Difficulty endpoints tried in order; values at or below this
    /// era's plausible floor of 1e9 are treated as trillion-scaled
    difficulty_urls: Vec<String>,
}

impl std::fmt::Debug for MarketDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataClient")
            .field("price_url", &self.price_url)
            .field("difficulty_urls", &self.difficulty_urls)
            .finish_non_exhaustive()
    }
}

impl Default for MarketDataClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketDataClient {
    pub fn new() -> Self {
        Self::with_urls(
            "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd"
                .to_owned(),
            vec![
                "https://chain.api.btc.com/v3/block/latest".to_owned(),
                "https://blockchain.info/q/getdifficulty".to_owned(),
            ],
        )
    }

    /// Endpoint override for tests
    pub fn with_urls(price_url: String, difficulty_urls: Vec<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            price_url,
            difficulty_urls,
        }
    }

    /// Fetch current market conditions, substituting the defaults for
    /// whatever could not be fetched. Never fails; the snapshot's
    /// `source` marks degraded results.
    pub fn fetch(&self, pool_fee_percent: f64, electricity_cost_usd_per_kwh: f64) -> MarketSnapshot {
        let price = self.fetch_btc_price();
        let difficulty = self.fetch_difficulty();
        let source = if price.is_some() && difficulty.is_some() {
            DataSource::Live
        } else {
            DataSource::Fallback
        };

        let conditions = MarketConditions {
            btc_price_usd: price.unwrap_or(FALLBACK_BTC_PRICE_USD),
            network_difficulty: difficulty.unwrap_or(FALLBACK_NETWORK_DIFFICULTY),
            pool_fee_percent,
            electricity_cost_usd_per_kwh,
        };
        info!(
            btc_price_usd = conditions.btc_price_usd,
            network_difficulty = conditions.network_difficulty,
            ?source,
            "market snapshot ready"
        );

        MarketSnapshot {
            conditions,
            source,
            fetched_at: Utc::now(),
        }
    }

    fn fetch_btc_price(&self) -> Option<f64> {
        match self.try_fetch_btc_price() {
            Ok(price) if price > 0.0 => Some(price),
            Ok(price) => {
                warn!(price, "price endpoint returned a non-positive price");
                None
            }
            Err(e) => {
                warn!(error = %e, "BTC price fetch failed, using fallback");
                None
            }
        }
    }

    fn try_fetch_btc_price(&self) -> Result<f64> {
        #[derive(Deserialize)]
        struct CurrencyQuote {
            usd: f64,
        }
        #[derive(Deserialize)]
        struct PriceResponse {
            bitcoin: CurrencyQuote,
        }

        let response: PriceResponse = self
            .client
            .get(&self.price_url)
            .send()
            .context("price request failed")?
            .error_for_status()
            .context("price endpoint returned an error status")?
            .json()
            .context("price response is not the expected JSON")?;
        Ok(response.bitcoin.usd)
    }

    fn fetch_difficulty(&self) -> Option<f64> {
        for url in &self.difficulty_urls {
            match self.try_fetch_difficulty(url) {
                Ok(difficulty) if difficulty > 0.0 => return Some(difficulty),
                Ok(difficulty) => {
                    warn!(url, difficulty, "difficulty endpoint returned non-positive value");
                }
                Err(e) => {
                    warn!(url, error = %e, "difficulty fetch failed, trying next endpoint");
                }
            }
        }
        None
    }

    fn try_fetch_difficulty(&self, url: &str) -> Result<f64> {
        let body = self
            .client
            .get(url)
            .send()
            .context("difficulty request failed")?
            .error_for_status()
            .context("difficulty endpoint returned an error status")?
            .text()
            .context("difficulty response is not text")?;

        // Either a bare number (blockchain.info) or a JSON block header
        // with a difficulty field (btc.com)
        let raw = if let Ok(value) = body.trim().parse::<f64>() {
            value
        } else {
            let json: serde_json::Value =
                serde_json::from_str(&body).context("difficulty response is not JSON")?;
            json.pointer("/data/difficulty")
                .or_else(|| json.pointer("/difficulty"))
                .and_then(serde_json::Value::as_f64)
                .context("difficulty field missing from JSON response")?
        };

        // Some aggregators quote difficulty in trillions
        if raw > 0.0 && raw < 1e9 {
            Ok(raw * 1e12)
        } else {
            Ok(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_against(server: &mockito::ServerGuard) -> MarketDataClient {
        MarketDataClient::with_urls(
            format!("{}/price", server.url()),
            vec![format!("{}/difficulty", server.url())],
        )
    }

    #[test]
    fn test_live_fetch_populates_conditions() {
        let mut server = mockito::Server::new();
        let _price = server
            .mock("GET", "/price")
            .with_body(r#"{"bitcoin":{"usd":64250.5}}"#)
            .create();
        let _difficulty = server
            .mock("GET", "/difficulty")
            .with_body("95000000000000.0")
            .create();

        let snapshot = client_against(&server).fetch(2.0, 0.10);
        assert_eq!(snapshot.source, DataSource::Live);
        assert!((snapshot.conditions.btc_price_usd - 64250.5).abs() < 1e-9);
        assert!((snapshot.conditions.network_difficulty - 9.5e13).abs() < 1.0);
        assert!((snapshot.conditions.pool_fee_percent - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_json_difficulty_response_is_understood() {
        let mut server = mockito::Server::new();
        let _price = server
            .mock("GET", "/price")
            .with_body(r#"{"bitcoin":{"usd":60000.0}}"#)
            .create();
        let _difficulty = server
            .mock("GET", "/difficulty")
            .with_body(r#"{"data":{"difficulty":88000000000000.0}}"#)
            .create();

        let snapshot = client_against(&server).fetch(2.0, 0.10);
        assert_eq!(snapshot.source, DataSource::Live);
        assert!((snapshot.conditions.network_difficulty - 8.8e13).abs() < 1.0);
    }

    #[test]
    fn test_trillion_scaled_difficulty_is_rescaled() {
        let mut server = mockito::Server::new();
        let _price = server
            .mock("GET", "/price")
            .with_body(r#"{"bitcoin":{"usd":60000.0}}"#)
            .create();
        let _difficulty = server
            .mock("GET", "/difficulty")
            .with_body("95.2")
            .create();

        let snapshot = client_against(&server).fetch(2.0, 0.10);
        assert!((snapshot.conditions.network_difficulty - 95.2e12).abs() < 1e3);
    }

    #[test]
    fn test_endpoint_failure_falls_back_without_erroring() {
        let mut server = mockito::Server::new();
        let _price = server.mock("GET", "/price").with_status(500).create();
        let _difficulty = server
            .mock("GET", "/difficulty")
            .with_body("not a number at all {{")
            .create();

        let snapshot = client_against(&server).fetch(2.0, 0.10);
        assert_eq!(snapshot.source, DataSource::Fallback);
        assert!((snapshot.conditions.btc_price_usd - FALLBACK_BTC_PRICE_USD).abs() < 1e-9);
        assert!(
            (snapshot.conditions.network_difficulty - FALLBACK_NETWORK_DIFFICULTY).abs() < 1.0
        );
    }

    #[test]
    fn test_second_difficulty_endpoint_is_tried() {
        let mut server = mockito::Server::new();
        let _price = server
            .mock("GET", "/price")
            .with_body(r#"{"bitcoin":{"usd":60000.0}}"#)
            .create();
        let _bad = server.mock("GET", "/difficulty-a").with_status(502).create();
        let _good = server
            .mock("GET", "/difficulty-b")
            .with_body("91000000000000.0")
            .create();

        let client = MarketDataClient::with_urls(
            format!("{}/price", server.url()),
            vec![
                format!("{}/difficulty-a", server.url()),
                format!("{}/difficulty-b", server.url()),
            ],
        );
        let snapshot = client.fetch(2.0, 0.10);
        assert_eq!(snapshot.source, DataSource::Live);
        assert!((snapshot.conditions.network_difficulty - 9.1e13).abs() < 1.0);
    }
}
