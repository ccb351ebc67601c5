// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! Miner catalog: remote CSV feed with a built-in fallback.
//!
//! The remote feed is a community-maintained CSV of ASIC models. When
//! it is unreachable or unusable, a small built-in set of proven
//! models keeps the selection and recommendation paths working.

use std::time::Duration;

use anyhow::{Context, Result};
use mineflux_types::MinerSpec;
use reqwest::blocking::Client;
use tracing::{info, warn};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/mineflux/asic-catalog/main/catalog.csv";

/// Anything that can produce a list of miner models
pub trait CatalogSource {
    fn load(&self) -> Result<Vec<MinerSpec>>;
}

/// Community CSV feed. Expected columns:
/// `brand,name,hashrate,release,power,efficiency,cost`
/// where hashrate is TH/s, power W, efficiency J/TH and cost a price
/// string that may carry a currency symbol.
pub struct RemoteCatalog {
    client: Client,
    url: String,
}

impl std::fmt::Debug for RemoteCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCatalog")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl Default for RemoteCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteCatalog {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_CATALOG_URL.to_owned())
    }

    pub fn with_url(url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            url,
        }
    }

    fn parse(text: &str) -> Result<Vec<MinerSpec>> {
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let mut specs = Vec::new();
        for record in reader.records() {
            let record = record.context("malformed catalog record")?;
            match parse_catalog_row(&record) {
                Some(spec) => specs.push(spec),
                None => warn!(row = ?record, "skipping unusable catalog row"),
            }
        }
        Ok(specs)
    }
}

impl CatalogSource for RemoteCatalog {
    fn load(&self) -> Result<Vec<MinerSpec>> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .context("catalog request failed")?
            .error_for_status()
            .context("catalog endpoint returned an error status")?
            .text()
            .context("catalog response is not text")?;
        let specs = Self::parse(&body)?;
        anyhow::ensure!(!specs.is_empty(), "catalog feed contained no usable models");
        Ok(specs)
    }
}

fn parse_catalog_row(record: &csv::StringRecord) -> Option<MinerSpec> {
    let brand = record.get(0)?.trim();
    let name = record.get(1)?.trim();
    let hashrate_ths: f64 = record.get(2)?.trim().parse().ok()?;
    let power_w: f64 = record.get(4)?.trim().parse().ok()?;
    if name.is_empty() || hashrate_ths <= 0.0 || power_w <= 0.0 {
        return None;
    }

    let mut spec = MinerSpec::new(slugify(brand, name), name, power_w, hashrate_ths);
    spec.brand = Some(brand.to_owned()).filter(|b| !b.is_empty());
    spec.efficiency_j_per_th = record.get(5).and_then(|c| c.trim().parse().ok());
    spec.hardware_cost_usd = record.get(6).and_then(parse_price);
    Some(spec)
}

/// Parse a price cell that may look like `"$4,199"` or `"4199 USD"`
fn parse_price(cell: &str) -> Option<f64> {
    let digits: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let price: f64 = digits.parse().ok()?;
    (price > 0.0).then_some(price)
}

fn slugify(brand: &str, name: &str) -> String {
    format!("{brand} {name}")
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Built-in set of proven models, used when the feed is unreachable
#[derive(Debug, Default)]
pub struct FallbackCatalog;

impl CatalogSource for FallbackCatalog {
    fn load(&self) -> Result<Vec<MinerSpec>> {
        let mut models = vec![
            spec("Bitmain", "Antminer S19 Pro", 110.0, 3250.0, 4000.0),
            spec("MicroBT", "Whatsminer M30S++", 112.0, 3472.0, 3800.0),
            spec("Bitmain", "Antminer S21", 200.0, 3550.0, 6000.0),
            spec("Bitmain", "Antminer S19 XP", 140.0, 3010.0, 5000.0),
        ];
        for model in &mut models {
            model.efficiency_j_per_th = Some(model.power_w / model.hashrate_ths);
        }
        Ok(models)
    }
}

fn spec(brand: &str, name: &str, hashrate_ths: f64, power_w: f64, cost: f64) -> MinerSpec {
    let mut spec = MinerSpec::new(slugify(brand, name), name, power_w, hashrate_ths);
    spec.brand = Some(brand.to_owned());
    spec.hardware_cost_usd = Some(cost);
    spec
}

/// Load from `source`, or fall back to the built-in models on any
/// failure. Never fails.
pub fn load_or_fallback(source: &dyn CatalogSource) -> Vec<MinerSpec> {
    match source.load() {
        Ok(specs) => {
            info!(models = specs.len(), "miner catalog loaded");
            specs
        }
        Err(e) => {
            warn!(error = %e, "catalog unavailable, using built-in models");
            FallbackCatalog
                .load()
                .unwrap_or_default()
        }
    }
}
