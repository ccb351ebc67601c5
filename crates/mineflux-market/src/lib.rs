// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! Live market data: BTC spot price, network difficulty, and the
//! remote miner catalog.
//!
//! Everything here degrades gracefully. A failed fetch logs a warning
//! and falls back to pessimistic defaults or the built-in catalog, so
//! an analysis run never dies on a flaky endpoint.

pub mod catalog;
pub mod conditions;

pub use catalog::{CatalogSource, FallbackCatalog, RemoteCatalog, load_or_fallback};
pub use conditions::{DataSource, MarketDataClient, MarketSnapshot};
