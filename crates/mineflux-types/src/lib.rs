// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

pub mod energy;
pub mod error;
pub mod market;
pub mod miner;

// Re-export common types for convenience
pub use energy::{EnergySample, EnergySeries};
pub use error::{MinefluxError, Result};
pub use market::{
    FALLBACK_BTC_PRICE_USD, FALLBACK_NETWORK_DIFFICULTY, MarketConditions, NetworkParams,
};
pub use miner::{CombinedMiner, MinerSelection, MinerSpec, SelectionEntry};
