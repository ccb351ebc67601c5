// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! Error types shared across the MineFlux crates

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MinefluxError {
    /// Structurally invalid input to an analysis operation: empty
    /// series, non-positive power/hashrate/difficulty, out-of-range
    /// percentages. The whole operation fails; nothing is substituted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The recommender found no miner combination fitting the budget,
    /// or a selection cannot run on any sample of the series.
    #[error("no viable configuration: {0}")]
    NoViableConfiguration(String),

    /// Uploaded data could not be turned into a usable energy series.
    #[error("data quality error: {0}")]
    DataQuality(String),

    /// Underlying file could not be read at all
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MinefluxError>;
