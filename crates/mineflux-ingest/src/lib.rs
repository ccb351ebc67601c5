// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! File ingestion: turning inverter/meter exports into an
//! [`EnergySeries`](mineflux_types::EnergySeries).
//!
//! Export formats vary wildly between vendors, so parsing is lenient:
//! unparseable rows are dropped and counted instead of failing the
//! whole file. A file is rejected only when nothing usable remains.

pub mod csv;
pub mod xlsx;

use mineflux_types::EnergySeries;

pub use self::csv::read_csv;
pub use self::xlsx::read_xlsx;

/// Outcome of ingesting one file
#[derive(Debug)]
pub struct IngestReport {
    pub series: EnergySeries,
    /// Data rows seen in the file, header excluded
    pub rows_read: usize,
    /// Rows dropped for malformed timestamps or energy values
    pub rows_dropped: usize,
}
