// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! CSV energy export ingestion with header sniffing.

use std::path::Path;

use chrono::NaiveDateTime;
use mineflux_types::{EnergySample, EnergySeries, MinefluxError, Result};
use tracing::{debug, warn};

use crate::IngestReport;

/// Header names recognized as the timestamp column, lowercased
const TIMESTAMP_HEADERS: &[&str] = &["time", "timestamp", "date", "datetime", "period", "update time"];

/// Header names recognized as the energy column, lowercased
const ENERGY_HEADERS: &[&str] = &["energy", "energy_kwh", "kwh", "power", "production", "export", "yield"];

/// Timestamp formats tried in order
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Read an hourly energy export from `path`.
///
/// The timestamp and energy columns are located by header name; when
/// no header matches, the first two columns are assumed. Rows that do
/// not parse, or carry negative energy, are dropped and counted.
pub fn read_csv(path: &Path) -> Result<IngestReport> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| match e.into_kind() {
        csv::ErrorKind::Io(io) => MinefluxError::Io(io),
        other => MinefluxError::DataQuality(format!("cannot open CSV: {other:?}")),
    })?;

    let headers = reader
        .headers()
        .map_err(|e| MinefluxError::DataQuality(format!("cannot read CSV header: {e}")))?
        .clone();
    let (timestamp_col, energy_col) = locate_columns(&headers);
    debug!(timestamp_col, energy_col, "resolved CSV columns");

    let mut samples = Vec::new();
    let mut rows_read = 0_usize;
    let mut rows_dropped = 0_usize;

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "skipping unreadable CSV record");
                rows_read += 1;
                rows_dropped += 1;
                continue;
            }
        };
        rows_read += 1;
        match parse_row(&record, timestamp_col, energy_col) {
            Some(sample) => samples.push(sample),
            None => rows_dropped += 1,
        }
    }

    if samples.is_empty() {
        return Err(MinefluxError::DataQuality(format!(
            "no usable rows in {} ({rows_read} read, all dropped)",
            path.display()
        )));
    }
    if rows_dropped > 0 {
        warn!(rows_dropped, rows_read, "dropped unusable CSV rows");
    }

    Ok(IngestReport {
        series: EnergySeries::new(samples),
        rows_read,
        rows_dropped,
    })
}

fn locate_columns(headers: &csv::StringRecord) -> (usize, usize) {
    let find = |names: &[&str]| {
        headers.iter().position(|h| {
            let h = h.trim().to_lowercase();
            names.iter().any(|n| h == *n || h.contains(n))
        })
    };
    let timestamp_col = find(TIMESTAMP_HEADERS).unwrap_or(0);
    let energy_col = find(ENERGY_HEADERS).unwrap_or(1);
    (timestamp_col, energy_col)
}

fn parse_row(record: &csv::StringRecord, timestamp_col: usize, energy_col: usize) -> Option<EnergySample> {
    let timestamp = parse_timestamp(record.get(timestamp_col)?.trim())?;
    let energy_kwh: f64 = record.get(energy_col)?.trim().parse().ok()?;
    if !energy_kwh.is_finite() || energy_kwh < 0.0 {
        return None;
    }
    Some(EnergySample { timestamp, energy_kwh })
}

pub(crate) fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}
