// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! CSV export/import of the monthly grid-vs-mining projection.
//!
//! Monetary values are written rounded to cents, so a written file
//! read back compares exactly against a re-rounded original.

use std::io;

use mineflux_types::{MinefluxError, Result};
use serde::{Deserialize, Serialize};

use crate::comparison::MonthlyComparison;

/// On-disk row shape. Field order defines the CSV column order.
#[derive(Debug, Serialize, Deserialize)]
struct ProjectionRow {
    month: u32,
    grid_revenue_usd: f64,
    mining_profit_usd: f64,
    cumulative_grid_revenue_usd: f64,
    cumulative_mining_profit_usd: f64,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl From<&MonthlyComparison> for ProjectionRow {
    fn from(row: &MonthlyComparison) -> Self {
        Self {
            month: row.month,
            grid_revenue_usd: round_cents(row.grid_revenue_usd),
            mining_profit_usd: round_cents(row.mining_profit_usd),
            cumulative_grid_revenue_usd: round_cents(row.cumulative_grid_revenue_usd),
            cumulative_mining_profit_usd: round_cents(row.cumulative_mining_profit_usd),
        }
    }
}

impl From<ProjectionRow> for MonthlyComparison {
    fn from(row: ProjectionRow) -> Self {
        Self {
            month: row.month,
            grid_revenue_usd: row.grid_revenue_usd,
            mining_profit_usd: row.mining_profit_usd,
            cumulative_grid_revenue_usd: row.cumulative_grid_revenue_usd,
            cumulative_mining_profit_usd: row.cumulative_mining_profit_usd,
        }
    }
}

/// Underlying I/O failures keep their identity; everything else about
/// the CSV payload is a data problem.
fn csv_error(error: csv::Error, what: &str) -> MinefluxError {
    match error.into_kind() {
        csv::ErrorKind::Io(io) => MinefluxError::Io(io),
        other => MinefluxError::DataQuality(format!("{what}: {other:?}")),
    }
}

/// Write `rows` as headed CSV, monetary columns rounded to cents.
pub fn write_projection_csv<W: io::Write>(writer: W, rows: &[MonthlyComparison]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer
            .serialize(ProjectionRow::from(row))
            .map_err(|e| csv_error(e, "failed to write projection row"))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read a projection previously written by [`write_projection_csv`].
pub fn read_projection_csv<R: io::Read>(reader: R) -> Result<Vec<MonthlyComparison>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        let row: ProjectionRow =
            record.map_err(|e| csv_error(e, "malformed projection row"))?;
        rows.push(MonthlyComparison::from(row));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<MonthlyComparison> {
        (1..=3)
            .map(|month| MonthlyComparison {
                month,
                grid_revenue_usd: 120.456,
                mining_profit_usd: 310.994_9,
                cumulative_grid_revenue_usd: 120.456 * f64::from(month),
                cumulative_mining_profit_usd: 310.994_9 * f64::from(month) - 4000.0,
            })
            .collect()
    }

    #[test]
    fn test_write_emits_header_and_cent_rounded_values() {
        let mut buf = Vec::new();
        write_projection_csv(&mut buf, &sample_rows()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "month,grid_revenue_usd,mining_profit_usd,cumulative_grid_revenue_usd,cumulative_mining_profit_usd"
        );
        assert_eq!(lines.next().unwrap(), "1,120.46,310.99,120.46,-3689.01");
    }

    #[test]
    fn test_round_trip_matches_rounded_original() {
        let original = sample_rows();
        let mut buf = Vec::new();
        write_projection_csv(&mut buf, &original).unwrap();
        let restored = read_projection_csv(buf.as_slice()).unwrap();

        assert_eq!(restored.len(), original.len());
        for (restored_row, original_row) in restored.iter().zip(&original) {
            assert_eq!(restored_row.month, original_row.month);
            assert_eq!(
                restored_row.mining_profit_usd,
                round_cents(original_row.mining_profit_usd)
            );
            assert_eq!(
                restored_row.cumulative_mining_profit_usd,
                round_cents(original_row.cumulative_mining_profit_usd)
            );
        }
    }

    #[test]
    fn test_malformed_row_is_a_data_quality_error() {
        let text = "month,grid_revenue_usd,mining_profit_usd,cumulative_grid_revenue_usd,cumulative_mining_profit_usd\n1,abc,2,3,4\n";
        let err = read_projection_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(err, MinefluxError::DataQuality(_)));
    }

    #[test]
    fn test_empty_input_reads_empty() {
        let rows = read_projection_csv(b"" as &[u8]).unwrap();
        assert!(rows.is_empty());
    }

    struct BrokenWriter;

    impl io::Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"))
        }
    }

    #[test]
    fn test_writer_failure_surfaces_as_io_error() {
        let err = write_projection_csv(BrokenWriter, &sample_rows()).unwrap_err();
        assert!(matches!(err, MinefluxError::Io(_)));
    }
}
