// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! Excel (.xlsx) energy export ingestion.
//!
//! Reads the first worksheet. The first row is treated as a header
//! when its cells are not data; timestamps are accepted either as text
//! in the same formats the CSV path takes or as native Excel datetime
//! cells.

use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::NaiveDateTime;
use mineflux_types::{EnergySample, EnergySeries, MinefluxError, Result};
use tracing::warn;

use crate::IngestReport;
use crate::csv::parse_timestamp;

/// Read an hourly energy export from the first worksheet of an xlsx
/// workbook. Column 0 is the timestamp, column 1 the energy in kWh.
pub fn read_xlsx(path: &Path) -> Result<IngestReport> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| {
        MinefluxError::DataQuality(format!("cannot open workbook {}: {e}", path.display()))
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names.first().ok_or_else(|| {
        MinefluxError::DataQuality(format!("workbook {} has no sheets", path.display()))
    })?;
    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| MinefluxError::DataQuality(format!("cannot read sheet {first_sheet}: {e}")))?;

    let mut samples = Vec::new();
    let mut rows_read = 0_usize;
    let mut rows_dropped = 0_usize;

    for (row_idx, row) in range.rows().enumerate() {
        if row.is_empty() || row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        // Tolerate a header row at the top
        if row_idx == 0 && parse_sample(row).is_none() {
            continue;
        }
        rows_read += 1;
        match parse_sample(row) {
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
        warn!(rows_dropped, rows_read, "dropped unusable worksheet rows");
    }

    Ok(IngestReport {
        series: EnergySeries::new(samples),
        rows_read,
        rows_dropped,
    })
}

fn parse_sample(row: &[Data]) -> Option<EnergySample> {
    let timestamp = cell_timestamp(row.first()?)?;
    let energy_kwh = cell_number(row.get(1)?)?;
    if !energy_kwh.is_finite() || energy_kwh < 0.0 {
        return None;
    }
    Some(EnergySample { timestamp, energy_kwh })
}

fn cell_timestamp(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::String(text) => parse_timestamp(text.trim()),
        Data::DateTime(dt) => dt.as_datetime(),
        Data::Empty
        | Data::Int(_)
        | Data::Float(_)
        | Data::Bool(_)
        | Data::Error(_)
        | Data::DateTimeIso(_)
        | Data::DurationIso(_) => None,
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(value) => Some(*value),
        Data::Int(value) => Some(*value as f64),
        Data::String(text) => text.trim().parse().ok(),
        Data::Empty
        | Data::Bool(_)
        | Data::Error(_)
        | Data::DateTime(_)
        | Data::DateTimeIso(_)
        | Data::DurationIso(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::ExcelDateTime;
    use chrono::NaiveDate;

    #[test]
    fn test_text_timestamp_cell() {
        let row = vec![Data::String("2025-06-02 10:00:00".into()), Data::Float(4.5)];
        let sample = parse_sample(&row).unwrap();
        assert_eq!(
            sample.timestamp,
            NaiveDate::from_ymd_opt(2025, 6, 2)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
        assert!((sample.energy_kwh - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_native_datetime_cell() {
        // Excel serial 45810.5 = 2025-06-02 12:00
        let cell = Data::DateTime(ExcelDateTime::new(
            45810.5,
            calamine::ExcelDateTimeType::DateTime,
            false,
        ));
        let timestamp = cell_timestamp(&cell).unwrap();
        assert_eq!(
            timestamp,
            NaiveDate::from_ymd_opt(2025, 6, 2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_numeric_string_energy_cell() {
        let row = vec![Data::String("2025-06-02 10:00".into()), Data::String(" 3.2 ".into())];
        let sample = parse_sample(&row).unwrap();
        assert!((sample.energy_kwh - 3.2).abs() < 1e-9);
    }

    #[test]
    fn test_negative_energy_row_rejected() {
        let row = vec![Data::String("2025-06-02 10:00".into()), Data::Float(-1.0)];
        assert!(parse_sample(&row).is_none());
    }

    #[test]
    fn test_missing_file_is_a_data_quality_error() {
        let err = read_xlsx(Path::new("/nonexistent/export.xlsx")).unwrap_err();
        assert!(matches!(err, MinefluxError::DataQuality(_)));
    }
}
