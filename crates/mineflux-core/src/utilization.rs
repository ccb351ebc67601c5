// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! Energy-utilization analysis: for every hour of the series, could the
//! miner have run, and where did the energy go.

use chrono::{Datelike, NaiveDateTime, Timelike};
use mineflux_types::{CombinedMiner, EnergySeries, MinefluxError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Energy accounting for a single hourly sample.
///
/// Exactly one of `energy_wasted_kwh` / `energy_deficit_kwh` can be
/// non-zero: surplus is waste when the miner runs, shortfall is deficit
/// when it cannot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleUtilization {
    pub timestamp: NaiveDateTime,
    pub can_run: bool,
    pub energy_available_kwh: f64,
    pub energy_used_kwh: f64,
    pub energy_wasted_kwh: f64,
    pub energy_deficit_kwh: f64,
}

/// Aggregated utilization of an energy series by one miner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilizationResult {
    /// Energy one hour of full-power operation consumes (kWh)
    pub miner_hourly_consumption_kwh: f64,

    pub samples: Vec<SampleUtilization>,

    pub total_hours: usize,
    pub uptime_hours: usize,
    /// Share of samples where the miner could run (0-100)
    pub uptime_percent: f64,

    pub total_energy_available_kwh: f64,
    pub total_energy_used_kwh: f64,
    pub total_energy_wasted_kwh: f64,
    /// Share of available energy the miner actually consumed (0-100).
    /// Reported as 0 when nothing was available, never NaN.
    pub utilization_percent: f64,

    /// Uptime percentage per hour of day (index 0-23); 0 for hours the
    /// series never touches
    pub uptime_by_hour: [f64; 24],

    /// Uptime percentage per weekday, Sunday = 0
    pub uptime_by_weekday: [f64; 7],
}

/// Analyze how a miner configuration fits an hourly energy series.
///
/// Pure function of its inputs. Fails with `InvalidInput` on an empty
/// series or a non-positive power draw; an empty series has no defined
/// utilization, which is distinct from a zero-valued one.
pub fn analyze(series: &EnergySeries, miner: &CombinedMiner) -> Result<UtilizationResult> {
    if series.is_empty() {
        return Err(MinefluxError::InvalidInput(
            "cannot analyze an empty energy series".to_owned(),
        ));
    }
    if miner.power_w <= 0.0 {
        return Err(MinefluxError::InvalidInput(format!(
            "miner power draw must be positive, got {} W",
            miner.power_w
        )));
    }

    let hourly_consumption = miner.hourly_consumption_kwh();

    let samples: Vec<SampleUtilization> = series
        .samples()
        .iter()
        .map(|sample| {
            let can_run = sample.energy_kwh >= hourly_consumption;
            if can_run {
                SampleUtilization {
                    timestamp: sample.timestamp,
                    can_run,
                    energy_available_kwh: sample.energy_kwh,
                    energy_used_kwh: hourly_consumption,
                    energy_wasted_kwh: sample.energy_kwh - hourly_consumption,
                    energy_deficit_kwh: 0.0,
                }
            } else {
                SampleUtilization {
                    timestamp: sample.timestamp,
                    can_run,
                    energy_available_kwh: sample.energy_kwh,
                    energy_used_kwh: 0.0,
                    energy_wasted_kwh: 0.0,
                    energy_deficit_kwh: hourly_consumption - sample.energy_kwh,
                }
            }
        })
        .collect();

    let total_hours = samples.len();
    let uptime_hours = samples.iter().filter(|s| s.can_run).count();
    let uptime_percent = uptime_hours as f64 / total_hours as f64 * 100.0;

    let total_energy_available_kwh: f64 = samples.iter().map(|s| s.energy_available_kwh).sum();
    let total_energy_used_kwh: f64 = samples.iter().map(|s| s.energy_used_kwh).sum();
    let total_energy_wasted_kwh: f64 = samples.iter().map(|s| s.energy_wasted_kwh).sum();

    // Guard: an all-zero series has nothing to utilize, report 0 rather
    // than letting NaN escape
    let utilization_percent = if total_energy_available_kwh > 0.0 {
        total_energy_used_kwh / total_energy_available_kwh * 100.0
    } else {
        0.0
    };

    let uptime_by_hour: [f64; 24] = bucket_uptime(&samples, |s| s.timestamp.hour() as usize);
    let uptime_by_weekday: [f64; 7] = bucket_uptime(&samples, |s| {
        s.timestamp.weekday().num_days_from_sunday() as usize
    });

    debug!(
        total_hours,
        uptime_hours,
        utilization_percent,
        "utilization analysis complete"
    );

    Ok(UtilizationResult {
        miner_hourly_consumption_kwh: hourly_consumption,
        samples,
        total_hours,
        uptime_hours,
        uptime_percent,
        total_energy_available_kwh,
        total_energy_used_kwh,
        total_energy_wasted_kwh,
        utilization_percent,
        uptime_by_hour,
        uptime_by_weekday,
    })
}

/// Uptime percentage per bucket; empty buckets report 0
fn bucket_uptime<const N: usize>(
    samples: &[SampleUtilization],
    key: impl Fn(&SampleUtilization) -> usize,
) -> [f64; N] {
    let mut total = [0usize; N];
    let mut up = [0usize; N];

    for sample in samples {
        let bucket = key(sample);
        if bucket < N {
            total[bucket] += 1;
            if sample.can_run {
                up[bucket] += 1;
            }
        }
    }

    let mut out = [0.0; N];
    for i in 0..N {
        if total[i] > 0 {
            out[i] = up[i] as f64 / total[i] as f64 * 100.0;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mineflux_types::EnergySample;

    fn series_of(energies: &[f64]) -> EnergySeries {
        let base = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        EnergySeries::new(
            energies
                .iter()
                .enumerate()
                .map(|(i, &energy_kwh)| EnergySample {
                    timestamp: base.and_hms_opt(0, 0, 0).unwrap()
                        + chrono::Duration::hours(i as i64),
                    energy_kwh,
                })
                .collect(),
        )
    }

    fn miner(power_w: f64) -> CombinedMiner {
        CombinedMiner {
            power_w,
            hashrate_ths: 110.0,
        }
    }

    #[test]
    fn test_empty_series_is_an_error() {
        let result = analyze(&EnergySeries::default(), &miner(3250.0));
        assert!(matches!(result, Err(MinefluxError::InvalidInput(_))));
    }

    #[test]
    fn test_non_positive_power_is_an_error() {
        let result = analyze(&series_of(&[5.0]), &miner(0.0));
        assert!(matches!(result, Err(MinefluxError::InvalidInput(_))));
    }

    #[test]
    fn test_per_sample_accounting_when_running() {
        let result = analyze(&series_of(&[5.0]), &miner(3250.0)).unwrap();
        let sample = &result.samples[0];
        assert!(sample.can_run);
        assert_eq!(sample.energy_used_kwh, 3.25);
        assert_eq!(sample.energy_wasted_kwh, 1.75);
        assert_eq!(sample.energy_deficit_kwh, 0.0);
    }

    #[test]
    fn test_per_sample_accounting_when_short_of_energy() {
        let result = analyze(&series_of(&[2.0]), &miner(3250.0)).unwrap();
        let sample = &result.samples[0];
        assert!(!sample.can_run);
        assert_eq!(sample.energy_used_kwh, 0.0);
        assert_eq!(sample.energy_wasted_kwh, 0.0);
        assert!((sample.energy_deficit_kwh - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_uptime_is_zero_when_power_always_exceeds_supply() {
        let result = analyze(&series_of(&[1.0, 2.0, 3.0]), &miner(3250.0)).unwrap();
        assert_eq!(result.uptime_hours, 0);
        assert_eq!(result.uptime_percent, 0.0);
    }

    #[test]
    fn test_mixed_series_aggregates() {
        // 3.25 kWh/h miner: runs on 4.0 and 3.25, not on 3.0
        let result = analyze(&series_of(&[4.0, 3.0, 3.25]), &miner(3250.0)).unwrap();
        assert_eq!(result.uptime_hours, 2);
        assert!((result.uptime_percent - 200.0 / 3.0).abs() < 1e-9);
        assert!((result.total_energy_used_kwh - 6.5).abs() < 1e-9);
        assert!((result.total_energy_wasted_kwh - 0.75).abs() < 1e-9);
        assert!(result.utilization_percent <= 100.0);
    }

    #[test]
    fn test_all_zero_series_reports_zero_not_nan() {
        let result = analyze(&series_of(&[0.0; 24]), &miner(3250.0)).unwrap();
        assert_eq!(result.uptime_percent, 0.0);
        assert_eq!(result.utilization_percent, 0.0);
        assert!(!result.utilization_percent.is_nan());
    }

    #[test]
    fn test_hour_of_day_breakdown() {
        // 48 hours: even hours 5.0 kWh, odd hours 0.0
        let energies: Vec<f64> = (0..48)
            .map(|i| if i % 2 == 0 { 5.0 } else { 0.0 })
            .collect();
        let result = analyze(&series_of(&energies), &miner(3250.0)).unwrap();
        assert_eq!(result.uptime_by_hour[0], 100.0);
        assert_eq!(result.uptime_by_hour[1], 0.0);
        assert_eq!(result.uptime_by_hour[22], 100.0);
        assert_eq!(result.uptime_by_hour[23], 0.0);
    }

    #[test]
    fn test_weekday_breakdown_uses_sunday_zero() {
        // 2025-06-01 is a Sunday; one full runnable day starting there
        let result = analyze(&series_of(&[5.0; 24]), &miner(3250.0)).unwrap();
        assert_eq!(result.uptime_by_weekday[0], 100.0);
        // No samples on any other weekday
        for day in 1..7 {
            assert_eq!(result.uptime_by_weekday[day], 0.0);
        }
    }
}
