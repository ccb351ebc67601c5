// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

//! Statistical survey of an energy series, independent of any concrete
//! miner choice.
//!
//! Answers "what does this production profile look like" questions:
//! how often is there nothing to use, which hours carry the output,
//! how the samples distribute across kWh bands, and how many units of
//! a reference-class miner the profile could feed.

use chrono::Timelike;
use mineflux_types::{EnergySeries, MinefluxError, Result};
use serde::{Deserialize, Serialize};

/// Hourly draw of a reference-class ASIC (kWh), used for the
/// miner-count sweep when no concrete model has been chosen yet.
pub const REFERENCE_MINER_KWH_PER_HOUR: f64 = 3.5;

/// Upper edges of the energy distribution bands (kWh); the last band
/// is open-ended.
const BAND_EDGES: [f64; 5] = [0.01, 1.0, 5.0, 10.0, 20.0];

/// Fleet sizes swept by the utilization curve
const MAX_SWEEP_MINERS: u32 = 10;

/// Share of a fleet's energy capacity the series can actually feed.
/// Falls as units are added past what the supply sustains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinerCountUtilization {
    pub miner_count: u32,
    pub utilization_percent: f64,
}

/// Sample count falling into one energy band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyBand {
    /// Human-readable range, e.g. `"1-5 kWh"`
    pub label: String,
    pub sample_count: usize,
    pub percent_of_samples: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyProfile {
    pub sample_count: usize,
    pub total_energy_kwh: f64,
    pub mean_energy_kwh: f64,
    pub max_energy_kwh: f64,

    /// Samples with no usable production at all
    pub zero_hours: usize,
    pub zero_hours_percent: f64,

    /// Mean production per hour of day, index 0 = midnight
    pub mean_energy_by_hour: [f64; 24],

    pub bands: Vec<EnergyBand>,

    /// Share of samples that could power at least one reference miner
    pub mining_potential_percent: f64,

    /// Reference miners the single best sample could feed
    pub max_supported_miners: u32,

    /// Mean over samples of the whole reference miners each one could
    /// feed; fractional
    pub mean_supported_miners: f64,

    /// Capacity-utilization sweep for 1..=min(max_supported_miners, 10)
    /// reference units
    pub utilization_by_miner_count: Vec<MinerCountUtilization>,
}

/// Survey `series` against the reference miner class.
pub fn survey(series: &EnergySeries) -> Result<EnergyProfile> {
    if series.is_empty() {
        return Err(MinefluxError::InvalidInput(
            "cannot profile an empty energy series".into(),
        ));
    }

    let samples = series.samples();
    let sample_count = samples.len();
    let total_energy_kwh = series.total_energy_kwh();
    let mean_energy_kwh = total_energy_kwh / sample_count as f64;
    let max_energy_kwh = series.max_energy_kwh();

    let zero_hours = samples.iter().filter(|s| s.energy_kwh <= 0.0).count();
    let zero_hours_percent = zero_hours as f64 / sample_count as f64 * 100.0;

    let mut hour_sums = [0.0_f64; 24];
    let mut hour_counts = [0_usize; 24];
    for sample in samples {
        let hour = sample.timestamp.hour() as usize;
        hour_sums[hour] += sample.energy_kwh;
        hour_counts[hour] += 1;
    }
    let mut mean_energy_by_hour = [0.0_f64; 24];
    for hour in 0..24 {
        if hour_counts[hour] > 0 {
            mean_energy_by_hour[hour] = hour_sums[hour] / hour_counts[hour] as f64;
        }
    }

    let bands = distribute_bands(series);

    let viable = samples
        .iter()
        .filter(|s| s.energy_kwh >= REFERENCE_MINER_KWH_PER_HOUR)
        .count();
    let mining_potential_percent = viable as f64 / sample_count as f64 * 100.0;

    let supported_per_sample: Vec<u32> = samples
        .iter()
        .map(|s| (s.energy_kwh / REFERENCE_MINER_KWH_PER_HOUR).floor() as u32)
        .collect();
    let max_supported_miners = supported_per_sample.iter().copied().max().unwrap_or(0);
    let mean_supported_miners =
        supported_per_sample.iter().map(|&n| f64::from(n)).sum::<f64>() / sample_count as f64;

    // How much of an n-unit fleet's capacity the supply can feed; the
    // curve falls once units outgrow the series
    let utilization_by_miner_count = (1..=max_supported_miners.min(MAX_SWEEP_MINERS))
        .map(|count| {
            let fleet_kwh = f64::from(count) * REFERENCE_MINER_KWH_PER_HOUR;
            let capacity_kwh = fleet_kwh * sample_count as f64;
            let used: f64 = samples.iter().map(|s| s.energy_kwh.min(fleet_kwh)).sum();
            MinerCountUtilization {
                miner_count: count,
                utilization_percent: used / capacity_kwh * 100.0,
            }
        })
        .collect();

    Ok(EnergyProfile {
        sample_count,
        total_energy_kwh,
        mean_energy_kwh,
        max_energy_kwh,
        zero_hours,
        zero_hours_percent,
        mean_energy_by_hour,
        bands,
        mining_potential_percent,
        max_supported_miners,
        mean_supported_miners,
        utilization_by_miner_count,
    })
}

fn distribute_bands(series: &EnergySeries) -> Vec<EnergyBand> {
    let samples = series.samples();
    let total = samples.len() as f64;

    let mut counts = [0_usize; 6];
    for sample in samples {
        let idx = BAND_EDGES
            .iter()
            .position(|&edge| sample.energy_kwh < edge)
            .unwrap_or(BAND_EDGES.len());
        counts[idx] += 1;
    }

    let labels = [
        "0 kWh",
        "0-1 kWh",
        "1-5 kWh",
        "5-10 kWh",
        "10-20 kWh",
        "20+ kWh",
    ];
    labels
        .iter()
        .zip(counts)
        .map(|(label, count)| EnergyBand {
            label: (*label).to_string(),
            sample_count: count,
            percent_of_samples: count as f64 / total * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mineflux_types::EnergySample;

    fn series_of(energies: &[f64]) -> EnergySeries {
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let samples = energies
            .iter()
            .enumerate()
            .map(|(i, &e)| EnergySample {
                timestamp: day.and_hms_opt((i % 24) as u32, 0, 0).unwrap(),
                energy_kwh: e,
            })
            .collect();
        EnergySeries::new(samples)
    }

    #[test]
    fn test_empty_series_is_rejected() {
        assert!(survey(&EnergySeries::new(Vec::new())).is_err());
    }

    #[test]
    fn test_zero_hours_counted() {
        let profile = survey(&series_of(&[0.0, 0.0, 5.0, 5.0])).unwrap();
        assert_eq!(profile.zero_hours, 2);
        assert!((profile.zero_hours_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_distribution() {
        // one sample per band
        let profile = survey(&series_of(&[0.0, 0.5, 3.0, 7.0, 15.0, 25.0])).unwrap();
        for band in &profile.bands {
            assert_eq!(band.sample_count, 1, "band {}", band.label);
        }
        let total: usize = profile.bands.iter().map(|b| b.sample_count).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_band_edges_are_half_open() {
        // exactly 5.0 lands in the 5-10 band, not 1-5
        let profile = survey(&series_of(&[5.0])).unwrap();
        assert_eq!(profile.bands[3].sample_count, 1);
        assert_eq!(profile.bands[2].sample_count, 0);
    }

    #[test]
    fn test_mean_energy_by_hour() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let next = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        let series = EnergySeries::new(vec![
            EnergySample {
                timestamp: day.and_hms_opt(12, 0, 0).unwrap(),
                energy_kwh: 4.0,
            },
            EnergySample {
                timestamp: next.and_hms_opt(12, 0, 0).unwrap(),
                energy_kwh: 6.0,
            },
        ]);
        let profile = survey(&series).unwrap();
        assert!((profile.mean_energy_by_hour[12] - 5.0).abs() < 1e-9);
        assert_eq!(profile.mean_energy_by_hour[0], 0.0);
    }

    #[test]
    fn test_supported_miner_counts() {
        // per-sample floors are 3 and 1: max 3, mean 2.0
        let profile = survey(&series_of(&[10.5, 3.5])).unwrap();
        assert_eq!(profile.max_supported_miners, 3);
        assert!((profile.mean_supported_miners - 2.0).abs() < 1e-9);
        assert_eq!(profile.utilization_by_miner_count.len(), 3);
    }

    #[test]
    fn test_mean_supported_miners_is_mean_of_per_sample_floors() {
        // both samples individually feed 0 whole units even though the
        // mean energy (3.5) would feed 1
        let profile = survey(&series_of(&[3.4, 3.6])).unwrap();
        assert!((profile.mean_supported_miners - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_sweep_measures_fleet_capacity_utilization() {
        // one unit wants 3.5 kWh per sample: 3.5 + min(10.5, 3.5) fills
        // its 7.0 kWh capacity completely
        let profile = survey(&series_of(&[3.5, 10.5])).unwrap();
        let one_unit = &profile.utilization_by_miner_count[0];
        assert_eq!(one_unit.miner_count, 1);
        assert!((one_unit.utilization_percent - 100.0).abs() < 1e-9);

        // three units: used = 3.5 + 10.5 of 21.0 capacity
        let three_units = &profile.utilization_by_miner_count[2];
        assert!((three_units.utilization_percent - 14.0 / 21.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_sweep_falls_as_fleet_outgrows_supply_and_stops_at_ten() {
        // peak 52.5 kWh feeds 15 units; the sweep still stops at 10
        let profile = survey(&series_of(&[52.5, 3.5, 0.0, 7.0])).unwrap();
        let sweep = &profile.utilization_by_miner_count;
        assert_eq!(sweep.len(), 10);
        for pair in sweep.windows(2) {
            assert!(pair[1].utilization_percent <= pair[0].utilization_percent + 1e-9);
        }
        for entry in sweep {
            assert!(entry.utilization_percent <= 100.0 + 1e-9);
            assert!(entry.utilization_percent >= 0.0);
        }
    }

    #[test]
    fn test_mining_potential_uses_reference_threshold() {
        let profile = survey(&series_of(&[3.5, 3.4, 10.0, 0.0])).unwrap();
        assert!((profile.mining_potential_percent - 50.0).abs() < 1e-9);
    }
}
