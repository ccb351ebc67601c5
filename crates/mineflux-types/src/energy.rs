// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One hour of exported energy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySample {
    pub timestamp: NaiveDateTime,

    /// Energy produced/exported in this hour (kWh, never negative)
    pub energy_kwh: f64,
}

/// An ordered hourly energy series, immutable once built.
///
/// One sample per hour is the expected shape, but contiguity is not
/// enforced: gaps and duplicate timestamps are tolerated and every
/// sample is processed independently downstream. A re-upload replaces
/// the series wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnergySeries {
    samples: Vec<EnergySample>,
}

impl EnergySeries {
    pub fn new(samples: Vec<EnergySample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[EnergySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn total_energy_kwh(&self) -> f64 {
        self.samples.iter().map(|s| s.energy_kwh).sum()
    }

    pub fn max_energy_kwh(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.energy_kwh)
            .fold(0.0, f64::max)
    }

    pub fn mean_energy_kwh(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.total_energy_kwh() / self.samples.len() as f64
        }
    }

    /// Power budget (W) this series can realistically sustain, used when
    /// the fleet recommender is not given an explicit budget.
    ///
    /// Uses the 95th-percentile hourly energy rather than the peak, so a
    /// single freak hour does not inflate the budget.
    pub fn suggested_power_budget_w(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut energies: Vec<f64> = self.samples.iter().map(|s| s.energy_kwh).collect();
        energies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let idx = ((energies.len() - 1) as f64 * 0.95).round() as usize;
        energies[idx] * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(hour: u32, energy_kwh: f64) -> EnergySample {
        EnergySample {
            timestamp: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            energy_kwh,
        }
    }

    #[test]
    fn test_empty_series_stats() {
        let series = EnergySeries::default();
        assert!(series.is_empty());
        assert_eq!(series.total_energy_kwh(), 0.0);
        assert_eq!(series.mean_energy_kwh(), 0.0);
        assert_eq!(series.max_energy_kwh(), 0.0);
        assert_eq!(series.suggested_power_budget_w(), 0.0);
    }

    #[test]
    fn test_series_aggregates() {
        let series = EnergySeries::new(vec![sample(0, 2.0), sample(1, 4.0), sample(2, 6.0)]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.total_energy_kwh(), 12.0);
        assert_eq!(series.mean_energy_kwh(), 4.0);
        assert_eq!(series.max_energy_kwh(), 6.0);
    }

    #[test]
    fn test_power_budget_ignores_freak_peak() {
        // 99 flat hours at 5 kWh plus one 40 kWh outlier
        let mut samples: Vec<EnergySample> = (0..99).map(|i| sample(i % 24, 5.0)).collect();
        samples.push(sample(12, 40.0));
        let series = EnergySeries::new(samples);
        assert_eq!(series.suggested_power_budget_w(), 5000.0);
    }
}
