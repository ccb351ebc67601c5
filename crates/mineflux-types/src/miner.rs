// Copyright (c) 2025 MineFlux contributors
//
// This file is part of MineFlux.

use serde::{Deserialize, Serialize};

use crate::error::{MinefluxError, Result};

/// A single ASIC model, described purely by power draw and hashrate.
///
/// Immutable once loaded from a catalog source; user-defined specs use
/// the same shape with the `custom` marker set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinerSpec {
    /// Unique id within one catalog
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub brand: Option<String>,

    /// Wall power draw (Watts)
    pub power_w: f64,

    /// Hashrate (TH/s)
    pub hashrate_ths: f64,

    #[serde(default)]
    pub hardware_cost_usd: Option<f64>,

    /// Catalog-supplied efficiency (J/TH); derived from power and
    /// hashrate when absent
    #[serde(default)]
    pub efficiency_j_per_th: Option<f64>,

    #[serde(default)]
    pub custom: bool,
}

impl MinerSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        power_w: f64,
        hashrate_ths: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: None,
            power_w,
            hashrate_ths,
            hardware_cost_usd: None,
            efficiency_j_per_th: None,
            custom: false,
        }
    }

    /// Efficiency in J/TH - lower is better
    pub fn efficiency(&self) -> f64 {
        self.efficiency_j_per_th
            .unwrap_or(self.power_w / self.hashrate_ths)
    }

    pub fn validate(&self) -> Result<()> {
        if self.power_w <= 0.0 {
            return Err(MinefluxError::InvalidInput(format!(
                "miner '{}' has non-positive power draw ({} W)",
                self.id, self.power_w
            )));
        }
        if self.hashrate_ths <= 0.0 {
            return Err(MinefluxError::InvalidInput(format!(
                "miner '{}' has non-positive hashrate ({} TH/s)",
                self.id, self.hashrate_ths
            )));
        }
        Ok(())
    }
}

/// One catalog model plus how many units of it are selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEntry {
    pub spec: MinerSpec,
    pub quantity: u32,
}

/// An ordered fleet of miners.
///
/// No two entries share a spec id: adding a model already present merges
/// into the existing entry instead of appending a duplicate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinerSelection {
    entries: Vec<SelectionEntry>,
}

impl MinerSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add `quantity` units of a model, merging with an existing entry
    /// for the same spec id
    pub fn add(&mut self, spec: MinerSpec, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|e| e.spec.id == spec.id) {
            entry.quantity += quantity;
        } else {
            self.entries.push(SelectionEntry { spec, quantity });
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.entries.retain(|e| e.spec.id != id);
    }

    pub fn unit_count(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    pub fn total_power_w(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.spec.power_w * f64::from(e.quantity))
            .sum()
    }

    pub fn total_hashrate_ths(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.spec.hashrate_ths * f64::from(e.quantity))
            .sum()
    }

    /// Total hardware cost, available only when every entry has a price
    pub fn total_hardware_cost_usd(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|e| e.spec.hardware_cost_usd.map(|c| c * f64::from(e.quantity)))
            .sum()
    }

    /// Collapse the fleet into the single synthetic miner the analyzer
    /// and revenue model consume
    pub fn combined(&self) -> CombinedMiner {
        CombinedMiner {
            power_w: self.total_power_w(),
            hashrate_ths: self.total_hashrate_ths(),
        }
    }
}

/// A selection collapsed to total power and hashrate. Downstream
/// analysis is unaware of the unit composition behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedMiner {
    pub power_w: f64,
    pub hashrate_ths: f64,
}

impl CombinedMiner {
    /// Energy one hour of full-power operation consumes (kWh)
    pub fn hourly_consumption_kwh(&self) -> f64 {
        self.power_w / 1000.0
    }
}

impl From<&MinerSpec> for CombinedMiner {
    fn from(spec: &MinerSpec) -> Self {
        Self {
            power_w: spec.power_w,
            hashrate_ths: spec.hashrate_ths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s19_pro() -> MinerSpec {
        MinerSpec::new("antminer-s19-pro", "Antminer S19 Pro", 3250.0, 110.0)
    }

    fn m30s() -> MinerSpec {
        MinerSpec::new("whatsminer-m30s++", "Whatsminer M30S++", 3472.0, 112.0)
    }

    #[test]
    fn test_efficiency_fallback() {
        let spec = s19_pro();
        assert!((spec.efficiency() - 3250.0 / 110.0).abs() < 1e-9);

        let mut with_catalog_value = spec;
        with_catalog_value.efficiency_j_per_th = Some(29.5);
        assert_eq!(with_catalog_value.efficiency(), 29.5);
    }

    #[test]
    fn test_validate_rejects_non_positive_power() {
        let mut spec = s19_pro();
        spec.power_w = 0.0;
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_selection_merges_on_same_id() {
        let mut selection = MinerSelection::new();
        selection.add(s19_pro(), 2);
        selection.add(s19_pro(), 1);
        assert_eq!(selection.entries().len(), 1);
        assert_eq!(selection.unit_count(), 3);
    }

    #[test]
    fn test_remove_drops_the_whole_entry() {
        let mut selection = MinerSelection::new();
        selection.add(s19_pro(), 2);
        selection.add(m30s(), 1);

        selection.remove(&s19_pro().id);
        assert_eq!(selection.entries().len(), 1);
        assert_eq!(selection.unit_count(), 1);
        assert_eq!(selection.total_power_w(), 3472.0);

        // unknown id is a no-op
        selection.remove("no-such-model");
        assert_eq!(selection.entries().len(), 1);
    }

    #[test]
    fn test_selection_totals_independent_of_order() {
        let mut a = MinerSelection::new();
        a.add(s19_pro(), 2);
        a.add(m30s(), 1);

        let mut b = MinerSelection::new();
        b.add(m30s(), 1);
        b.add(s19_pro(), 2);

        assert_eq!(a.total_power_w(), b.total_power_w());
        assert_eq!(a.total_hashrate_ths(), b.total_hashrate_ths());
        assert_eq!(a.total_power_w(), 2.0 * 3250.0 + 3472.0);
        assert_eq!(a.total_hashrate_ths(), 2.0 * 110.0 + 112.0);
    }

    #[test]
    fn test_hardware_cost_requires_every_entry_priced() {
        let mut priced = s19_pro();
        priced.hardware_cost_usd = Some(2000.0);

        let mut selection = MinerSelection::new();
        selection.add(priced, 2);
        assert_eq!(selection.total_hardware_cost_usd(), Some(4000.0));

        selection.add(m30s(), 1); // no price
        assert_eq!(selection.total_hardware_cost_usd(), None);
    }

    #[test]
    fn test_combined_miner_hourly_consumption() {
        let mut selection = MinerSelection::new();
        selection.add(s19_pro(), 1);
        let combined = selection.combined();
        assert_eq!(combined.hourly_consumption_kwh(), 3.25);
    }
}
