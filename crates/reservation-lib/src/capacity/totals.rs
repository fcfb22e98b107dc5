//! Aggregated normalized capacity

use super::weights::NormalizedUnits;
use serde::Serialize;
use std::collections::BTreeMap;

/// size -> units
pub type SizeTotals = BTreeMap<String, NormalizedUnits>;

/// Normalized units grouped by family, then by size (region scope)
/// or by zone and size (zone scope)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedTotals {
    pub region: BTreeMap<String, SizeTotals>,
    pub zone: BTreeMap<String, BTreeMap<String, SizeTotals>>,
}

impl NormalizedTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_region(&mut self, family: &str, size: &str, units: NormalizedUnits) {
        *self
            .region
            .entry(family.to_string())
            .or_default()
            .entry(size.to_string())
            .or_default() += units;
    }

    pub fn add_zone(&mut self, family: &str, zone: &str, size: &str, units: NormalizedUnits) {
        *self
            .zone
            .entry(family.to_string())
            .or_default()
            .entry(zone.to_string())
            .or_default()
            .entry(size.to_string())
            .or_default() += units;
    }

    /// Fold another set of totals into this one
    pub fn merge(mut self, other: NormalizedTotals) -> Self {
        for (family, sizes) in other.region {
            for (size, units) in sizes {
                self.add_region(&family, &size, units);
            }
        }
        for (family, zones) in other.zone {
            for (zone, sizes) in zones {
                for (size, units) in sizes {
                    self.add_zone(&family, &zone, &size, units);
                }
            }
        }
        self
    }

    pub fn region_units(&self, family: &str, size: &str) -> Option<NormalizedUnits> {
        self.region.get(family)?.get(size).copied()
    }

    pub fn zone_units(&self, family: &str, zone: &str, size: &str) -> Option<NormalizedUnits> {
        self.zone.get(family)?.get(zone)?.get(size).copied()
    }

    pub fn region_total(&self) -> NormalizedUnits {
        self.region.values().flat_map(|s| s.values().copied()).sum()
    }

    pub fn zone_total(&self) -> NormalizedUnits {
        self.zone
            .values()
            .flat_map(|zones| zones.values())
            .flat_map(|s| s.values().copied())
            .sum()
    }

    pub fn total(&self) -> NormalizedUnits {
        self.region_total() + self.zone_total()
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_empty() && self.zone.is_empty()
    }
}
