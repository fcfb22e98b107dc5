//! Size class to normalization weight table

use crate::error::{ReservationError, Result};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Mul};

/// Quarter units per normalized unit (the smallest weight is 0.25)
const QUARTERS: u64 = 4;

/// Normalized capacity, stored as exact quarter units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedUnits(u64);

impl NormalizedUnits {
    pub const ZERO: Self = Self(0);

    pub const fn from_quarters(quarters: u64) -> Self {
        Self(quarters)
    }

    pub const fn from_units(units: u64) -> Self {
        Self(units * QUARTERS)
    }

    pub fn quarters(&self) -> u64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / QUARTERS as f64
    }
}

impl Add for NormalizedUnits {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for NormalizedUnits {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<u32> for NormalizedUnits {
    type Output = Self;

    fn mul(self, count: u32) -> Self {
        Self(self.0 * u64::from(count))
    }
}

impl std::iter::Sum for NormalizedUnits {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for NormalizedUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % QUARTERS == 0 {
            write!(f, "{}", self.0 / QUARTERS)
        } else {
            write!(f, "{}", self.as_f64())
        }
    }
}

impl Serialize for NormalizedUnits {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Immutable size to weight lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeWeights {
    table: BTreeMap<String, NormalizedUnits>,
}

impl SizeWeights {
    /// Build a table from `(size, quarter units)` pairs
    pub fn from_quarters<'a>(entries: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        Self {
            table: entries
                .into_iter()
                .map(|(size, q)| (size.to_string(), NormalizedUnits::from_quarters(q)))
                .collect(),
        }
    }

    /// The EC2 normalization factors
    pub fn standard() -> Self {
        Self::from_quarters([
            ("nano", 1),
            ("micro", 2),
            ("small", 4),
            ("medium", 8),
            ("large", 16),
            ("xlarge", 32),
            ("2xlarge", 64),
            ("3xlarge", 96),
            ("4xlarge", 128),
            ("6xlarge", 192),
            ("8xlarge", 256),
            ("9xlarge", 288),
            ("10xlarge", 320),
            ("12xlarge", 384),
            ("16xlarge", 512),
            ("18xlarge", 576),
            ("24xlarge", 768),
            ("32xlarge", 1024),
            ("48xlarge", 1536),
            ("56xlarge", 1792),
            ("112xlarge", 3584),
        ])
    }

    pub fn get(&self, size: &str) -> Option<NormalizedUnits> {
        self.table.get(size).copied()
    }

    /// Weight for `size`, or `UnknownSizeClass`
    pub fn weight(&self, reservation_id: &str, size: &str) -> Result<NormalizedUnits> {
        self.get(size)
            .ok_or_else(|| ReservationError::UnknownSizeClass {
                reservation_id: reservation_id.to_string(),
                size: size.to_string(),
            })
    }

    pub fn sizes(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

impl Default for SizeWeights {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_weights() {
        let weights = SizeWeights::standard();
        assert_eq!(weights.get("nano").unwrap().as_f64(), 0.25);
        assert_eq!(weights.get("micro").unwrap().as_f64(), 0.5);
        assert_eq!(weights.get("large").unwrap().as_f64(), 4.0);
        assert_eq!(weights.get("2xlarge").unwrap().as_f64(), 16.0);
        assert_eq!(weights.get("32xlarge").unwrap().as_f64(), 256.0);
    }

    #[test]
    fn test_standard_weights_follow_ec2_factors() {
        let weights = SizeWeights::standard();
        let units = |size: &str| weights.get(size).unwrap().as_f64();

        // Nx sizes weigh 8 x N
        assert_eq!(units("8xlarge"), 64.0);
        assert_eq!(units("9xlarge"), 72.0);
        assert_eq!(units("10xlarge"), 80.0);
        for n in [3u32, 4, 6, 12, 16, 18, 24, 32, 48, 56, 112] {
            assert_eq!(units(&format!("{n}xlarge")), 8.0 * f64::from(n));
        }
    }

    #[test]
    fn test_unknown_size_is_an_error() {
        let weights = SizeWeights::standard();
        let err = weights.weight("ri-1", "metal").unwrap_err();
        assert!(matches!(
            err,
            ReservationError::UnknownSizeClass { ref size, .. } if size == "metal"
        ));
    }

    #[test]
    fn test_units_display() {
        assert_eq!(NormalizedUnits::from_quarters(1).to_string(), "0.25");
        assert_eq!(NormalizedUnits::from_units(16).to_string(), "16");
        assert_eq!((NormalizedUnits::from_quarters(2) * 3).to_string(), "1.5");
    }
}
