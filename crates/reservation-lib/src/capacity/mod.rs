//! Normalized capacity accounting
//!
//! Converts reservations of different instance sizes into a single
//! comparable unit and sums them per family and scope. Only reservations
//! that are still active at evaluation time contribute.

mod totals;
mod weights;


pub use totals::{NormalizedTotals, SizeTotals};
pub use weights::{NormalizedUnits, SizeWeights};

use crate::error::{ReservationError, Result};
use crate::models::{ReservationRecord, Scope};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Accumulate `instance_count x weight(size)` for every active reservation.
///
/// Any malformed instance type, unknown size or zone-less zonal record
/// aborts the whole pass; no partial totals are returned.
pub fn normalize(
    records: &[ReservationRecord],
    weights: &SizeWeights,
    now: DateTime<Utc>,
) -> Result<NormalizedTotals> {
    let mut totals = NormalizedTotals::new();

    for record in records.iter().filter(|r| r.is_active(now)) {
        let parsed = record.parsed_type()?;
        let units = weights.weight(&record.id, &parsed.size)? * record.instance_count;

        match record.scope {
            Scope::Region => {
                totals.add_region(&parsed.family, &parsed.size, units);
            }
            Scope::AvailabilityZone => {
                let zone = record.availability_zone.as_deref().ok_or_else(|| {
                    ReservationError::MissingAvailabilityZone {
                        reservation_id: record.id.clone(),
                    }
                })?;
                totals.add_zone(&parsed.family, zone, &parsed.size, units);
            }
        }

        debug!(
            reservation_id = %record.id,
            instance_type = %parsed,
            scope = %record.scope,
            units = %units,
            "Reservation normalized"
        );
    }

    Ok(totals)
}
