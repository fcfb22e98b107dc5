//! Core data models for reserved capacity records

use crate::error::{ReservationError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const SECONDS_PER_DAY: i64 = 86_400;

/// Whether a reservation applies to a whole region or to a single zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "Region")]
    Region,
    #[serde(rename = "Availability Zone")]
    AvailabilityZone,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Region => f.write_str("Region"),
            Scope::AvailabilityZone => f.write_str("Availability Zone"),
        }
    }
}

/// Reservation state as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationState {
    PaymentPending,
    Active,
    PaymentFailed,
    Retired,
    Queued,
    QueuedDeleted,
    /// Any state this client does not know about yet
    #[serde(other)]
    Unknown,
}

impl ReservationState {
    /// Provider filter value for this state
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationState::PaymentPending => "payment-pending",
            ReservationState::Active => "active",
            ReservationState::PaymentFailed => "payment-failed",
            ReservationState::Retired => "retired",
            ReservationState::Queued => "queued",
            ReservationState::QueuedDeleted => "queued-deleted",
            ReservationState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ReservationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle derived from the end timestamp at evaluation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Active,
    Retired,
}

/// One purchased reservation, as returned by `describe-reserved-instances`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReservationRecord {
    #[serde(rename = "ReservedInstancesId")]
    pub id: String,
    pub instance_count: u32,
    pub instance_type: String,
    #[serde(default)]
    pub product_description: String,
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(rename = "Duration", default)]
    pub duration_seconds: i64,
    #[serde(default)]
    pub offering_type: String,
    pub end: DateTime<Utc>,
    #[serde(rename = "State", default, skip_serializing_if = "Option::is_none")]
    pub provider_state: Option<ReservationState>,
}

impl ReservationRecord {
    /// Active iff the end timestamp is strictly after `now`
    pub fn lifecycle(&self, now: DateTime<Utc>) -> Lifecycle {
        if self.end > now {
            Lifecycle::Active
        } else {
            Lifecycle::Retired
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.lifecycle(now) == Lifecycle::Active
    }

    /// Whole days until expiry, never negative
    pub fn time_left_days(&self, now: DateTime<Utc>) -> i64 {
        (self.end - now).num_days().max(0)
    }

    pub fn duration_days(&self) -> i64 {
        self.duration_seconds / SECONDS_PER_DAY
    }

    /// Parse the instance type into family and size
    pub fn parsed_type(&self) -> Result<InstanceType> {
        InstanceType::parse(&self.id, &self.instance_type)
    }
}

/// Instance type split into `<family>.<size>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceType {
    pub family: String,
    pub size: String,
}

impl InstanceType {
    /// Split on the single `.` separator.
    ///
    /// `reservation_id` only decorates the error.
    pub fn parse(reservation_id: &str, instance_type: &str) -> Result<Self> {
        let malformed = || ReservationError::MalformedInstanceType {
            reservation_id: reservation_id.to_string(),
            instance_type: instance_type.to_string(),
        };

        let (family, size) = instance_type.split_once('.').ok_or_else(malformed)?;
        if family.is_empty() || size.is_empty() || size.contains('.') {
            return Err(malformed());
        }

        Ok(Self {
            family: family.to_string(),
            size: size.to_string(),
        })
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.family, self.size)
    }
}

/// Top-level shape of the provider listing response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReservationListing {
    #[serde(default)]
    pub reserved_instances: Vec<ReservationRecord>,
}
