//! Reservation inventory sources
//!
//! Sources return already-parsed [`ReservationRecord`]s. Filtering follows
//! the provider's semantics: state is matched exactly, instance type as a
//! substring.

mod aws_cli;
mod json_file;

pub use aws_cli::AwsCliInventory;
pub use json_file::JsonFileInventory;

use crate::models::{Lifecycle, ReservationRecord, ReservationState};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for reservation listing implementations
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// List reservations matching `filter`
    async fn list_reservations(&self, filter: &InventoryFilter) -> Result<Vec<ReservationRecord>>;
}

/// Listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    pub state: Option<ReservationState>,
    pub instance_type: Option<String>,
}

impl InventoryFilter {
    /// Resolve user-supplied filters.
    ///
    /// Calendar sync only ever looks at active reservations, so when it is
    /// requested the manual state and type filters are ignored.
    pub fn resolve(
        state: Option<ReservationState>,
        instance_type: Option<String>,
        calendar_sync: bool,
    ) -> Self {
        if calendar_sync {
            return Self {
                state: Some(ReservationState::Active),
                instance_type: None,
            };
        }

        Self {
            state,
            instance_type: instance_type.filter(|t| !t.is_empty()),
        }
    }

    /// `--filters` arguments for `describe-reserved-instances`
    pub fn to_provider_filters(&self) -> Vec<String> {
        let mut filters = Vec::new();
        if let Some(state) = self.state {
            filters.push(format!("Name=state,Values={}", state));
        }
        if let Some(instance_type) = &self.instance_type {
            filters.push(format!("Name=instance-type,Values=*{}*", instance_type));
        }
        filters
    }

    /// Local equivalent of the provider-side filter.
    ///
    /// Records without a provider state are matched on the lifecycle
    /// derived from their end time.
    pub fn matches(&self, record: &ReservationRecord, now: DateTime<Utc>) -> bool {
        let state_ok = match (self.state, record.provider_state) {
            (None, _) => true,
            (Some(_), Some(ReservationState::Unknown)) => false,
            (Some(wanted), Some(actual)) => wanted == actual,
            (Some(wanted), None) => match record.lifecycle(now) {
                Lifecycle::Active => wanted == ReservationState::Active,
                Lifecycle::Retired => wanted == ReservationState::Retired,
            },
        };

        let type_ok = self
            .instance_type
            .as_ref()
            .map(|t| record.instance_type.contains(t.as_str()))
            .unwrap_or(true);

        state_ok && type_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scope;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn record(instance_type: &str, days: i64, state: Option<ReservationState>) -> ReservationRecord {
        ReservationRecord {
            id: "ri-1".to_string(),
            instance_count: 1,
            instance_type: instance_type.to_string(),
            product_description: "Linux/UNIX".to_string(),
            scope: Scope::Region,
            availability_zone: None,
            duration_seconds: 31_536_000,
            offering_type: "No Upfront".to_string(),
            end: now() + Duration::days(days),
            provider_state: state,
        }
    }

    #[test]
    fn test_calendar_sync_overrides_manual_filters() {
        let filter = InventoryFilter::resolve(
            Some(ReservationState::Retired),
            Some("m5".to_string()),
            true,
        );
        assert_eq!(filter.state, Some(ReservationState::Active));
        assert_eq!(filter.instance_type, None);
        assert_eq!(filter.to_provider_filters(), vec!["Name=state,Values=active"]);
    }

    #[test]
    fn test_manual_filters_without_calendar_sync() {
        let filter = InventoryFilter::resolve(
            Some(ReservationState::PaymentFailed),
            Some("m5".to_string()),
            false,
        );
        assert_eq!(
            filter.to_provider_filters(),
            vec![
                "Name=state,Values=payment-failed",
                "Name=instance-type,Values=*m5*"
            ]
        );

        let empty = InventoryFilter::resolve(None, Some(String::new()), false);
        assert!(empty.to_provider_filters().is_empty());
    }

    #[test]
    fn test_local_matching() {
        let filter = InventoryFilter {
            state: Some(ReservationState::Active),
            instance_type: Some("large".to_string()),
        };

        assert!(filter.matches(&record("m5.2xlarge", 10, None), now()));
        assert!(!filter.matches(&record("m5.2xlarge", -10, None), now()));
        assert!(!filter.matches(&record("t3.micro", 10, None), now()));
        assert!(!filter.matches(
            &record("m5.large", 10, Some(ReservationState::PaymentPending)),
            now()
        ));
        assert!(InventoryFilter::default().matches(&record("t3.micro", -1, None), now()));
    }

    #[test]
    fn test_unrecognized_state_never_matches_a_wanted_state() {
        let unknown = record("m5.large", 10, Some(ReservationState::Unknown));
        let queued = record("m5.large", 10, Some(ReservationState::Queued));

        for wanted in [ReservationState::Active, ReservationState::Unknown] {
            let filter = InventoryFilter {
                state: Some(wanted),
                instance_type: None,
            };
            assert!(!filter.matches(&unknown, now()));
            assert!(!filter.matches(&queued, now()));
        }
        assert!(InventoryFilter::default().matches(&unknown, now()));
    }
}
