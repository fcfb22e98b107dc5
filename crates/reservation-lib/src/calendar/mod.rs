//! Expiration event calendar sync
//!
//! This module provides:
//! - Deterministic expiration events derived from active reservations
//! - Reconciliation against ids already present in a remote calendar
//! - A fail-closed sync driver over any [`CalendarClient`]
//! - A Google Calendar v3 client

mod event;
mod google;
mod reconcile;
mod sync;


pub use event::{
    derive_events, event_id, EventTime, ExpirationEvent, Reminder, ReminderMethod, Reminders,
    EVENT_ID_SCHEME, EVENT_LOCATION, EVENT_SUMMARY, EVENT_TIME_ZONE,
};
pub use google::{GoogleCalendarClient, GOOGLE_CALENDAR_API_URL};
pub use reconcile::{reconcile, Reconciliation};
pub use sync::{sync_events, FailedEvent, SyncReport};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Confirmation returned by the calendar for a created event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
}

/// Remote calendar operations used by the sync driver
#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// Resolve a calendar's id from its display name
    async fn find_calendar_id(&self, name: &str) -> Result<Option<String>>;

    /// Every event id currently stored in the calendar
    async fn list_event_ids(&self, calendar_id: &str) -> Result<HashSet<String>>;

    /// Insert one event
    async fn create_event(&self, calendar_id: &str, event: &ExpirationEvent) -> Result<CreatedEvent>;
}
