//! Structured logging for calendar sync
//!
//! Every line carries an `event` field and the calendar name so sync runs
//! can be filtered from JSON logs.

use crate::calendar::SyncReport;
use tracing::{debug, info, warn};

/// Structured logger for one sync run against one calendar
#[derive(Debug, Clone)]
pub struct SyncLogger {
    calendar: String,
}

impl SyncLogger {
    pub fn new(calendar: &str) -> Self {
        Self {
            calendar: calendar.to_string(),
        }
    }

    pub fn calendar(&self) -> &str {
        &self.calendar
    }

    /// Log the reconciliation decision
    pub fn log_plan(&self, existing: usize, to_create: usize, already_present: usize) {
        info!(
            event = "calendar_reconciled",
            calendar = %self.calendar,
            existing_events = existing,
            to_create = to_create,
            already_present = already_present,
            "Reconciled expiration events with calendar"
        );
    }

    pub fn log_already_present(&self, event_id: &str) {
        debug!(
            event = "calendar_event_present",
            calendar = %self.calendar,
            event_id = %event_id,
            "Event already scheduled"
        );
    }

    pub fn log_created(&self, event_id: &str, html_link: Option<&str>) {
        info!(
            event = "calendar_event_created",
            calendar = %self.calendar,
            event_id = %event_id,
            html_link = ?html_link,
            "Event created"
        );
    }

    pub fn log_create_failed(&self, event_id: &str, reason: &str) {
        warn!(
            event = "calendar_event_create_failed",
            calendar = %self.calendar,
            event_id = %event_id,
            reason = %reason,
            "Event creation failed, will retry on next run"
        );
    }

    /// Listing failed; nothing will be created
    pub fn log_listing_failed(&self, reason: &str, candidates: usize) {
        warn!(
            event = "calendar_listing_unavailable",
            calendar = %self.calendar,
            reason = %reason,
            skipped_candidates = candidates,
            "Could not list existing events, refusing to create any"
        );
    }

    pub fn log_summary(&self, report: &SyncReport) {
        if report.is_complete() {
            info!(
                event = "calendar_sync_complete",
                calendar = %self.calendar,
                created = report.created.len(),
                already_present = report.already_present.len(),
                "Calendar sync finished"
            );
        } else {
            warn!(
                event = "calendar_sync_partial",
                calendar = %self.calendar,
                created = report.created.len(),
                already_present = report.already_present.len(),
                failed = report.failed.len(),
                "Calendar sync finished with failures"
            );
        }
    }
}
