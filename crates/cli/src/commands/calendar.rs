//! Expiration event calendar sync command

use anyhow::Result;
use chrono::{DateTime, Utc};
use reservation_lib::calendar::{derive_events, sync_events, CalendarClient, SyncReport};
use reservation_lib::ReservationRecord;

use crate::output::{print_error, print_info, print_success};

/// Derive events for active reservations and create the missing ones
pub async fn sync_calendar(
    client: &dyn CalendarClient,
    calendar_name: &str,
    records: &[ReservationRecord],
    now: DateTime<Utc>,
) -> Result<SyncReport> {
    let events = derive_events(records, now);
    let report = sync_events(client, calendar_name, events).await?;
    Ok(report)
}

/// Print per-event sync outcome
pub fn print_sync_report(report: &SyncReport, calendar_name: &str) {
    println!();
    let total = report.created.len() + report.already_present.len() + report.failed.len();
    if total > 0 {
        print_info(&format!(
            "Syncing {} events with the {} calendar of your Google account",
            total, calendar_name
        ));
    } else {
        print_info("No active reservations to schedule");
    }

    for id in &report.already_present {
        println!("The event: {} is already scheduled. Nothing to do...", id);
    }

    for created in &report.created {
        match &created.html_link {
            Some(link) => print_success(&format!("Event created: {}", link)),
            None => print_success(&format!("Event created: {}", created.id)),
        }
    }

    for failed in &report.failed {
        print_error(&format!("{}", failed.to_error()));
    }
}

/// Error for a run where some events could not be created
pub fn ensure_complete(report: &SyncReport) -> Result<()> {
    if !report.is_complete() {
        anyhow::bail!(
            "{} event(s) could not be created; re-run to retry",
            report.failed.len()
        );
    }
    Ok(())
}
