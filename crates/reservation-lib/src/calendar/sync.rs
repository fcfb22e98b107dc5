//! Fail-closed sync of expiration events into a remote calendar

use super::{reconcile, CalendarClient, CreatedEvent, ExpirationEvent};
use crate::error::{ReservationError, Result};
use crate::observability::SyncLogger;
use serde::Serialize;

/// Event creation that failed; retried on the next run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEvent {
    pub event_id: String,
    pub reason: String,
}

impl FailedEvent {
    pub fn to_error(&self) -> ReservationError {
        ReservationError::RemoteCreateFailed {
            event_id: self.event_id.clone(),
            reason: self.reason.clone(),
        }
    }
}

/// Per-event outcome of a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub calendar_id: String,
    pub created: Vec<CreatedEvent>,
    pub already_present: Vec<String>,
    pub failed: Vec<FailedEvent>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Create every candidate event missing from the calendar named
/// `calendar_name`.
///
/// If the existing ids cannot be listed nothing is created. A failed
/// creation is recorded and the remaining events are still attempted.
pub async fn sync_events<C>(
    client: &C,
    calendar_name: &str,
    candidates: Vec<ExpirationEvent>,
) -> Result<SyncReport>
where
    C: CalendarClient + ?Sized,
{
    let logger = SyncLogger::new(calendar_name);

    let calendar_id = client
        .find_calendar_id(calendar_name)
        .await
        .map_err(|e| ReservationError::RemoteListingUnavailable {
            calendar: calendar_name.to_string(),
            reason: format!("{e:#}"),
        })?
        .ok_or_else(|| ReservationError::CalendarNotFound(calendar_name.to_string()))?;

    let existing_ids = match client.list_event_ids(&calendar_id).await {
        Ok(ids) => ids,
        Err(e) => {
            let reason = format!("{e:#}");
            logger.log_listing_failed(&reason, candidates.len());
            return Err(ReservationError::RemoteListingUnavailable {
                calendar: calendar_name.to_string(),
                reason,
            });
        }
    };

    let plan = reconcile(candidates, &existing_ids);
    logger.log_plan(existing_ids.len(), plan.to_create.len(), plan.already_present.len());

    let mut report = SyncReport {
        calendar_id: calendar_id.clone(),
        ..SyncReport::default()
    };

    for event in plan.already_present {
        logger.log_already_present(&event.id);
        report.already_present.push(event.id);
    }

    for event in plan.to_create {
        match client.create_event(&calendar_id, &event).await {
            Ok(created) => {
                logger.log_created(&created.id, created.html_link.as_deref());
                report.created.push(created);
            }
            Err(e) => {
                let reason = format!("{e:#}");
                logger.log_create_failed(&event.id, &reason);
                report.failed.push(FailedEvent {
                    event_id: event.id,
                    reason,
                });
            }
        }
    }

    logger.log_summary(&report);
    Ok(report)
}
