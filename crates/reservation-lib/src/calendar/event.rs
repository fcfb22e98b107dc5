//! Expiration events derived from active reservations
//!
//! The event id is a pure function of the reservation id. Remote calendars
//! are the only record of what has been created, so this derivation is what
//! makes repeated syncs idempotent. Changing the digest or its encoding
//! orphans every event created under the previous scheme.

use crate::models::ReservationRecord;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha224};

/// Identifier scheme for derived event ids
pub const EVENT_ID_SCHEME: &str = "sha224-hex/v1";

pub const EVENT_SUMMARY: &str = "Reserve Instance Expiration";
pub const EVENT_LOCATION: &str = "aws";

/// Display time zone attached to event times
pub const EVENT_TIME_ZONE: &str = "America/Los_Angeles";

/// Events mark the expiry moment with a fixed one hour window
const EVENT_WINDOW_MINUTES: i64 = 60;

const EMAIL_REMINDER_MINUTES: u32 = 24 * 60;
const POPUP_REMINDER_MINUTES: u32 = 10;

/// Lowercase hex SHA-224 of the reservation id
pub fn event_id(reservation_id: &str) -> String {
    hex::encode(Sha224::digest(reservation_id.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: DateTime<Utc>,
    pub time_zone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Email,
    Popup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub method: ReminderMethod,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<Reminder>,
}

impl Reminders {
    /// Email a day ahead, popup ten minutes ahead
    pub fn expiration_defaults() -> Self {
        Self {
            use_default: false,
            overrides: vec![
                Reminder {
                    method: ReminderMethod::Email,
                    minutes: EMAIL_REMINDER_MINUTES,
                },
                Reminder {
                    method: ReminderMethod::Popup,
                    minutes: POPUP_REMINDER_MINUTES,
                },
            ],
        }
    }
}

/// Calendar event marking a reservation's expiry.
///
/// Serializes to the Google Calendar v3 event resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationEvent {
    pub id: String,
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    pub reminders: Reminders,
}

impl ExpirationEvent {
    pub fn from_record(record: &ReservationRecord) -> Self {
        let start = record.end;
        let end = start + Duration::minutes(EVENT_WINDOW_MINUTES);

        Self {
            id: event_id(&record.id),
            summary: EVENT_SUMMARY.to_string(),
            location: EVENT_LOCATION.to_string(),
            description: describe(record),
            start: EventTime {
                date_time: start,
                time_zone: EVENT_TIME_ZONE.to_string(),
            },
            end: EventTime {
                date_time: end,
                time_zone: EVENT_TIME_ZONE.to_string(),
            },
            reminders: Reminders::expiration_defaults(),
        }
    }
}

fn describe(record: &ReservationRecord) -> String {
    format!(
        "A purchased reservation affecting {} x {} instances is about to expire. Reservation id: {}",
        record.instance_count, record.instance_type, record.id
    )
}

/// One event per reservation still active at `now`, in input order
pub fn derive_events(records: &[ReservationRecord], now: DateTime<Utc>) -> Vec<ExpirationEvent> {
    records
        .iter()
        .filter(|r| r.is_active(now))
        .map(ExpirationEvent::from_record)
        .collect()
}
