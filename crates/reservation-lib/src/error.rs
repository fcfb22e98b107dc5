//! Error types shared by the reservation core and its collaborators

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, ReservationError>;

/// Errors raised while accounting reservations or syncing calendar events
#[derive(Debug, Error)]
pub enum ReservationError {
    /// Instance type is not of the form `<family>.<size>`
    #[error("malformed instance type '{instance_type}' on reservation {reservation_id}: expected '<family>.<size>'")]
    MalformedInstanceType {
        reservation_id: String,
        instance_type: String,
    },

    /// Size class has no entry in the weight table
    #[error("unknown size class '{size}' on reservation {reservation_id}")]
    UnknownSizeClass {
        reservation_id: String,
        size: String,
    },

    /// Zone-scoped reservation without an availability zone
    #[error("reservation {reservation_id} is zone scoped but has no availability zone")]
    MissingAvailabilityZone { reservation_id: String },

    /// Existing event ids could not be listed, so no events may be created
    #[error("could not list existing events in calendar '{calendar}': {reason}")]
    RemoteListingUnavailable { calendar: String, reason: String },

    /// A single event creation failed
    #[error("failed to create event {event_id}: {reason}")]
    RemoteCreateFailed { event_id: String, reason: String },

    /// No calendar with the requested display name
    #[error("calendar '{0}' not found")]
    CalendarNotFound(String),
}

impl ReservationError {
    /// Whether the error came from reservation input data rather than I/O
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedInstanceType { .. }
                | Self::UnknownSizeClass { .. }
                | Self::MissingAvailabilityZone { .. }
        )
    }
}
