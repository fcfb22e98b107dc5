//! Reserved capacity accounting and expiration calendar sync
//!
//! This crate provides the core functionality for:
//! - Normalizing reservations of mixed instance sizes into comparable units
//! - Deriving deterministic expiration events from active reservations
//! - Idempotent, fail-closed sync of those events into a remote calendar
//! - Listing reservations from the AWS CLI or a saved listing

pub mod calendar;
pub mod capacity;
pub mod error;
pub mod inventory;
pub mod models;
pub mod observability;

pub use calendar::{derive_events, event_id, reconcile, sync_events, ExpirationEvent, SyncReport};
pub use capacity::{normalize, NormalizedTotals, NormalizedUnits, SizeWeights};
pub use error::{ReservationError, Result};
pub use models::*;
pub use observability::SyncLogger;
