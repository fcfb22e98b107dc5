//! CLI command implementations

pub mod calendar;
pub mod inventory;
