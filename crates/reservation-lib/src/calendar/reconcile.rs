//! Partition candidate events against ids already in the remote calendar

use super::event::ExpirationEvent;
use std::collections::HashSet;

/// Outcome of reconciling candidates with the remote calendar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub to_create: Vec<ExpirationEvent>,
    pub already_present: Vec<ExpirationEvent>,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty()
    }
}

/// Split `candidates` by membership of their id in `existing_ids`.
///
/// Never proposes updates or deletions. Candidates sharing an id are
/// collapsed to the first one, so each id lands in exactly one partition
/// exactly once.
pub fn reconcile(candidates: Vec<ExpirationEvent>, existing_ids: &HashSet<String>) -> Reconciliation {
    let mut result = Reconciliation::default();
    let mut seen: HashSet<String> = HashSet::new();

    for event in candidates {
        if !seen.insert(event.id.clone()) {
            continue;
        }
        if existing_ids.contains(&event.id) {
            result.already_present.push(event);
        } else {
            result.to_create.push(event);
        }
    }

    result
}
