//! Last-write-wins sequencing for externally completed checks
//!
//! Some checks finish later than the edit that triggered them (uniqueness
//! lookups, server round trips). Each check start issues a ticket carrying a
//! monotonically increasing sequence number; when results come back only
//! the most recent ticket per field may be applied.
//!
//! # Invariants
//!
//! - Sequence numbers are strictly monotonic across all fields
//! - Sequence 0 is never issued
//! - A ticket is current until a newer ticket for the same field is issued,
//!   the field is cancelled, or the ticket is finished

use std::collections::HashMap;
use std::fmt;

/// Handle for one in-flight check
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckTicket {
    field: String,
    seq: u64,
}

impl CheckTicket {
    /// Field the check belongs to
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Sequence number
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl fmt::Display for CheckTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.field, self.seq)
    }
}

/// Issues tickets and decides which results are still current
#[derive(Debug, Default)]
pub struct CheckSequencer {
    last_issued: u64,
    latest: HashMap<String, u64>,
}

impl CheckSequencer {
    /// Create a sequencer with nothing in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a check for `field`, superseding any earlier one
    pub fn begin(&mut self, field: impl Into<String>) -> CheckTicket {
        self.last_issued += 1;
        let field = field.into();
        if let Some(previous) = self.latest.insert(field.clone(), self.last_issued) {
            tracing::debug!(
                target: "formstore::validation",
                field = %field,
                superseded = previous,
                seq = self.last_issued,
                "Check superseded"
            );
        }
        CheckTicket {
            field,
            seq: self.last_issued,
        }
    }

    /// Check if `ticket` is still the newest for its field
    pub fn is_current(&self, ticket: &CheckTicket) -> bool {
        self.latest.get(&ticket.field) == Some(&ticket.seq)
    }

    /// Retire `ticket`; returns true if its result may be applied
    pub fn finish(&mut self, ticket: &CheckTicket) -> bool {
        if self.is_current(ticket) {
            self.latest.remove(&ticket.field);
            true
        } else {
            tracing::debug!(
                target: "formstore::validation",
                ticket = %ticket,
                current = ?self.latest.get(&ticket.field),
                "Stale check result discarded"
            );
            false
        }
    }

    /// Drop whatever is in flight for `field`
    pub fn cancel(&mut self, field: &str) {
        self.latest.remove(field);
    }

    /// Drop everything in flight
    pub fn clear(&mut self) {
        self.latest.clear();
    }

    /// Check if a check for `field` is in flight
    pub fn is_pending(&self, field: &str) -> bool {
        self.latest.contains_key(field)
    }

    /// Number of fields with a check in flight
    pub fn pending_count(&self) -> usize {
        self.latest.len()
    }
}
