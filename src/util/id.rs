//! ID utilities (ULIDs, serial ids).

use std::sync::atomic::{AtomicU64, Ordering};

use ulid::Ulid;

use crate::model::Id;

/// Generate a session id. ULIDs sort by creation time, which keeps the
/// session table easy to eyeball in logs.
pub fn new_session_id() -> String {
    Ulid::new().to_string()
}

/// Per-table serial ids, starting at 1 like a database sequence.
#[derive(Debug)]
pub struct Serial(AtomicU64);

impl Serial {
    pub fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    pub fn next(&self) -> Id {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for Serial {
    fn default() -> Self {
        Self::new()
    }
}
