//! Consultation queue numbering.
//!
//! Two numbering policies exist, one per store:
//!
//! - [`QueuePolicy::RunningCounter`]: a single process-wide counter starting
//!   at 1 and never reset by day. Used by the in-memory store.
//! - [`QueuePolicy::DailyCount`]: numbering restarts every calendar day.
//!   Used by the SQLite store, where the number is computed from the
//!   patients already queued today.
//!
//! Either way, numbers handed out in call order are strictly increasing.

use serde::{Deserialize, Serialize};

use crate::models::Patient;

/// How a store assigns queue numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueuePolicy {
    /// Monotonic for the life of the process
    RunningCounter,
    /// Restarts at 1 every calendar day
    DailyCount,
}

/// Process-wide running queue counter.
#[derive(Debug, Clone)]
pub struct RunningCounter {
    next: u32,
}

impl RunningCounter {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next queue number.
    pub fn next(&mut self) -> u32 {
        let n = self.next;
        self.next += 1;
        n
    }
}

impl Default for RunningCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort patients into consultation order.
///
/// Queue day first (daily numbering restarts at 1), then queue number, then
/// registration time.
pub fn sort_by_queue(patients: &mut [Patient]) {
    patients.sort_by(|a, b| {
        a.queue_date
            .cmp(&b.queue_date)
            .then_with(|| a.queue_number.cmp(&b.queue_number))
            .then_with(|| a.registered_at.cmp(&b.registered_at))
    });
}
