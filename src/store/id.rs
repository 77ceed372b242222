//! Record id generation.
//!
//! Each store owns one sequence. Ids are decimal strings starting at "0",
//! monotonically increasing, never reused, and capped at
//! [`ID_CHAR_LIMIT`](crate::record::ID_CHAR_LIMIT) characters.

use super::errors::{StoreError, StoreResult};
use crate::record::{RecordId, ID_CHAR_LIMIT};

/// Monotonic id source for a single store.
#[derive(Debug, Default)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Resumes a sequence at a given counter value. Used when reloading a
    /// store so fresh ids never collide with replayed ones, and by tests.
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Hands out the next id.
    ///
    /// # Errors
    ///
    /// `StoreError::IdOverflow` once the decimal rendering would exceed the
    /// id length cap; the counter is left unchanged.
    pub fn next_id(&mut self) -> StoreResult<RecordId> {
        let id = self.next.to_string();
        if id.len() > ID_CHAR_LIMIT {
            return Err(StoreError::IdOverflow);
        }
        self.next += 1;
        Ok(id)
    }

    /// Bumps the counter past `id` if `id` is numeric and at or beyond it.
    pub fn observe(&mut self, id: &str) {
        if let Ok(numeric) = id.parse::<u64>() {
            if numeric >= self.next {
                self.next = numeric + 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_from_zero() {
        let mut seq = IdSequence::new();
        assert_eq!(seq.next_id().unwrap(), "0");
        assert_eq!(seq.next_id().unwrap(), "1");
        assert_eq!(seq.next_id().unwrap(), "2");
    }

    #[test]
    fn overflow_past_ten_chars_is_rejected() {
        // 10_000_000_000 renders as 11 characters.
        let mut seq = IdSequence::starting_at(9_999_999_999);
        assert_eq!(seq.next_id().unwrap(), "9999999999");
        assert_eq!(seq.next_id(), Err(StoreError::IdOverflow));
        // Still exhausted on retry.
        assert_eq!(seq.next_id(), Err(StoreError::IdOverflow));
    }

    #[test]
    fn observe_skips_past_replayed_ids() {
        let mut seq = IdSequence::new();
        seq.observe("41");
        assert_eq!(seq.next_id().unwrap(), "42");
        seq.observe("7");
        assert_eq!(seq.next_id().unwrap(), "43");
    }

    #[test]
    fn observe_ignores_non_numeric_ids() {
        let mut seq = IdSequence::new();
        seq.observe("imported-a");
        assert_eq!(seq.next_id().unwrap(), "0");
    }
}
