//! Stale-response suppression for out-of-order async replies.
//!
//! Widgets fetch data on demand, and a slow reply for an old query can land
//! after the reply for a newer one. A [`RequestSlot`] assigns each request a
//! monotonically increasing sequence number and accepts a completion only if
//! it carries the newest ticket; anything older is discarded.

use tracing::debug;

/// Proof that a request was issued, carrying its sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    /// The sequence number, for logging.
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// Holds the latest response for one logical request stream.
#[derive(Debug, Clone)]
pub struct RequestSlot<T> {
    next_seq: u64,
    latest_issued: u64,
    value: Option<(u64, T)>,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RequestSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            latest_issued: 0,
            value: None,
        }
    }

    /// Issue a ticket for a new request, superseding all earlier ones.
    pub fn begin(&mut self) -> Ticket {
        self.next_seq += 1;
        self.latest_issued = self.next_seq;
        Ticket(self.next_seq)
    }

    /// Accept a completion if its ticket is still the newest. Returns
    /// whether the value was stored.
    pub fn complete(&mut self, ticket: Ticket, value: T) -> bool {
        if ticket.0 != self.latest_issued {
            debug!(
                seq = ticket.0,
                latest = self.latest_issued,
                "discarding stale response"
            );
            return false;
        }
        self.value = Some((ticket.0, value));
        true
    }

    /// The most recent accepted value, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.value.as_ref().map(|(_, v)| v)
    }

    /// Whether the stored value answers the newest issued request.
    #[must_use]
    pub fn is_current(&self) -> bool {
        matches!(self.value, Some((seq, _)) if seq == self.latest_issued)
    }

    /// Drop the stored value without invalidating outstanding tickets.
    pub fn clear(&mut self) {
        self.value = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
