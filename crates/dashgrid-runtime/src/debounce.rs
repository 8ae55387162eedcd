//! Write debouncing.
//!
//! Layout edits arrive in bursts (every intermediate frame of a drag fires a
//! change), so the orchestrator coalesces them: each change re-arms a quiet
//! window, and the write happens once the window elapses with no further
//! changes. Latest state wins; intermediate states are never persisted.
//!
//! [`DebouncedWriter`] is a passive timer. It never spawns anything; the
//! host drives it by calling [`poll`](DebouncedWriter::poll) from its event
//! loop (or [`flush`](DebouncedWriter::flush) on shutdown) and performs the
//! actual write when told to.

use std::time::{Duration, Instant};

/// Quiet window between the last change and the persistence write.
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(500);

/// Trailing-edge debounce timer for persistence writes.
#[derive(Debug, Clone)]
pub struct DebouncedWriter {
    window: Duration,
    deadline: Option<Instant>,
}

impl DebouncedWriter {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Record a change at `now`, re-arming the quiet window.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Whether a write is armed and its deadline has passed. Returns `true`
    /// at most once per armed window; the caller then performs the write.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Disarm and report whether a write was pending. Used on shutdown so
    /// the last burst is never lost to the quiet window.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Drop any pending write without performing it.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a write is currently armed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The armed deadline, for hosts that sleep until the next event.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Default for DebouncedWriter {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_WINDOW)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
