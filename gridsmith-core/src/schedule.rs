//! Trailing-edge debounce for property-edit commits.

use std::time::{Duration, Instant};

/// Default quiet period before a property edit is committed to history.
pub const DEFAULT_COMMIT_DELAY: Duration = Duration::from_millis(500);

/// Tracks when a burst of edits has gone quiet.
///
/// The owner drives it with explicit timestamps: call [`touch`](Self::touch)
/// on every edit and poll [`take_due`](Self::take_due) from its event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitDebouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl CommitDebouncer {
    /// Create a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Record an edit at `now`, pushing the deadline out.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Whether an edit is waiting to be committed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the pending edit's quiet period has elapsed at `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Disarm and return `true` if due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Drop any pending commit.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// The quiet period.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for CommitDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_COMMIT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_debouncer_is_never_due() {
        let mut debouncer = CommitDebouncer::default();
        let now = Instant::now();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.take_due(now + Duration::from_secs(10)));
    }

    #[test]
    fn test_due_after_quiet_period() {
        let mut debouncer = CommitDebouncer::default();
        let start = Instant::now();
        debouncer.touch(start);
        assert!(!debouncer.is_due(start + Duration::from_millis(499)));
        assert!(debouncer.take_due(start + Duration::from_millis(500)));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.take_due(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_touch_extends_deadline() {
        let mut debouncer = CommitDebouncer::default();
        let start = Instant::now();
        debouncer.touch(start);
        debouncer.touch(start + Duration::from_millis(400));
        assert!(!debouncer.is_due(start + Duration::from_millis(600)));
        assert!(debouncer.is_due(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_cancel() {
        let mut debouncer = CommitDebouncer::new(Duration::from_millis(10));
        let start = Instant::now();
        debouncer.touch(start);
        debouncer.cancel();
        assert!(!debouncer.is_due(start + Duration::from_secs(1)));
    }
}
