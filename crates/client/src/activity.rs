//! Global loading-indicator tracking as a scoped acquisition.
//!
//! Every network call acquires an [`ActivityGuard`] for its duration; the
//! guard releases on drop, success or failure, so the indicator can never
//! be left on after a call completes or unwinds.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts in-flight network calls across a screen/frontend.
#[derive(Debug, Clone, Default)]
pub struct ActivityTracker {
    active: Arc<AtomicUsize>,
}

/// RAII handle for one in-flight call.  Dropping it releases the slot.
#[derive(Debug)]
pub struct ActivityGuard {
    active: Arc<AtomicUsize>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a network call as started.  Hold the guard for its duration.
    pub fn begin(&self) -> ActivityGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        ActivityGuard {
            active: Arc::clone(&self.active),
        }
    }

    /// Whether any call is currently in flight (drives the indicator).
    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::SeqCst) > 0
    }

    /// Number of calls currently in flight.
    pub fn in_flight(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_tracker_is_not_busy() {
        let tracker = ActivityTracker::new();
        assert!(!tracker.is_busy());
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_guard_toggles_busy_state() {
        let tracker = ActivityTracker::new();
        let guard = tracker.begin();
        assert!(tracker.is_busy());
        drop(guard);
        assert!(!tracker.is_busy());
    }

    #[test]
    fn test_overlapping_guards_count() {
        let tracker = ActivityTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert_eq!(tracker.in_flight(), 2);
        drop(first);
        assert!(tracker.is_busy());
        drop(second);
        assert!(!tracker.is_busy());
    }

    #[test]
    fn test_guard_releases_on_unwind() {
        let tracker = ActivityTracker::new();
        let result = std::panic::catch_unwind({
            let tracker = tracker.clone();
            move || {
                let _guard = tracker.begin();
                panic!("call failed mid-flight");
            }
        });
        assert!(result.is_err());
        assert!(!tracker.is_busy());
    }
}
