use std::time::{Duration, Instant};

/// Tracks when an action should fire after a quiet period.
///
/// Callers register activity with [`trigger`](Self::trigger) and poll
/// [`should_execute`](Self::should_execute) from the event loop; the action
/// fires once when the delay has elapsed with no further triggers.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    last_event: Option<Instant>,
    pending: bool,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_event: None,
            pending: false,
        }
    }

    /// Register that activity occurred, restarting the quiet period.
    pub fn trigger(&mut self) {
        self.last_event = Some(Instant::now());
        self.pending = true;
    }

    /// True once per trigger burst, after the delay has elapsed.
    pub fn should_execute(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        if let Some(last) = self.last_event {
            if last.elapsed() >= self.delay {
                self.pending = false;
                self.last_event = None;
                return true;
            }
        }
        false
    }

    /// Cancel any pending action.
    pub fn reset(&mut self) {
        self.last_event = None;
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
