use std::time::{Duration, Instant};

/// Cancellable deferred callback, driven by an explicit clock so tests can
/// step time. Re-arming replaces the pending deadline; callbacks never
/// stack.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    due: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self { window, due: None }
    }

    pub fn arm(&mut self, now: Instant) {
        self.due = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    /// True exactly once when the quiet period has elapsed; disarms.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
