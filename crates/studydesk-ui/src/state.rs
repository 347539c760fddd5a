use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

/// UI-thread state that the window itself doesn't hold
pub struct UiState {
    pub visible: Cell<bool>,
    pub scroll: RefCell<ScrollThrottle>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            visible: Cell::new(true),
            scroll: RefCell::new(ScrollThrottle::new(Duration::from_millis(200))),
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Lets one wheel step through per interval
#[derive(Debug, Clone)]
pub struct ScrollThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl ScrollThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last
            && now.saturating_duration_since(last) < self.interval
        {
            return false;
        }
        self.last = Some(now);
        true
    }
}
