use std::time::{Duration, Instant};

/// Source of elapsed time and blocking sleeps.
pub trait Clock {
    /// Seconds since an arbitrary fixed origin.
    fn now(&self) -> f64;

    fn sleep(&mut self, seconds: f64);

    /// Seconds elapsed since `since` (a previous `now()`).
    fn since(&self, since: f64) -> f64 {
        self.now() - since
    }
}

/// Real time: monotonic instant plus `thread::sleep`.
#[derive(Debug, Clone)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn sleep(&mut self, seconds: f64) {
        if seconds > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(seconds));
        }
    }
}
