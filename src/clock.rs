use chrono::{DateTime, TimeDelta, Utc};
use std::sync::{Arc, Mutex};

/// Wall-clock source for timestamps, dwell times and idle deadlines
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests and headless drivers.
/// Clones share the same underlying instant.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        self.advance(TimeDelta::milliseconds(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Elapsed wall-clock time in whole seconds, rounded half up and never negative
pub fn elapsed_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let ms = (now - since).num_milliseconds().max(0);
    (ms as f64 / 1000.0).round() as u64
}
