use chrono::{DateTime, TimeDelta, Utc};
use crossterm::event::{Event, KeyEventKind, MouseEventKind};

use crate::clock::elapsed_secs;

pub const DEFAULT_IDLE_THRESHOLD_MS: u64 = 5000;

/// User activity that postpones idle detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ActivitySignal {
    PointerDown,
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
}

impl ActivitySignal {
    /// Map a terminal event to an activity signal. Terminals have no touch input.
    pub fn from_terminal_event(event: &Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Some(ActivitySignal::KeyPress),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(_) => Some(ActivitySignal::PointerDown),
                MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(ActivitySignal::PointerMove),
                MouseEventKind::ScrollUp
                | MouseEventKind::ScrollDown
                | MouseEventKind::ScrollLeft
                | MouseEventKind::ScrollRight => Some(ActivitySignal::Scroll),
                MouseEventKind::Up(_) => None,
            },
            _ => None,
        }
    }
}

/// Single rearming quiet-period timer.
///
/// At most one deadline is armed. Each activity signal replaces it; `poll`
/// fires once per quiet interval and leaves the detector disarmed until the
/// next activity.
#[derive(Debug, Clone)]
pub struct IdleDetector {
    threshold: TimeDelta,
    last_activity: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
}

impl IdleDetector {
    /// Armed immediately, as if activity happened at `now`. A threshold too
    /// large to represent as a deadline never expires.
    pub fn new(threshold_ms: u64, now: DateTime<Utc>) -> Self {
        let threshold = i64::try_from(threshold_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            threshold,
            last_activity: now,
            deadline: now.checked_add_signed(threshold),
        }
    }

    pub fn threshold_ms(&self) -> i64 {
        self.threshold.num_milliseconds()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn record_activity(&mut self, _signal: ActivitySignal, now: DateTime<Utc>) {
        self.last_activity = now;
        self.deadline = now.checked_add_signed(self.threshold);
    }

    /// Idle duration in rounded seconds if the quiet period expired
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<u64> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(elapsed_secs(self.last_activity, now))
            }
            _ => None,
        }
    }
}
