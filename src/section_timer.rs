use chrono::{DateTime, Utc};

use crate::clock::elapsed_secs;
use crate::section::Section;

/// Dwell time accumulated in a section that has just been left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionTime {
    pub section: Section,
    pub secs: u64,
}

/// The active section and when it was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionClock {
    pub current_section: Section,
    pub section_start: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SectionTimer {
    clock: SectionClock,
}

impl SectionTimer {
    pub fn new(section: Section, now: DateTime<Utc>) -> Self {
        Self {
            clock: SectionClock {
                current_section: section,
                section_start: now,
            },
        }
    }

    pub fn current_section(&self) -> Section {
        self.clock.current_section
    }

    pub fn clock(&self) -> SectionClock {
        self.clock
    }

    /// Switch to `section`. Returns the time spent in the section being left,
    /// or `None` when `section` is already active (no reset either).
    pub fn set_active_section(&mut self, section: Section, now: DateTime<Utc>) -> Option<SectionTime> {
        if self.clock.current_section == section {
            return None;
        }
        let left = self.take_section_time(self.clock.current_section, now);
        self.clock.current_section = section;
        Some(left)
    }

    /// Dwell time since the start reference, attributed to `section`; the
    /// start reference is reset to `now`.
    pub fn take_section_time(&mut self, section: Section, now: DateTime<Utc>) -> SectionTime {
        let secs = elapsed_secs(self.clock.section_start, now);
        self.clock.section_start = now;
        SectionTime { section, secs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn t(ms: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(ms)
    }

    #[test]
    fn test_switch_reports_left_section() {
        let mut timer = SectionTimer::new(Section::Personal, t(0));
        let spent = timer.set_active_section(Section::Address, t(12_400));

        assert_eq!(
            spent,
            Some(SectionTime {
                section: Section::Personal,
                secs: 12
            })
        );
        assert_eq!(timer.current_section(), Section::Address);
        assert_eq!(timer.clock().section_start, t(12_400));
    }

    #[test]
    fn test_same_section_is_idempotent() {
        let mut timer = SectionTimer::new(Section::Personal, t(0));
        assert_eq!(timer.set_active_section(Section::Personal, t(3_000)), None);
        // start reference untouched
        assert_eq!(timer.clock().section_start, t(0));

        let spent = timer.set_active_section(Section::Address, t(4_000)).unwrap();
        assert_eq!(spent.secs, 4);
    }

    #[test]
    fn test_take_section_time_resets_start() {
        let mut timer = SectionTimer::new(Section::Review, t(0));
        let spent = timer.take_section_time(Section::Review, t(2_600));
        assert_eq!(spent.secs, 3);
        assert_eq!(timer.take_section_time(Section::Review, t(2_600)).secs, 0);
        assert_eq!(timer.current_section(), Section::Review);
    }

    #[test]
    fn test_clock_going_backwards_reports_zero() {
        let mut timer = SectionTimer::new(Section::Personal, t(5_000));
        let spent = timer.set_active_section(Section::Address, t(1_000)).unwrap();
        assert_eq!(spent.secs, 0);
    }
}
