use std::sync::Arc;

use tracing::debug;

use crate::clock::Clock;
use crate::event::{EventData, EventRecord, EventType};
use crate::section::Section;
use crate::section_timer::{SectionClock, SectionTimer};
use crate::transport::Transport;

/// Capability handed to the wizard for reporting interactions.
///
/// Only `current_section`, `track`, `report_section_change` and
/// `report_section_time` need implementing; the rest are shaped on top.
pub trait EventSink {
    fn current_section(&self) -> Section;

    /// Build a record from `data` (section defaults to the current one) and ship it
    fn track(&mut self, event_type: EventType, data: EventData);

    /// Make `section` the active one, reporting time spent in the section left
    fn report_section_change(&mut self, section: Section);

    /// Report dwell time for `section` and restart the dwell clock
    fn report_section_time(&mut self, section: Section);

    fn report_page_load(&mut self) {
        let section = self.current_section();
        self.track(EventType::PageLoad, EventData::new().section(section));
    }

    fn report_click(&mut self, element: &str) {
        let section = self.current_section();
        self.track(
            EventType::Click,
            EventData::new().section(section).element(element),
        );
    }

    fn report_error(&mut self, field: &str) {
        let section = self.current_section();
        self.track(EventType::Error, EventData::new().section(section).field(field));
    }

    fn report_backtrack(&mut self, from: Section, to: Section) {
        self.track(
            EventType::Backtrack,
            EventData::new().section(from).transition(from, to),
        );
    }

    fn report_idle(&mut self, idle_secs: u64) {
        let section = self.current_section();
        self.track(
            EventType::Idle,
            EventData::new().section(section).duration(idle_secs),
        );
    }
}

/// Owns the section clock and stamps records with the injected clock
pub struct Tracker<T: Transport> {
    transport: T,
    clock: Arc<dyn Clock>,
    timer: SectionTimer,
}

impl<T: Transport> Tracker<T> {
    pub fn new(transport: T, clock: Arc<dyn Clock>) -> Self {
        let timer = SectionTimer::new(Section::Personal, clock.now());
        Self {
            transport,
            clock,
            timer,
        }
    }

    pub fn section_clock(&self) -> SectionClock {
        self.timer.clock()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> EventSink for Tracker<T> {
    fn current_section(&self) -> Section {
        self.timer.current_section()
    }

    fn track(&mut self, event_type: EventType, data: EventData) {
        let record = EventRecord::build(event_type, data, self.current_section(), self.clock.now());
        debug!(event = %record.event_type, section = %record.section, "tracking event");
        self.transport.send(record);
    }

    fn report_section_change(&mut self, section: Section) {
        let now = self.clock.now();
        if let Some(spent) = self.timer.set_active_section(section, now) {
            self.track(
                EventType::TimeSpent,
                EventData::new().section(spent.section).duration(spent.secs),
            );
        }
    }

    fn report_section_time(&mut self, section: Section) {
        let spent = self.timer.take_section_time(section, self.clock.now());
        self.track(
            EventType::TimeSpent,
            EventData::new().section(spent.section).duration(spent.secs),
        );
    }
}
