use tracing::debug;

use crate::event::{EventData, EventType};
use crate::form::{FormView, Summary};
use crate::section::{section_for_step, Section, TOTAL_STEPS};
use crate::tracker::EventSink;
use crate::validation::{validate, ValidationOutcome};

/// Step position. `current_step` stays within `1..=TOTAL_STEPS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardState {
    current_step: u8,
    submitted: bool,
}

impl WizardState {
    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn section(&self) -> Section {
        section_for_step(self.current_step).unwrap_or(Section::Personal)
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current_step: 1,
            submitted: false,
        }
    }
}

/// What a navigation request did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Advanced { from: Section, to: Section },
    Retreated { from: Section, to: Section },
    Submitted,
    /// Validation failed; the step did not change
    Rejected(ValidationOutcome),
    /// Out of bounds, wrong step, or already submitted
    Ignored,
}

/// Multi-step form state machine.
///
/// Forward moves and submission are gated by validation of the current step;
/// backward moves are always allowed. Every transition reports through the
/// injected [`EventSink`] and redraws through the [`FormView`].
pub struct Wizard<S: EventSink, V: FormView> {
    state: WizardState,
    sink: S,
    view: V,
}

impl<S: EventSink, V: FormView> Wizard<S, V> {
    pub fn new(sink: S, view: V) -> Self {
        let mut wizard = Self {
            state: WizardState::default(),
            sink,
            view,
        };
        wizard.view.set_step_visible(1, true);
        wizard.update_progress();
        wizard.sink.report_section_change(wizard.state.section());
        wizard
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn current_step(&self) -> u8 {
        self.state.current_step
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn next_step(&mut self) -> Transition {
        if self.state.submitted {
            return Transition::Ignored;
        }

        let outcome = self.validate_current_step();
        if !outcome.is_valid() {
            return Transition::Rejected(outcome);
        }
        if self.state.current_step >= TOTAL_STEPS {
            return Transition::Ignored;
        }

        let from = self.state.section();
        self.show_step(self.state.current_step + 1);
        let to = self.state.section();

        if self.state.current_step == TOTAL_STEPS {
            let summary = Summary::from_values(&self.view.field_values());
            self.view.show_summary(summary);
        }

        debug!(%from, %to, "advanced");
        Transition::Advanced { from, to }
    }

    pub fn prev_step(&mut self) -> Transition {
        if self.state.submitted || self.state.current_step <= 1 {
            return Transition::Ignored;
        }

        let from = self.state.section();
        let to = section_for_step(self.state.current_step - 1).unwrap_or(Section::Personal);
        self.sink.report_backtrack(from, to);
        self.show_step(self.state.current_step - 1);

        debug!(%from, %to, "backtracked");
        Transition::Retreated { from, to }
    }

    pub fn submit_form(&mut self) -> Transition {
        if self.state.submitted || self.state.current_step != TOTAL_STEPS {
            return Transition::Ignored;
        }

        let outcome = self.validate_current_step();
        if !outcome.is_valid() {
            return Transition::Rejected(outcome);
        }

        self.sink
            .track(EventType::Submit, EventData::new().section(Section::Review));
        self.view.hide_form();
        self.sink.report_section_time(Section::Review);
        self.view.show_success();
        self.state.submitted = true;

        debug!("form submitted");
        Transition::Submitted
    }

    fn validate_current_step(&mut self) -> ValidationOutcome {
        self.view.clear_errors();
        let outcome = validate(self.state.current_step, &self.view.field_values());
        for (field, error) in &outcome.errors {
            self.view.set_error(*field, &error.to_string());
            self.sink.report_error(field.as_str());
        }
        outcome
    }

    fn show_step(&mut self, step: u8) {
        self.view.set_step_visible(self.state.current_step, false);
        self.state.current_step = step;
        self.view.set_step_visible(step, true);
        self.update_progress();
        self.sink.report_section_change(self.state.section());
    }

    fn update_progress(&mut self) {
        for step in 1..=TOTAL_STEPS {
            self.view
                .set_progress_marker(step, step <= self.state.current_step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::event::EventRecord;
    use crate::form::{FormScreen, Summary};
    use crate::tracker::Tracker;
    use crate::transport::{RecordingTransport, Transport};
    use crate::validation::{Field, FieldValues, Notification};
    use assert_matches::assert_matches;
    use std::sync::{Arc, Mutex};

    type TestWizard = Wizard<Tracker<RecordingTransport>, FormScreen>;

    fn wizard() -> (TestWizard, RecordingTransport, ManualClock) {
        let clock = ManualClock::default();
        let transport = RecordingTransport::new();
        let tracker = Tracker::new(transport.clone(), Arc::new(clock.clone()));
        (Wizard::new(tracker, FormScreen::new()), transport, clock)
    }

    fn fill_all(wizard: &mut TestWizard) {
        let values = &mut wizard.view_mut().values;
        values.name = "Ada".into();
        values.dob = "1990-01-01".into();
        values.street = "1 Analytical Way".into();
        values.city = "London".into();
        values.notifications.insert(Notification::Sms);
        values.terms = true;
    }

    fn types(records: &[EventRecord]) -> Vec<EventType> {
        records.iter().map(|r| r.event_type).collect()
    }

    #[test]
    fn test_initial_state() {
        let (wizard, transport, _) = wizard();
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(wizard.view().visible_step(), Some(1));
        assert_eq!(wizard.view().progress, [true, false, false, false]);
        assert_eq!(wizard.sink().current_section(), Section::Personal);
        assert!(transport.records().is_empty());
    }

    #[test]
    fn test_advance_blocked_per_missing_field() {
        let (mut wizard, transport, _) = wizard();
        let result = wizard.next_step();

        assert_matches!(result, Transition::Rejected(ref o) if o.errors.len() == 2);
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(wizard.view().error(Field::Name), Some("Name is required"));
        assert_eq!(
            wizard.view().error(Field::Dob),
            Some("Date of birth is required")
        );

        let records = transport.records();
        assert_eq!(types(&records), vec![EventType::Error, EventType::Error]);
        assert_eq!(records[0].field.as_deref(), Some("name"));
        assert_eq!(records[1].field.as_deref(), Some("dob"));
        assert!(records.iter().all(|r| r.section == Section::Personal));
    }

    #[test]
    fn test_errors_cleared_before_revalidation() {
        let (mut wizard, _, _) = wizard();
        wizard.next_step();
        wizard.view_mut().values.name = "Ada".into();
        wizard.next_step();

        assert_eq!(wizard.view().error(Field::Name), None);
        assert!(wizard.view().error(Field::Dob).is_some());
    }

    #[test]
    fn test_advance_from_personal() {
        let (mut wizard, transport, clock) = wizard();
        wizard.view_mut().values.name = "Ada".into();
        wizard.view_mut().values.dob = "1990-01-01".into();
        clock.advance_ms(3_000);

        assert_eq!(
            wizard.next_step(),
            Transition::Advanced {
                from: Section::Personal,
                to: Section::Address
            }
        );
        assert_eq!(wizard.current_step(), 2);
        assert_eq!(wizard.view().visible_step(), Some(2));
        assert!(wizard.view().progress[1]);

        let records = transport.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event_type, EventType::TimeSpent);
        assert_eq!(records[0].section, Section::Personal);
        assert_eq!(records[0].duration, Some(3));
    }

    #[test]
    fn test_retreat_skips_validation() {
        let (mut wizard, transport, _) = wizard();
        fill_all(&mut wizard);
        wizard.next_step();
        wizard.next_step();
        transport.take();

        wizard.view_mut().values.notifications.clear();
        assert_eq!(
            wizard.prev_step(),
            Transition::Retreated {
                from: Section::Preferences,
                to: Section::Address
            }
        );
        assert_eq!(wizard.current_step(), 2);
        assert!(wizard.view().errors.is_empty());

        let records = transport.records();
        assert_eq!(
            types(&records),
            vec![EventType::Backtrack, EventType::TimeSpent]
        );
        assert_eq!(records[0].from_section, Some(Section::Preferences));
        assert_eq!(records[0].to_section, Some(Section::Address));
        assert_eq!(records[1].section, Section::Preferences);
    }

    #[test]
    fn test_retreat_from_first_step_is_noop() {
        let (mut wizard, transport, _) = wizard();
        assert_eq!(wizard.prev_step(), Transition::Ignored);
        assert_eq!(wizard.current_step(), 1);
        assert!(transport.records().is_empty());
    }

    #[test]
    fn test_advance_bounded_at_last_step() {
        let (mut wizard, _, _) = wizard();
        fill_all(&mut wizard);
        for _ in 0..3 {
            assert_matches!(wizard.next_step(), Transition::Advanced { .. });
        }
        assert_eq!(wizard.next_step(), Transition::Ignored);
        assert_eq!(wizard.current_step(), TOTAL_STEPS);
    }

    #[test]
    fn test_review_summary_populated() {
        let (mut wizard, _, _) = wizard();
        fill_all(&mut wizard);
        wizard.view_mut().values.city.clear();
        wizard.next_step();
        wizard.view_mut().values.city = "London".into();
        wizard.next_step();
        assert!(wizard.view().summary.is_none());
        wizard.next_step();

        let summary = wizard.view().summary.clone().unwrap();
        assert_eq!(summary.name, "Ada");
        assert_eq!(summary.address, "1 Analytical Way");
        assert_eq!(summary.city, "London");
    }

    #[test]
    fn test_submit_only_on_review_step() {
        let (mut wizard, transport, _) = wizard();
        fill_all(&mut wizard);
        assert_eq!(wizard.submit_form(), Transition::Ignored);
        assert!(transport.records().is_empty());
    }

    #[test]
    fn test_submit_without_terms_stays_on_review() {
        let (mut wizard, transport, _) = wizard();
        fill_all(&mut wizard);
        wizard.view_mut().values.terms = false;
        for _ in 0..3 {
            wizard.next_step();
        }
        transport.take();

        assert_matches!(wizard.submit_form(), Transition::Rejected(_));
        assert_eq!(wizard.current_step(), 4);
        assert!(!wizard.view().success_visible);
        assert_eq!(
            wizard.view().error(Field::Terms),
            Some("You must agree to the terms")
        );
        let records = transport.records();
        assert_eq!(types(&records), vec![EventType::Error]);
        assert_eq!(records[0].field.as_deref(), Some("terms"));
    }

    #[test]
    fn test_submit_is_terminal() {
        let (mut wizard, transport, clock) = wizard();
        fill_all(&mut wizard);
        for _ in 0..3 {
            wizard.next_step();
        }
        transport.take();
        clock.advance_ms(9_000);

        assert_eq!(wizard.submit_form(), Transition::Submitted);
        let records = transport.take();
        assert_eq!(types(&records), vec![EventType::Submit, EventType::TimeSpent]);
        assert_eq!(records[0].section, Section::Review);
        assert_eq!(records[1].section, Section::Review);
        assert_eq!(records[1].duration, Some(9));
        assert!(wizard.view().success_visible);
        assert!(wizard.view().form_hidden);

        assert_eq!(wizard.submit_form(), Transition::Ignored);
        assert_eq!(wizard.prev_step(), Transition::Ignored);
        assert_eq!(wizard.next_step(), Transition::Ignored);
        assert!(transport.records().is_empty());
    }

    type Log = Arc<Mutex<Vec<String>>>;

    struct LoggingTransport(Log);

    impl Transport for LoggingTransport {
        fn send(&self, record: EventRecord) {
            self.0.lock().unwrap().push(format!("{}", record.event_type));
        }
    }

    /// FormScreen that also logs the calls which change what is on screen
    struct LoggingView {
        inner: FormScreen,
        log: Log,
    }

    impl FormView for LoggingView {
        fn field_values(&self) -> FieldValues {
            self.inner.field_values()
        }
        fn clear_errors(&mut self) {
            self.inner.clear_errors();
        }
        fn set_error(&mut self, field: Field, message: &str) {
            self.inner.set_error(field, message);
        }
        fn set_step_visible(&mut self, step: u8, visible: bool) {
            self.inner.set_step_visible(step, visible);
        }
        fn set_progress_marker(&mut self, step: u8, active: bool) {
            self.inner.set_progress_marker(step, active);
        }
        fn show_summary(&mut self, summary: Summary) {
            self.inner.show_summary(summary);
        }
        fn hide_form(&mut self) {
            self.log.lock().unwrap().push("hide_form".into());
            self.inner.hide_form();
        }
        fn show_success(&mut self) {
            self.log.lock().unwrap().push("show_success".into());
            self.inner.show_success();
        }
    }

    #[test]
    fn test_submit_order_interleaves_events_and_view() {
        let log: Log = Arc::default();
        let clock = ManualClock::default();
        let tracker = Tracker::new(LoggingTransport(log.clone()), Arc::new(clock.clone()));
        let view = LoggingView {
            inner: FormScreen::new(),
            log: log.clone(),
        };
        let mut wizard = Wizard::new(tracker, view);
        let values = &mut wizard.view_mut().inner.values;
        values.name = "Ada".into();
        values.dob = "1990-01-01".into();
        values.street = "1 Analytical Way".into();
        values.city = "London".into();
        values.notifications.insert(Notification::Push);
        values.terms = true;
        for _ in 0..3 {
            wizard.next_step();
        }
        log.lock().unwrap().clear();

        assert_eq!(wizard.submit_form(), Transition::Submitted);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["submit", "hide_form", "time_spent", "show_success"]
        );
    }
}
