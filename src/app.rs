use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::clock::Clock;
use crate::form::{Control, FormScreen};
use crate::idle::{ActivitySignal, IdleDetector};
use crate::runtime::WizardEvent;
use crate::section::TOTAL_STEPS;
use crate::tracker::EventSink;
use crate::wizard::{Transition, Wizard};

pub const NEXT_BUTTON: &str = "next-btn";
pub const PREV_BUTTON: &str = "prev-btn";
pub const SUBMIT_BUTTON: &str = "submit-btn";

/// Terminal host: routes input to the wizard and drives idle detection
pub struct App<S: EventSink> {
    pub wizard: Wizard<S, FormScreen>,
    pub idle: IdleDetector,
    pub last_transition: Option<Transition>,
    clock: Arc<dyn Clock>,
    should_quit: bool,
}

impl<S: EventSink> App<S> {
    pub fn new(sink: S, clock: Arc<dyn Clock>, idle_threshold_ms: u64) -> Self {
        let mut wizard = Wizard::new(sink, FormScreen::new());
        wizard.sink_mut().report_page_load();
        let idle = IdleDetector::new(idle_threshold_ms, clock.now());
        Self {
            wizard,
            idle,
            last_transition: None,
            clock,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn screen(&self) -> &FormScreen {
        self.wizard.view()
    }

    pub fn handle_event(&mut self, event: WizardEvent) {
        if let Some(signal) = event
            .as_terminal_event()
            .as_ref()
            .and_then(ActivitySignal::from_terminal_event)
        {
            self.idle.record_activity(signal, self.clock.now());
        }

        match event {
            WizardEvent::Tick => self.on_tick(),
            WizardEvent::Key(key) => self.on_key(key),
            WizardEvent::InputClosed => {
                tracing::info!("input closed, leaving");
                self.should_quit = true;
            }
            WizardEvent::Mouse(_) | WizardEvent::Resize => {}
        }
    }

    pub fn on_tick(&mut self) {
        if let Some(idle_secs) = self.idle.poll(self.clock.now()) {
            self.wizard.sink_mut().report_idle(idle_secs);
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            _ if self.wizard.state().is_submitted() => {
                if key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            KeyCode::Enter => self.press_forward(),
            KeyCode::PageUp => self.press_back(),
            KeyCode::Char('p') if ctrl => self.press_back(),
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::Backspace => self.wizard.view_mut().backspace(),
            KeyCode::Char(' ') if self.focus_is_checkbox() => {
                if let Some(control) = self.wizard.view_mut().toggle_focused() {
                    self.wizard.sink_mut().report_click(control.element_id());
                }
            }
            KeyCode::Char(c) if !ctrl => {
                self.wizard.view_mut().insert_char(c);
            }
            _ => {}
        }
    }

    /// Entering a text input counts as a click on it
    fn move_focus(&mut self, forward: bool) {
        let view = self.wizard.view_mut();
        if forward {
            view.focus_next();
        } else {
            view.focus_prev();
        }
        if let Some(control @ Control::Text(_)) = self.wizard.view().focused_control() {
            self.wizard.sink_mut().report_click(control.element_id());
        }
    }

    fn focus_is_checkbox(&self) -> bool {
        matches!(
            self.wizard.view().focused_control(),
            Some(Control::Check(_)) | Some(Control::Terms)
        )
    }

    fn press_forward(&mut self) {
        let transition = if self.wizard.current_step() == TOTAL_STEPS {
            self.wizard.sink_mut().report_click(SUBMIT_BUTTON);
            self.wizard.submit_form()
        } else {
            self.wizard.sink_mut().report_click(NEXT_BUTTON);
            self.wizard.next_step()
        };
        self.last_transition = Some(transition);
    }

    fn press_back(&mut self) {
        // the back button only exists past the first step
        if self.wizard.current_step() > 1 {
            self.wizard.sink_mut().report_click(PREV_BUTTON);
            self.last_transition = Some(self.wizard.prev_step());
        }
    }
}
