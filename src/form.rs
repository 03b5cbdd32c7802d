use std::collections::BTreeMap;

use crate::section::TOTAL_STEPS;
use crate::validation::{Field, FieldValues, Notification};

pub const NOT_PROVIDED: &str = "Not provided";

/// Read-only recap shown on the review step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub name: String,
    pub dob: String,
    pub address: String,
    pub city: String,
}

impl Summary {
    pub fn from_values(values: &FieldValues) -> Self {
        let or_missing = |s: &str| {
            if s.is_empty() {
                NOT_PROVIDED.to_string()
            } else {
                s.to_string()
            }
        };
        Self {
            name: or_missing(&values.name),
            dob: or_missing(&values.dob),
            address: or_missing(&values.street),
            city: or_missing(&values.city),
        }
    }
}

/// Rendering collaborator driven by the wizard
pub trait FormView {
    fn field_values(&self) -> FieldValues;
    fn clear_errors(&mut self);
    fn set_error(&mut self, field: Field, message: &str);
    fn set_step_visible(&mut self, step: u8, visible: bool);
    fn set_progress_marker(&mut self, step: u8, active: bool);
    fn show_summary(&mut self, summary: Summary);
    fn hide_form(&mut self);
    fn show_success(&mut self);
}

/// Focusable input on a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Text(Field),
    Check(Notification),
    Terms,
}

impl Control {
    /// Element id reported on click events
    pub fn element_id(&self) -> &'static str {
        match self {
            Control::Text(field) => field.as_str(),
            Control::Check(Notification::Email) => "notify-email",
            Control::Check(Notification::Sms) => "notify-sms",
            Control::Check(Notification::Push) => "notify-push",
            Control::Terms => "terms",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Control::Text(Field::Name) => "Full name",
            Control::Text(Field::Dob) => "Date of birth (YYYY-MM-DD)",
            Control::Text(Field::Street) => "Street address",
            Control::Text(Field::City) => "City",
            Control::Text(_) => "",
            Control::Check(n) => n.label(),
            Control::Terms => "I agree to the terms and conditions",
        }
    }
}

pub fn controls_for_step(step: u8) -> &'static [Control] {
    match step {
        1 => &[Control::Text(Field::Name), Control::Text(Field::Dob)],
        2 => &[Control::Text(Field::Street), Control::Text(Field::City)],
        3 => &[
            Control::Check(Notification::Email),
            Control::Check(Notification::Sms),
            Control::Check(Notification::Push),
        ],
        4 => &[Control::Terms],
        _ => &[],
    }
}

/// In-memory view model rendered by the terminal UI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormScreen {
    pub values: FieldValues,
    pub errors: BTreeMap<Field, String>,
    pub steps_visible: [bool; TOTAL_STEPS as usize],
    pub progress: [bool; TOTAL_STEPS as usize],
    pub summary: Option<Summary>,
    pub form_hidden: bool,
    pub success_visible: bool,
    pub focus: usize,
}

impl FormScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible_step(&self) -> Option<u8> {
        self.steps_visible
            .iter()
            .position(|&v| v)
            .map(|idx| idx as u8 + 1)
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn focused_control(&self) -> Option<Control> {
        let step = self.visible_step()?;
        controls_for_step(step).get(self.focus).copied()
    }

    pub fn focus_next(&mut self) {
        let count = self.visible_step().map_or(0, |s| controls_for_step(s).len());
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.visible_step().map_or(0, |s| controls_for_step(s).len());
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.values.name),
            Field::Dob => Some(&mut self.values.dob),
            Field::Street => Some(&mut self.values.street),
            Field::City => Some(&mut self.values.city),
            Field::Notifications | Field::Terms => None,
        }
    }

    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.values.name,
            Field::Dob => &self.values.dob,
            Field::Street => &self.values.street,
            Field::City => &self.values.city,
            Field::Notifications | Field::Terms => "",
        }
    }

    pub fn is_checked(&self, control: Control) -> bool {
        match control {
            Control::Check(n) => self.values.notifications.contains(&n),
            Control::Terms => self.values.terms,
            Control::Text(_) => false,
        }
    }

    /// Type into the focused text input. Returns false if nothing took the char.
    pub fn insert_char(&mut self, c: char) -> bool {
        match self.focused_control() {
            Some(Control::Text(field)) => match self.text_mut(field) {
                Some(text) => {
                    text.push(c);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    pub fn backspace(&mut self) {
        if let Some(Control::Text(field)) = self.focused_control() {
            if let Some(text) = self.text_mut(field) {
                text.pop();
            }
        }
    }

    /// Toggle the focused checkbox, returning the toggled control
    pub fn toggle_focused(&mut self) -> Option<Control> {
        let control = self.focused_control()?;
        match control {
            Control::Check(n) => {
                if !self.values.notifications.remove(&n) {
                    self.values.notifications.insert(n);
                }
            }
            Control::Terms => self.values.terms = !self.values.terms,
            Control::Text(_) => return None,
        }
        Some(control)
    }
}

impl FormView for FormScreen {
    fn field_values(&self) -> FieldValues {
        self.values.clone()
    }

    fn clear_errors(&mut self) {
        self.errors.clear();
    }

    fn set_error(&mut self, field: Field, message: &str) {
        self.errors.insert(field, message.to_string());
    }

    fn set_step_visible(&mut self, step: u8, visible: bool) {
        if let Some(slot) = self.steps_visible.get_mut((step as usize).wrapping_sub(1)) {
            *slot = visible;
        }
        if visible {
            self.focus = 0;
        }
    }

    fn set_progress_marker(&mut self, step: u8, active: bool) {
        if let Some(slot) = self.progress.get_mut((step as usize).wrapping_sub(1)) {
            *slot = active;
        }
    }

    fn show_summary(&mut self, summary: Summary) {
        self.summary = Some(summary);
    }

    fn hide_form(&mut self) {
        self.form_hidden = true;
        self.steps_visible = [false; TOTAL_STEPS as usize];
    }

    fn show_success(&mut self) {
        self.success_visible = true;
    }
}
