use ratatui::Frame;

use crate::form::FormScreen;
use crate::ui::cursor_position;

/// A UI Screen boundary: responsible for rendering one phase of the form
pub trait Screen {
    fn render(&self, form: &FormScreen, f: &mut Frame);
}

/// Active wizard step, with the terminal cursor parked in the focused input
pub struct StepScreen;

impl Screen for StepScreen {
    fn render(&self, form: &FormScreen, f: &mut Frame) {
        let area = f.area();
        f.render_widget(form, area);
        if let Some(pos) = cursor_position(form, area) {
            f.set_cursor_position(pos);
        }
    }
}

/// Shown once the form is submitted
pub struct SuccessScreen;

impl Screen for SuccessScreen {
    fn render(&self, form: &FormScreen, f: &mut Frame) {
        f.render_widget(form, f.area());
    }
}

/// Helper to construct the appropriate screen for the current form state
pub fn current_screen(form: &FormScreen) -> Box<dyn Screen> {
    if form.success_visible {
        Box::new(SuccessScreen)
    } else {
        Box::new(StepScreen)
    }
}
