pub mod screen;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::form::{controls_for_step, Control, FormScreen, Summary};
use crate::section::{section_for_step, Section, TOTAL_STEPS};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const HELP_TEXT: &str =
    "(tab) next field  (space) toggle  (enter) next/submit  (pgup/ctrl+p) back  (esc)ape";

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn progress_line(screen: &FormScreen) -> Line<'static> {
    let spans = Section::ALL
        .iter()
        .zip(screen.progress.iter())
        .map(|(section, &active)| {
            let style = if active {
                bold().fg(Color::Green)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            Span::styled(format!(" {} {} ", section.step(), section), style)
        })
        .collect::<Vec<_>>();
    let mut line = Vec::with_capacity(spans.len() * 2);
    for (idx, span) in spans.into_iter().enumerate() {
        if idx > 0 {
            line.push(Span::raw("──"));
        }
        line.push(span);
    }
    Line::from(line)
}

fn control_lines(screen: &FormScreen, step: u8) -> Vec<Line<'static>> {
    let focused = screen.focused_control();
    let mut lines = Vec::new();

    for &control in controls_for_step(step) {
        let marker = if focused == Some(control) { "▸ " } else { "  " };
        let label_style = if focused == Some(control) {
            bold().fg(Color::Cyan)
        } else {
            bold()
        };

        match control {
            Control::Text(field) => {
                lines.push(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(control.label(), label_style),
                ]));
                lines.push(Line::from(format!("    [{}]", screen.text(field))));
                if let Some(err) = screen.error(field) {
                    lines.push(Line::from(Span::styled(
                        format!("    {}", err),
                        Style::default().fg(Color::Red),
                    )));
                }
            }
            Control::Check(_) | Control::Terms => {
                let mark = if screen.is_checked(control) { "[x]" } else { "[ ]" };
                lines.push(Line::from(vec![
                    Span::raw(marker),
                    Span::raw(format!("{} ", mark)),
                    Span::styled(control.label(), label_style),
                ]));
            }
        }
    }

    // checkbox groups carry one error slot for the whole group
    let group_field = match step {
        3 => Some(crate::validation::Field::Notifications),
        4 => Some(crate::validation::Field::Terms),
        _ => None,
    };
    if let Some(err) = group_field.and_then(|f| screen.error(f)) {
        lines.push(Line::from(Span::styled(
            format!("    {}", err),
            Style::default().fg(Color::Red),
        )));
    }
    lines
}

fn summary_lines(summary: &Summary, screen: &FormScreen) -> Vec<Line<'static>> {
    let notifications = if screen.values.notifications.is_empty() {
        crate::form::NOT_PROVIDED.to_string()
    } else {
        screen
            .values
            .notifications
            .iter()
            .map(|n| n.label())
            .join(", ")
    };
    [
        ("Name", summary.name.clone()),
        ("Date of birth", summary.dob.clone()),
        ("Address", summary.address.clone()),
        ("City", summary.city.clone()),
        ("Notifications", notifications),
    ]
    .into_iter()
    .map(|(label, value)| {
        Line::from(vec![
            Span::styled(format!("  {:<15}", label), Style::default().add_modifier(Modifier::DIM)),
            Span::raw(value),
        ])
    })
    .collect()
}

impl Widget for &FormScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // progress
                Constraint::Length(1), // padding
                Constraint::Min(1),    // step body
                Constraint::Length(1), // help
            ])
            .split(area);

        Paragraph::new(progress_line(self))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        if self.success_visible {
            Paragraph::new(vec![
                Line::from(Span::styled("Thank you!", bold().fg(Color::Green))),
                Line::from("Your form has been submitted successfully."),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .render(chunks[2], buf);

            Paragraph::new(Span::styled(
                "(q)uit / (esc)ape",
                Style::default().add_modifier(Modifier::ITALIC),
            ))
            .render(chunks[3], buf);
            return;
        }

        let Some(step) = self.visible_step() else {
            return;
        };
        let title = section_for_step(step).map_or("", |s| s.title());

        let mut lines = Vec::new();
        if let (4, Some(summary)) = (step, &self.summary) {
            lines.extend(summary_lines(summary, self));
            lines.push(Line::from(""));
        }
        lines.extend(control_lines(self, step));

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Step {} of {}: {}", step, TOTAL_STEPS, title)),
            )
            .wrap(Wrap { trim: false })
            .render(chunks[2], buf);

        Paragraph::new(Span::styled(
            HELP_TEXT,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }
}

/// Terminal cursor position for the focused text input, if any
pub fn cursor_position(screen: &FormScreen, area: Rect) -> Option<(u16, u16)> {
    let step = screen.visible_step()?;
    let Some(Control::Text(field)) = screen.focused_control() else {
        return None;
    };

    // rows above the focused input's value line inside the body block
    let mut row = 0u16;
    for &control in controls_for_step(step) {
        row += 1; // label
        if control == Control::Text(field) {
            break;
        }
        row += 1; // value
        if let Control::Text(other) = control {
            if screen.error(other).is_some() {
                row += 1;
            }
        }
    }

    // margin + progress + padding + block border
    let y = area.y + VERTICAL_MARGIN + 2 + 1 + row;
    let x = area.x + HORIZONTAL_MARGIN + 1 + 5 + screen.text(field).width() as u16;
    (x < area.right() && y < area.bottom()).then_some((x, y))
}
