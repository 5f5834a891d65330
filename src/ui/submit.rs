use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::FeedbackSource;
use crate::ui::components::{notice_line, themed_block};
use crate::ui::controller::{DashboardController, FormField, InputField, Mode};
use crate::ui::layout::rows;
use crate::ui::state::{LogLevel, Operation};
use crate::ui::theme::Palette;
use crate::ui::view::View;

const CURSOR: &str = "▏";

/// Single entry form plus CSV bulk upload in admin mode
pub struct SubmitView;

impl View for SubmitView {
    fn render(&self, f: &mut Frame, area: Rect, controller: &DashboardController, palette: &Palette) {
        let admin = controller.mode == Mode::Admin;
        let mut constraints = vec![Constraint::Min(6), Constraint::Length(3)];
        if admin {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Length(2));
        constraints.push(Constraint::Length(7));
        let sections = rows(area, &constraints);

        let form = &controller.form;
        let text_editing = controller.editing == Some(InputField::FeedbackText);
        let submitting = controller.is_busy(Operation::SubmitFeedback);
        let text_title = if submitting { "Feedback (submitting...)" } else { "Feedback" };
        let text = Paragraph::new(input_value(&form.text, text_editing, "Describe the issue or request..."))
            .wrap(Wrap { trim: false })
            .style(palette.base())
            .block(field_block(text_title, form.focus == FormField::Text, palette));
        f.render_widget(text, sections[0]);

        let source = Paragraph::new(source_line(form.source, palette))
            .block(field_block("Source", form.focus == FormField::Source, palette));
        f.render_widget(source, sections[1]);

        let mut next = 2;
        if admin {
            let csv_editing = controller.editing == Some(InputField::CsvPath);
            let csv_title = if controller.is_busy(Operation::UploadCsv) {
                "CSV file, columns text,source (uploading...)"
            } else {
                "CSV file, columns text,source"
            };
            let csv = Paragraph::new(input_value(&form.csv_path, csv_editing, "path/to/feedback.csv"))
                .style(palette.base())
                .block(field_block(csv_title, form.focus == FormField::CsvPath, palette));
            f.render_widget(csv, sections[next]);
            next += 1;
        }

        let message = match &controller.notice {
            Some(notice) => notice_line(notice, palette),
            None => Line::from(""),
        };
        f.render_widget(Paragraph::new(message), sections[next]);

        render_activity(f, sections[next + 1], controller, palette);
    }

    fn title(&self) -> &'static str {
        "Upload Feedback"
    }

    fn key_hints(&self, controller: &DashboardController) -> Vec<(&'static str, &'static str)> {
        if controller.editing.is_some() {
            return vec![("Enter", "done"), ("Esc", "stop editing")];
        }
        let mut hints = vec![("↑/↓", "field"), ("Enter", "edit"), ("←/→", "source"), ("s", "submit")];
        if controller.mode == Mode::Admin {
            hints.push(("u", "upload CSV"));
            hints.push(("Tab", "switch view"));
        }
        hints.extend([("m", "mode"), ("t", "theme"), ("q", "quit")]);
        hints
    }
}

fn render_activity(f: &mut Frame, area: Rect, controller: &DashboardController, palette: &Palette) {
    let lines: Vec<Line> = controller
        .tracker
        .recent_logs(5)
        .iter()
        .map(|log| {
            let color = match log.level {
                LogLevel::Info => palette.muted,
                LogLevel::Success => palette.success,
                LogLevel::Warning => ratatui::style::Color::Yellow,
                LogLevel::Error => palette.error,
            };
            Line::from(vec![
                Span::styled(format!("[{}] ", log.timestamp.format("%H:%M:%S")), palette.muted_style()),
                Span::styled(log.message.clone(), Style::default().fg(color)),
            ])
        })
        .collect();

    let activity = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(themed_block("Activity", palette));
    f.render_widget(activity, area);
}

fn field_block<'a>(title: &'a str, focused: bool, palette: &Palette) -> Block<'a> {
    let border = if focused {
        palette.key_style()
    } else {
        palette.border_style()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
        .title_style(palette.title_style())
        .style(palette.base())
}

/// Field content with a cursor while editing, or a hint when empty
fn input_value(value: &str, editing: bool, hint: &'static str) -> String {
    match (value.is_empty(), editing) {
        (_, true) => format!("{}{}", value, CURSOR),
        (true, false) => hint.to_string(),
        (false, false) => value.to_string(),
    }
}

fn source_line(selected: FeedbackSource, palette: &Palette) -> Line<'static> {
    let mut spans = vec![Span::styled("◀ ", palette.muted_style())];
    for (i, source) in FeedbackSource::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if *source == selected {
            palette.highlight_style()
        } else {
            Style::default().fg(palette.text)
        };
        spans.push(Span::styled(source.label(), style));
    }
    spans.push(Span::styled(" ▶", palette.muted_style()));
    Line::from(spans)
}
