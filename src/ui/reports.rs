use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::ui::components::{markdown_lines, notice_line, render_loading_indicator, themed_block};
use crate::ui::controller::{DashboardController, InputField};
use crate::ui::layout::rows;
use crate::ui::state::Operation;
use crate::ui::theme::Palette;
use crate::ui::view::View;

/// Latest generated report with generate and email actions
pub struct ReportsView;

impl View for ReportsView {
    fn render(&self, f: &mut Frame, area: Rect, controller: &DashboardController, palette: &Palette) {
        let sections = rows(area, &[Constraint::Min(5), Constraint::Length(3), Constraint::Length(1)]);

        if controller.is_busy(Operation::GenerateReport) {
            render_loading_indicator(f, sections[0], "Generating a new report...", palette);
        } else if let Some(report) = &controller.report {
            let title = format!(
                "Report #{} generated {}",
                report.id,
                report.generated_at.format("%Y-%m-%d %H:%M UTC")
            );
            let body = Paragraph::new(markdown_lines(&report.markdown_report, palette))
                .wrap(Wrap { trim: false })
                .scroll((controller.report_scroll, 0))
                .block(themed_block(title, palette));
            f.render_widget(body, sections[0]);
        } else if controller.is_busy(Operation::LoadReport) {
            render_loading_indicator(f, sections[0], "Loading the latest report...", palette);
        } else {
            let empty = Paragraph::new("No report has been generated yet. Press g to generate one.")
                .style(palette.muted_style())
                .block(themed_block("Report", palette));
            f.render_widget(empty, sections[0]);
        }

        let editing = controller.editing == Some(InputField::Email);
        let email_text = match (controller.email.is_empty(), editing) {
            (_, true) => format!("{}▏", controller.email),
            (true, false) => "press e to enter an address".to_string(),
            (false, false) => controller.email.clone(),
        };
        let email_title = if controller.is_busy(Operation::SendEmail) {
            "Send report to email (sending...)"
        } else {
            "Send report to email"
        };
        let email_style = if editing { palette.key_style() } else { palette.border_style() };
        let email = Paragraph::new(email_text)
            .style(Style::default().fg(palette.text))
            .block(themed_block(email_title, palette).border_style(email_style));
        f.render_widget(email, sections[1]);

        let message = match &controller.notice {
            Some(notice) => notice_line(notice, palette),
            None => Line::from(""),
        };
        f.render_widget(Paragraph::new(message), sections[2]);
    }

    fn title(&self) -> &'static str {
        "Reports"
    }

    fn key_hints(&self, controller: &DashboardController) -> Vec<(&'static str, &'static str)> {
        if controller.editing.is_some() {
            return vec![("Enter", "send"), ("Esc", "stop editing")];
        }
        vec![
            ("g", "generate"),
            ("r", "reload"),
            ("e", "email"),
            ("↑/↓", "scroll"),
            ("Tab", "switch view"),
            ("m", "mode"),
            ("t", "theme"),
            ("q", "quit"),
        ]
    }
}
