/// Shared widgets and formatting helpers for the dashboard views
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::fmt::Display;

use crate::analysis::PriorityBand;
use crate::ui::controller::{Notice, NoticeKind};
use crate::ui::theme::Palette;

pub const PROCESSING: &str = "Processing...";
pub const UNKNOWN_NUMBER: &str = "?";

/// Text field or the processing placeholder
pub fn placeholder_text(value: Option<&str>) -> &str {
    value.unwrap_or(PROCESSING)
}

/// Numeric field or `?`
pub fn placeholder_number<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN_NUMBER.to_string())
}

pub fn format_priority(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| UNKNOWN_NUMBER.to_string())
}

/// Cut `text` to at most `max_chars` characters, ending with an ellipsis
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/// Priority value colored by its band
pub fn styled_priority_span(value: Option<f64>, palette: &Palette) -> Span<'static> {
    let band = PriorityBand::classify(value);
    Span::styled(
        format_priority(value),
        Style::default().fg(palette.band_color(band)).add_modifier(Modifier::BOLD),
    )
}

/// Render a Markdown report as styled lines.
///
/// Handles headings, bullets, numbered items and `**bold**` runs; anything else
/// is shown verbatim.
pub fn markdown_lines(markdown: &str, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for raw in markdown.lines() {
        let trimmed = raw.trim_start();
        if let Some(rest) = trimmed.strip_prefix("### ") {
            lines.push(Line::from(Span::styled(
                rest.to_string(),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            )));
        } else if let Some(rest) = trimmed.strip_prefix("## ") {
            lines.push(Line::from(Span::styled(rest.to_string(), palette.title_style())));
        } else if let Some(rest) = trimmed.strip_prefix("# ") {
            lines.push(Line::from(Span::styled(
                rest.to_uppercase(),
                palette.title_style().add_modifier(Modifier::UNDERLINED),
            )));
        } else if let Some(rest) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            let indent = " ".repeat(raw.len() - trimmed.len());
            let mut spans = vec![Span::raw(format!("{}• ", indent))];
            spans.extend(inline_spans(rest, palette));
            lines.push(Line::from(spans));
        } else {
            lines.push(Line::from(inline_spans(raw, palette)));
        }
    }
    lines
}

fn inline_spans(text: &str, palette: &Palette) -> Vec<Span<'static>> {
    let bold = Style::default().fg(palette.text).add_modifier(Modifier::BOLD);
    text.split("**")
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| {
            if i % 2 == 1 {
                Span::styled(part.to_string(), bold)
            } else {
                Span::styled(part.to_string(), Style::default().fg(palette.text))
            }
        })
        .collect()
}

/// `key: action` hints for the bottom of a view
pub fn key_hint_line(hints: &[(&'static str, &'static str)], palette: &Palette) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", palette.muted_style()));
        }
        spans.push(Span::styled(*key, palette.key_style()));
        spans.push(Span::styled(format!(" {}", action), palette.muted_style()));
    }
    Line::from(spans)
}

pub fn notice_line(notice: &Notice, palette: &Palette) -> Line<'static> {
    let color = match notice.kind {
        NoticeKind::Info => palette.accent,
        NoticeKind::Success => palette.success,
        NoticeKind::Error => palette.error,
    };
    Line::from(Span::styled(notice.text.clone(), Style::default().fg(color)))
}

pub fn themed_block<'a>(title: impl Into<Line<'a>>, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .title(title)
        .title_style(palette.title_style())
        .style(palette.base())
}

/// Render a single statistic with its label
pub fn render_stat_card(f: &mut Frame, area: Rect, label: &str, value: &str, palette: &Palette) {
    let card = Paragraph::new(vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label.to_string(), palette.muted_style())),
    ])
    .alignment(Alignment::Center)
    .block(themed_block("", palette));

    f.render_widget(card, area);
}

/// Render a loading indicator
pub fn render_loading_indicator(f: &mut Frame, area: Rect, message: &str, palette: &Palette) {
    let loading = Paragraph::new(message.to_string())
        .block(themed_block("Loading", palette))
        .style(Style::default().fg(ratatui::style::Color::Yellow));

    f.render_widget(loading, area);
}

/// Render error message
pub fn render_error(f: &mut Frame, area: Rect, error: &str, palette: &Palette) {
    let error_paragraph = Paragraph::new(error.to_string())
        .block(themed_block("Error", palette))
        .style(Style::default().fg(palette.error))
        .wrap(Wrap { trim: true });

    f.render_widget(error_paragraph, area);
}
