use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::analysis::{scatter_series, theme_aggregate, PriorityBand, SortKey};
use crate::models::FeedbackRecord;
use crate::ui::components::{
    format_priority, markdown_lines, notice_line, placeholder_number, placeholder_text, render_error, render_loading_indicator,
    render_stat_card, styled_priority_span, themed_block, truncate,
};
use crate::ui::controller::DashboardController;
use crate::ui::layout::{columns, rows};
use crate::ui::state::Operation;
use crate::ui::theme::Palette;
use crate::ui::view::View;

/// Number keys that sort the table
pub const SORT_SHORTCUTS: [(char, SortKey); 6] = [
    ('1', SortKey::Sentiment),
    ('2', SortKey::Theme),
    ('3', SortKey::Urgency),
    ('4', SortKey::Impact),
    ('5', SortKey::PriorityScore),
    ('6', SortKey::CreatedAt),
];

const TABLE_COLUMNS: [(&str, Option<SortKey>); 9] = [
    ("ID", Some(SortKey::Id)),
    ("Feedback", Some(SortKey::Text)),
    ("Source", Some(SortKey::Source)),
    ("Sentiment", Some(SortKey::Sentiment)),
    ("Theme", Some(SortKey::Theme)),
    ("Urg", Some(SortKey::Urgency)),
    ("Imp", Some(SortKey::Impact)),
    ("Priority", Some(SortKey::PriorityScore)),
    ("Created", Some(SortKey::CreatedAt)),
];

/// Stats, charts and the prioritized feedback table
pub struct DashboardView;

impl View for DashboardView {
    fn render(&self, f: &mut Frame, area: Rect, controller: &DashboardController, palette: &Palette) {
        if !controller.feedback_loaded && controller.is_busy(Operation::LoadFeedback) {
            render_loading_indicator(f, area, "Loading feedback...", palette);
            return;
        }
        if let (false, Some(e)) = (controller.feedback_loaded, &controller.load_error) {
            render_error(f, area, &format!("Failed to load feedback: {}\n\nPress r to retry.", e), palette);
            return;
        }

        let sections = rows(
            area,
            &[
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Length(13),
                Constraint::Min(6),
            ],
        );

        render_stats(f, sections[0], controller, palette);
        render_message_row(f, sections[1], controller, palette);

        let charts = columns(sections[2], &[Constraint::Percentage(50), Constraint::Percentage(50)]);
        render_theme_chart(f, charts[0], &controller.feedback, palette);
        render_scatter_chart(f, charts[1], &controller.feedback, palette);

        let bottom = columns(sections[3], &[Constraint::Percentage(65), Constraint::Percentage(35)]);
        render_table(f, bottom[0], controller, palette);
        render_side_panel(f, bottom[1], controller, palette);
    }

    fn title(&self) -> &'static str {
        "Dashboard"
    }

    fn key_hints(&self, controller: &DashboardController) -> Vec<(&'static str, &'static str)> {
        if controller.pending_delete.is_some() {
            return vec![("y", "confirm delete"), ("n", "cancel")];
        }
        vec![
            ("↑/↓", "select"),
            ("1-6", "sort"),
            ("0", "reset sort"),
            ("r", "refresh"),
            ("d", "delete"),
            ("x", "export"),
            ("Tab", "switch view"),
            ("m", "mode"),
            ("t", "theme"),
            ("q", "quit"),
        ]
    }
}

fn render_stats(f: &mut Frame, area: Rect, controller: &DashboardController, palette: &Palette) {
    let stats = controller.stats();
    let cards = columns(
        area,
        &[
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ],
    );
    render_stat_card(f, cards[0], "Total Feedback", &stats.total.to_string(), palette);
    render_stat_card(f, cards[1], "Avg Urgency", &stats.display_avg_urgency(), palette);
    render_stat_card(f, cards[2], "Avg Impact", &stats.display_avg_impact(), palette);
}

fn render_message_row(f: &mut Frame, area: Rect, controller: &DashboardController, palette: &Palette) {
    let line = if let Some(id) = controller.pending_delete {
        Line::from(vec![
            Span::styled(
                format!(" Delete feedback {}? ", id),
                Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
            ),
            Span::styled("(y/n)", palette.key_style()),
        ])
    } else if let Some(notice) = &controller.notice {
        notice_line(notice, palette)
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_theme_chart(f: &mut Frame, area: Rect, records: &[FeedbackRecord], palette: &Palette) {
    let buckets = theme_aggregate(records);
    let bars: Vec<Bar> = buckets
        .iter()
        .map(|bucket| {
            let band = PriorityBand::classify(Some(bucket.avg_priority));
            Bar::default()
                .value(bucket.count as u64)
                .label(Line::from(truncate(bucket.display_theme(), 10)))
                .text_value(format!("{} ({:.1})", bucket.count, bucket.avg_priority))
                .style(Style::default().fg(palette.band_color(band)))
        })
        .collect();

    let chart = BarChart::default()
        .block(themed_block("Themes (count, avg priority)", palette))
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .value_style(Style::default().fg(palette.text).add_modifier(Modifier::BOLD))
        .label_style(palette.muted_style());

    f.render_widget(chart, area);
}

fn render_scatter_chart(f: &mut Frame, area: Rect, records: &[FeedbackRecord], palette: &Palette) {
    let bands = [
        PriorityBand::High,
        PriorityBand::Medium,
        PriorityBand::Low,
        PriorityBand::Unscored,
    ];
    let mut series: Vec<Vec<(f64, f64)>> = vec![Vec::new(); bands.len()];
    for point in scatter_series(records) {
        if let Some(idx) = bands.iter().position(|b| *b == point.band()) {
            series[idx].push((point.urgency as f64, point.impact as f64));
        }
    }

    let datasets: Vec<Dataset> = bands
        .iter()
        .zip(series.iter())
        .filter(|(_, points)| !points.is_empty())
        .map(|(band, points)| {
            Dataset::default()
                .name(band.label())
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(palette.band_color(*band)))
                .data(points)
        })
        .collect();

    let axis_labels = || vec![Span::raw("0"), Span::raw("5"), Span::raw("10")];
    let chart = Chart::new(datasets)
        .block(themed_block("Urgency vs Impact", palette))
        .x_axis(
            Axis::default()
                .title("Urgency")
                .style(palette.muted_style())
                .bounds([0.0, 10.5])
                .labels(axis_labels()),
        )
        .y_axis(
            Axis::default()
                .title("Impact")
                .style(palette.muted_style())
                .bounds([0.0, 10.5])
                .labels(axis_labels()),
        );

    f.render_widget(chart, area);
}

fn render_table(f: &mut Frame, area: Rect, controller: &DashboardController, palette: &Palette) {
    let view = controller.sorted_feedback();
    if view.is_empty() {
        let empty = Paragraph::new("No feedback yet. Submit some from the Upload Feedback tab.")
            .style(palette.muted_style())
            .block(themed_block("Feedback", palette));
        f.render_widget(empty, area);
        return;
    }

    let (active_key, direction) = controller.sort.effective();
    let header = Row::new(TABLE_COLUMNS.iter().map(|(label, key)| {
        let text = match key {
            Some(k) if *k == active_key => format!("{} {}", label, direction.indicator()),
            _ => label.to_string(),
        };
        Cell::from(text)
    }))
    .style(palette.title_style());

    let table_rows: Vec<Row> = view
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(record.id.to_string()),
                Cell::from(truncate(&record.text, 40)),
                Cell::from(record.source.clone()),
                Cell::from(Span::styled(
                    record
                        .sentiment
                        .map(|s| s.as_str().to_string())
                        .unwrap_or_else(|| placeholder_text(None).to_string()),
                    Style::default().fg(palette.sentiment_color(record.sentiment)),
                )),
                Cell::from(placeholder_text(record.theme.as_deref()).to_string()),
                Cell::from(placeholder_number(record.urgency)),
                Cell::from(placeholder_number(record.impact)),
                Cell::from(styled_priority_span(record.priority_score, palette)),
                Cell::from(record.created_at.format("%m-%d %H:%M").to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(14),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(10),
        Constraint::Length(11),
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(themed_block(format!("Feedback ({})", view.len()), palette))
        .highlight_style(palette.highlight_style())
        .highlight_symbol("→ ");

    let mut state = TableState::default().with_selected(Some(controller.selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_side_panel(f: &mut Frame, area: Rect, controller: &DashboardController, palette: &Palette) {
    let panels = match &controller.report {
        Some(_) => rows(area, &[Constraint::Percentage(50), Constraint::Percentage(50)]),
        None => vec![area],
    };

    render_detail(f, panels[0], controller.selected_record(), palette);

    if let (Some(report), Some(report_area)) = (&controller.report, panels.get(1)) {
        let preview = Paragraph::new(markdown_lines(&report.markdown_report, palette))
            .wrap(Wrap { trim: false })
            .block(themed_block(
                format!("Latest Report ({})", report.generated_at.format("%Y-%m-%d %H:%M")),
                palette,
            ));
        f.render_widget(preview, *report_area);
    }
}

fn render_detail(f: &mut Frame, area: Rect, record: Option<&FeedbackRecord>, palette: &Palette) {
    let Some(record) = record else {
        f.render_widget(Paragraph::new("").block(themed_block("Details", palette)), area);
        return;
    };

    let label = |text: &'static str| Span::styled(text, palette.key_style());
    let lines = vec![
        Line::from(vec![label("Feedback: "), Span::raw(record.text.clone())]),
        Line::from(""),
        Line::from(vec![
            label("Summary: "),
            Span::raw(placeholder_text(record.summary.as_deref()).to_string()),
        ]),
        Line::from(vec![
            label("Justification: "),
            Span::raw(placeholder_text(record.justification.as_deref()).to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            label("Priority: "),
            Span::raw(format_priority(record.priority_score)),
            Span::styled(
                format!("  {}", PriorityBand::classify(record.priority_score).label()),
                palette.muted_style(),
            ),
        ]),
        Line::from(vec![
            label("Source: "),
            Span::raw(record.source.clone()),
            label("  Received: "),
            Span::raw(record.created_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        ]),
    ];

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(themed_block(format!("Feedback #{}", record.id), palette));
    f.render_widget(detail, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockFeedbackGateway, MockReportGateway};
    use chrono::{TimeZone, Utc};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn record(id: i64, theme: Option<&str>, priority: Option<f64>) -> FeedbackRecord {
        FeedbackRecord {
            id,
            text: format!("Feedback number {}", id),
            source: "web".to_string(),
            sentiment: None,
            theme: theme.map(str::to_string),
            summary: None,
            justification: None,
            urgency: priority.map(|_| 7),
            impact: priority.map(|_| 6),
            priority_score: priority,
            created_at: Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(),
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn draw(controller: &DashboardController) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        let palette = Palette::default();
        terminal
            .draw(|f| DashboardView.render(f, f.area(), controller, &palette))
            .unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_renders_placeholders_and_stats() {
        let mut controller =
            DashboardController::new(Arc::new(MockFeedbackGateway::new()), Arc::new(MockReportGateway::new()), 0);
        controller.feedback = vec![record(1, Some("Bug Report"), Some(8.5)), record(2, None, None)];
        controller.feedback_loaded = true;

        let text = draw(&controller);
        assert!(text.contains("Total Feedback"));
        assert!(text.contains("Processing..."));
        assert!(text.contains("Priority ▼"));
        assert!(text.contains("Bug Report"));
    }

    #[test]
    fn test_renders_delete_prompt() {
        let mut controller =
            DashboardController::new(Arc::new(MockFeedbackGateway::new()), Arc::new(MockReportGateway::new()), 0);
        controller.feedback = vec![record(4, Some("UI"), Some(2.0))];
        controller.feedback_loaded = true;
        controller.request_delete_selected();

        let text = draw(&controller);
        assert!(text.contains("Delete feedback 4?"));
        assert_eq!(DashboardView.key_hints(&controller)[0], ("y", "confirm delete"));
    }

    #[test]
    fn test_initial_load_failure_shows_error() {
        let mut controller =
            DashboardController::new(Arc::new(MockFeedbackGateway::new()), Arc::new(MockReportGateway::new()), 0);
        controller.load_error = Some("backend returned 502 Bad Gateway: ".to_string());
        let text = draw(&controller);
        assert!(text.contains("Failed to load feedback: backend returned 502"));
    }

    #[test]
    fn test_empty_list_message() {
        let mut controller =
            DashboardController::new(Arc::new(MockFeedbackGateway::new()), Arc::new(MockReportGateway::new()), 0);
        controller.feedback_loaded = true;
        let text = draw(&controller);
        assert!(text.contains("No feedback yet."));
    }
}
