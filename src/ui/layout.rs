use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

use crate::ui::components::{key_hint_line, themed_block};
use crate::ui::theme::Palette;

/// Frame split shared by every view
pub struct TuiLayout {
    pub tab_bar: Rect,
    pub content: Rect,
    pub status_bar: Rect,
}

impl TuiLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tab bar
                Constraint::Min(0),    // Content
                Constraint::Length(4), // Status bar
            ])
            .split(area);

        Self {
            tab_bar: chunks[0],
            content: chunks[1],
            status_bar: chunks[2],
        }
    }

    pub fn render_tab_bar(&self, f: &mut Frame, titles: &[&'static str], selected_tab: usize, mode_label: &str, palette: &Palette) {
        let tabs = Tabs::new(titles.iter().copied())
            .block(themed_block(format!("Feedback Prioritizer ({})", mode_label), palette))
            .style(Style::default().fg(palette.text))
            .highlight_style(palette.key_style())
            .select(selected_tab);

        f.render_widget(tabs, self.tab_bar);
    }

    /// Key hints on the first line, operation status on the second
    pub fn render_status_bar(
        &self,
        f: &mut Frame,
        hints: &[(&'static str, &'static str)],
        status_text: &str,
        palette: &Palette,
    ) {
        let status_content = vec![
            key_hint_line(hints, palette),
            Line::from(Span::styled(format!("Status: {}", status_text), Style::default().fg(palette.accent))),
        ];

        let paragraph = Paragraph::new(status_content).block(themed_block("", palette));
        f.render_widget(paragraph, self.status_bar);
    }
}

/// Split helpers for the inside of a view
pub struct ViewLayout {
    pub main_content: Rect,
}

impl ViewLayout {
    pub fn new(content_area: Rect) -> Self {
        Self {
            main_content: content_area,
        }
    }

    pub fn split_main_content(&self, direction: Direction, constraints: &[Constraint]) -> Vec<Rect> {
        Layout::default()
            .direction(direction)
            .constraints(constraints.to_vec())
            .split(self.main_content)
            .to_vec()
    }

    pub fn split_main_content_vertical(&self, constraints: &[Constraint]) -> Vec<Rect> {
        self.split_main_content(Direction::Vertical, constraints)
    }

    pub fn split_main_content_horizontal(&self, constraints: &[Constraint]) -> Vec<Rect> {
        self.split_main_content(Direction::Horizontal, constraints)
    }
}

/// Split `area` horizontally and return each piece
pub fn columns(area: Rect, constraints: &[Constraint]) -> Vec<Rect> {
    ViewLayout::new(area).split_main_content_horizontal(constraints)
}

/// Split `area` vertically and return each piece
pub fn rows(area: Rect, constraints: &[Constraint]) -> Vec<Rect> {
    ViewLayout::new(area).split_main_content_vertical(constraints)
}
