use ratatui::style::{Color, Modifier, Style};

use crate::analysis::PriorityBand;
use crate::models::{Sentiment, ThemeMode};

/// Colors handed to every render function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub mode: ThemeMode,
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub success: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                mode,
                background: Color::Reset,
                text: Color::White,
                muted: Color::Gray,
                accent: Color::Cyan,
                border: Color::DarkGray,
                highlight_bg: Color::LightBlue,
                highlight_fg: Color::Black,
                success: Color::Green,
                error: Color::Red,
            },
            ThemeMode::Light => Self {
                mode,
                background: Color::Rgb(248, 250, 252),
                text: Color::Rgb(15, 23, 42),
                muted: Color::Rgb(100, 116, 139),
                accent: Color::Rgb(37, 99, 235),
                border: Color::Rgb(203, 213, 225),
                highlight_bg: Color::Rgb(219, 234, 254),
                highlight_fg: Color::Rgb(15, 23, 42),
                success: Color::Rgb(22, 163, 74),
                error: Color::Rgb(220, 38, 38),
            },
        }
    }

    pub fn toggled(&self) -> Self {
        Self::for_mode(self.mode.toggled())
    }

    pub fn band_color(&self, band: PriorityBand) -> Color {
        match band {
            PriorityBand::High => Color::Rgb(220, 38, 38),
            PriorityBand::Medium => Color::Rgb(245, 158, 11),
            PriorityBand::Low => Color::Rgb(59, 130, 246),
            PriorityBand::Unscored => Color::Rgb(148, 163, 184),
        }
    }

    pub fn sentiment_color(&self, sentiment: Option<Sentiment>) -> Color {
        match sentiment {
            Some(Sentiment::Positive) => self.success,
            Some(Sentiment::Negative) => self.error,
            Some(Sentiment::Neutral) => self.accent,
            Some(Sentiment::Unknown) | None => self.muted,
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .fg(self.highlight_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_style(&self) -> Style {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_mode(ThemeMode::default())
    }
}
