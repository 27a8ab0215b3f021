// Theme for the TUI
//
// One dark palette; severity colours come from here so the toast, navbar and
// footer agree on what "error" looks like.

use crate::logging::LogLevel;
use crate::notification::Severity;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub title: Color,
    pub accent: Color,
    pub price: Color,

    pub selected_bg: Color,
    pub selected_fg: Color,

    pub success: Color,
    pub error: Color,
    pub info: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            muted: Color::Gray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            title: Color::Cyan,
            accent: Color::LightMagenta,
            price: Color::LightGreen,

            selected_bg: Color::DarkGray,
            selected_fg: Color::Yellow,

            success: Color::Green,
            error: Color::Red,
            info: Color::Blue,
            warning: Color::Yellow,
        }
    }
}

impl Theme {
    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Success => self.success,
            Severity::Error => self.error,
            Severity::Info => self.info,
            Severity::Warning => self.warning,
        }
    }

    pub fn log_level(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Error => self.error,
            LogLevel::Warn => self.warning,
            LogLevel::Info => self.info,
            LogLevel::Debug | LogLevel::Trace => self.muted,
        }
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selected_bg)
            .fg(self.selected_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn heading(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }
}
