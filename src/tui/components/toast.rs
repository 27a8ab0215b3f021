//! Toast for the live notification
//!
//! Renders top-center on top of all other content, bordered in the
//! severity's colour. Lifetime is owned by the notification channel; this
//! only draws whatever is current.

use crate::notification::Notification;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Widest toast, in cells, before text wraps
const MAX_WIDTH: u16 = 60;

pub fn render(f: &mut Frame, area: Rect, notification: &Notification, theme: &Theme) {
    let colour = theme.severity(notification.severity);

    // Field errors arrive joined by newlines
    let lines: Vec<&str> = notification.message.lines().collect();
    let (width, height) = toast_size(&lines, area);

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + 1.min(area.height.saturating_sub(height));
    let toast_area = Rect::new(x, y, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colour))
        .title(Span::styled(
            format!(" {} ", notification.severity.as_str()),
            Style::default().fg(colour).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme.bg));

    let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(theme.fg))
        .block(block);

    f.render_widget(Clear, toast_area);
    f.render_widget(paragraph, toast_area);
}

/// Display width of a line in cells, clamped to what a `Rect` can hold
fn cells(line: &str) -> u16 {
    u16::try_from(line.width()).unwrap_or(u16::MAX)
}

/// Outer width and height of the toast for `lines` inside `area`
fn toast_size(lines: &[&str], area: Rect) -> (u16, u16) {
    let text_width = lines.iter().map(|l| cells(l)).max().unwrap_or(0);

    let max_width = MAX_WIDTH.min(area.width.saturating_sub(4));
    let width = text_width
        .saturating_add(4)
        .min(max_width)
        .max(12.min(max_width));
    let inner_width = width.saturating_sub(4).max(1);
    let wrapped_rows = lines
        .iter()
        .map(|l| cells(l).div_ceil(inner_width).max(1))
        .fold(0u16, u16::saturating_add);
    let height = wrapped_rows.saturating_add(2).min(area.height);

    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_fits_its_text() {
        let area = Rect::new(0, 0, 120, 40);
        assert_eq!(toast_size(&["Login berhasil!"], area), (19, 3));
    }

    #[test]
    fn test_long_lines_wrap_within_max_width() {
        let area = Rect::new(0, 0, 120, 40);
        let line = "x".repeat(112);
        assert_eq!(toast_size(&[&line, "ok"], area), (MAX_WIDTH, 5));
    }

    #[test]
    fn test_oversized_message_is_clamped() {
        let area = Rect::new(0, 0, 80, 24);
        let huge = "x".repeat(usize::from(u16::MAX) + 10);
        let many: Vec<&str> = std::iter::repeat(huge.as_str()).take(4).collect();

        let (width, height) = toast_size(&many, area);
        assert_eq!(width, MAX_WIDTH);
        assert_eq!(height, area.height);
    }
}
