// Footer - address bar or key hints, plus the latest warning from the log

use crate::router::View;
use crate::tui::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn hints(view: &View) -> &'static str {
    match view {
        View::Products => "ketik: cari  Tab: kategori  ↑↓: pilih  Enter: buka",
        View::ProductDetail { .. } => "a: tambah ke keranjang  Backspace: kembali",
        View::Login => "Tab/↑↓: kolom  Ctrl+T: daftar/masuk  Ctrl+P: lihat sandi  Enter: kirim",
        View::Home | View::About | View::Blank { .. } => "Ctrl+L: alamat  Esc: tutup notifikasi",
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let first = match &app.address_bar {
        Some(address) => Line::from(vec![
            Span::styled(" alamat: ", Style::default().fg(theme.accent)),
            Span::styled(address.as_str(), Style::default().fg(theme.fg)),
            Span::styled("█", Style::default().fg(theme.border_focused)),
        ]),
        None => Line::from(vec![
            Span::styled(
                format!(" {} ", app.storefront.route()),
                Style::default().fg(theme.accent),
            ),
            Span::styled(hints(&app.storefront.view()), Style::default().fg(theme.muted)),
            Span::styled("  Ctrl+C: keluar", Style::default().fg(theme.muted)),
        ]),
    };
    f.render_widget(Paragraph::new(first), rows[0]);

    if let Some(entry) = app.log_buffer.latest_problem() {
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", entry.level.as_str()),
                Style::default().fg(theme.log_level(entry.level)),
            ),
            Span::styled(
                format!("{} {}", entry.timestamp.format("%H:%M:%S"), entry.message),
                Style::default().fg(theme.muted),
            ),
        ]);
        f.render_widget(Paragraph::new(line), rows[1]);
    }
}
