// Navbar - top row with the route links and the session state

use crate::router::Route;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const LINKS: [(&str, &str); 3] = [("F1", "Beranda"), ("F2", "Tentang"), ("F3", "Produk")];

/// Index into `LINKS` highlighted for `route`
fn active_link(route: &Route) -> Option<usize> {
    match route {
        Route::Home => Some(0),
        Route::About => Some(1),
        Route::Products | Route::ProductDetail { .. } => Some(2),
        Route::Login | Route::Unknown(_) => None,
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let route = app.storefront.route();
    let session = app.storefront.session();

    let mut spans = vec![Span::styled(" storefront ", theme.heading()), Span::raw("│")];

    let active = active_link(route);
    for (i, (key, label)) in LINKS.into_iter().enumerate() {
        let style = if active == Some(i) {
            theme.selected()
        } else {
            Style::default().fg(theme.fg)
        };
        spans.push(Span::styled(format!(" {} ", key), Style::default().fg(theme.muted)));
        spans.push(Span::styled(label, style));
    }

    spans.push(Span::raw("  │ "));
    if session.is_authenticated() {
        spans.push(Span::styled(
            session.display_name().to_string(),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(" F5 ", Style::default().fg(theme.muted)));
        spans.push(Span::raw("Keluar"));
    } else {
        spans.push(Span::styled("F4 ", Style::default().fg(theme.muted)));
        spans.push(Span::raw("Masuk"));
    }

    let navbar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style(false)),
    );
    f.render_widget(navbar, area);
}
