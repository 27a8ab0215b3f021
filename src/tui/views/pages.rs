// Static pages: home and about

use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render_home(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let session = app.storefront.session();

    let greeting = if session.is_authenticated() {
        format!("Halo, {}!", session.display_name())
    } else {
        "Halo, selamat datang di toko kami!".to_string()
    };

    let count = app.storefront.catalog().products().len();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(greeting, theme.heading())),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} produk pilihan siap dikirim ke seluruh Indonesia.", count),
            Style::default().fg(theme.fg),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Tekan F3 untuk melihat katalog produk.",
            Style::default().fg(theme.muted),
        )),
    ];

    let page = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(theme.border_style(false)));
    f.render_widget(page, area);
}

pub fn render_about(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let lines = vec![
        Line::from(Span::styled("Tentang Kami", theme.heading())),
        Line::from(""),
        Line::from("Kami adalah toko daring yang menjual elektronik, fashion, dan perlengkapan rumah tangga."),
        Line::from(""),
        Line::from(Span::styled("Visi", Style::default().fg(theme.accent))),
        Line::from("Menjadi tempat belanja yang mudah dan terpercaya bagi semua orang."),
        Line::from(""),
        Line::from(Span::styled("Misi", Style::default().fg(theme.accent))),
        Line::from("Menyediakan produk berkualitas dengan harga jujur dan layanan yang ramah."),
    ];

    let page = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(theme.border_style(false)));
    f.render_widget(page, area);
}
