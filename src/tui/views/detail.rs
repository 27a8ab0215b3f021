// Product detail view

use crate::catalog::{ProductLookup, MISSING_ID, UNKNOWN_PRODUCT};
use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(false));

    let product = match app.storefront.product_lookup() {
        Some(ProductLookup::Found(product)) => product,
        Some(ProductLookup::MissingId) | None => {
            let message = Paragraph::new(MISSING_ID)
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.error))
                .block(block);
            f.render_widget(message, area);
            return;
        }
        Some(ProductLookup::NotFound { .. }) => {
            let message = Paragraph::new(UNKNOWN_PRODUCT)
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.error))
                .block(block);
            f.render_widget(message, area);
            return;
        }
    };

    let mut lines = vec![
        Line::from(Span::styled(product.name.clone(), theme.heading())),
        Line::from(Span::styled(
            product.category.clone(),
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
        Line::from(Span::styled(
            product.price.clone(),
            Style::default().fg(theme.price).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(product.description.clone()),
    ];

    let details = product.detail_items();
    if !details.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Detail Produk",
            Style::default().fg(theme.accent),
        )));
        lines.extend(details.into_iter().map(|item| Line::from(format!("  • {}", item))));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[a] Tambah ke Keranjang",
        Style::default().fg(theme.success),
    )));

    let page = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block.title(format!(" Produk #{} ", product.id)));
    f.render_widget(page, area);
}
