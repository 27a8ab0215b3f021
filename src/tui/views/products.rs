// Products view - search box, category tabs and the filtered list

use crate::catalog::EMPTY_RESULT;
use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.theme.clone();
    let (browser, catalog) = app.storefront.browser_mut();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    // Search box
    let search = Paragraph::new(Line::from(vec![
        Span::styled(browser.criteria().search_term.clone(), Style::default().fg(theme.fg)),
        Span::styled("█", Style::default().fg(theme.border_focused)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(true))
            .title(" Cari produk "),
    );
    f.render_widget(search, chunks[0]);

    // Category tabs
    let categories = catalog.categories();
    let selected_tab = categories
        .iter()
        .position(|c| *c == browser.criteria().selected_category)
        .unwrap_or(0);
    let tabs = Tabs::new(categories)
        .select(selected_tab)
        .style(Style::default().fg(theme.muted))
        .highlight_style(theme.selected())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(false))
                .title(" Kategori (Tab) "),
        );
    f.render_widget(tabs, chunks[1]);

    // Results
    let selected = browser.selected();
    let products = browser.visible(catalog);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(false))
        .title(format!(" {} produk ", products.len()));

    if products.is_empty() {
        let empty = Paragraph::new(EMPTY_RESULT)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.muted))
            .block(block);
        f.render_widget(empty, chunks[2]);
        return;
    }

    let items: Vec<ListItem> = products
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<28}", p.name), Style::default().fg(theme.fg)),
                Span::styled(format!("{:<14}", p.category), Style::default().fg(theme.muted)),
                Span::styled(p.price.clone(), Style::default().fg(theme.price)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selected())
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, chunks[2], &mut state);
}
