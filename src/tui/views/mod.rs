// Views module - screen-level rendering
//
// One renderer per router view. `draw` builds the shell (navbar when the
// route shows one, content, footer) and floats the toast over it.

mod detail;
mod login;
mod pages;
mod products;

use super::app::App;
use super::components;
use crate::router::View;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

/// Main render function, called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.bg));
    f.render_widget(bg_block, f.area());

    let navbar_height = if app.storefront.navbar_visible() { 2 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(navbar_height),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(f.area());

    if navbar_height > 0 {
        components::render_navbar(f, chunks[0], app);
    }

    let content = chunks[1];
    match app.storefront.view() {
        View::Home => pages::render_home(f, content, app),
        View::About => pages::render_about(f, content, app),
        View::Products => products::render(f, content, app),
        View::ProductDetail { .. } => detail::render(f, content, app),
        View::Login => login::render(f, content, app),
        View::Blank { .. } => {}
    }

    components::render_footer(f, chunks[2], app);

    if let Some(notification) = app.storefront.notification() {
        components::render_toast(f, f.area(), &notification, &app.theme);
    }
}
