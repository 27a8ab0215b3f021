// Login view - tabbed login/register forms

use crate::app::LoginTab;
use crate::tui::app::{field_value, App, Field};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Centered column the forms are drawn in
fn form_area(area: Rect) -> Rect {
    let width = area.width.min(56);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y,
        width,
        area.height,
    )
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let Some(view) = app.storefront.login_view() else {
        return;
    };
    let focused = app.focused_field();
    let fields = Field::for_tab(view.tab);
    let area = form_area(area);

    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let selected_tab = match view.tab {
        LoginTab::Login => 0,
        LoginTab::Register => 1,
    };
    let tabs = Tabs::new(vec!["Masuk", "Daftar"])
        .select(selected_tab)
        .style(Style::default().fg(theme.muted))
        .highlight_style(theme.selected())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(false))
                .title(" Ctrl+T "),
        );
    f.render_widget(tabs, rows[0]);

    for (i, field) in fields.iter().enumerate() {
        let (value, visible) = field_value(view, *field);
        let shown = if visible {
            value.to_string()
        } else {
            "•".repeat(value.chars().count())
        };
        let is_focused = focused == Some(*field);

        let mut spans = vec![Span::styled(shown, Style::default().fg(theme.fg))];
        if is_focused {
            spans.push(Span::styled("█", Style::default().fg(theme.border_focused)));
        }

        let mut title = format!(" {} ", field.label());
        if field.is_secret() {
            title.push_str(if visible { "(terlihat) " } else { "(tersembunyi) " });
        }

        let input = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(is_focused))
                .title(title),
        );
        f.render_widget(input, rows[i + 1]);
    }

    let action = match (view.tab, app.storefront.is_submitting()) {
        (_, true) => "Memproses...",
        (LoginTab::Login, false) => "Enter: Masuk",
        (LoginTab::Register, false) => "Enter: Daftar",
    };
    f.render_widget(
        Paragraph::new(Span::styled(action, Style::default().fg(theme.accent))),
        rows[fields.len() + 1],
    );
}
