//! Users tab: account listing (admin only on the backend side).

use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new([
        Cell::from("Username"),
        Cell::from("Name"),
        Cell::from("Email"),
        Cell::from("Role"),
    ])
    .style(styles::title_style())
    .height(1);

    let current_id = app.current_user.as_ref().map(|u| u.id);

    let rows: Vec<Row> = app
        .users
        .iter()
        .map(|user| {
            let style = if Some(user.id) == current_id {
                styles::highlight_style()
            } else {
                styles::list_item_style()
            };
            let role = if user.is_staff { "admin" } else { "staff" };
            let marker = if Some(user.id) == current_id {
                format!("{} (you)", user.username)
            } else {
                user.username.clone()
            };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(user.display_name()),
                Cell::from(user.email.as_deref().unwrap_or("-").to_string()),
                Cell::from(role),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(24),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(8),
    ];

    let title = if app.users.is_empty() {
        " Users (admin only) ".to_string()
    } else {
        format!(" Users ({}) - [d]elete ", app.users.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.user_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
