use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, ItemFormFocus, LoginFocus, Tab};
use crate::auth::AuthState;

use super::styles;
use super::tabs::{dashboard, inventory, shipments, users};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::EditingItem => render_item_form_overlay(frame, app),
        AppState::ChangingStatus => render_status_overlay(frame, app),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        _ => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Stockroom";
    let user = app
        .current_user
        .as_ref()
        .map(|u| format!("{} | ", u.username))
        .unwrap_or_default();
    let help_hint = format!("{}[?] Help", user);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + help_hint.len() + 4),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [Tab::Dashboard, Tab::Inventory, Tab::Shipments, Tab::Users];

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(
            format!("[{}] {}", i + 1, tab.title()),
            styles::tab_style(app.current_tab == *tab),
        ));
    }

    if !app.search_query.is_empty() {
        spans.push(Span::styled(
            format!("   search: \"{}\"", app.search_query),
            styles::highlight_style(),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    // The guard result gates the protected views: while the check is in
    // flight we show a placeholder, and an unauthenticated result is
    // covered by the login overlay.
    if matches!(app.auth_state, AuthState::Unknown) {
        let placeholder = Paragraph::new("Checking session...")
            .alignment(Alignment::Center)
            .style(styles::muted_style());
        frame.render_widget(placeholder, area);
        return;
    }

    match app.current_tab {
        Tab::Dashboard => dashboard::render(frame, app, area),
        Tab::Inventory => inventory::render(frame, app, area),
        Tab::Shipments => shipments::render(frame, app, area),
        Tab::Users => users::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[/]search [r]efresh [L]ogout [q]uit";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if matches!(app.state, AppState::Searching) {
        format!(" Search: {}_ ", app.search_query)
    } else {
        String::new()
    };

    let padding = (area.width as usize).saturating_sub(left_text.len() + shortcuts.len() + 2);
    let line = Line::from(vec![
        Span::styled(left_text, styles::highlight_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(shortcuts, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Compute a centered rect of the given size within `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(44, 11, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("Sign in", styles::title_style())),
        Line::from(""),
        field_line(
            "Username: ",
            app.login_username.clone(),
            app.login_focus == LoginFocus::Username,
        ),
        field_line(
            "Password: ",
            "*".repeat(app.login_password.len()),
            app.login_focus == LoginFocus::Password,
        ),
        Line::from(""),
        Line::from(Span::styled(
            if app.login_focus == LoginFocus::Button {
                "> [ Login ] <"
            } else {
                "  [ Login ]  "
            },
            if app.login_focus == LoginFocus::Button {
                styles::selected_style()
            } else {
                styles::list_item_style()
            },
        )),
    ];

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.clone(),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(" Session ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_item_form_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(56, 15, frame.area());
    frame.render_widget(Clear, area);

    let form = &app.item_form;
    let title = if form.editing_id.is_some() {
        " Edit Item "
    } else {
        " New Item "
    };

    let fields = [
        ("Name:       ", ItemFormFocus::Name),
        ("SKU:        ", ItemFormFocus::Sku),
        ("Description:", ItemFormFocus::Description),
        ("Quantity:   ", ItemFormFocus::Quantity),
        ("Location:   ", ItemFormFocus::Location),
        ("Category:   ", ItemFormFocus::Category),
        ("Min stock:  ", ItemFormFocus::MinimumStock),
    ];

    let mut lines = Vec::new();
    for (label, focus) in fields {
        lines.push(field_line(
            label,
            form.field(focus).to_string(),
            app.item_form_focus == focus,
        ));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        if app.item_form_focus == ItemFormFocus::Save {
            "> [ Save ] <"
        } else {
            "  [ Save ]  "
        },
        if app.item_form_focus == ItemFormFocus::Save {
            styles::selected_style()
        } else {
            styles::list_item_style()
        },
    )));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.clone(),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_overlay(frame: &mut Frame, app: &App) {
    let height = 6 + app.status_choices.len() as u16;
    let area = centered_rect(44, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("Change status to:", styles::title_style())),
        Line::from(""),
    ];

    for (i, status) in app.status_choices.iter().enumerate() {
        let marker = if i == app.status_selection { "> " } else { "  " };
        let style = if i == app.status_selection {
            styles::selected_style()
        } else {
            styles::shipment_status_style(*status)
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", marker, status.label()),
            style,
        )));
    }

    lines.push(Line::from(""));
    if app.status_confirming {
        let chosen = app
            .status_choices
            .get(app.status_selection)
            .map(|s| s.label())
            .unwrap_or("?");
        lines.push(Line::from(Span::styled(
            format!("Confirm change to {}? [y/n]", chosen),
            styles::warning_style(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Enter to select, Esc to cancel",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(" Shipment Status ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 5, frame.area());
    frame.render_widget(Clear, area);

    let message = app
        .pending_delete
        .as_ref()
        .map(|p| p.describe())
        .unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled(message, styles::warning_style())),
        Line::from(""),
        Line::from(Span::styled("[y] delete    [n] cancel", styles::muted_style())),
    ];

    let block = Block::default()
        .title(" Confirm Delete ")
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect(34, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled("Quit Stockroom?", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled("[y] quit    [n] stay", styles::muted_style())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(56, 19, frame.area());
    frame.render_widget(Clear, area);

    let entries = [
        ("1-4", "Switch tab (re-checks the session)"),
        ("Left/Right", "Previous / next tab"),
        ("j/k, arrows", "Move selection"),
        ("PgUp/PgDn", "Page selection"),
        ("Tab", "Toggle list/detail focus"),
        ("/", "Search current tab"),
        ("r", "Refresh all data"),
        ("o", "Cycle inventory sort, O flips direction"),
        ("a / e", "Add / edit inventory item"),
        ("h", "Shipment history for selected item"),
        ("s", "Change shipment status"),
        ("f", "Cycle shipment status filter"),
        ("d", "Delete selected (with confirmation)"),
        ("L", "Log out"),
        ("q", "Quit"),
    ];

    let mut lines = vec![
        Line::from(Span::styled("Keys", styles::title_style())),
        Line::from(""),
    ];
    for (key, description) in entries {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", key), styles::highlight_style()),
            Span::raw(description),
        ]));
    }

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(label.to_string(), styles::muted_style()),
        Span::styled(format!("{}{}", value, cursor), style),
    ])
}
