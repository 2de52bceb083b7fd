//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_field_char, can_add_password_char, can_add_username_char, App, AppState, Focus,
    ItemFormFocus, LoginFocus, Tab, PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Overlay states take the keys first
    match app.state {
        AppState::LoggingIn => return handle_login_input(app, key).await,
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.apply_delete(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.pending_delete = None;
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::ChangingStatus => return handle_status_input(app, key),
        AppState::EditingItem => return handle_item_form_input(app, key),
        AppState::Searching => return handle_search_input(app, key),
        AppState::Normal | AppState::Quitting => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('1') => switch_tab(app, Tab::Dashboard).await,
        KeyCode::Char('2') => switch_tab(app, Tab::Inventory).await,
        KeyCode::Char('3') => switch_tab(app, Tab::Shipments).await,
        KeyCode::Char('4') => switch_tab(app, Tab::Users).await,
        KeyCode::Left => {
            let prev = app.current_tab.prev();
            switch_tab(app, prev).await;
        }
        KeyCode::Right => {
            let next = app.current_tab.next();
            switch_tab(app, next).await;
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::List => Focus::Detail,
                Focus::Detail => Focus::List,
            };
        }
        KeyCode::Char('/') => {
            if matches!(app.current_tab, Tab::Inventory | Tab::Shipments) {
                app.state = AppState::Searching;
            }
        }
        KeyCode::Char('r') => app.refresh_all_background(),
        KeyCode::Char('L') => app.logout(),

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => move_selection(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_selection(app, -1),
        KeyCode::PageDown => move_selection(app, PAGE_SCROLL_SIZE as isize),
        KeyCode::PageUp => move_selection(app, -(PAGE_SCROLL_SIZE as isize)),
        KeyCode::Home => set_selection(app, 0),
        KeyCode::End => set_selection(app, usize::MAX),

        // Tab-specific actions
        KeyCode::Char('a') if app.current_tab == Tab::Inventory => app.open_item_form(false),
        KeyCode::Char('e') if app.current_tab == Tab::Inventory => app.open_item_form(true),
        KeyCode::Char('h') if app.current_tab == Tab::Inventory => app.fetch_item_history(),
        KeyCode::Char('o') if app.current_tab == Tab::Inventory => app.cycle_inventory_sort(),
        KeyCode::Char('O') if app.current_tab == Tab::Inventory => {
            app.inventory_sort_ascending = !app.inventory_sort_ascending;
        }
        KeyCode::Char('s') if app.current_tab == Tab::Shipments => app.start_status_change(),
        KeyCode::Char('f') if app.current_tab == Tab::Shipments => app.cycle_status_filter(),
        KeyCode::Char('d')
            if matches!(app.current_tab, Tab::Inventory | Tab::Shipments | Tab::Users) =>
        {
            app.start_delete()
        }
        _ => {}
    }

    Ok(false)
}

/// Switch tab and re-run the session guard: every navigation to a protected
/// view is a fresh activation.
async fn switch_tab(app: &mut App, tab: Tab) {
    app.current_tab = tab;
    app.focus = Focus::List;
    app.activate_guard().await;
}

fn current_selection(app: &App) -> usize {
    match app.current_tab {
        Tab::Dashboard => 0,
        Tab::Inventory => app.inventory_selection,
        Tab::Shipments => app.shipment_selection,
        Tab::Users => app.user_selection,
    }
}

fn set_selection(app: &mut App, index: usize) {
    let len = app.list_len(app.current_tab);
    let clamped = index.min(len.saturating_sub(1));
    match app.current_tab {
        Tab::Dashboard => {}
        Tab::Inventory => app.inventory_selection = clamped,
        Tab::Shipments => app.shipment_selection = clamped,
        Tab::Users => app.user_selection = clamped,
    }
}

fn move_selection(app: &mut App, delta: isize) {
    let current = current_selection(app) as isize;
    set_selection(app, (current + delta).max(0) as usize);
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => {
                app.login_focus = LoginFocus::Password;
            }
            LoginFocus::Password => {
                app.login_focus = LoginFocus::Button;
            }
            LoginFocus::Button => {
                let _ = app.attempt_login().await;
                if app.state == AppState::Normal {
                    // Login succeeded, refresh data
                    app.refresh_all_background();
                }
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.len(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }

    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.search_query.clear();
            app.state = AppState::Normal;
            app.search_current_tab();
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            app.search_current_tab();
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => {
            if can_add_field_char(app.search_query.len(), c) {
                app.search_query.push(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_status_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if app.status_confirming {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.apply_status_change(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.status_confirming = false;
            }
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => {
            app.status_target = None;
            app.state = AppState::Normal;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.status_selection + 1 < app.status_choices.len() {
                app.status_selection += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.status_selection = app.status_selection.saturating_sub(1);
        }
        KeyCode::Enter => {
            app.status_confirming = true;
        }
        _ => {}
    }
    Ok(false)
}

fn handle_item_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.item_form_focus = app.item_form_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.item_form_focus = app.item_form_focus.prev();
        }
        KeyCode::Enter => {
            if app.item_form_focus == ItemFormFocus::Save {
                app.submit_item_form();
            } else {
                app.item_form_focus = app.item_form_focus.next();
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = app.item_form.field_mut(app.item_form_focus) {
                field.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(field) = app.item_form.field_mut(app.item_form_focus) {
                if can_add_field_char(field.len(), c) {
                    field.push(c);
                }
            }
        }
        _ => {}
    }
    Ok(false)
}
