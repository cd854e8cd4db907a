//! Event Handling
//!
//! Keyboard handling for azurelite. Keys are routed by mode first, then by
//! the current view.

use crate::app::{App, CreateField, Mode, View};
use crate::lifecycle::Action;
use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use std::time::{Duration, Instant};

/// Handle events, returns true if app should quit
pub async fn handle_events(app: &mut App) -> Result<bool> {
    if poll(Duration::from_millis(100))? {
        if let Event::Key(key) = read()? {
            return Ok(handle_key_event(app, key.code, key.modifiers));
        }
    }
    Ok(false)
}

/// Apply one key press, returns true if app should quit
pub fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    // Global quit shortcut
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, code, modifiers),
        Mode::Command => handle_command_mode(app, code, modifiers),
        Mode::Help => handle_help_mode(app, code),
        Mode::Confirm => handle_confirm_mode(app, code),
        Mode::Warning => handle_warning_mode(app, code),
        Mode::Notifications => handle_notifications_mode(app, code),
        Mode::Settings => handle_settings_mode(app, code, modifiers),
    }
}

fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    // Text entry owns the keyboard
    if app.filter_active {
        handle_filter_input(app, code, modifiers);
        return false;
    }
    if app.catalog_search_active {
        handle_catalog_search_input(app, code, modifiers);
        return false;
    }
    if app.view == View::Create {
        return handle_create_view(app, code, modifiers);
    }
    if app.view == View::Profile {
        return handle_profile_view(app, code, modifiers);
    }

    // Double-g jumps to the top
    if code == KeyCode::Char('g') {
        if let Some((KeyCode::Char('g'), time)) = app.last_key_press {
            if time.elapsed() < Duration::from_millis(1000) {
                app.go_to_top();
                app.last_key_press = None;
                return false;
            }
        }
        app.last_key_press = Some((code, Instant::now()));
        return false;
    }
    app.last_key_press = None;
    app.error_message = None;

    match code {
        KeyCode::Char('q') => return true,

        // Views
        KeyCode::Char('1') => app.navigate(View::Dashboard),
        KeyCode::Char('2') => app.navigate(View::Resources),
        KeyCode::Char('3') => app.navigate(View::Catalog),
        KeyCode::Char('c') => app.navigate(View::Create),
        KeyCode::Char('p') => app.navigate(View::Profile),

        // Overlays
        KeyCode::Char(':') => app.enter_command_mode(),
        KeyCode::Char('?') => app.enter_help_mode(),
        KeyCode::Char('n') => app.enter_notifications_mode(),

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Home => app.go_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.go_to_bottom(),

        _ => match app.view.clone() {
            View::Dashboard => handle_dashboard_view(app, code),
            View::Resources => handle_resources_view(app, code),
            View::Detail(_) => handle_detail_view(app, code),
            View::Catalog => handle_catalog_view(app, code),
            View::Create | View::Profile => {},
        },
    }

    false
}

/// Action shortcuts shared by the resource list and the detail page
fn handle_action_key(app: &mut App, code: KeyCode) -> bool {
    let action = match code {
        KeyCode::Delete => Some(Action::Delete),
        KeyCode::Char(c) => Action::ALL.into_iter().find(|a| a.shortcut() == c),
        _ => None,
    };
    match action {
        Some(action) => {
            app.request_action(action);
            true
        },
        None => false,
    }
}

fn handle_dashboard_view(app: &mut App, code: KeyCode) {
    if code == KeyCode::Enter {
        app.navigate(View::Resources);
    }
}

fn handle_resources_view(app: &mut App, code: KeyCode) {
    if handle_action_key(app, code) {
        return;
    }
    match code {
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('/') => app.filter_active = true,
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Char(']') | KeyCode::Right | KeyCode::PageDown => app.next_page(),
        KeyCode::Char('[') | KeyCode::Left | KeyCode::PageUp => app.prev_page(),
        _ => {},
    }
}

fn handle_detail_view(app: &mut App, code: KeyCode) {
    if handle_action_key(app, code) {
        return;
    }
    match code {
        KeyCode::Char('e') => app.open_settings(),
        KeyCode::Tab => app.detail_tab = app.detail_tab.toggle(),
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Left => {
            app.navigate(View::Resources)
        },
        _ => {},
    }
}

fn handle_catalog_view(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('/') => app.catalog_search_active = true,
        KeyCode::Enter => app.select_service(),
        KeyCode::Esc => app.clear_catalog_search(),
        _ => {},
    }
}

fn handle_filter_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Enter => app.filter_active = false,
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.push_filter_char(c)
        },
        _ => {},
    }
}

fn handle_catalog_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Esc => app.clear_catalog_search(),
        KeyCode::Enter => app.catalog_search_active = false,
        KeyCode::Down => app.next(),
        KeyCode::Up => app.previous(),
        KeyCode::Backspace => app.pop_catalog_char(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.push_catalog_char(c)
        },
        _ => {},
    }
}

fn handle_create_view(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    let focused = app.create_form.focused;
    match code {
        KeyCode::Esc => app.navigate(View::Resources),
        KeyCode::Tab | KeyCode::Down => app.create_form.focused = focused.next(),
        KeyCode::BackTab | KeyCode::Up => app.create_form.focused = focused.prev(),
        KeyCode::Left => app.create_form.cycle(false),
        KeyCode::Right => app.create_form.cycle(true),
        KeyCode::Backspace => app.create_form.backspace(),
        KeyCode::Enter if focused == CreateField::Submit => {
            app.submit_create_form();
        },
        KeyCode::Enter => app.create_form.focused = focused.next(),
        KeyCode::Char(c) if focused.is_text() && !modifiers.contains(KeyModifiers::CONTROL) => {
            app.create_form.input_char(c)
        },
        KeyCode::Char(' ') => app.create_form.cycle(true),
        KeyCode::Char('q') => return true,
        KeyCode::Char(':') => app.enter_command_mode(),
        KeyCode::Char('?') => app.enter_help_mode(),
        _ => {},
    }
    false
}

fn handle_profile_view(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    let focused = app.profile_form.focused;
    match code {
        KeyCode::Esc => app.navigate(View::Dashboard),
        KeyCode::Tab | KeyCode::Down => app.profile_form.focused = focused.next(),
        KeyCode::BackTab | KeyCode::Up => app.profile_form.focused = focused.prev(),
        KeyCode::Left => app.profile_form.cycle(false),
        KeyCode::Right => app.profile_form.cycle(true),
        KeyCode::Backspace => app.profile_form.backspace(),
        KeyCode::Enter => app.submit_profile_page(),
        KeyCode::Char(c) if focused.is_text() && !modifiers.contains(KeyModifiers::CONTROL) => {
            app.profile_form.input_char(c)
        },
        KeyCode::Char(' ') => app.profile_form.cycle(true),
        KeyCode::Char('q') => return true,
        KeyCode::Char('1') => app.navigate(View::Dashboard),
        KeyCode::Char('2') => app.navigate(View::Resources),
        KeyCode::Char(':') => app.enter_command_mode(),
        KeyCode::Char('?') => app.enter_help_mode(),
        KeyCode::Char('n') => app.enter_notifications_mode(),
        _ => {},
    }
    false
}

fn handle_command_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc => app.exit_mode(),
        KeyCode::Enter => {
            let should_quit = app.execute_command();
            if app.mode == Mode::Command {
                app.exit_mode();
            }
            return should_quit;
        },
        KeyCode::Backspace => {
            app.command_text.pop();
            app.update_command_suggestions();
        },
        KeyCode::Tab | KeyCode::Right => app.apply_suggestion(),
        KeyCode::Down => app.next_suggestion(),
        KeyCode::Up => app.prev_suggestion(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_text.push(c);
            app.update_command_suggestions();
        },
        _ => {},
    }
    false
}

fn handle_help_mode(app: &mut App, code: KeyCode) -> bool {
    if matches!(
        code,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter
    ) {
        app.exit_mode();
    }
    false
}

fn handle_confirm_mode(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => app.confirm_pending(false),
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_pending(true),
        KeyCode::Left | KeyCode::Char('h') => {
            if let Some(ref mut pending) = app.pending_action {
                pending.selected_yes = true;
            }
        },
        KeyCode::Right | KeyCode::Char('l') => {
            if let Some(ref mut pending) = app.pending_action {
                pending.selected_yes = false;
            }
        },
        KeyCode::Tab => {
            if let Some(ref mut pending) = app.pending_action {
                pending.selected_yes = !pending.selected_yes;
            }
        },
        KeyCode::Enter => {
            let yes = app
                .pending_action
                .as_ref()
                .map(|p| p.selected_yes)
                .unwrap_or(false);
            app.confirm_pending(yes);
        },
        _ => {},
    }
    false
}

fn handle_warning_mode(app: &mut App, code: KeyCode) -> bool {
    if matches!(code, KeyCode::Esc | KeyCode::Enter) {
        app.exit_mode();
    }
    false
}

fn handle_notifications_mode(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('n') | KeyCode::Char('N') => {
            app.exit_mode()
        },
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.notification_manager.notifications.len();
            if len > 0 {
                app.notifications_selected = (app.notifications_selected + 1).min(len - 1);
            }
        },
        KeyCode::Char('k') | KeyCode::Up => {
            app.notifications_selected = app.notifications_selected.saturating_sub(1);
        },
        KeyCode::Char('c') => app.clear_notifications(),
        _ => {},
    }
    false
}

fn handle_settings_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc => app.exit_mode(),
        KeyCode::Enter => {
            app.apply_settings();
        },
        _ => {
            let Some(state) = app.settings.as_mut() else {
                app.exit_mode();
                return false;
            };
            match code {
                KeyCode::Tab | KeyCode::Down => state.focused = state.focused.next(),
                KeyCode::BackTab | KeyCode::Up => state.focused = state.focused.prev(),
                KeyCode::Backspace => {
                    state.focused_text().pop();
                },
                KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                    state.focused_text().push(c)
                },
                _ => {},
            }
        },
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{DetailTab, ProfileField, SettingsField};
    use crate::config::Config;
    use crate::lifecycle::{SimulatedBackend, Status};
    use crate::resource::{sample_resources, Directory};
    use std::sync::Arc;

    fn app() -> App {
        let directory = Directory::new(sample_resources().unwrap(), 5).unwrap();
        App::new(
            Config::default(),
            directory,
            Arc::new(SimulatedBackend::default()),
            false,
        )
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_event(app, code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_ctrl_c_quits_from_any_mode() {
        let mut app = app();
        app.enter_help_mode();
        assert!(handle_key_event(
            &mut app,
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        ));
    }

    #[test]
    fn test_view_keys_switch_pages() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.view, View::Resources);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.view, View::Catalog);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.view, View::Dashboard);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_filter_captures_action_shortcuts() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "vm-");
        assert_eq!(app.directory.search(), "vm-");
        assert_eq!(app.operations.in_flight_count(), 0);

        press(&mut app, KeyCode::Enter);
        assert!(!app.filter_active);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.directory.search(), "");
    }

    #[test]
    fn test_double_g_goes_to_top() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.list_selected, 2);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.list_selected, 2);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.list_selected, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_key_on_detail_page() {
        let mut app = app();
        app.open_detail(Some("vm-001"));
        press(&mut app, KeyCode::Char('S'));
        assert_eq!(app.directory.get("vm-001").unwrap().status, Status::Deleting);
    }

    #[test]
    fn test_delete_dialog_defaults_to_no() {
        let mut app = app();
        app.open_detail(Some("vm-001"));
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.mode, Mode::Confirm);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.directory.get("vm-001").is_some());

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);
        assert!(app.directory.get("vm-001").is_none());
    }

    #[test]
    fn test_create_form_typing_and_focus() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.view, View::Create);

        // 'q' and 'c' are text while the name field is focused
        type_str(&mut app, "qc-box");
        assert_eq!(app.create_form.name, "qc-box");
        assert_eq!(app.view, View::Create);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.create_form.focused, CreateField::Region);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.create_form.region, Some(0));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Resources);
    }

    #[test]
    fn test_settings_overlay_edits_focused_field() {
        let mut app = app();
        app.open_detail(Some("vm-001"));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, Mode::Settings);

        press(&mut app, KeyCode::Tab);
        assert_eq!(
            app.settings.as_ref().unwrap().focused,
            SettingsField::Tags
        );
        type_str(&mut app, ",team=web");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Normal);
        let tags = &app.directory.get("vm-001").unwrap().tags;
        assert!(tags.iter().any(|t| t.key == "team" && t.value == "web"));
    }

    #[test]
    fn test_command_mode_runs_command() {
        let mut app = app();
        press(&mut app, KeyCode::Char(':'));
        assert_eq!(app.mode, Mode::Command);
        type_str(&mut app, "detail db-main-01");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.view, View::Detail("db-main-01".to_string()));
    }

    #[test]
    fn test_profile_page_typing_and_toggles() {
        let mut app = app();
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.view, View::Profile);

        // 'q' and 'p' are text in the name field
        for _ in 0.."Demo User".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_str(&mut app, "Quinn Park");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view, View::Profile);
        assert_eq!(app.config.profile.full_name, "Quinn Park");

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.profile_form.focused, ProfileField::Theme);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        assert!(app.config.profile.email_marketing);
        assert_eq!(app.config.profile.theme.as_str(), "light");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Dashboard);
    }

    #[test]
    fn test_profile_name_too_short_stays_unsaved() {
        let mut app = app();
        press(&mut app, KeyCode::Char('p'));
        for _ in 0.."Demo User".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_str(&mut app, "Q");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.config.profile.full_name, "Demo User");
        assert!(!app.profile_form.errors.is_empty());
    }

    #[test]
    fn test_tab_switches_detail_panel() {
        let mut app = app();
        app.open_detail(Some("vm-001"));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.detail_tab, DetailTab::Monitoring);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.detail_tab, DetailTab::Overview);
    }
}
