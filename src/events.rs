use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};
use crate::export::ExportFormat;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Live),
        KeyCode::Char('2') => app.set_view(View::History),
        KeyCode::Char('3') => app.set_view(View::Devices),

        // Navigation (up/down for items, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => match app.current_view {
            View::Devices => app.select_current_device(),
            View::History => app.load_history(),
            View::Live => {}
        },
        KeyCode::Esc => app.set_view(View::Live),
        KeyCode::Char('r') => app.reload(),

        // Range navigation (History view)
        KeyCode::Char('[') if app.current_view == View::History => app.shift_range(false),
        KeyCode::Char(']') if app.current_view == View::History => app.shift_range(true),
        KeyCode::Char('+') | KeyCode::Char('=') if app.current_view == View::History => {
            app.zoom_out()
        }
        KeyCode::Char('-') if app.current_view == View::History => app.zoom_in(),

        KeyCode::Char('f') => app.cycle_field(),
        KeyCode::Char('e') => app.export(ExportFormat::Csv),
        KeyCode::Char('J') => app.export(ExportFormat::Json),
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Tab clicks (row 1, after header)
        MouseEventKind::Down(MouseButton::Left) if mouse.row == 1 => {
            // Approximate tab positions: Live (0-9), History (10-22), Devices (23-35)
            let col = mouse.column;
            if col < 10 {
                app.set_view(View::Live);
            } else if col < 23 {
                app.set_view(View::History);
            } else if col < 36 {
                app.set_view(View::Devices);
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppOptions;
    use crate::data::TimeRange;
    use crate::store::MemoryStore;
    use soilwatch_types::{Field, Reading};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> (MemoryStore, App) {
        let store = MemoryStore::new("test");
        store.push("device_001", Reading::at(1_000));
        store.push("device_002", Reading::at(2_000));
        let mut app = App::new(
            Box::new(store.clone()),
            AppOptions {
                history_range: TimeRange::new(0, 3_600_000),
                ..AppOptions::default()
            },
        );
        app.start();
        (store, app)
    }

    #[test]
    fn test_quit() {
        let (_, mut app) = app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let (_, mut app) = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);

        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_tab_cycles_views() {
        let (_, mut app) = app();
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::History);
        assert!(!app.is_subscribed());

        handle_key_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.current_view, View::Live);
        assert!(app.is_subscribed());
    }

    #[test]
    fn test_range_keys_only_in_history() {
        let (_, mut app) = app();
        let initial = app.history_range;

        handle_key_event(&mut app, key(KeyCode::Char(']')));
        assert_eq!(app.history_range, initial);

        handle_key_event(&mut app, key(KeyCode::Char('2')));
        handle_key_event(&mut app, key(KeyCode::Char(']')));
        assert_eq!(app.history_range, initial.shifted(3_600_000));

        handle_key_event(&mut app, key(KeyCode::Char('+')));
        assert_eq!(app.history_range.span(), Duration::from_secs(6 * 3600));
    }

    #[test]
    fn test_enter_selects_device() {
        let (_, mut app) = app();
        handle_key_event(&mut app, key(KeyCode::Char('3')));
        handle_key_event(&mut app, key(KeyCode::Down));
        handle_key_event(&mut app, key(KeyCode::Enter));

        assert_eq!(app.device_id, "device_002");
        assert_eq!(app.current_view, View::Live);
    }

    #[test]
    fn test_field_cycle_key() {
        let (_, mut app) = app();
        handle_key_event(&mut app, key(KeyCode::Char('f')));
        assert_eq!(app.selected_field, Field::Temperature);
    }
}
