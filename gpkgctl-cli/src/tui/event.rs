//! Event handling for the TUI

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode, Pane};

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling a key event
pub enum HandleResult {
    /// Continue running
    Continue,
    /// Quit the application
    Quit,
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) -> HandleResult {
    // Global quit shortcuts (Ctrl+C, Ctrl+Q)
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return HandleResult::Quit,
            _ => {}
        }
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Filter => handle_filter_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        // Quit
        KeyCode::Char('q') => return HandleResult::Quit,

        // Row navigation
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),

        // Pane focus
        KeyCode::Tab => app.toggle_pane(),
        KeyCode::Char('h') | KeyCode::Left => app.focus(Pane::Tables),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => app.focus(Pane::Fields),

        // Filter the focused pane
        KeyCode::Char('/') => app.enter_filter(),

        // Toggle the detail pane
        KeyCode::Char('p') => {
            app.show_detail = !app.show_detail;
            app.set_status(if app.show_detail {
                "detail pane shown"
            } else {
                "detail pane hidden"
            });
        }

        // Home/End
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),

        KeyCode::Esc => app.clear_status(),

        _ => {}
    }
    HandleResult::Continue
}

/// Handle keys in filter mode
fn handle_filter_mode(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Esc => app.cancel_filter(),
        KeyCode::Enter => app.commit_filter(),
        KeyCode::Backspace => app.filter_pop(),
        // Selection stays usable while the filter narrows the list
        KeyCode::Down => app.select_next(),
        KeyCode::Up => app.select_prev(),
        KeyCode::Char(c) => app.filter_push(c),
        _ => {}
    }
    HandleResult::Continue
}
