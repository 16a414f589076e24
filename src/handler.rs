use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tracing::debug;

use crate::app::{App, InputMode, Screen};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Boot(event) => app.apply_boot_event(event),
        AppEvent::Reply(settled) => {
            let outcome = app.apply_reply(settled);
            debug!(?outcome, "chat reply applied");
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Any key skips the boot screen
    if app.is_booting() {
        app.finish_boot();
        return;
    }

    match app.input_mode {
        InputMode::Editing if app.chat_open => handle_chat_editing(app, key),
        _ => handle_normal_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc if app.chat_open => app.close_chat(),

        // Screen switching
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.select_screen(app.screen.next()),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.select_screen(app.screen.prev()),
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            app.select_screen(Screen::TABS[idx]);
        }

        // Content navigation
        KeyCode::Char('j') | KeyCode::Down => {
            if app.screen == Screen::Projects {
                app.project_nav_down();
            } else {
                app.content_scroll = app.content_scroll.saturating_add(1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.screen == Screen::Projects {
                app.project_nav_up();
            } else {
                app.content_scroll = app.content_scroll.saturating_sub(1);
            }
        }

        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('c') | KeyCode::Char('a') | KeyCode::Char('/') => app.open_chat(),
        KeyCode::Char('i') if app.chat_open => app.input_mode = InputMode::Editing,

        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_chat(),
        KeyCode::Enter => submit_chat(app),
        // Input is locked while a reply is pending; scrolling still works
        KeyCode::Char(_)
        | KeyCode::Backspace
        | KeyCode::Delete
        | KeyCode::Left
        | KeyCode::Right
        | KeyCode::Home
        | KeyCode::End
            if app.is_waiting() => {}
        KeyCode::Backspace => {
            if app.chat_cursor > 0 {
                app.chat_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.chat_input.chars().count();
            if app.chat_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.chat_cursor = app.chat_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.chat_input.chars().count();
            app.chat_cursor = (app.chat_cursor + 1).min(char_count);
        }
        KeyCode::Home => app.chat_cursor = 0,
        KeyCode::End => app.chat_cursor = app.chat_input.chars().count(),
        KeyCode::Up => app.chat_scroll_up(1),
        KeyCode::Down => app.chat_scroll_down(1),
        KeyCode::PageUp => app.chat_scroll_up(app.chat_height.max(2) / 2),
        KeyCode::PageDown => app.chat_scroll_down(app.chat_height.max(2) / 2),
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
            app.chat_input.insert(byte_pos, c);
            app.chat_cursor += 1;
        }
        _ => {}
    }
}

/// Starts the outbound call in the background; the reply comes back as an
/// `AppEvent::Reply`. Blank input or a pending reply makes this a no-op.
fn submit_chat(app: &mut App) {
    let Some(exchange) = app.take_exchange() else {
        return;
    };

    let backend = app.backend();
    let timeout = app.request_timeout();
    let events = app.events();
    tokio::spawn(async move {
        let settled = exchange.run(backend.as_ref(), timeout).await;
        let _ = events.send(AppEvent::Reply(settled));
    });
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if !app.chat_open {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.chat_scroll_down(3),
        MouseEventKind::ScrollUp => app.chat_scroll_up(3),
        _ => {}
    }
}
