pub mod keymap;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::store::Persist;

use super::app::App;
use keymap::Action;

/// Handle a key event: shortcuts first, then text editing of the draft
pub fn handle_key<P: Persist>(app: &mut App<P>, key: KeyEvent, now: Instant) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    match keymap::resolve(key) {
        Some(action) => perform(app, action, now),
        None => edit_draft(app, key),
    }
}

fn perform<P: Persist>(app: &mut App<P>, action: Action, now: Instant) {
    match action {
        Action::CommitDraft => app.commit_draft(),
        Action::DeleteSelected => app.delete_selected(),
        Action::ToggleSelected => app.toggle_selected(),
        Action::NewTask => app.begin_new_task(),
        Action::SelectNext => app.move_selection(1),
        Action::SelectPrev => app.move_selection(-1),
        Action::MoveDown => app.move_selected(1),
        Action::MoveUp => app.move_selected(-1),
        Action::NewTab => app.new_tab(),
        Action::CloseTab => app.request_close_tab(now),
        Action::PrevTab => app.switch_tab(-1),
        Action::NextTab => app.switch_tab(1),
        Action::LeaveInput => {
            if app.input_focused {
                app.input_focused = false;
            } else {
                app.selection = None;
            }
        }
        Action::Quit => app.should_quit = true,
    }
}

fn edit_draft<P: Persist>(app: &mut App<P>, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    // Typing with the list focused starts a new task
    if !app.input_focused {
        if let KeyCode::Char(_) = key.code
            && !ctrl
            && !alt
        {
            app.input_focused = true;
        } else {
            return;
        }
    }

    let draft = &mut app.draft;
    match key.code {
        KeyCode::Char('a') if ctrl => draft.home(),
        KeyCode::Char('e') if ctrl => draft.end(),
        KeyCode::Char('u') if ctrl => draft.clear(),
        KeyCode::Char(c) if !ctrl && !alt => draft.insert_char(c),
        KeyCode::Backspace if ctrl || alt => draft.delete_word_back(),
        KeyCode::Backspace => draft.backspace(),
        KeyCode::Delete => draft.delete_forward(),
        KeyCode::Left => draft.left(),
        KeyCode::Right => draft.right(),
        KeyCode::Home => draft.home(),
        KeyCode::End => draft.end(),
        _ => {}
    }
}

/// Handle a bracketed paste: the text goes into the draft on one line
pub fn handle_paste<P: Persist>(app: &mut App<P>, text: &str) {
    if text.is_empty() {
        return;
    }
    app.input_focused = true;
    app.draft.insert_str(text);
}

/// Handle a mouse event against the regions recorded by the last render
pub fn handle_mouse<P: Persist>(app: &mut App<P>, mouse: MouseEvent) {
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(tab_id) = app.hit_map.tab_at(col, row) {
                app.select_tab(tab_id);
            } else if let Some(hit) = app.hit_map.row_at(col, row).copied() {
                if hit.toggle_col == Some(col) {
                    app.toggle_task(hit.task_id);
                } else if hit.delete_col == Some(col) {
                    app.delete_task(hit.task_id);
                } else {
                    app.selection = Some(hit.task_id);
                    app.input_focused = false;
                    app.begin_drag(hit.task_id);
                }
            } else if app.hit_map.in_entry(col, row) {
                app.input_focused = true;
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(hit) = app.hit_map.row_at(col, row).copied() {
                app.hover = Some(hit.task_id);
                app.drag_enter(hit.task_id);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => app.drop_drag(),
        MouseEventKind::Moved => {
            app.hover = app.hit_map.row_at(col, row).map(|hit| hit.task_id);
        }
        MouseEventKind::ScrollDown => {
            let max = app.tasks().len().saturating_sub(1);
            app.list_scroll = (app.list_scroll + 1).min(max);
        }
        MouseEventKind::ScrollUp => {
            app.list_scroll = app.list_scroll.saturating_sub(1);
        }
        _ => {}
    }
}
