use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A command bound to a shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CommitDraft,
    DeleteSelected,
    ToggleSelected,
    NewTask,
    SelectNext,
    SelectPrev,
    MoveDown,
    MoveUp,
    NewTab,
    CloseTab,
    PrevTab,
    NextTab,
    LeaveInput,
    Quit,
}

/// Map a key to its action. Keys with no binding fall through to the
/// text field.
///
/// In raw mode Ctrl+J and Ctrl+H arrive as `Char('j')` / `Char('h')` with
/// CONTROL, so they bind like any other Ctrl chord. Ctrl+Enter is only
/// distinguishable under the kitty protocol; Ctrl+D works everywhere.
pub fn resolve(key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let action = match key.code {
        KeyCode::Enter if ctrl => Action::ToggleSelected,
        KeyCode::Enter => Action::CommitDraft,
        KeyCode::Delete if ctrl => Action::DeleteSelected,
        KeyCode::Down if ctrl => Action::MoveDown,
        KeyCode::Up if ctrl => Action::MoveUp,
        KeyCode::Down => Action::SelectNext,
        KeyCode::Up => Action::SelectPrev,
        KeyCode::BackTab => Action::SelectPrev,
        KeyCode::Tab if shift => Action::SelectPrev,
        KeyCode::Tab => Action::SelectNext,
        KeyCode::Esc => Action::LeaveInput,
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'd' => Action::ToggleSelected,
            'n' => Action::NewTask,
            'j' => Action::SelectNext,
            'k' => Action::SelectPrev,
            't' => Action::NewTab,
            'w' => Action::CloseTab,
            'h' => Action::PrevTab,
            'l' => Action::NextTab,
            'q' | 'c' => Action::Quit,
            _ => return None,
        },
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn enter_variants() {
        assert_eq!(resolve(key(KeyCode::Enter)), Some(Action::CommitDraft));
        assert_eq!(resolve(ctrl(KeyCode::Enter)), Some(Action::ToggleSelected));
        assert_eq!(resolve(ctrl(KeyCode::Char('d'))), Some(Action::ToggleSelected));
    }

    #[test]
    fn selection_keys() {
        assert_eq!(resolve(ctrl(KeyCode::Char('j'))), Some(Action::SelectNext));
        assert_eq!(resolve(ctrl(KeyCode::Char('k'))), Some(Action::SelectPrev));
        assert_eq!(resolve(key(KeyCode::Down)), Some(Action::SelectNext));
        assert_eq!(resolve(key(KeyCode::Up)), Some(Action::SelectPrev));
        assert_eq!(resolve(key(KeyCode::Tab)), Some(Action::SelectNext));
        assert_eq!(resolve(key(KeyCode::BackTab)), Some(Action::SelectPrev));
        assert_eq!(
            resolve(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT)),
            Some(Action::SelectPrev)
        );
    }

    #[test]
    fn reorder_keys() {
        assert_eq!(resolve(ctrl(KeyCode::Down)), Some(Action::MoveDown));
        assert_eq!(resolve(ctrl(KeyCode::Up)), Some(Action::MoveUp));
    }

    #[test]
    fn tab_keys() {
        assert_eq!(resolve(ctrl(KeyCode::Char('t'))), Some(Action::NewTab));
        assert_eq!(resolve(ctrl(KeyCode::Char('w'))), Some(Action::CloseTab));
        assert_eq!(resolve(ctrl(KeyCode::Char('h'))), Some(Action::PrevTab));
        assert_eq!(resolve(ctrl(KeyCode::Char('l'))), Some(Action::NextTab));
    }

    #[test]
    fn misc_keys() {
        assert_eq!(resolve(ctrl(KeyCode::Delete)), Some(Action::DeleteSelected));
        assert_eq!(resolve(ctrl(KeyCode::Char('n'))), Some(Action::NewTask));
        assert_eq!(resolve(key(KeyCode::Esc)), Some(Action::LeaveInput));
        assert_eq!(resolve(ctrl(KeyCode::Char('q'))), Some(Action::Quit));
    }

    #[test]
    fn plain_text_is_unbound() {
        assert_eq!(resolve(key(KeyCode::Char('j'))), None);
        assert_eq!(resolve(key(KeyCode::Delete)), None);
        assert_eq!(resolve(key(KeyCode::Backspace)), None);
        assert_eq!(resolve(ctrl(KeyCode::Char('z'))), None);
    }
}
