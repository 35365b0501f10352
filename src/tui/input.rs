use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Activate,
    Back,
    NextView,
    PrevView,
    CycleTypeFilter,
    CycleStatusFilter,
    StartSearch,
    Refresh,
    Quit,
    ToggleHelp,
    /// `y` on a confirmation overlay.
    Accept,
    /// `n` on a confirmation overlay.
    Decline,
    SubmitText,
    Cancel,
    Backspace,
    InputChar(char),
    Noop,
}

pub fn action_for_key(key: KeyEvent, text_mode: bool) -> Action {
    if text_mode {
        return match key.code {
            KeyCode::Enter => Action::SubmitText,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::InputChar(c)
            }
            _ => Action::Noop,
        };
    }

    match key.code {
        KeyCode::Up => Action::Move(Direction::Up),
        KeyCode::Down => Action::Move(Direction::Down),
        KeyCode::Left => Action::Move(Direction::Left),
        KeyCode::Right => Action::Move(Direction::Right),
        KeyCode::Enter => Action::Activate,
        KeyCode::Esc => Action::Back,
        KeyCode::Tab => Action::NextView,
        KeyCode::BackTab => Action::PrevView,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('h') => Action::Move(Direction::Left),
        KeyCode::Char('j') => Action::Move(Direction::Down),
        KeyCode::Char('k') => Action::Move(Direction::Up),
        KeyCode::Char('l') => Action::Move(Direction::Right),
        KeyCode::Char('f') => Action::CycleTypeFilter,
        KeyCode::Char('s') => Action::CycleStatusFilter,
        KeyCode::Char('/') => Action::StartSearch,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('y') => Action::Accept,
        KeyCode::Char('n') => Action::Decline,
        _ => Action::Noop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn vim_keys_and_arrows_agree() {
        let pairs = [
            (KeyCode::Char('h'), KeyCode::Left),
            (KeyCode::Char('j'), KeyCode::Down),
            (KeyCode::Char('k'), KeyCode::Up),
            (KeyCode::Char('l'), KeyCode::Right),
        ];
        for (vim, arrow) in pairs {
            assert_eq!(action_for_key(key(vim), false), action_for_key(key(arrow), false));
        }
        assert_eq!(
            action_for_key(key(KeyCode::Char('j')), false),
            Action::Move(Direction::Down)
        );
    }

    #[test]
    fn tab_and_back_tab_cycle_views() {
        assert_eq!(action_for_key(key(KeyCode::Tab), false), Action::NextView);
        assert_eq!(
            action_for_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), false),
            Action::PrevView
        );
    }

    #[test]
    fn text_mode_captures_letters() {
        assert_eq!(
            action_for_key(key(KeyCode::Char('j')), true),
            Action::InputChar('j')
        );
        assert_eq!(action_for_key(key(KeyCode::Char('q')), true), Action::InputChar('q'));
        assert_eq!(action_for_key(key(KeyCode::Esc), true), Action::Cancel);
        assert_eq!(action_for_key(key(KeyCode::Enter), true), Action::SubmitText);
        assert_eq!(action_for_key(key(KeyCode::Backspace), true), Action::Backspace);
        assert_eq!(action_for_key(key(KeyCode::Tab), true), Action::Noop);
    }

    #[test]
    fn confirmation_answers() {
        assert_eq!(action_for_key(key(KeyCode::Char('y')), false), Action::Accept);
        assert_eq!(action_for_key(key(KeyCode::Char('n')), false), Action::Decline);
        assert_eq!(action_for_key(key(KeyCode::Char('y')), true), Action::InputChar('y'));
    }

    #[test]
    fn ctrl_c_quits_outside_text_mode() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(ctrl_c, false), Action::Quit);
        assert_eq!(action_for_key(ctrl_c, true), Action::Noop);
    }
}
