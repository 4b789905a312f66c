use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for the second key
    GoHome,
    GoContact,
    StartPathInput,
    // Case-study selection on the home page
    NextItem,
    PrevItem,
    Select,
    // Contact form
    StartEditing,
    StopEditing,
    NextField,
    PrevField,
    CycleNext,
    CyclePrev,
    Back,
    Submit,
    ReopenForm,
    Confirm,
    Cancel,
    InputChar(char),
    Backspace,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    if let Mode::PathInput(_) = app.mode {
        return handle_input_mode(key);
    }

    if app.is_editing() {
        return handle_form_mode(key);
    }

    // Second key of a g-sequence
    if app.pending_key == Some('g') {
        match key.code {
            KeyCode::Char('g') => return Action::JumpToTop,
            KeyCode::Char('h') => return Action::GoHome,
            KeyCode::Char('c') => return Action::GoContact,
            _ => {}
        }
    }

    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Scrolling
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::PageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::PageUp,
        (KeyCode::Char(' '), KeyModifiers::NONE) => Action::PageDown,
        (KeyCode::PageDown, _) => Action::PageDown,
        (KeyCode::PageUp, _) => Action::PageUp,

        (KeyCode::Char('g'), KeyModifiers::NONE) => Action::PendingG,
        (KeyCode::Char('G'), _) => Action::JumpToBottom,

        (KeyCode::Char(':'), _) => Action::StartPathInput,

        (KeyCode::Tab, KeyModifiers::NONE) => Action::NextItem,
        (KeyCode::BackTab, _) => Action::PrevItem,
        (KeyCode::Enter, KeyModifiers::NONE) => Action::Select,

        (KeyCode::Char('i'), KeyModifiers::NONE) => Action::StartEditing,
        (KeyCode::Char('o'), KeyModifiers::NONE) => Action::ReopenForm,

        _ => Action::None,
    }
}

/// Handle key events in path input mode
fn handle_input_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

/// Handle key events while typing into the contact form
fn handle_form_mode(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Action::Submit,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::Back,
        (KeyCode::Esc, _) => Action::StopEditing,
        (KeyCode::Tab, _) | (KeyCode::Down, _) => Action::NextField,
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => Action::PrevField,
        (KeyCode::Right, _) => Action::CycleNext,
        (KeyCode::Left, _) => Action::CyclePrev,
        (KeyCode::Enter, _) => Action::Confirm,
        (KeyCode::Backspace, _) => Action::Backspace,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::InputChar(c)
        }
        _ => Action::None,
    }
}
