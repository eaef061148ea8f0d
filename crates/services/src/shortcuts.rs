//! Keyboard shortcuts for the quiz view.
//!
//! The UI forwards raw key events here. Navigation and the settings panel are
//! handled against the store directly; option selection, submission and help
//! are returned for the UI to act on, since selection state lives in the UI.

use crate::store::QuestionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// `1` to `9`.
    Digit(u8),
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Char(char),
}

impl Key {
    /// Parse a DOM-style key name (`"ArrowLeft"`, `"Enter"`, `"3"`, `"?"`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            "Enter" => Some(Self::Enter),
            "Escape" => Some(Self::Escape),
            _ => {
                let mut chars = name.chars();
                let ch = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                match ch.to_digit(10) {
                    Some(d @ 1..=9) => u8::try_from(d).ok().map(Self::Digit),
                    _ => Some(Self::Char(ch)),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    /// Set when focus is in a text field; such events are ignored.
    pub from_text_input: bool,
}

impl KeyEvent {
    #[must_use]
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            from_text_input: false,
        }
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
}

/// What a handled shortcut did or asks the UI to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Toggle option `n` (0-based) of the current question.
    SelectOption(usize),
    /// The display index moved to the contained value.
    Navigated(usize),
    /// Submit the current selection.
    Submit,
    SettingsClosed,
    ShowHelp,
}

/// Apply `event` to `store`. Returns `None` when the key does nothing.
pub fn handle_key(store: &mut QuestionStore, event: &KeyEvent) -> Option<ShortcutAction> {
    if event.from_text_input {
        return None;
    }

    match event.key {
        Key::Digit(n @ 1..=9) => {
            let option = usize::from(n - 1);
            let options = store.current_question()?.options().len();
            (option < options).then_some(ShortcutAction::SelectOption(option))
        }
        Key::Digit(_) => None,
        Key::ArrowLeft => {
            let current = store.current_question_index();
            if current == 0 {
                return None;
            }
            store.set_current_question(current - 1);
            Some(ShortcutAction::Navigated(store.current_question_index()))
        }
        Key::ArrowRight => {
            let current = store.current_question_index();
            if current + 1 >= store.available_question_count() {
                return None;
            }
            store.set_current_question(current + 1);
            Some(ShortcutAction::Navigated(store.current_question_index()))
        }
        Key::Enter => Some(ShortcutAction::Submit),
        Key::Escape => {
            if !store.is_settings_open() {
                return None;
            }
            store.close_settings();
            Some(ShortcutAction::SettingsClosed)
        }
        Key::Char('?') if event.ctrl || event.meta => Some(ShortcutAction::ShowHelp),
        Key::Char(_) => None,
    }
}
