use crate::runtime::command::Command;
use crate::state::text_input::TextAction;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn alt(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::ALT)
    }

    pub fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

#[derive(Default)]
pub struct KeyBindings {
    bindings: HashMap<KeyBinding, Command>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut manager = Self::default();
        manager.install_defaults();
        manager
    }

    pub fn bind(&mut self, key: KeyBinding, command: Command) {
        self.bindings.insert(key, command);
    }

    /// Bound command for a key, or the key itself as input.
    pub fn resolve(&self, event: KeyEvent) -> Command {
        self.bindings
            .get(&KeyBinding::from_event(event))
            .copied()
            .unwrap_or(Command::InputKey(event))
    }

    fn install_defaults(&mut self) {
        self.bind(KeyBinding::ctrl(KeyCode::Char('c')), Command::Exit);
        self.bind(KeyBinding::ctrl(KeyCode::Char('s')), Command::Save);
        self.bind(KeyBinding::ctrl(KeyCode::Char('n')), Command::AddColumn);
        self.bind(KeyBinding::ctrl(KeyCode::Char('d')), Command::RemoveColumn);
        self.bind(KeyBinding::ctrl(KeyCode::Char('o')), Command::OpenImage);
        self.bind(KeyBinding::ctrl(KeyCode::Char('u')), Command::ChangeFile);

        self.bind(KeyBinding::key(KeyCode::Enter), Command::Submit);
        self.bind(KeyBinding::key(KeyCode::Esc), Command::Cancel);
        self.bind(KeyBinding::key(KeyCode::Tab), Command::NextFocus);
        self.bind(
            KeyBinding::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            Command::PrevFocus,
        );
        self.bind(KeyBinding::key(KeyCode::BackTab), Command::PrevFocus);

        self.bind(KeyBinding::key(KeyCode::PageDown), Command::NextRecord);
        self.bind(KeyBinding::key(KeyCode::PageUp), Command::PrevRecord);
        self.bind(KeyBinding::alt(KeyCode::Right), Command::NextRecord);
        self.bind(KeyBinding::alt(KeyCode::Left), Command::PrevRecord);

        self.bind(
            KeyBinding::ctrl(KeyCode::Backspace),
            Command::TextAction(TextAction::DeleteWordLeft),
        );
        self.bind(
            KeyBinding::ctrl(KeyCode::Char('w')),
            Command::TextAction(TextAction::DeleteWordLeft),
        );
        self.bind(
            KeyBinding::ctrl(KeyCode::Delete),
            Command::TextAction(TextAction::DeleteWordRight),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_resolve_and_other_keys_pass_through() {
        let bindings = KeyBindings::new();
        assert_eq!(bindings.resolve(KeyEvent::ctrl('s')), Command::Save);
        assert_eq!(
            bindings.resolve(KeyEvent::alt(KeyCode::Left)),
            Command::PrevRecord
        );
        let plain = KeyEvent::plain(KeyCode::Char('s'));
        assert_eq!(bindings.resolve(plain), Command::InputKey(plain));
    }
}
