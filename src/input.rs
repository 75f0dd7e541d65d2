//! Keyboard bindings.
//!
//! Maps physical keys to [`Command`]s. Only the initial press of a key
//! counts; OS key repeat is ignored so holding a key issues one command.
//!
//! | Key | Command |
//! |-----|---------|
//! | Up | [`Command::Sharpen`] |
//! | Down | [`Command::Unsharpen`] |
//! | D | [`Command::ToggleDraw`] |
//! | L | [`Command::ToggleTimeLimit`] |
//! | F | [`Command::MoreFriction`] |
//! | V | [`Command::LessFriction`] |
//! | Escape | quit |

use std::collections::HashMap;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::control::Command;

/// What a key press asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Command(Command),
    Quit,
}

/// Physical key to action table.
#[derive(Clone, Debug)]
pub struct KeyBindings {
    map: HashMap<KeyCode, KeyAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings
            .bind(KeyCode::ArrowUp, KeyAction::Command(Command::Sharpen))
            .bind(KeyCode::ArrowDown, KeyAction::Command(Command::Unsharpen))
            .bind(KeyCode::KeyD, KeyAction::Command(Command::ToggleDraw))
            .bind(KeyCode::KeyL, KeyAction::Command(Command::ToggleTimeLimit))
            .bind(KeyCode::KeyF, KeyAction::Command(Command::MoreFriction))
            .bind(KeyCode::KeyV, KeyAction::Command(Command::LessFriction))
            .bind(KeyCode::Escape, KeyAction::Quit);
        bindings
    }
}

impl KeyBindings {
    /// A table with no bindings.
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind `key`, replacing any previous binding.
    pub fn bind(&mut self, key: KeyCode, action: KeyAction) -> &mut Self {
        self.map.insert(key, action);
        self
    }

    /// Action bound to `key`, if any.
    pub fn lookup(&self, key: KeyCode) -> Option<KeyAction> {
        self.map.get(&key).copied()
    }

    /// Resolve a key press from the state it carries.
    pub fn resolve(&self, key: PhysicalKey, state: ElementState, repeat: bool) -> Option<KeyAction> {
        if state != ElementState::Pressed || repeat {
            return None;
        }
        match key {
            PhysicalKey::Code(code) => self.lookup(code),
            PhysicalKey::Unidentified(_) => None,
        }
    }

    /// Resolve a winit keyboard event.
    pub fn action_for(&self, event: &KeyEvent) -> Option<KeyAction> {
        self.resolve(event.physical_key, event.state, event.repeat)
    }
}
