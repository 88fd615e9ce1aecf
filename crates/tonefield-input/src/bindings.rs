//! Named key bindings for observer movement.
//!
//! Bindings are configured with logical key names such as `"w"`,
//! `"ArrowUp"` or `"KeyW"` and resolved once to physical key codes.

use winit::keyboard::{KeyCode, PhysicalKey};

use crate::keyboard::KeyboardState;

/// The four planar movement directions an observer can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveAction {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveAction {
    pub const ALL: [MoveAction; 4] = [Self::Forward, Self::Back, Self::Left, Self::Right];
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("unknown key name `{0}`")]
    UnknownKey(String),
}

/// Movement action to physical key mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveBindings {
    pub forward: KeyCode,
    pub back: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl Default for MoveBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            back: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
        }
    }
}

impl MoveBindings {
    /// Resolve bindings from logical key names.
    pub fn from_names(
        forward: &str,
        back: &str,
        left: &str,
        right: &str,
    ) -> Result<Self, BindingError> {
        Ok(Self {
            forward: parse_key_name(forward)?,
            back: parse_key_name(back)?,
            left: parse_key_name(left)?,
            right: parse_key_name(right)?,
        })
    }

    pub fn key_for(&self, action: MoveAction) -> KeyCode {
        match action {
            MoveAction::Forward => self.forward,
            MoveAction::Back => self.back,
            MoveAction::Left => self.left,
            MoveAction::Right => self.right,
        }
    }

    /// Whether the key bound to `action` is held.
    pub fn is_held(&self, keyboard: &KeyboardState, action: MoveAction) -> bool {
        keyboard.is_pressed(PhysicalKey::Code(self.key_for(action)))
    }
}

/// Resolve a key name, case-insensitively.
///
/// Accepts single letters and digits (`"w"`, `"7"`), winit code names
/// (`"KeyW"`, `"Digit7"`, `"ArrowUp"`) and a few common aliases.
pub fn parse_key_name(name: &str) -> Result<KeyCode, BindingError> {
    let lower = name.trim().to_ascii_lowercase();
    let unknown = || BindingError::UnknownKey(name.to_string());

    let stripped = lower
        .strip_prefix("key")
        .or_else(|| lower.strip_prefix("digit"))
        .filter(|rest| rest.len() == 1)
        .unwrap_or(lower.as_str());

    if let [c] = stripped.as_bytes() {
        return char_key(*c).ok_or_else(unknown);
    }

    Ok(match stripped {
        "space" => KeyCode::Space,
        "enter" | "return" => KeyCode::Enter,
        "escape" | "esc" => KeyCode::Escape,
        "tab" => KeyCode::Tab,
        "shift" | "shiftleft" => KeyCode::ShiftLeft,
        "shiftright" => KeyCode::ShiftRight,
        "control" | "ctrl" | "controlleft" => KeyCode::ControlLeft,
        "controlright" => KeyCode::ControlRight,
        "alt" | "altleft" => KeyCode::AltLeft,
        "altright" => KeyCode::AltRight,
        "arrowup" | "up" => KeyCode::ArrowUp,
        "arrowdown" | "down" => KeyCode::ArrowDown,
        "arrowleft" | "left" => KeyCode::ArrowLeft,
        "arrowright" | "right" => KeyCode::ArrowRight,
        _ => return Err(unknown()),
    })
}

fn char_key(c: u8) -> Option<KeyCode> {
    Some(match c {
        b'a' => KeyCode::KeyA,
        b'b' => KeyCode::KeyB,
        b'c' => KeyCode::KeyC,
        b'd' => KeyCode::KeyD,
        b'e' => KeyCode::KeyE,
        b'f' => KeyCode::KeyF,
        b'g' => KeyCode::KeyG,
        b'h' => KeyCode::KeyH,
        b'i' => KeyCode::KeyI,
        b'j' => KeyCode::KeyJ,
        b'k' => KeyCode::KeyK,
        b'l' => KeyCode::KeyL,
        b'm' => KeyCode::KeyM,
        b'n' => KeyCode::KeyN,
        b'o' => KeyCode::KeyO,
        b'p' => KeyCode::KeyP,
        b'q' => KeyCode::KeyQ,
        b'r' => KeyCode::KeyR,
        b's' => KeyCode::KeyS,
        b't' => KeyCode::KeyT,
        b'u' => KeyCode::KeyU,
        b'v' => KeyCode::KeyV,
        b'w' => KeyCode::KeyW,
        b'x' => KeyCode::KeyX,
        b'y' => KeyCode::KeyY,
        b'z' => KeyCode::KeyZ,
        b'0' => KeyCode::Digit0,
        b'1' => KeyCode::Digit1,
        b'2' => KeyCode::Digit2,
        b'3' => KeyCode::Digit3,
        b'4' => KeyCode::Digit4,
        b'5' => KeyCode::Digit5,
        b'6' => KeyCode::Digit6,
        b'7' => KeyCode::Digit7,
        b'8' => KeyCode::Digit8,
        b'9' => KeyCode::Digit9,
        _ => return None,
    })
}
