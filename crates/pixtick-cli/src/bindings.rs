//! Terminal keyboard bindings for the virtual board.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pixtick_types::LogicalKey;

/// What a terminal key does on the virtual board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Key(LogicalKey),
    Quit,
}

/// Human-readable binding table, in logical key order.
pub const BINDINGS: &[(LogicalKey, &str)] = &[
    (LogicalKey::Key0, "z  n  0  space  enter"),
    (LogicalKey::Key1, "x  m  1"),
    (LogicalKey::Key2, "c  ,  2"),
    (LogicalKey::Key3, "v  .  3"),
    (LogicalKey::Key4, "4"),
    (LogicalKey::Key5, "5"),
    (LogicalKey::Key6, "6"),
    (LogicalKey::Key7, "7"),
    (LogicalKey::Key8, "8"),
    (LogicalKey::Key9, "9"),
    (LogicalKey::Key10, "-"),
    (LogicalKey::Key11, "="),
    (LogicalKey::RotaryButton, "r"),
    (LogicalKey::Joystick, "g"),
    (LogicalKey::RotaryLeft, "["),
    (LogicalKey::RotaryRight, "]"),
    (LogicalKey::Left, "left  s  h"),
    (LogicalKey::Right, "right  f  l"),
    (LogicalKey::Up, "up  e  k"),
    (LogicalKey::Down, "down  d  j"),
];

/// Quit keys, for help output.
pub const QUIT_KEYS: &str = "q  esc  ctrl-c";

pub fn action(event: &KeyEvent) -> Option<Action> {
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    let key = match event.code {
        KeyCode::Esc | KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Left | KeyCode::Char('s' | 'h') => LogicalKey::Left,
        KeyCode::Right | KeyCode::Char('f' | 'l') => LogicalKey::Right,
        KeyCode::Up | KeyCode::Char('e' | 'k') => LogicalKey::Up,
        KeyCode::Down | KeyCode::Char('d' | 'j') => LogicalKey::Down,
        KeyCode::Enter | KeyCode::Char('z' | 'n' | '0' | ' ') => LogicalKey::Key0,
        KeyCode::Char('x' | 'm' | '1') => LogicalKey::Key1,
        KeyCode::Char('c' | ',' | '2') => LogicalKey::Key2,
        KeyCode::Char('v' | '.' | '3') => LogicalKey::Key3,
        KeyCode::Char('4') => LogicalKey::Key4,
        KeyCode::Char('5') => LogicalKey::Key5,
        KeyCode::Char('6') => LogicalKey::Key6,
        KeyCode::Char('7') => LogicalKey::Key7,
        KeyCode::Char('8') => LogicalKey::Key8,
        KeyCode::Char('9') => LogicalKey::Key9,
        KeyCode::Char('-') => LogicalKey::Key10,
        KeyCode::Char('=') => LogicalKey::Key11,
        KeyCode::Char('r') => LogicalKey::RotaryButton,
        KeyCode::Char('g') => LogicalKey::Joystick,
        KeyCode::Char('[') => LogicalKey::RotaryLeft,
        KeyCode::Char(']') => LogicalKey::RotaryRight,
        _ => return None,
    };
    Some(Action::Key(key))
}
