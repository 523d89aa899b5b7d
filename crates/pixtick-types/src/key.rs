//! Logical key space.
//!
//! Every physical input (matrix buttons, rotary encoder, analog joystick)
//! is mapped onto one entry of [`LogicalKey`] before debouncing, so game
//! code never cares how a key was actuated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of logical keys.
pub const KEY_COUNT: usize = 20;

/// A logical key.
///
/// The discriminant is the key's index in every per-key table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum LogicalKey {
    // Key matrix, row-major
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Key10,
    Key11,

    // Digital pins
    RotaryButton,
    Joystick,

    // Rotary rotation pseudo-keys
    RotaryLeft,
    RotaryRight,

    // Joystick direction pseudo-keys
    Left,
    Right,
    Up,
    Down,
}

impl LogicalKey {
    #[allow(non_upper_case_globals)]
    pub const ArrowLeft: Self = Self::Left;
    #[allow(non_upper_case_globals)]
    pub const ArrowRight: Self = Self::Right;
    #[allow(non_upper_case_globals)]
    pub const ArrowUp: Self = Self::Up;
    #[allow(non_upper_case_globals)]
    pub const ArrowDown: Self = Self::Down;

    /// All keys in index order.
    pub const ALL: [Self; KEY_COUNT] = [
        Self::Key0,
        Self::Key1,
        Self::Key2,
        Self::Key3,
        Self::Key4,
        Self::Key5,
        Self::Key6,
        Self::Key7,
        Self::Key8,
        Self::Key9,
        Self::Key10,
        Self::Key11,
        Self::RotaryButton,
        Self::Joystick,
        Self::RotaryLeft,
        Self::RotaryRight,
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
    ];

    /// The twelve matrix keys, row-major.
    pub const MATRIX: [Self; 12] = [
        Self::Key0,
        Self::Key1,
        Self::Key2,
        Self::Key3,
        Self::Key4,
        Self::Key5,
        Self::Key6,
        Self::Key7,
        Self::Key8,
        Self::Key9,
        Self::Key10,
        Self::Key11,
    ];

    /// Index of this key in per-key tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Key for a table index, if in range.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether this key is a momentary pulse (rotary rotation).
    #[must_use]
    pub fn is_pulse(self) -> bool {
        matches!(self, Self::RotaryLeft | Self::RotaryRight)
    }

    /// Whether this key belongs to the key matrix.
    #[must_use]
    pub fn is_matrix(self) -> bool {
        self.index() < Self::MATRIX.len()
    }

    fn name(self) -> &'static str {
        match self {
            Self::Key0 => "Key0",
            Self::Key1 => "Key1",
            Self::Key2 => "Key2",
            Self::Key3 => "Key3",
            Self::Key4 => "Key4",
            Self::Key5 => "Key5",
            Self::Key6 => "Key6",
            Self::Key7 => "Key7",
            Self::Key8 => "Key8",
            Self::Key9 => "Key9",
            Self::Key10 => "Key10",
            Self::Key11 => "Key11",
            Self::RotaryButton => "RotaryButton",
            Self::Joystick => "Joystick",
            Self::RotaryLeft => "RotaryLeft",
            Self::RotaryRight => "RotaryRight",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Up => "Up",
            Self::Down => "Down",
        }
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for LogicalKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ArrowLeft" => return Ok(Self::ArrowLeft),
            "ArrowRight" => return Ok(Self::ArrowRight),
            "ArrowUp" => return Ok(Self::ArrowUp),
            "ArrowDown" => return Ok(Self::ArrowDown),
            _ => {}
        }
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

/// A set of logical keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeySet(u32);

impl KeySet {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn all() -> Self {
        Self((1 << KEY_COUNT) - 1)
    }

    pub fn insert(&mut self, key: LogicalKey) {
        self.0 |= 1 << key.index();
    }

    pub fn remove(&mut self, key: LogicalKey) {
        self.0 &= !(1 << key.index());
    }

    pub fn set(&mut self, key: LogicalKey, present: bool) {
        if present {
            self.insert(key);
        } else {
            self.remove(key);
        }
    }

    #[must_use]
    pub fn contains(&self, key: LogicalKey) -> bool {
        self.0 & (1 << key.index()) != 0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the keys in index order.
    pub fn iter(&self) -> impl Iterator<Item = LogicalKey> + '_ {
        LogicalKey::ALL.into_iter().filter(|k| self.contains(*k))
    }
}

impl FromIterator<LogicalKey> for KeySet {
    fn from_iter<I: IntoIterator<Item = LogicalKey>>(iter: I) -> Self {
        let mut set = Self::empty();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl<const N: usize> From<[LogicalKey; N]> for KeySet {
    fn from(keys: [LogicalKey; N]) -> Self {
        keys.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_order_matches_table() {
        for (i, key) in LogicalKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
            assert_eq!(LogicalKey::from_index(i), Some(*key));
        }
        assert_eq!(LogicalKey::from_index(KEY_COUNT), None);
    }

    #[test]
    fn key_ranges() {
        assert_eq!(LogicalKey::RotaryButton.index(), 12);
        assert_eq!(LogicalKey::RotaryLeft.index(), 14);
        assert_eq!(LogicalKey::Left.index(), 16);
        assert_eq!(LogicalKey::Down.index(), KEY_COUNT - 1);
        assert!(LogicalKey::Key11.is_matrix());
        assert!(!LogicalKey::RotaryButton.is_matrix());
        assert!(LogicalKey::RotaryRight.is_pulse());
        assert!(!LogicalKey::Up.is_pulse());
    }

    #[test]
    fn arrow_aliases() {
        assert_eq!(LogicalKey::ArrowLeft, LogicalKey::Left);
        assert_eq!(LogicalKey::ArrowDown, LogicalKey::Down);
        assert_eq!("ArrowUp".parse::<LogicalKey>(), Ok(LogicalKey::Up));
    }

    #[test]
    fn parse_display() {
        for key in LogicalKey::ALL {
            assert_eq!(key.to_string().parse::<LogicalKey>(), Ok(key));
        }
        assert!("Key12".parse::<LogicalKey>().is_err());
    }

    #[test]
    fn key_set_ops() {
        let mut set = KeySet::empty();
        assert!(set.is_empty());
        set.insert(LogicalKey::Key3);
        set.insert(LogicalKey::Up);
        set.insert(LogicalKey::Key3);
        assert_eq!(set.len(), 2);
        assert!(set.contains(LogicalKey::Up));
        assert!(!set.contains(LogicalKey::Down));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![LogicalKey::Key3, LogicalKey::Up]
        );

        set.remove(LogicalKey::Key3);
        assert_eq!(set, KeySet::from([LogicalKey::Up]));
        assert_eq!(KeySet::all().len(), KEY_COUNT);
    }

    #[test]
    fn key_deserializes_by_name() {
        #[derive(Deserialize)]
        struct Binding {
            key: LogicalKey,
        }
        let b: Binding = toml::from_str(r#"key = "RotaryLeft""#).unwrap();
        assert_eq!(b.key, LogicalKey::RotaryLeft);
    }
}
