//! Screen geometry and monochrome color types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width and height of a surface in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Same area with width and height exchanged.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Width as a signed pixel coordinate.
    #[must_use]
    pub fn width_i32(self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    /// Height as a signed pixel coordinate.
    #[must_use]
    pub fn height_i32(self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }

    /// Whether `(x, y)` addresses a pixel inside this size.
    #[must_use]
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width_i32() && y < self.height_i32()
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Monochrome pixel color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Background, pixel off.
    #[default]
    Black,
    /// Foreground, pixel lit.
    White,
}

impl Color {
    #[must_use]
    pub fn is_on(self) -> bool {
        self == Self::White
    }

    #[must_use]
    pub fn inverted(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

impl From<bool> for Color {
    fn from(on: bool) -> Self {
        if on {
            Self::White
        } else {
            Self::Black
        }
    }
}

/// Fixed display rotation in 90° steps.
///
/// Serialized as degrees (`0`, `90`, `180`, `270`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rotation must be 0, 90, 180 or 270 degrees, got {0}")]
pub struct InvalidRotation(pub u16);

impl Rotation {
    #[must_use]
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Whether this rotation exchanges width and height.
    #[must_use]
    pub fn is_transposed(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = InvalidRotation;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(InvalidRotation(other)),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_contains() {
        let size = Size::new(128, 64);
        assert!(size.contains(0, 0));
        assert!(size.contains(127, 63));
        assert!(!size.contains(128, 0));
        assert!(!size.contains(0, 64));
        assert!(!size.contains(-1, 10));
    }

    #[test]
    fn size_swapped() {
        assert_eq!(Size::new(128, 64).swapped(), Size::new(64, 128));
        assert!(Size::new(0, 10).is_empty());
    }

    #[test]
    fn rotation_from_degrees() {
        assert_eq!(Rotation::try_from(90), Ok(Rotation::Deg90));
        assert_eq!(Rotation::try_from(45), Err(InvalidRotation(45)));
        assert!(Rotation::Deg270.is_transposed());
        assert!(!Rotation::Deg180.is_transposed());
    }

    #[test]
    fn rotation_deserializes_from_degrees() {
        #[derive(Deserialize)]
        struct Display {
            rotation: Rotation,
        }
        let d: Display = toml::from_str("rotation = 180").unwrap();
        assert_eq!(d.rotation, Rotation::Deg180);
        assert!(toml::from_str::<Display>("rotation = 45").is_err());
    }

    #[test]
    fn color_from_bool() {
        assert_eq!(Color::from(true), Color::White);
        assert!(!Color::from(false).is_on());
        assert_eq!(Color::White.inverted(), Color::Black);
    }
}
