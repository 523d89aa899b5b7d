//! Shared types for pixtick.
//!
//! This crate contains the types shared across the pixtick workspace:
//! the fixed logical key space, key sets, monochrome colors, and screen
//! geometry (sizes and display rotations).

pub mod key;
pub mod screen;

pub use key::{KeySet, LogicalKey, UnknownKey, KEY_COUNT};
pub use screen::{Color, InvalidRotation, Rotation, Size};
