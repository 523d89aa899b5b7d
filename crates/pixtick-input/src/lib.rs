//! Debounced key-event engine for pixtick.
//!
//! Raw boolean line samples flow through a per-key [`debounce::LineState`]
//! machine into an [`InputState`], which answers the per-tick queries games
//! use (pressed, just pressed, just released, hold duration).
//!
//! Hardware backends implement [`RawInput`], either directly or by
//! composing the physical sources in [`sources`] into an
//! [`sources::InputBoard`].

use pixtick_types::{KeySet, LogicalKey};

pub mod aggregator;
pub mod debounce;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod sources;

pub use aggregator::{InputHandle, InputState, KeyEvents, Thresholds};
pub use debounce::{Edge, LineState, Phase};
pub use error::InputError;

/// Raw logical input lines, sampled once per tick.
///
/// `begin_tick` runs first and gives the backend a chance to latch state
/// that is read as a whole (matrix scans, encoder counters, ADCs, queued
/// terminal events). `sample_line` is then called once per logical key.
pub trait RawInput: Send {
    /// Latch hardware state for this tick.
    fn begin_tick(&mut self) -> Result<(), InputError> {
        Ok(())
    }

    /// Whether the line for `key` is currently asserted.
    fn sample_line(&mut self, key: LogicalKey) -> bool;
}

impl<T: RawInput + ?Sized> RawInput for Box<T> {
    fn begin_tick(&mut self) -> Result<(), InputError> {
        (**self).begin_tick()
    }

    fn sample_line(&mut self, key: LogicalKey) -> bool {
        (**self).sample_line(key)
    }
}

/// Sample every logical line of `input` into a key set.
pub fn sample_all(input: &mut dyn RawInput) -> KeySet {
    LogicalKey::ALL
        .into_iter()
        .filter(|key| input.sample_line(*key))
        .collect()
}
