//! Key-event aggregator.
//!
//! [`InputState`] owns one [`LineState`] per logical key and derives the
//! per-tick key-event sets from their phases. [`InputHandle`] puts it
//! behind a single mutex so a sampling context and the game loop can share
//! it; each lock covers either one whole advance or one snapshot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pixtick_types::{KeySet, LogicalKey, KEY_COUNT};
use tracing::debug;

use crate::debounce::{Edge, LineState, Phase};

/// Per-key debounce thresholds, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds([u32; KEY_COUNT]);

impl Thresholds {
    /// The same threshold for every key.
    pub fn uniform(ticks: u32) -> Self {
        Self([ticks; KEY_COUNT])
    }

    /// `ticks` for regular keys and `pulse_ticks` for the rotary
    /// rotation pseudo-keys.
    pub fn new(ticks: u32, pulse_ticks: u32) -> Self {
        let mut thresholds = Self::uniform(ticks);
        for key in LogicalKey::ALL.into_iter().filter(|k| k.is_pulse()) {
            thresholds.0[key.index()] = pulse_ticks;
        }
        thresholds
    }

    #[must_use]
    pub fn with(mut self, key: LogicalKey, ticks: u32) -> Self {
        self.0[key.index()] = ticks;
        self
    }

    pub fn get(&self, key: LogicalKey) -> u32 {
        self.0[key.index()]
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(2, 0)
    }
}

/// Read-only snapshot of one tick's key events.
///
/// Edge sets are only meaningful for the tick they were taken on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvents {
    tick: u64,
    pressed: KeySet,
    just_pressed: KeySet,
    just_released: KeySet,
    hold: [u32; KEY_COUNT],
}

impl KeyEvents {
    /// Number of advances that produced this snapshot.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn pressed(&self) -> KeySet {
        self.pressed
    }

    pub fn just_pressed(&self) -> KeySet {
        self.just_pressed
    }

    pub fn just_released(&self) -> KeySet {
        self.just_released
    }

    pub fn is_pressed(&self, key: LogicalKey) -> bool {
        self.pressed.contains(key)
    }

    pub fn is_just_pressed(&self, key: LogicalKey) -> bool {
        self.just_pressed.contains(key)
    }

    pub fn is_just_released(&self, key: LogicalKey) -> bool {
        self.just_released.contains(key)
    }

    pub fn hold_duration(&self, key: LogicalKey) -> u32 {
        self.hold[key.index()]
    }
}

impl Default for KeyEvents {
    fn default() -> Self {
        Self {
            tick: 0,
            pressed: KeySet::empty(),
            just_pressed: KeySet::empty(),
            just_released: KeySet::empty(),
            hold: [0; KEY_COUNT],
        }
    }
}

/// Debounce state for the whole logical key space.
#[derive(Debug, Clone)]
pub struct InputState {
    lines: [LineState; KEY_COUNT],
    thresholds: Thresholds,
    tick: u64,
}

impl InputState {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            lines: [LineState::new(); KEY_COUNT],
            thresholds,
            tick: 0,
        }
    }

    /// Advance every line by one tick; `raw` holds the asserted lines.
    pub fn advance(&mut self, raw: KeySet) {
        self.tick += 1;
        for key in LogicalKey::ALL {
            let threshold = self.thresholds.get(key);
            match self.lines[key.index()].advance(raw.contains(key), threshold) {
                Some(Edge::Press) => debug!(key = %key, tick = self.tick, "key pressed"),
                Some(Edge::Release) => debug!(key = %key, tick = self.tick, "key released"),
                None => {}
            }
        }
    }

    /// Return every line to idle.
    pub fn reset(&mut self) {
        self.lines = [LineState::new(); KEY_COUNT];
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn phase(&self, key: LogicalKey) -> Phase {
        self.lines[key.index()].phase()
    }

    pub fn pressed_keys(&self) -> KeySet {
        self.keys_where(Phase::is_down)
    }

    pub fn just_pressed_keys(&self) -> KeySet {
        self.keys_where(|p| p == Phase::RisingEdge)
    }

    pub fn just_released_keys(&self) -> KeySet {
        self.keys_where(|p| p == Phase::FallingEdge)
    }

    pub fn hold_duration(&self, key: LogicalKey) -> u32 {
        self.lines[key.index()].hold_duration()
    }

    pub fn snapshot(&self) -> KeyEvents {
        let mut hold = [0; KEY_COUNT];
        for (slot, line) in hold.iter_mut().zip(&self.lines) {
            *slot = line.hold_duration();
        }
        KeyEvents {
            tick: self.tick,
            pressed: self.pressed_keys(),
            just_pressed: self.just_pressed_keys(),
            just_released: self.just_released_keys(),
            hold,
        }
    }

    fn keys_where(&self, f: impl Fn(Phase) -> bool) -> KeySet {
        LogicalKey::ALL
            .into_iter()
            .filter(|key| f(self.lines[key.index()].phase()))
            .collect()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

/// Clonable, lock-guarded handle to an [`InputState`].
#[derive(Debug, Clone, Default)]
pub struct InputHandle {
    state: Arc<Mutex<InputState>>,
}

impl InputHandle {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            state: Arc::new(Mutex::new(InputState::new(thresholds))),
        }
    }

    /// Advance all lines under one lock.
    pub fn advance(&self, raw: KeySet) {
        self.lock().advance(raw);
    }

    /// Take the current tick's event snapshot under one lock.
    pub fn snapshot(&self) -> KeyEvents {
        self.lock().snapshot()
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    fn lock(&self) -> MutexGuard<'_, InputState> {
        // A panic mid-advance leaves every line in a valid phase.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
