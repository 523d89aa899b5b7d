//! Mock input backends for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use pixtick_types::{KeySet, LogicalKey};

use crate::error::InputError;
use crate::sources::{AnalogAxes, DigitalPin, MatrixPins, QuadratureCounter};
use crate::RawInput;

// ---------------------------------------------------------------------------
// MockInput
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MockInputState {
    held: KeySet,
    script: VecDeque<KeySet>,
    latched: KeySet,
    fail_polls: u32,
    polls: u64,
}

/// Mock [`RawInput`] backend.
///
/// Each tick latches either the next scripted frame or, once the script
/// runs out, the currently held keys.
pub struct MockInput {
    state: Arc<Mutex<MockInputState>>,
}

impl Default for MockInput {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInput {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockInputState::default())),
        }
    }

    /// Get a clonable handle for driving the mock from tests.
    pub fn handle(&self) -> MockInputHandle {
        MockInputHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl RawInput for MockInput {
    fn begin_tick(&mut self) -> Result<(), InputError> {
        let mut state = self.state.lock().unwrap();
        state.polls += 1;
        if state.fail_polls > 0 {
            state.fail_polls -= 1;
            return Err(InputError::Poll("mock poll failure".into()));
        }
        state.latched = match state.script.pop_front() {
            Some(frame) => frame,
            None => state.held,
        };
        Ok(())
    }

    fn sample_line(&mut self, key: LogicalKey) -> bool {
        self.state.lock().unwrap().latched.contains(key)
    }
}

/// Clonable driver handle for [`MockInput`].
#[derive(Clone)]
pub struct MockInputHandle {
    state: Arc<Mutex<MockInputState>>,
}

impl MockInputHandle {
    pub fn press(&self, key: LogicalKey) {
        self.state.lock().unwrap().held.insert(key);
    }

    pub fn release(&self, key: LogicalKey) {
        self.state.lock().unwrap().held.remove(key);
    }

    pub fn set_held(&self, keys: KeySet) {
        self.state.lock().unwrap().held = keys;
    }

    /// Queue raw frames, one per tick, ahead of the held set.
    pub fn script(&self, frames: impl IntoIterator<Item = KeySet>) {
        self.state.lock().unwrap().script.extend(frames);
    }

    /// Make the next `count` polls fail.
    pub fn fail_next_polls(&self, count: u32) {
        self.state.lock().unwrap().fail_polls = count;
    }

    /// Number of `begin_tick` calls so far, failed ones included.
    pub fn polls(&self) -> u64 {
        self.state.lock().unwrap().polls
    }
}

// ---------------------------------------------------------------------------
// Physical source mocks
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct MatrixState {
    rows: usize,
    cols: usize,
    closed: Vec<bool>,
}

/// Clonable mock key matrix; all clones share switch state.
#[derive(Debug, Clone)]
pub struct MockMatrix {
    state: Arc<Mutex<MatrixState>>,
}

impl MockMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(MatrixState {
                rows,
                cols,
                closed: vec![false; rows * cols],
            })),
        }
    }

    pub fn set(&self, row: usize, col: usize, closed: bool) {
        let mut state = self.state.lock().unwrap();
        let cols = state.cols;
        state.closed[row * cols + col] = closed;
    }
}

impl MatrixPins for MockMatrix {
    fn rows(&self) -> usize {
        self.state.lock().unwrap().rows
    }

    fn cols(&self) -> usize {
        self.state.lock().unwrap().cols
    }

    fn is_closed(&mut self, row: usize, col: usize) -> bool {
        let state = self.state.lock().unwrap();
        state.closed[row * state.cols + col]
    }
}

/// Clonable mock digital pin.
#[derive(Debug, Clone)]
pub struct MockPin {
    level: Arc<Mutex<bool>>,
}

impl MockPin {
    pub fn new(high: bool) -> Self {
        Self {
            level: Arc::new(Mutex::new(high)),
        }
    }

    pub fn set(&self, high: bool) {
        *self.level.lock().unwrap() = high;
    }
}

impl DigitalPin for MockPin {
    fn is_high(&mut self) -> bool {
        *self.level.lock().unwrap()
    }
}

/// Clonable mock quadrature counter.
#[derive(Debug, Clone, Default)]
pub struct MockCounter {
    position: Arc<Mutex<i32>>,
}

impl MockCounter {
    /// Move the counter by `steps` detents.
    pub fn turn(&self, steps: i32) {
        *self.position.lock().unwrap() += steps;
    }
}

impl QuadratureCounter for MockCounter {
    fn position(&mut self) -> i32 {
        *self.position.lock().unwrap()
    }
}

/// Clonable mock joystick ADC.
#[derive(Debug, Clone)]
pub struct MockAxes {
    xy: Arc<Mutex<(u16, u16)>>,
}

impl MockAxes {
    pub fn centered() -> Self {
        Self {
            xy: Arc::new(Mutex::new((0x8000, 0x8000))),
        }
    }

    pub fn set(&self, x: u16, y: u16) {
        *self.xy.lock().unwrap() = (x, y);
    }
}

impl AnalogAxes for MockAxes {
    fn read_x(&mut self) -> u16 {
        self.xy.lock().unwrap().0
    }

    fn read_y(&mut self) -> u16 {
        self.xy.lock().unwrap().1
    }
}
