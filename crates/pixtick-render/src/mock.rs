//! Mock display backend for testing.

use std::sync::{Arc, Mutex};

use pixtick_types::{Color, Size};

use crate::bitmap::Bitmap;
use crate::error::DisplayError;
use crate::surface::Surface;

#[derive(Debug)]
struct MockDisplayState {
    buffer: Bitmap,
    frames: Vec<Bitmap>,
    set_pixel_calls: u64,
    clears: u64,
    presents: u64,
    fail_on_present: Option<u64>,
}

/// Mock [`Surface`] that records every call and keeps presented frames.
pub struct MockDisplay {
    size: Size,
    state: Arc<Mutex<MockDisplayState>>,
}

impl MockDisplay {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            state: Arc::new(Mutex::new(MockDisplayState {
                buffer: Bitmap::new(size),
                frames: Vec::new(),
                set_pixel_calls: 0,
                clears: 0,
                presents: 0,
                fail_on_present: None,
            })),
        }
    }

    /// Get a clonable handle for observing the display from tests.
    pub fn handle(&self) -> MockDisplayHandle {
        MockDisplayHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl Surface for MockDisplay {
    fn size(&self) -> Size {
        self.size
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let mut state = self.state.lock().unwrap();
        state.set_pixel_calls += 1;
        state.buffer.set(x, y, color.is_on());
    }

    fn clear(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.clears += 1;
        state.buffer.fill(false);
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        let mut state = self.state.lock().unwrap();
        state.presents += 1;
        if state.fail_on_present == Some(state.presents) {
            return Err(DisplayError::Present("mock present failure".into()));
        }
        let frame = state.buffer.clone();
        state.frames.push(frame);
        Ok(())
    }
}

/// Clonable observer handle for [`MockDisplay`].
#[derive(Clone)]
pub struct MockDisplayHandle {
    state: Arc<Mutex<MockDisplayState>>,
}

impl MockDisplayHandle {
    pub fn set_pixel_calls(&self) -> u64 {
        self.state.lock().unwrap().set_pixel_calls
    }

    pub fn clears(&self) -> u64 {
        self.state.lock().unwrap().clears
    }

    /// Present attempts, failed ones included.
    pub fn presents(&self) -> u64 {
        self.state.lock().unwrap().presents
    }

    /// Successfully presented frames, oldest first.
    pub fn frames(&self) -> Vec<Bitmap> {
        self.state.lock().unwrap().frames.clone()
    }

    pub fn last_frame(&self) -> Option<Bitmap> {
        self.state.lock().unwrap().frames.last().cloned()
    }

    /// Make the `n`th present attempt (1-based) fail.
    pub fn fail_on_present(&self, n: u64) {
        self.state.lock().unwrap().fail_on_present = Some(n);
    }
}
