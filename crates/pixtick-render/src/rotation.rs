//! Display rotation adapter.

use pixtick_types::{Color, Rotation, Size};

use crate::error::DisplayError;
use crate::surface::Surface;

/// Presents a rotated view of an inner surface.
///
/// With `(sx, sy)` the inner surface's size, a logical write at `(x, y)`
/// lands on:
///
/// | rotation | inner pixel      |
/// |----------|------------------|
/// | 0°       | `(x, y)`         |
/// | 90°      | `(sx - y, x)`    |
/// | 180°     | `(sx - x, sy - y)` |
/// | 270°     | `(y, sy - x)`    |
#[derive(Debug)]
pub struct Rotated<S> {
    inner: S,
    rotation: Rotation,
}

impl<S: Surface> Rotated<S> {
    pub fn new(inner: S, rotation: Rotation) -> Self {
        Self { inner, rotation }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Change the rotation in place.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn map(&self, x: i32, y: i32) -> (i32, i32) {
        let native = self.inner.size();
        let (sx, sy) = (native.width_i32(), native.height_i32());
        match self.rotation {
            Rotation::Deg0 => (x, y),
            // Saturated results stay out of bounds of the inner surface.
            Rotation::Deg90 => (sx.saturating_sub(y), x),
            Rotation::Deg180 => (sx.saturating_sub(x), sy.saturating_sub(y)),
            Rotation::Deg270 => (y, sy.saturating_sub(x)),
        }
    }
}

impl<S: Surface> Surface for Rotated<S> {
    fn size(&self) -> Size {
        let native = self.inner.size();
        if self.rotation.is_transposed() {
            native.swapped()
        } else {
            native
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let (x, y) = self.map(x, y);
        self.inner.set_pixel(x, y, color);
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.inner.present()
    }
}
