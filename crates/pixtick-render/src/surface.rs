//! Pixel-addressable destinations.

use pixtick_types::{Color, Size};

use crate::error::DisplayError;

/// A monochrome frame buffer that can be pushed to a display.
///
/// `set_pixel` must silently ignore coordinates outside [`Self::size`].
pub trait Surface {
    fn size(&self) -> Size;

    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Set every pixel to the background color.
    fn clear(&mut self);

    /// Push the frame buffer to the device.
    fn present(&mut self) -> Result<(), DisplayError>;
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        (**self).set_pixel(x, y, color);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        (**self).present()
    }
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        (**self).set_pixel(x, y, color);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        (**self).present()
    }
}

/// The top-left `size` pixels of an inner surface.
///
/// Writes outside the viewport are dropped; `size` is clamped to the inner
/// surface.
pub struct Viewport<S> {
    inner: S,
    size: Size,
}

impl<S: Surface> Viewport<S> {
    pub fn new(inner: S, size: Size) -> Self {
        let outer = inner.size();
        let size = Size::new(size.width.min(outer.width), size.height.min(outer.height));
        Self { inner, size }
    }
}

impl<S: Surface> Surface for Viewport<S> {
    fn size(&self) -> Size {
        self.size
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.size.contains(x, y) {
            self.inner.set_pixel(x, y, color);
        }
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.inner.present()
    }
}
