//! Per-frame drawing context handed to games.

use std::convert::Infallible;
use std::fmt;

use embedded_graphics::geometry::{OriginDimensions, Point, Size as EgSize};
use embedded_graphics::mono_font::ascii::FONT_5X7;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, Drawable, Pixel, Primitive};
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Baseline, Text};
use pixtick_types::{Color, Size};

use crate::assets::BitmapCache;
use crate::bitmap::Bitmap;
use crate::compositor::{draw_image, Clip, DrawImageOptions};
use crate::geom::GeoM;
use crate::surface::Surface;

/// Vertical advance of [`Screen::println`], in pixels.
pub const LINE_HEIGHT: i32 = 8;

/// Left margin of [`Screen::println`] text.
pub const TEXT_MARGIN: i32 = 2;

/// Drawing context for one frame.
///
/// The `println` cursor starts at the top for every new `Screen`.
pub struct Screen<'a> {
    target: &'a mut dyn Surface,
    assets: &'a mut BitmapCache,
    clip: Clip,
    text_y: i32,
}

impl<'a> Screen<'a> {
    pub fn new(target: &'a mut dyn Surface, assets: &'a mut BitmapCache) -> Self {
        Self {
            target,
            assets,
            clip: Clip::default(),
            text_y: 0,
        }
    }

    /// Set the clip mode used by [`Self::options`].
    #[must_use]
    pub fn with_clip(mut self, clip: Clip) -> Self {
        self.clip = clip;
        self
    }

    /// Draw options for `geom` with this frame's clip mode.
    pub fn options(&self, geom: GeoM) -> DrawImageOptions {
        DrawImageOptions::new(geom).with_clip(self.clip)
    }

    /// Logical size of the frame.
    pub fn size(&self) -> Size {
        self.target.size()
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.target.set_pixel(x, y, color);
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Color) {
        if !color.is_on() {
            self.target.clear();
            return;
        }
        let size = self.target.size();
        for y in 0..size.height_i32() {
            for x in 0..size.width_i32() {
                self.target.set_pixel(x, y, color);
            }
        }
    }

    pub fn rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let rect = Rectangle::new(Point::new(x, y), EgSize::new(w, h));
        self.paint(&rect.into_styled(stroke(color)));
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let rect = Rectangle::new(Point::new(x, y), EgSize::new(w, h));
        self.paint(&rect.into_styled(PrimitiveStyle::with_fill(binary(color))));
    }

    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        let line = Line::new(Point::new(x1, y1), Point::new(x2, y2));
        self.paint(&line.into_styled(stroke(color)));
    }

    /// Circle outline centered on `(x, y)`.
    pub fn circle(&mut self, x: i32, y: i32, r: u32, color: Color) {
        self.paint(&centered_circle(x, y, r).into_styled(stroke(color)));
    }

    pub fn fill_circle(&mut self, x: i32, y: i32, r: u32, color: Color) {
        let style = PrimitiveStyle::with_fill(binary(color));
        self.paint(&centered_circle(x, y, r).into_styled(style));
    }

    pub fn triangle(&mut self, p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), color: Color) {
        let triangle = Triangle::new(point(p0), point(p1), point(p2));
        self.paint(&triangle.into_styled(stroke(color)));
    }

    pub fn fill_triangle(&mut self, p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), color: Color) {
        let triangle = Triangle::new(point(p0), point(p1), point(p2));
        self.paint(&triangle.into_styled(PrimitiveStyle::with_fill(binary(color))));
    }

    /// Draw `text` with its baseline at `y`.
    pub fn text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        let style = MonoTextStyle::new(&FONT_5X7, binary(color));
        self.paint(&Text::with_baseline(
            text,
            Point::new(x, y),
            style,
            Baseline::Alphabetic,
        ));
    }

    /// Draw `line` one line below the previous `println` of this frame.
    pub fn println(&mut self, line: impl fmt::Display) {
        self.text_y += LINE_HEIGHT;
        let text = line.to_string();
        self.text(TEXT_MARGIN, self.text_y, &text, Color::White);
    }

    pub fn draw_image(&mut self, bitmap: &Bitmap, options: &DrawImageOptions) {
        draw_image(bitmap, options, &mut *self.target);
    }

    /// Draw the bitmap stored at `path`. Assets that fail to load are
    /// skipped.
    pub fn draw_asset(&mut self, path: &str, options: &DrawImageOptions) {
        if let Some(bitmap) = self.assets.get(path) {
            draw_image(&bitmap, options, &mut *self.target);
        }
    }

    pub fn assets(&mut self) -> &mut BitmapCache {
        self.assets
    }

    fn paint<D>(&mut self, item: &D)
    where
        D: Drawable<Color = BinaryColor>,
    {
        let mut target = SurfaceTarget(&mut *self.target);
        match item.draw(&mut target) {
            Ok(_) => {}
            Err(never) => match never {},
        }
    }
}

/// Exposes a [`Surface`] as an embedded-graphics draw target.
struct SurfaceTarget<'s>(&'s mut dyn Surface);

impl OriginDimensions for SurfaceTarget<'_> {
    fn size(&self) -> EgSize {
        let size = self.0.size();
        EgSize::new(size.width, size.height)
    }
}

impl DrawTarget for SurfaceTarget<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(at, color) in pixels {
            self.0.set_pixel(at.x, at.y, Color::from(color.is_on()));
        }
        Ok(())
    }
}

fn binary(color: Color) -> BinaryColor {
    if color.is_on() {
        BinaryColor::On
    } else {
        BinaryColor::Off
    }
}

fn stroke(color: Color) -> PrimitiveStyle<BinaryColor> {
    PrimitiveStyle::with_stroke(binary(color), 1)
}

fn point((x, y): (i32, i32)) -> Point {
    Point::new(x, y)
}

fn centered_circle(x: i32, y: i32, r: u32) -> Circle {
    Circle::with_center(Point::new(x, y), r.saturating_mul(2).saturating_add(1))
}
