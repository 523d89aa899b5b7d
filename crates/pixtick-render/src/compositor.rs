//! Sprite compositor.

use pixtick_types::Color;
use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;
use crate::geom::GeoM;
use crate::surface::Surface;

/// Which source region [`draw_image`] walks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Clip {
    /// Walk only `min(src, dst)` of the source in each axis, before the
    /// transform is applied. Sprite pixels beyond the destination's width
    /// or height are never drawn, even if the transform would bring them
    /// on screen.
    #[default]
    Untransformed,
    /// Walk the whole source and rely on the destination's bounds checks.
    Transformed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawImageOptions {
    pub geom: GeoM,
    pub clip: Clip,
}

impl DrawImageOptions {
    pub fn new(geom: GeoM) -> Self {
        Self {
            geom,
            clip: Clip::default(),
        }
    }

    #[must_use]
    pub fn with_clip(mut self, clip: Clip) -> Self {
        self.clip = clip;
        self
    }
}

impl From<GeoM> for DrawImageOptions {
    fn from(geom: GeoM) -> Self {
        Self::new(geom)
    }
}

/// Draw every set pixel of `source` onto `dest` through `options.geom`.
///
/// Destination coordinates are rounded half away from zero. Nothing is
/// drawn when the transform is not invertible.
pub fn draw_image(source: &Bitmap, options: &DrawImageOptions, dest: &mut dyn Surface) {
    let geom = &options.geom;
    if !geom.is_invertible() {
        return;
    }

    let (width, height) = match options.clip {
        Clip::Untransformed => {
            let dst = dest.size();
            (
                source.width().min(dst.width),
                source.height().min(dst.height),
            )
        }
        Clip::Transformed => (source.width(), source.height()),
    };

    for sy in 0..height as i32 {
        for sx in 0..width as i32 {
            if !source.get(sx, sy) {
                continue;
            }
            let (dx, dy) = geom.apply(f64::from(sx), f64::from(sy));
            dest.set_pixel(round(dx), round(dy), Color::White);
        }
    }
}

fn round(v: f64) -> i32 {
    // `as` saturates, so far off-screen results stay out of bounds.
    v.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDisplay;
    use pixtick_types::Size;
    use std::f64::consts::FRAC_PI_2;

    fn solid(w: u32, h: u32) -> Bitmap {
        let mut bitmap = Bitmap::new(Size::new(w, h));
        bitmap.fill(true);
        bitmap
    }

    #[test]
    fn translated_block_lands_exactly() {
        let mut dest = Bitmap::new(Size::new(10, 10));
        let options = DrawImageOptions::new(GeoM::new().translate(5.0, 5.0));
        draw_image(&solid(3, 3), &options, &mut dest);

        let set: Vec<_> = dest.set_pixels().collect();
        let expected: Vec<_> = (5..=7).flat_map(|y| (5..=7).map(move |x| (x, y))).collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn degenerate_transform_draws_nothing() {
        let mut dest = MockDisplay::new(Size::new(10, 10));
        let handle = dest.handle();
        let options = DrawImageOptions::new(GeoM::new().scale(0.0, 0.0));
        draw_image(&solid(3, 3), &options, &mut dest);
        assert_eq!(handle.set_pixel_calls(), 0);
    }

    #[test]
    fn clear_pixels_are_skipped() {
        let mut dest = MockDisplay::new(Size::new(10, 10));
        let handle = dest.handle();
        let sprite = Bitmap::from_rows(&["#.", ".#"]);
        draw_image(&sprite, &DrawImageOptions::default(), &mut dest);
        assert_eq!(handle.set_pixel_calls(), 2);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let mut dest = Bitmap::new(Size::new(4, 4));
        let options = DrawImageOptions::new(GeoM::new().translate(0.5, 1.5));
        draw_image(&solid(1, 1), &options, &mut dest);
        assert!(dest.get(1, 2));
    }

    #[test]
    fn untransformed_clip_uses_source_coordinates() {
        // 6-wide sprite on a 4-wide screen, shifted left by 2: columns 4..6
        // would land on screen but are outside the walked region.
        let sprite = solid(6, 1);
        let geom = GeoM::new().translate(-2.0, 0.0);

        let mut clipped = Bitmap::new(Size::new(4, 1));
        draw_image(&sprite, &DrawImageOptions::new(geom), &mut clipped);
        assert_eq!(clipped.set_pixels().collect::<Vec<_>>(), vec![(0, 0), (1, 0)]);

        let mut full = Bitmap::new(Size::new(4, 1));
        let options = DrawImageOptions::new(geom).with_clip(Clip::Transformed);
        draw_image(&sprite, &options, &mut full);
        assert_eq!(full.count_set(), 4);
    }

    #[test]
    fn rotated_sprite() {
        let mut dest = Bitmap::new(Size::new(8, 8));
        let sprite = Bitmap::from_rows(&["##"]);
        let geom = GeoM::new().rotate(FRAC_PI_2).translate(4.0, 4.0);
        draw_image(&sprite, &DrawImageOptions::new(geom), &mut dest);
        assert_eq!(dest.set_pixels().collect::<Vec<_>>(), vec![(4, 4), (4, 5)]);
    }
}
