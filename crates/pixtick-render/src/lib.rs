//! Monochrome rendering for pixtick.
//!
//! Everything draws onto a [`Surface`]. Sprites are [`Bitmap`]s placed
//! through a [`GeoM`] by the compositor; [`Rotated`] adapts a physical
//! panel to the orientation a game wants; [`Screen`] is the per-frame
//! context games receive, with shape and text primitives and the asset
//! cache.

pub mod assets;
pub mod bitmap;
pub mod compositor;
pub mod error;
pub mod geom;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod rotation;
pub mod screen;
pub mod surface;

pub use assets::{AssetSource, BitmapCache, BitmapDecoder, DirSource, PngDecoder, StaticSource};
pub use bitmap::Bitmap;
pub use compositor::{draw_image, Clip, DrawImageOptions};
pub use error::{AssetError, DisplayError};
pub use geom::GeoM;
pub use rotation::Rotated;
pub use screen::Screen;
pub use surface::{Surface, Viewport};
