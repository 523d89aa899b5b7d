//! Bitmap assets: sources, decoding and the per-path cache.

use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use image::ImageFormat;
use pixtick_types::Size;
use tracing::{debug, warn};

use crate::bitmap::Bitmap;
use crate::error::AssetError;

/// Largest accepted bitmap side, in pixels.
pub const MAX_DIMENSION: u32 = 4096;

/// Where asset bytes come from.
pub trait AssetSource: Send {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError>;
}

/// Assets stored under a directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let relative = Path::new(path);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(AssetError::NotFound(path.to_string()));
        }
        std::fs::read(self.root.join(relative)).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                AssetError::NotFound(path.to_string())
            } else {
                AssetError::Read {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }
}

/// Assets held in memory, for bundled sprites and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    files: HashMap<String, Arc<[u8]>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.files.insert(path.into(), bytes.into());
    }
}

impl AssetSource for StaticSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.files
            .get(path)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

/// Turns encoded bytes into a monochrome bitmap.
pub trait BitmapDecoder: Send {
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, AssetError>;
}

/// PNG decoder.
///
/// A pixel is set when at least two of its red, green and blue channels
/// are below `0x80`; alpha is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngDecoder;

impl BitmapDecoder for PngDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, AssetError> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgb8();
        let (width, height) = image.dimensions();
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(AssetError::TooLarge {
                width,
                height,
                max: MAX_DIMENSION,
            });
        }

        let mut bitmap = Bitmap::new(Size::new(width, height));
        for (x, y, pixel) in image.enumerate_pixels() {
            let dark = pixel.0.iter().filter(|&&channel| channel < 0x80).count();
            if dark >= 2 {
                bitmap.set(x as i32, y as i32, true);
            }
        }
        Ok(bitmap)
    }
}

/// Decoded bitmaps keyed by path.
///
/// Each path is loaded at most once. Paths that failed to load are
/// remembered and not retried until [`BitmapCache::forget`].
pub struct BitmapCache {
    source: Box<dyn AssetSource>,
    decoder: Box<dyn BitmapDecoder>,
    loaded: HashMap<String, Arc<Bitmap>>,
    failed: HashSet<String>,
}

impl BitmapCache {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self::with_decoder(source, PngDecoder)
    }

    pub fn with_decoder(
        source: impl AssetSource + 'static,
        decoder: impl BitmapDecoder + 'static,
    ) -> Self {
        Self {
            source: Box::new(source),
            decoder: Box::new(decoder),
            loaded: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// A cache with no backing files; only inserted bitmaps resolve.
    pub fn empty() -> Self {
        Self::new(StaticSource::new())
    }

    /// Load `path`, decoding it on first use.
    pub fn load(&mut self, path: &str) -> Result<Arc<Bitmap>, AssetError> {
        if let Some(bitmap) = self.loaded.get(path) {
            return Ok(Arc::clone(bitmap));
        }
        let bytes = self.source.read(path)?;
        let bitmap = Arc::new(self.decoder.decode(&bytes)?);
        debug!(path, size = %bitmap.size(), "asset loaded");
        self.loaded.insert(path.to_string(), Arc::clone(&bitmap));
        Ok(bitmap)
    }

    /// Like [`Self::load`], but logs the first failure for each path and
    /// returns `None` for it from then on.
    pub fn get(&mut self, path: &str) -> Option<Arc<Bitmap>> {
        if self.failed.contains(path) {
            return None;
        }
        match self.load(path) {
            Ok(bitmap) => Some(bitmap),
            Err(e) => {
                warn!(path, error = %e, "failed to load asset, skipping");
                self.failed.insert(path.to_string());
                None
            }
        }
    }

    /// Register an already decoded bitmap under `path`.
    pub fn insert(&mut self, path: impl Into<String>, bitmap: Bitmap) {
        let path = path.into();
        self.failed.remove(&path);
        self.loaded.insert(path, Arc::new(bitmap));
    }

    /// Drop any cached bitmap or failure for `path`.
    pub fn forget(&mut self, path: &str) {
        self.loaded.remove(path);
        self.failed.remove(path);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.loaded.contains_key(path)
    }

    pub fn has_failed(&self, path: &str) -> bool {
        self.failed.contains(path)
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

impl Default for BitmapCache {
    fn default() -> Self {
        Self::empty()
    }
}
