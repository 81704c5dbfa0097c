use crate::{Extent, FilterError, RecipeImage, Result};
use image::{ImageReader, Rgba, RgbaImage};
use std::{
    borrow::Cow,
    io::Cursor,
    path::{Path, PathBuf},
};

/// Where the source raster comes from.
#[derive(Debug, Clone)]
pub enum SourceAsset {
    /// Encoded image bytes, usually bundled with `include_bytes!`.
    Bytes(Cow<'static, [u8]>),
    Path(PathBuf),
}

impl SourceAsset {
    pub fn bundled(bytes: &'static [u8]) -> Self {
        Self::Bytes(Cow::Borrowed(bytes))
    }

    pub fn load(&self) -> Result<SourceImage> {
        match self {
            SourceAsset::Bytes(bytes) => SourceImage::from_bytes(bytes),
            SourceAsset::Path(path) => SourceImage::open(path),
        }
    }
}

/// Immutable RGBA raster the pipeline starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Decode an encoded image (PNG) from memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| FilterError::SourceLoadFailed(format!("unreadable asset: {e}")))?
            .decode()
            .map_err(|e| FilterError::SourceLoadFailed(format!("corrupt asset: {e}")))?;

        Self::from_rgba(image.to_rgba8())
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = ImageReader::open(path)
            .map_err(|e| {
                FilterError::SourceLoadFailed(format!("open {} failed: {e}", path.display()))
            })?
            .decode()
            .map_err(|e| {
                FilterError::SourceLoadFailed(format!("decode {} failed: {e}", path.display()))
            })?;

        Self::from_rgba(image.to_rgba8())
    }

    pub fn from_rgba(pixels: RgbaImage) -> Result<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(FilterError::SourceLoadFailed(format!(
                "empty image {}x{}",
                pixels.width(),
                pixels.height()
            )));
        }

        log::debug!("source image loaded: {}x{}", pixels.width(), pixels.height());
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn extent(&self) -> Extent {
        Extent::from_size(self.width(), self.height())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Pixel at integer coordinates, transparent black outside the raster.
    pub fn pixel(&self, x: i64, y: i64) -> Rgba<u8> {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return Rgba([0, 0, 0, 0]);
        }
        *self.pixels.get_pixel(x as u32, y as u32)
    }

    /// Lazy description of this image. No pixels are copied.
    pub fn recipe(&self) -> RecipeImage<'_> {
        RecipeImage::Source(self)
    }
}
