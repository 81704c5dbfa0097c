use crate::{RenderedImage, Result};
use image::{ImageFormat, RgbaImage};
use std::{io::Cursor, path::Path};

/// Presentation wrapper handed to whatever shows the result.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayableImage {
    rendered: RenderedImage,
}

impl From<RenderedImage> for DisplayableImage {
    fn from(rendered: RenderedImage) -> Self {
        Self { rendered }
    }
}

impl DisplayableImage {
    pub fn width(&self) -> u32 {
        self.rendered.width()
    }

    pub fn height(&self) -> u32 {
        self.rendered.height()
    }

    pub fn rendered(&self) -> &RenderedImage {
        &self.rendered
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        self.rendered.pixels()
    }

    /// Raw RGBA8 bytes, row major.
    pub fn as_raw(&self) -> &[u8] {
        self.rendered.pixels().as_raw()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        self.as_rgba().write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.as_rgba()
            .save_with_format(path.as_ref(), ImageFormat::Png)?;
        Ok(())
    }
}
