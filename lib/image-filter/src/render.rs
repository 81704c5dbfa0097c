use crate::{Extent, FilterError, RecipeImage, Result, recipe::to_u8};
use derivative::Derivative;
use derive_setters::Setters;
use image::{Rgba, RgbaImage};

/// Materializes recipes into pixel buffers.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct RenderContext {
    /// Largest buffer the context agrees to allocate
    #[derivative(Default(value = "64 * 1024 * 1024"))]
    max_pixels: u64,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_pixels(&self) -> u64 {
        self.max_pixels
    }

    /// Evaluate every pixel centre inside the recipe's natural extent.
    pub fn render(&self, recipe: &RecipeImage) -> Result<RenderedImage> {
        let extent = recipe.extent();

        if extent.is_empty() {
            return Err(FilterError::RenderFailed(format!(
                "empty extent {}x{}",
                extent.width, extent.height
            )));
        }

        if extent.area() > self.max_pixels {
            return Err(FilterError::RenderFailed(format!(
                "extent {}x{} exceeds the {} pixel budget",
                extent.width, extent.height, self.max_pixels
            )));
        }

        let (origin_x, origin_y) = (extent.x as f32, extent.y as f32);
        let pixels = RgbaImage::from_fn(extent.width, extent.height, |x, y| {
            to_u8(recipe.sample(origin_x + x as f32 + 0.5, origin_y + y as f32 + 0.5))
        });

        log::debug!(
            "rendered {}x{} at ({}, {})",
            extent.width,
            extent.height,
            extent.x,
            extent.y
        );

        Ok(RenderedImage { extent, pixels })
    }
}

/// Concrete pixels produced from a recipe. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    extent: Extent,
    pixels: RgbaImage,
}

impl RenderedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Region of source space the pixels cover.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// Pixel at source-space coordinates, `None` outside the extent.
    pub fn pixel_at(&self, x: i64, y: i64) -> Option<Rgba<u8>> {
        if !self.extent.contains(x, y) {
            return None;
        }

        let local_x = (x - self.extent.left()) as u32;
        let local_y = (y - self.extent.top()) as u32;
        Some(*self.pixels.get_pixel(local_x, local_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        SourceImage,
        filter::{Kernel, twirl::TwirlKernel},
    };

    fn source() -> SourceImage {
        let img = RgbaImage::from_fn(10, 10, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        SourceImage::from_rgba(img).unwrap()
    }

    #[test]
    fn test_render_source_is_copy() {
        let source = source();
        let rendered = RenderContext::new().render(&source.recipe()).unwrap();

        assert_eq!(rendered.extent(), source.extent());
        assert_eq!(rendered.pixels(), source.pixels());
    }

    #[test]
    fn test_render_beyond_source_is_transparent() {
        let source = source();
        let recipe = source.recipe().filtered(Kernel::Twirl(TwirlKernel {
            radius: 8.0,
            angle: 1.0,
            center_x: 0.0,
            center_y: 0.0,
        }));
        let rendered = RenderContext::new().render(&recipe).unwrap();

        assert_eq!(rendered.extent(), Extent::new(-8, -8, 18, 18));
        assert_eq!(rendered.pixel_at(-8, 9), Some(Rgba([0, 0, 0, 0])));
        assert_eq!(rendered.pixel_at(9, 9), Some(Rgba([9, 9, 0, 255])));
        assert_eq!(rendered.pixel_at(10, 0), None);
    }

    #[test]
    fn test_pixel_budget() {
        let source = source();
        let err = RenderContext::new()
            .with_max_pixels(50)
            .render(&source.recipe())
            .unwrap_err();

        assert!(matches!(err, FilterError::RenderFailed(_)));
    }
}
