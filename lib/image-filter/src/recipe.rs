use crate::{Extent, SourceImage, filter::Kernel};
use image::Rgba;

/// Lazy description of pixel content.
///
/// A recipe borrows the source it was built from and produces no pixels until
/// a [`crate::RenderContext`] evaluates it. Coordinates passed to
/// [`RecipeImage::sample`] are continuous; pixel `(i, j)` has its centre at
/// `(i + 0.5, j + 0.5)`.
#[derive(Debug, Clone)]
pub enum RecipeImage<'a> {
    Source(&'a SourceImage),
    Filtered {
        input: Box<RecipeImage<'a>>,
        kernel: Kernel,
    },
}

impl<'a> RecipeImage<'a> {
    /// Wrap this recipe in a filter kernel.
    pub fn filtered(self, kernel: Kernel) -> RecipeImage<'a> {
        RecipeImage::Filtered {
            input: Box::new(self),
            kernel,
        }
    }

    pub fn extent(&self) -> Extent {
        match self {
            RecipeImage::Source(source) => source.extent(),
            RecipeImage::Filtered { input, kernel } => kernel.extent(&input.extent()),
        }
    }

    /// Colour at a continuous position, channels in `0.0..=255.0`.
    /// Positions outside the content are transparent black.
    pub fn sample(&self, x: f32, y: f32) -> Rgba<f32> {
        match self {
            RecipeImage::Source(source) => {
                to_f32(source.pixel(x.floor() as i64, y.floor() as i64))
            }
            RecipeImage::Filtered { input, kernel } => kernel.sample(input, x, y),
        }
    }

    /// Bilinear interpolation between the four nearest pixel centres.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> Rgba<f32> {
        let fx = x - 0.5;
        let fy = y - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let dx = fx - x0;
        let dy = fy - y0;

        let p00 = self.sample(x0 + 0.5, y0 + 0.5);
        let p10 = self.sample(x0 + 1.5, y0 + 0.5);
        let p01 = self.sample(x0 + 0.5, y0 + 1.5);
        let p11 = self.sample(x0 + 1.5, y0 + 1.5);

        let mut out = [0.0f32; 4];
        for (c, value) in out.iter_mut().enumerate() {
            *value = p00[c] * (1.0 - dx) * (1.0 - dy)
                + p10[c] * dx * (1.0 - dy)
                + p01[c] * (1.0 - dx) * dy
                + p11[c] * dx * dy;
        }
        Rgba(out)
    }

    /// The source image at the root of this recipe.
    pub fn source(&self) -> &'a SourceImage {
        match self {
            RecipeImage::Source(source) => source,
            RecipeImage::Filtered { input, .. } => input.source(),
        }
    }
}

pub fn to_f32(pixel: Rgba<u8>) -> Rgba<f32> {
    Rgba(pixel.0.map(|c| c as f32))
}

pub fn to_u8(pixel: Rgba<f32>) -> Rgba<u8> {
    Rgba(pixel.0.map(|c| c.round().clamp(0.0, 255.0) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::sepia::SepiaKernel;
    use image::RgbaImage;

    fn source() -> SourceImage {
        let img = RgbaImage::from_fn(2, 2, |x, y| {
            Rgba([(x * 100) as u8, (y * 100) as u8, 0, 255])
        });
        SourceImage::from_rgba(img).unwrap()
    }

    #[test]
    fn test_source_sample_is_nearest_pixel() {
        let source = source();
        let recipe = source.recipe();

        assert_eq!(to_u8(recipe.sample(1.5, 0.5)), Rgba([100, 0, 0, 255]));
        assert_eq!(to_u8(recipe.sample(1.9, 1.1)), Rgba([100, 100, 0, 255]));
        assert_eq!(to_u8(recipe.sample(-0.1, 0.5)), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_bilinear_midpoint() {
        let source = source();
        let recipe = source.recipe();

        let mid = recipe.sample_bilinear(1.0, 0.5);
        assert!((mid[0] - 50.0).abs() < 1e-3);
        assert_eq!(to_u8(recipe.sample_bilinear(0.5, 0.5)), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_filtered_keeps_source_reference() {
        let source = source();
        let recipe = source
            .recipe()
            .filtered(Kernel::Sepia(SepiaKernel { intensity: 0.0 }));

        assert!(std::ptr::eq(recipe.source(), &source));
        assert_eq!(recipe.extent(), source.extent());
        assert_eq!(to_u8(recipe.sample(1.5, 1.5)), Rgba([100, 100, 0, 255]));
    }
}
