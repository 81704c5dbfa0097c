use super::{Filter, FilterKind, Kernel, ParameterKey, check_finite, resolve_center, unsupported};
use crate::{Extent, RecipeImage, Result};
use derivative::Derivative;
use derive_setters::Setters;
use image::Rgba;
use std::collections::BTreeSet;

/// Pixellate configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct PixellateConfig {
    /// Cell size in pixels
    #[derivative(Default(value = "8.0"))]
    scale: f32,

    /// Grid anchor, defaults to the middle of the input
    #[setters(strip_option)]
    center_x: Option<f32>,

    #[setters(strip_option)]
    center_y: Option<f32>,
}

impl PixellateConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Filter for PixellateConfig {
    fn kind(&self) -> FilterKind {
        FilterKind::Pixellate
    }

    fn supported_parameters(&self) -> BTreeSet<ParameterKey> {
        BTreeSet::from([
            ParameterKey::Scale,
            ParameterKey::CenterX,
            ParameterKey::CenterY,
        ])
    }

    fn value(&self, key: ParameterKey) -> Option<f32> {
        match key {
            ParameterKey::Scale => Some(self.scale),
            ParameterKey::CenterX => self.center_x,
            ParameterKey::CenterY => self.center_y,
            _ => None,
        }
    }

    fn set_value(&mut self, key: ParameterKey, value: f32) -> Result<()> {
        let value = check_finite(key, value)?;
        match key {
            ParameterKey::Scale => self.scale = value,
            ParameterKey::CenterX => self.center_x = Some(value),
            ParameterKey::CenterY => self.center_y = Some(value),
            _ => return Err(unsupported(self.kind(), key)),
        }
        Ok(())
    }

    fn output_image<'a>(&self, input: RecipeImage<'a>) -> Option<RecipeImage<'a>> {
        let extent = input.extent();
        if extent.is_empty() {
            return None;
        }

        let (center_x, center_y) = resolve_center(self.center_x, self.center_y, &extent);
        Some(input.filtered(Kernel::Pixellate(PixellateKernel {
            scale: self.scale.max(1.0),
            center_x,
            center_y,
        })))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PixellateKernel {
    pub scale: f32,
    pub center_x: f32,
    pub center_y: f32,
}

impl PixellateKernel {
    fn is_identity(&self) -> bool {
        self.scale <= 1.0
    }

    fn cell_center(&self, pos: f32, anchor: f32) -> f32 {
        let cell = ((pos - anchor) / self.scale).floor();
        anchor + (cell + 0.5) * self.scale
    }

    fn snap_down(&self, pos: i64, anchor: f32) -> i64 {
        (anchor + ((pos as f32 - anchor) / self.scale).floor() * self.scale).floor() as i64
    }

    fn snap_up(&self, pos: i64, anchor: f32) -> i64 {
        (anchor + ((pos as f32 - anchor) / self.scale).ceil() * self.scale).ceil() as i64
    }

    /// Input extent grown outward to whole cells.
    pub fn extent(&self, input: &Extent) -> Extent {
        if self.is_identity() || input.is_empty() {
            return *input;
        }

        Extent::from_bounds(
            self.snap_down(input.left(), self.center_x),
            self.snap_down(input.top(), self.center_y),
            self.snap_up(input.right(), self.center_x),
            self.snap_up(input.bottom(), self.center_y),
        )
    }

    pub fn sample(&self, input: &RecipeImage, x: f32, y: f32) -> Rgba<f32> {
        if self.is_identity() {
            return input.sample(x, y);
        }

        input.sample(
            self.cell_center(x, self.center_x),
            self.cell_center(y, self.center_y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SourceImage, recipe::to_u8};
    use image::RgbaImage;

    fn gradient(width: u32, height: u32) -> SourceImage {
        let img = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 7, 255]));
        SourceImage::from_rgba(img).unwrap()
    }

    #[test]
    fn test_cells_share_one_colour() {
        let source = gradient(20, 20);
        let recipe = PixellateConfig::new()
            .with_scale(10.0)
            .output_image(source.recipe())
            .unwrap();

        let a = to_u8(recipe.sample(0.5, 0.5));
        let b = to_u8(recipe.sample(9.5, 9.5));
        let c = to_u8(recipe.sample(10.5, 0.5));

        assert_eq!(a, b);
        assert_eq!(a, Rgba([5, 5, 7, 255]));
        assert_eq!(c, Rgba([15, 5, 7, 255]));
    }

    #[test]
    fn test_extent_snaps_to_grid() {
        let source = gradient(25, 10);
        let recipe = PixellateConfig::new()
            .with_scale(10.0)
            .with_center_x(0.0)
            .with_center_y(0.0)
            .output_image(source.recipe())
            .unwrap();

        assert_eq!(recipe.extent(), Extent::new(0, 0, 30, 10));
    }

    #[test]
    fn test_unit_scale_is_identity() {
        let source = gradient(8, 8);
        let recipe = PixellateConfig::new()
            .with_scale(0.0)
            .output_image(source.recipe())
            .unwrap();

        assert_eq!(recipe.extent(), source.extent());
        assert_eq!(to_u8(recipe.sample(3.5, 6.5)), Rgba([3, 6, 7, 255]));
    }

    #[test]
    fn test_center_is_optional() {
        let mut config = PixellateConfig::new();
        assert_eq!(config.value(ParameterKey::CenterX), None);

        config.set_value(ParameterKey::CenterX, 4.0).unwrap();
        assert_eq!(config.value(ParameterKey::CenterX), Some(4.0));
        assert!(config.set_value(ParameterKey::Intensity, 1.0).is_err());
    }
}
