use super::{Filter, FilterKind, Kernel, ParameterKey, check_finite, unsupported};
use crate::{RecipeImage, Result};
use derivative::Derivative;
use derive_setters::Setters;
use image::Rgba;
use std::collections::BTreeSet;

/// Sepia tone configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SepiaConfig {
    #[derivative(Default(value = "1.0"))]
    intensity: f32, // [0.0, 1.0]
}

impl SepiaConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Filter for SepiaConfig {
    fn kind(&self) -> FilterKind {
        FilterKind::Sepia
    }

    fn supported_parameters(&self) -> BTreeSet<ParameterKey> {
        BTreeSet::from([ParameterKey::Intensity])
    }

    fn value(&self, key: ParameterKey) -> Option<f32> {
        match key {
            ParameterKey::Intensity => Some(self.intensity),
            _ => None,
        }
    }

    fn set_value(&mut self, key: ParameterKey, value: f32) -> Result<()> {
        match key {
            ParameterKey::Intensity => self.intensity = check_finite(key, value)?,
            _ => return Err(unsupported(self.kind(), key)),
        }
        Ok(())
    }

    fn output_image<'a>(&self, input: RecipeImage<'a>) -> Option<RecipeImage<'a>> {
        if input.extent().is_empty() {
            return None;
        }

        Some(input.filtered(Kernel::Sepia(SepiaKernel {
            intensity: self.intensity.clamp(0.0, 1.0),
        })))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SepiaKernel {
    pub intensity: f32,
}

impl SepiaKernel {
    pub fn sample(&self, input: &RecipeImage, x: f32, y: f32) -> Rgba<f32> {
        let pixel = input.sample(x, y);
        let (r, g, b) = (pixel[0], pixel[1], pixel[2]);

        let tr = (0.393 * r + 0.769 * g + 0.189 * b).min(255.0);
        let tg = (0.349 * r + 0.686 * g + 0.168 * b).min(255.0);
        let tb = (0.272 * r + 0.534 * g + 0.131 * b).min(255.0);

        let t = self.intensity;
        Rgba([
            r * (1.0 - t) + tr * t,
            g * (1.0 - t) + tg * t,
            b * (1.0 - t) + tb * t,
            pixel[3],
        ])
    }
}
