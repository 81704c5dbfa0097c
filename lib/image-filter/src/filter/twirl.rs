use super::{Filter, FilterKind, Kernel, ParameterKey, check_finite, resolve_center, unsupported};
use crate::{Extent, RecipeImage, Result};
use derivative::Derivative;
use derive_setters::Setters;
use image::Rgba;
use std::collections::BTreeSet;

/// Twirl distortion configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct TwirlConfig {
    #[derivative(Default(value = "300.0"))]
    radius: f32,

    /// Rotation at the centre, in radians
    #[derivative(Default(value = "std::f32::consts::PI"))]
    angle: f32,

    #[setters(strip_option)]
    center_x: Option<f32>,

    #[setters(strip_option)]
    center_y: Option<f32>,
}

impl TwirlConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Filter for TwirlConfig {
    fn kind(&self) -> FilterKind {
        FilterKind::Twirl
    }

    fn supported_parameters(&self) -> BTreeSet<ParameterKey> {
        BTreeSet::from([
            ParameterKey::Radius,
            ParameterKey::Angle,
            ParameterKey::CenterX,
            ParameterKey::CenterY,
        ])
    }

    fn value(&self, key: ParameterKey) -> Option<f32> {
        match key {
            ParameterKey::Radius => Some(self.radius),
            ParameterKey::Angle => Some(self.angle),
            ParameterKey::CenterX => self.center_x,
            ParameterKey::CenterY => self.center_y,
            _ => None,
        }
    }

    fn set_value(&mut self, key: ParameterKey, value: f32) -> Result<()> {
        let value = check_finite(key, value)?;
        match key {
            ParameterKey::Radius => self.radius = value,
            ParameterKey::Angle => self.angle = value,
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
        Some(input.filtered(Kernel::Twirl(TwirlKernel {
            radius: self.radius.max(0.0),
            angle: self.angle,
            center_x,
            center_y,
        })))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TwirlKernel {
    pub radius: f32,
    pub angle: f32,
    pub center_x: f32,
    pub center_y: f32,
}

impl TwirlKernel {
    fn is_identity(&self) -> bool {
        self.radius <= 0.0 || self.angle == 0.0
    }

    /// The twirl disc may reach past the input, where it pulls in
    /// transparent padding.
    pub fn extent(&self, input: &Extent) -> Extent {
        if self.is_identity() {
            return *input;
        }

        let disc = Extent::from_bounds(
            (self.center_x - self.radius).floor() as i64,
            (self.center_y - self.radius).floor() as i64,
            (self.center_x + self.radius).ceil() as i64,
            (self.center_y + self.radius).ceil() as i64,
        );
        input.union(&disc)
    }

    pub fn sample(&self, input: &RecipeImage, x: f32, y: f32) -> Rgba<f32> {
        if self.is_identity() {
            return input.sample(x, y);
        }

        let dx = x - self.center_x;
        let dy = y - self.center_y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance >= self.radius {
            return input.sample(x, y);
        }

        let rotation = self.angle * (1.0 - distance / self.radius);
        let (sin_r, cos_r) = rotation.sin_cos();
        let src_x = self.center_x + dx * cos_r - dy * sin_r;
        let src_y = self.center_y + dx * sin_r + dy * cos_r;

        input.sample_bilinear(src_x, src_y)
    }
}
