use super::{Filter, FilterKind, Kernel, ParameterKey, check_finite, resolve_center, unsupported};
use crate::{Extent, RecipeImage, Result};
use derivative::Derivative;
use derive_setters::Setters;
use image::Rgba;
use std::collections::BTreeSet;

const JITTER_SEED: u32 = 0x5EED_C0DE;

/// Crystallize (Voronoi polygon) configuration
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct CrystallizeConfig {
    /// Spacing of the seed grid in pixels
    #[derivative(Default(value = "20.0"))]
    radius: f32,

    #[setters(strip_option)]
    center_x: Option<f32>,

    #[setters(strip_option)]
    center_y: Option<f32>,
}

impl CrystallizeConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Filter for CrystallizeConfig {
    fn kind(&self) -> FilterKind {
        FilterKind::Crystallize
    }

    fn supported_parameters(&self) -> BTreeSet<ParameterKey> {
        BTreeSet::from([
            ParameterKey::Radius,
            ParameterKey::CenterX,
            ParameterKey::CenterY,
        ])
    }

    fn value(&self, key: ParameterKey) -> Option<f32> {
        match key {
            ParameterKey::Radius => Some(self.radius),
            ParameterKey::CenterX => self.center_x,
            ParameterKey::CenterY => self.center_y,
            _ => None,
        }
    }

    fn set_value(&mut self, key: ParameterKey, value: f32) -> Result<()> {
        let value = check_finite(key, value)?;
        match key {
            ParameterKey::Radius => self.radius = value,
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
        Some(input.filtered(Kernel::Crystallize(CrystallizeKernel {
            radius: self.radius.max(1.0),
            center_x,
            center_y,
        })))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrystallizeKernel {
    pub radius: f32,
    pub center_x: f32,
    pub center_y: f32,
}

impl CrystallizeKernel {
    fn is_identity(&self) -> bool {
        self.radius <= 1.0
    }

    /// Jittered seed point of grid cell `(cx, cy)`.
    fn seed_point(&self, cx: i64, cy: i64) -> (f32, f32) {
        let jx = hash_f32(cx as u32, cy as u32, JITTER_SEED);
        let jy = hash_f32(cx as u32, cy as u32, JITTER_SEED.wrapping_add(77));

        (
            self.center_x + (cx as f32 + jx) * self.radius,
            self.center_y + (cy as f32 + jy) * self.radius,
        )
    }

    /// Cell index along one axis, kept within `i32` so neighbours never overflow.
    fn grid_cell(&self, offset: f32) -> i64 {
        (offset / self.radius)
            .floor()
            .clamp(i32::MIN as f32, i32::MAX as f32) as i64
    }

    fn nearest_seed(&self, x: f32, y: f32) -> (f32, f32) {
        let gx = self.grid_cell(x - self.center_x);
        let gy = self.grid_cell(y - self.center_y);

        let mut best = (x, y);
        let mut best_dist = f32::MAX;

        for dy in -1..=1 {
            for dx in -1..=1 {
                let (sx, sy) = self.seed_point(gx + dx, gy + dy);
                let d = (x - sx) * (x - sx) + (y - sy) * (y - sy);
                if d < best_dist {
                    best_dist = d;
                    best = (sx, sy);
                }
            }
        }

        best
    }

    /// Cells on the border reach out by up to one radius.
    pub fn extent(&self, input: &Extent) -> Extent {
        if self.is_identity() {
            return *input;
        }
        input.outset(self.radius.ceil() as u32)
    }

    pub fn sample(&self, input: &RecipeImage, x: f32, y: f32) -> Rgba<f32> {
        if self.is_identity() {
            return input.sample(x, y);
        }

        let (sx, sy) = self.nearest_seed(x, y);
        input.sample(sx, sy)
    }
}

fn hash_u32(mut x: u32) -> u32 {
    x = x.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

/// Deterministic value in `[0, 1)` for a grid cell.
fn hash_f32(x: u32, y: u32, seed: u32) -> f32 {
    let h = hash_u32(
        x.wrapping_mul(374761393)
            .wrapping_add(y.wrapping_mul(668265263))
            .wrapping_add(seed),
    );
    (h & 0x00FF_FFFF) as f32 / 16_777_216.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SourceImage, recipe::to_u8};
    use image::RgbaImage;

    fn checker() -> SourceImage {
        let img = RgbaImage::from_fn(40, 40, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        SourceImage::from_rgba(img).unwrap()
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(hash_f32(3, 9, 1), hash_f32(3, 9, 1));
        assert!((0.0..1.0).contains(&hash_f32(u32::MAX, 0, 42)));
    }

    #[test]
    fn test_small_radius_is_identity() {
        let source = checker();
        let recipe = CrystallizeConfig::new()
            .with_radius(0.0)
            .output_image(source.recipe())
            .unwrap();

        assert_eq!(recipe.extent(), source.extent());
        for (x, y) in [(0, 0), (5, 2), (39, 39)] {
            assert_eq!(
                to_u8(recipe.sample(x as f32 + 0.5, y as f32 + 0.5)),
                *source.pixels().get_pixel(x, y)
            );
        }
    }

    #[test]
    fn test_output_uses_seed_colours() {
        let source = checker();
        let recipe = CrystallizeConfig::new()
            .with_radius(10.0)
            .output_image(source.recipe())
            .unwrap();

        assert_eq!(recipe.extent(), Extent::new(-10, -10, 60, 60));

        let kernel = CrystallizeKernel {
            radius: 10.0,
            center_x: 20.0,
            center_y: 20.0,
        };
        let (sx, sy) = kernel.nearest_seed(20.5, 20.5);
        assert_eq!(
            to_u8(recipe.sample(20.5, 20.5)),
            source.pixel(sx.floor() as i64, sy.floor() as i64)
        );
    }

    #[test]
    fn test_repeatable_across_recipes() {
        let source = checker();
        let config = CrystallizeConfig::new().with_radius(7.5);
        let a = config.output_image(source.recipe()).unwrap();
        let b = config.output_image(source.recipe()).unwrap();

        for y in 0..40 {
            for x in 0..40 {
                let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
                assert_eq!(a.sample(fx, fy), b.sample(fx, fy));
            }
        }
    }

    #[test]
    fn test_far_away_center() {
        let source = checker();
        let recipe = CrystallizeConfig::new()
            .with_radius(10.0)
            .with_center_x(-1.0e12)
            .with_center_y(1.0e12)
            .output_image(source.recipe())
            .unwrap();

        assert_eq!(recipe.extent(), Extent::new(-10, -10, 60, 60));
        for (x, y) in [(0.5, 0.5), (20.5, 20.5), (39.5, 39.5)] {
            let a = recipe.sample(x, y);
            assert!(a.0.iter().all(|c| (0.0..=255.0).contains(c)));
        }
    }
}
