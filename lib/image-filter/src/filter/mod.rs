//! Built-in filters.
//!
//! Every filter advertises the parameters it understands through
//! [`Filter::supported_parameters`]. Callers probe that set before assigning
//! values instead of matching on the concrete filter type.

pub mod crystallize;
pub mod pixellate;
pub mod sepia;
pub mod twirl;

use crate::{Extent, FilterError, RecipeImage, Result};
use image::Rgba;
use std::{collections::BTreeSet, str::FromStr};
use strum::VariantArray as _;
use strum_macros::{AsRefStr, Display, EnumString, VariantArray};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, VariantArray,
)]
#[strum(ascii_case_insensitive)]
pub enum FilterKind {
    #[strum(to_string = "sepia", serialize = "sepia-tone")]
    Sepia,
    #[strum(to_string = "pixellate", serialize = "pixelate")]
    Pixellate,
    #[strum(to_string = "crystallize")]
    Crystallize,
    #[strum(to_string = "twirl", serialize = "twirl-distortion")]
    Twirl,
}

impl FilterKind {
    pub fn all() -> &'static [FilterKind] {
        FilterKind::VARIANTS
    }

    /// Parse a filter name, mapping failures to [`FilterError::UnknownFilter`].
    pub fn parse(name: &str) -> Result<Self> {
        FilterKind::from_str(name.trim()).map_err(|_| FilterError::UnknownFilter(name.to_string()))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum ParameterKey {
    Intensity,
    Radius,
    Scale,
    Angle,
    CenterX,
    CenterY,
}

pub trait Filter {
    fn kind(&self) -> FilterKind;

    fn supported_parameters(&self) -> BTreeSet<ParameterKey>;

    /// Current value of `key`. Unset optional parameters report `None`.
    fn value(&self, key: ParameterKey) -> Option<f32>;

    fn set_value(&mut self, key: ParameterKey, value: f32) -> Result<()>;

    /// Recipe describing `input` with this filter applied, or `None` when the
    /// filter cannot produce anything from it.
    fn output_image<'a>(&self, input: RecipeImage<'a>) -> Option<RecipeImage<'a>>;

    fn supports(&self, key: ParameterKey) -> bool {
        self.supported_parameters().contains(&key)
    }
}

/// Instantiate a filter with its built-in defaults.
pub fn make_filter(kind: FilterKind) -> Box<dyn Filter> {
    match kind {
        FilterKind::Sepia => Box::new(sepia::SepiaConfig::new()),
        FilterKind::Pixellate => Box::new(pixellate::PixellateConfig::new()),
        FilterKind::Crystallize => Box::new(crystallize::CrystallizeConfig::new()),
        FilterKind::Twirl => Box::new(twirl::TwirlConfig::new()),
    }
}

/// Per-pixel evaluation of a configured filter inside a recipe.
#[derive(Debug, Clone, PartialEq)]
pub enum Kernel {
    Sepia(sepia::SepiaKernel),
    Pixellate(pixellate::PixellateKernel),
    Crystallize(crystallize::CrystallizeKernel),
    Twirl(twirl::TwirlKernel),
}

impl Kernel {
    pub fn extent(&self, input: &Extent) -> Extent {
        match self {
            Kernel::Sepia(_) => *input,
            Kernel::Pixellate(kernel) => kernel.extent(input),
            Kernel::Crystallize(kernel) => kernel.extent(input),
            Kernel::Twirl(kernel) => kernel.extent(input),
        }
    }

    pub fn sample(&self, input: &RecipeImage, x: f32, y: f32) -> Rgba<f32> {
        match self {
            Kernel::Sepia(kernel) => kernel.sample(input, x, y),
            Kernel::Pixellate(kernel) => kernel.sample(input, x, y),
            Kernel::Crystallize(kernel) => kernel.sample(input, x, y),
            Kernel::Twirl(kernel) => kernel.sample(input, x, y),
        }
    }
}

fn unsupported(kind: FilterKind, key: ParameterKey) -> FilterError {
    FilterError::InvalidParameter(format!("{kind} does not support `{key}`"))
}

fn check_finite(key: ParameterKey, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FilterError::InvalidParameter(format!(
            "`{key}` must be finite, got {value}"
        )))
    }
}

/// Resolve an optional centre against the input extent's midpoint.
fn resolve_center(x: Option<f32>, y: Option<f32>, input: &Extent) -> (f32, f32) {
    let (mid_x, mid_y) = input.center();
    (x.unwrap_or(mid_x), y.unwrap_or(mid_y))
}
