//! Source image in, one filtered and rendered image out.

use crate::{
    Filter, FilterError, FilterKind, ParameterKey, RenderContext, RenderedImage, Result,
    SourceImage, make_filter,
};
use serde::{Deserialize, Serialize};

/// Which filter to run and how strongly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub name: String,

    /// Generic strength in `[0, 1]`, clamped on use
    pub amount: f32,

    /// Overrides the filter centre when the filter has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<(f32, f32)>,
}

impl FilterSpec {
    pub fn new(name: impl Into<String>, amount: f32) -> Self {
        Self {
            name: name.into(),
            amount,
            center: None,
        }
    }

    pub fn with_center(mut self, x: f32, y: f32) -> Self {
        self.center = Some((x, y));
        self
    }

    pub fn kind(&self) -> Result<FilterKind> {
        FilterKind::parse(&self.name)
    }
}

/// Generic parameter roles the amount is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterRole {
    Intensity,
    Radius,
    Scale,
}

impl ParameterRole {
    pub const ALL: [ParameterRole; 3] = [
        ParameterRole::Intensity,
        ParameterRole::Radius,
        ParameterRole::Scale,
    ];

    pub fn key(&self) -> ParameterKey {
        match self {
            ParameterRole::Intensity => ParameterKey::Intensity,
            ParameterRole::Radius => ParameterKey::Radius,
            ParameterRole::Scale => ParameterKey::Scale,
        }
    }

    pub fn multiplier(&self) -> f32 {
        match self {
            ParameterRole::Intensity => 1.0,
            ParameterRole::Radius => 200.0,
            ParameterRole::Scale => 10.0,
        }
    }
}

/// Set every role the filter advertises to `amount * multiplier`.
///
/// Roles the filter does not support are skipped. Returns the roles that were
/// assigned, which may be empty.
pub fn assign_parameters(filter: &mut dyn Filter, amount: f32) -> Result<Vec<ParameterRole>> {
    if !amount.is_finite() {
        return Err(FilterError::InvalidParameter(format!(
            "amount must be finite, got {amount}"
        )));
    }

    let amount = amount.clamp(0.0, 1.0);
    let supported = filter.supported_parameters();
    let mut assigned = Vec::with_capacity(ParameterRole::ALL.len());

    for role in ParameterRole::ALL {
        if supported.contains(&role.key()) {
            filter.set_value(role.key(), amount * role.multiplier())?;
            assigned.push(role);
        }
    }

    Ok(assigned)
}

/// Progress through one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RecipeBuilt,
    ParametersAssigned,
    Rendered,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    context: RenderContext,
}

impl Pipeline {
    pub fn new(context: RenderContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn apply(&self, source: &SourceImage, spec: &FilterSpec) -> Result<RenderedImage> {
        self.apply_with_progress(source, spec, |_| {})
    }

    /// Like [`Pipeline::apply`], reporting each completed stage to `on_stage`.
    pub fn apply_with_progress(
        &self,
        source: &SourceImage,
        spec: &FilterSpec,
        mut on_stage: impl FnMut(Stage),
    ) -> Result<RenderedImage> {
        let recipe = source.recipe();
        let kind = spec.kind()?;
        let mut filter = make_filter(kind);
        on_stage(Stage::RecipeBuilt);

        let assigned = assign_parameters(filter.as_mut(), spec.amount)?;
        if assigned.is_empty() {
            log::debug!("{kind} supports no generic role, using its defaults");
        } else {
            log::debug!("{kind} assigned roles {assigned:?} from amount {}", spec.amount);
        }

        if let Some((x, y)) = spec.center
            && filter.supports(ParameterKey::CenterX)
            && filter.supports(ParameterKey::CenterY)
        {
            filter.set_value(ParameterKey::CenterX, x)?;
            filter.set_value(ParameterKey::CenterY, y)?;
        }
        on_stage(Stage::ParametersAssigned);

        // A decoded source always has content, so this only trips on hand-built recipes.
        let output = filter.output_image(recipe).ok_or(FilterError::NoOutput)?;
        let rendered = self.context.render(&output)?;
        on_stage(Stage::Rendered);

        Ok(rendered)
    }
}

/// Run `spec` over `source` with a default render context.
pub fn apply_filter(source: &SourceImage, spec: &FilterSpec) -> Result<RenderedImage> {
    Pipeline::default().apply(source, spec)
}
