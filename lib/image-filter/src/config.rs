use crate::{FilterError, FilterKind, FilterSpec, ParameterRole, Result, make_filter};
use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// Filter selection as it appears in a TOML config file.
///
/// ```toml
/// filter = "twirl"
/// amount = 1.0
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Derivative)]
#[derivative(Default)]
pub struct FilterConfig {
    #[serde(default = "filter_default")]
    #[derivative(Default(value = "filter_default()"))]
    pub filter: String,

    #[serde(default = "amount_default")]
    #[derivative(Default(value = "amount_default()"))]
    pub amount: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_x: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_y: Option<f32>,
}

impl FilterConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config = toml::from_str::<FilterConfig>(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline would run without visible effect.
    ///
    /// A filter that advertises none of the generic roles cannot be driven by
    /// `amount` and is refused here, even though the pipeline itself would run
    /// it with defaults.
    pub fn validate(&self) -> Result<FilterKind> {
        let kind = FilterKind::parse(&self.filter)?;

        if !self.amount.is_finite() || !(0.0..=1.0).contains(&self.amount) {
            return Err(FilterError::InvalidParameter(format!(
                "amount must be within [0, 1], got {}",
                self.amount
            )));
        }

        let supported = make_filter(kind).supported_parameters();
        if !ParameterRole::ALL
            .iter()
            .any(|role| supported.contains(&role.key()))
        {
            return Err(FilterError::InvalidParameter(format!(
                "{kind} has no parameter driven by amount"
            )));
        }

        if self.center_x.is_some() != self.center_y.is_some() {
            return Err(FilterError::InvalidParameter(
                "center_x and center_y must be set together".to_string(),
            ));
        }

        Ok(kind)
    }

    pub fn to_spec(&self) -> FilterSpec {
        let spec = FilterSpec::new(self.filter.clone(), self.amount);
        match (self.center_x, self.center_y) {
            (Some(x), Some(y)) => spec.with_center(x, y),
            _ => spec,
        }
    }
}

fn filter_default() -> String {
    FilterKind::Twirl.to_string()
}

fn amount_default() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FilterConfig::default();
        assert_eq!(config.filter, "twirl");
        assert_eq!(config.amount, 1.0);
        assert_eq!(config.validate().unwrap(), FilterKind::Twirl);
        assert_eq!(config.to_spec(), FilterSpec::new("twirl", 1.0));
    }

    #[test]
    fn test_parse_toml() {
        let config = FilterConfig::from_toml_str(
            r#"
            filter = "pixellate"
            amount = 0.4
            center_x = 12.0
            center_y = 8.0
            "#,
        )
        .unwrap();

        assert_eq!(config.filter, "pixellate");
        assert_eq!(config.to_spec().center, Some((12.0, 8.0)));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = FilterConfig::from_toml_str("amount = 0.25").unwrap();
        assert_eq!(config.filter, "twirl");
        assert_eq!(config.amount, 0.25);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            FilterConfig::from_toml_str(r#"filter = "unknown-filter""#),
            Err(FilterError::UnknownFilter(_))
        ));
        assert!(matches!(
            FilterConfig::from_toml_str("amount = 1.5"),
            Err(FilterError::InvalidParameter(_))
        ));
        assert!(matches!(
            FilterConfig::from_toml_str("center_x = 1.0"),
            Err(FilterError::InvalidParameter(_))
        ));
        assert!(matches!(
            FilterConfig::from_toml_str("amount = \"lots\""),
            Err(FilterError::Config(_))
        ));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = FilterConfig {
            filter: "sepia".to_string(),
            amount: 0.5,
            ..FilterConfig::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(FilterConfig::from_toml_str(&text).unwrap(), config);
    }
}
