//! Configuration validation.

use super::Config;
use crate::error::{ConvertError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let rates = &config.estimator.success_rates;
    let ordered = [
        ("trivial", rates.trivial),
        ("simple", rates.simple),
        ("moderate", rates.moderate),
        ("complex", rates.complex),
        ("impossible", rates.impossible),
    ];
    for (name, rate) in ordered {
        check_unit("estimator.success_rates", name, rate)?;
    }
    for pair in ordered.windows(2) {
        if pair[1].1 > pair[0].1 {
            return Err(ConvertError::Config(format!(
                "estimator.success_rates.{} ({}) must not exceed estimator.success_rates.{} ({})",
                pair[1].0, pair[1].1, pair[0].0, pair[0].1
            )));
        }
    }

    let factors = &config.estimator.compatibility_factors;
    for (name, factor) in [
        ("identical", factors.identical),
        ("compatible", factors.compatible),
        ("partial", factors.partial),
        ("incompatible", factors.incompatible),
    ] {
        check_unit("estimator.compatibility_factors", name, factor)?;
    }

    if config.estimator.moderate_minutes_max_objects >= config.estimator.moderate_hours_max_objects {
        return Err(ConvertError::Config(format!(
            "estimator.moderate_minutes_max_objects ({}) must be less than estimator.moderate_hours_max_objects ({})",
            config.estimator.moderate_minutes_max_objects,
            config.estimator.moderate_hours_max_objects
        )));
    }

    if config.engine.max_custom_type_depth == 0 {
        return Err(ConvertError::Config(
            "engine.max_custom_type_depth must be at least 1".into(),
        ));
    }

    Ok(())
}

fn check_unit(section: &str, name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConvertError::Config(format!(
            "{}.{} must be between 0 and 1, got {}",
            section, name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rate_out_of_range() {
        let mut config = Config::default();
        config.estimator.success_rates.trivial = 1.5;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("success_rates.trivial"));
    }

    #[test]
    fn test_rates_must_not_increase() {
        let mut config = Config::default();
        config.estimator.success_rates.complex = 0.9;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("success_rates.complex"));
    }

    #[test]
    fn test_nan_factor_rejected() {
        let mut config = Config::default();
        config.estimator.compatibility_factors.partial = f64::NAN;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_thresholds_must_ascend() {
        let mut config = Config::default();
        config.estimator.moderate_minutes_max_objects = 100;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let mut config = Config::default();
        config.engine.max_custom_type_depth = 0;
        assert!(matches!(validate(&config), Err(ConvertError::Config(_))));
    }
}
