//! Complexity levels, duration buckets and the built-in heuristic estimator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EstimatorConfig;
use crate::core::Estimator;
use crate::paradigm::ParadigmCompatibility;

/// How hard a conversion is. Totally ordered, `Trivial` lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionComplexity {
    Trivial,
    Simple,
    Moderate,
    Complex,
    Impossible,
}

impl ConversionComplexity {
    /// One level worse, saturating at `Impossible`.
    pub fn worse(self) -> Self {
        match self {
            ConversionComplexity::Trivial => ConversionComplexity::Simple,
            ConversionComplexity::Simple => ConversionComplexity::Moderate,
            ConversionComplexity::Moderate => ConversionComplexity::Complex,
            ConversionComplexity::Complex | ConversionComplexity::Impossible => {
                ConversionComplexity::Impossible
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionComplexity::Trivial => "trivial",
            ConversionComplexity::Simple => "simple",
            ConversionComplexity::Moderate => "moderate",
            ConversionComplexity::Complex => "complex",
            ConversionComplexity::Impossible => "impossible",
        }
    }
}

impl fmt::Display for ConversionComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated wall-clock effort bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationEstimate {
    Seconds,
    Minutes,
    Hours,
    HoursToDays,
    Infeasible,
}

impl fmt::Display for DurationEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DurationEstimate::Seconds => "seconds",
            DurationEstimate::Minutes => "minutes",
            DurationEstimate::Hours => "hours",
            DurationEstimate::HoursToDays => "hours to days",
            DurationEstimate::Infeasible => "infeasible",
        };
        f.write_str(s)
    }
}

/// Fixed-constant estimator driven by [`EstimatorConfig`].
#[derive(Debug, Clone, Default)]
pub struct HeuristicEstimator {
    config: EstimatorConfig,
}

impl HeuristicEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }
}

impl Estimator for HeuristicEstimator {
    fn success_rate(
        &self,
        complexity: ConversionComplexity,
        compatibility: ParadigmCompatibility,
    ) -> f64 {
        let rates = &self.config.success_rates;
        let base = match complexity {
            ConversionComplexity::Trivial => rates.trivial,
            ConversionComplexity::Simple => rates.simple,
            ConversionComplexity::Moderate => rates.moderate,
            ConversionComplexity::Complex => rates.complex,
            ConversionComplexity::Impossible => rates.impossible,
        };
        let factors = &self.config.compatibility_factors;
        let factor = match compatibility {
            ParadigmCompatibility::Identical => factors.identical,
            ParadigmCompatibility::Compatible => factors.compatible,
            ParadigmCompatibility::Partial => factors.partial,
            ParadigmCompatibility::Incompatible => factors.incompatible,
        };
        (base * factor).clamp(0.0, 1.0)
    }

    fn duration(&self, complexity: ConversionComplexity, object_count: usize) -> DurationEstimate {
        match complexity {
            ConversionComplexity::Trivial => DurationEstimate::Seconds,
            ConversionComplexity::Simple => DurationEstimate::Minutes,
            ConversionComplexity::Moderate => {
                if object_count <= self.config.moderate_minutes_max_objects {
                    DurationEstimate::Minutes
                } else if object_count <= self.config.moderate_hours_max_objects {
                    DurationEstimate::Hours
                } else {
                    DurationEstimate::HoursToDays
                }
            }
            ConversionComplexity::Complex => DurationEstimate::HoursToDays,
            ConversionComplexity::Impossible => DurationEstimate::Infeasible,
        }
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_is_ordered() {
        assert!(ConversionComplexity::Trivial < ConversionComplexity::Simple);
        assert!(ConversionComplexity::Complex < ConversionComplexity::Impossible);
        assert_eq!(ConversionComplexity::Moderate.worse(), ConversionComplexity::Complex);
        assert_eq!(ConversionComplexity::Impossible.worse(), ConversionComplexity::Impossible);
    }

    #[test]
    fn test_success_rate_constants() {
        let estimator = HeuristicEstimator::default();
        let rate = estimator.success_rate(ConversionComplexity::Trivial, ParadigmCompatibility::Identical);
        assert!((rate - 0.99).abs() < 1e-9);
        let rate = estimator.success_rate(ConversionComplexity::Complex, ParadigmCompatibility::Incompatible);
        assert!((rate - 0.42).abs() < 1e-9);
        let rate = estimator.success_rate(ConversionComplexity::Moderate, ParadigmCompatibility::Partial);
        assert!((rate - 0.68).abs() < 1e-9);
    }

    #[test]
    fn test_moderate_duration_scales_with_objects() {
        let estimator = HeuristicEstimator::default();
        assert_eq!(estimator.duration(ConversionComplexity::Moderate, 5), DurationEstimate::Minutes);
        assert_eq!(estimator.duration(ConversionComplexity::Moderate, 50), DurationEstimate::Hours);
        assert_eq!(estimator.duration(ConversionComplexity::Moderate, 500), DurationEstimate::HoursToDays);
        assert_eq!(estimator.duration(ConversionComplexity::Impossible, 1), DurationEstimate::Infeasible);
    }

    #[test]
    fn test_configured_constants_are_used() {
        let mut config = EstimatorConfig::default();
        config.success_rates.simple = 0.5;
        config.moderate_minutes_max_objects = 1;
        let estimator = HeuristicEstimator::new(config);
        let rate = estimator.success_rate(ConversionComplexity::Simple, ParadigmCompatibility::Identical);
        assert!((rate - 0.5).abs() < 1e-9);
        assert_eq!(estimator.duration(ConversionComplexity::Moderate, 2), DurationEstimate::Hours);
    }
}
