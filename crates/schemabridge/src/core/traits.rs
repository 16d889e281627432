//! Core traits for pluggable conversion heuristics.
//!
//! - [`Estimator`]: success-rate and duration heuristics used by the matrix
//!   generator and the engine report

use crate::matrix::{ConversionComplexity, DurationEstimate};
use crate::paradigm::ParadigmCompatibility;

/// Success-rate and duration heuristics for a conversion.
///
/// The built-in [`HeuristicEstimator`](crate::matrix::HeuristicEstimator)
/// reads its constants from [`EstimatorConfig`](crate::config::EstimatorConfig).
/// Hosts with measured outcomes can plug in their own implementation
/// without touching the resolvers.
pub trait Estimator: Send + Sync {
    /// Estimated probability (0..=1) that a conversion succeeds.
    fn success_rate(
        &self,
        complexity: ConversionComplexity,
        compatibility: ParadigmCompatibility,
    ) -> f64;

    /// Estimated duration bucket for a conversion of `object_count` objects.
    fn duration(&self, complexity: ConversionComplexity, object_count: usize) -> DurationEstimate;

    /// Name shown in reports.
    fn name(&self) -> &str {
        "custom"
    }
}
