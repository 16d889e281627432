//! Configuration types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Success-rate and duration heuristics.
    #[serde(default)]
    pub estimator: EstimatorConfig,

    /// Conversion engine behavior.
    #[serde(default)]
    pub engine: EngineSettings,
}

/// Heuristic constants for success-rate and duration estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Base success rate per complexity level.
    #[serde(default)]
    pub success_rates: SuccessRates,

    /// Multiplier per paradigm compatibility class.
    #[serde(default)]
    pub compatibility_factors: CompatibilityFactors,

    /// Moderate conversions with at most this many objects take minutes.
    #[serde(default = "default_moderate_minutes_max_objects")]
    pub moderate_minutes_max_objects: usize,

    /// Moderate conversions with at most this many objects take hours;
    /// larger ones take hours to days.
    #[serde(default = "default_moderate_hours_max_objects")]
    pub moderate_hours_max_objects: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            success_rates: SuccessRates::default(),
            compatibility_factors: CompatibilityFactors::default(),
            moderate_minutes_max_objects: default_moderate_minutes_max_objects(),
            moderate_hours_max_objects: default_moderate_hours_max_objects(),
        }
    }
}

/// Base success rate per complexity level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuccessRates {
    pub trivial: f64,
    pub simple: f64,
    pub moderate: f64,
    pub complex: f64,
    pub impossible: f64,
}

impl Default for SuccessRates {
    fn default() -> Self {
        Self {
            trivial: 0.99,
            simple: 0.95,
            moderate: 0.85,
            complex: 0.70,
            impossible: 0.10,
        }
    }
}

/// Success-rate multiplier per paradigm compatibility class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityFactors {
    pub identical: f64,
    pub compatible: f64,
    pub partial: f64,
    pub incompatible: f64,
}

impl Default for CompatibilityFactors {
    fn default() -> Self {
        Self {
            identical: 1.0,
            compatible: 0.95,
            partial: 0.80,
            incompatible: 0.60,
        }
    }
}

/// Conversion engine behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Mode used when a request does not set one (default: automatic).
    #[serde(default)]
    pub default_mode: ExecutionMode,

    /// Maximum nesting depth when flattening composite types (default: 8).
    #[serde(default = "default_max_custom_type_depth")]
    pub max_custom_type_depth: usize,

    /// Fail requests classified as impossible instead of attempting them
    /// (default: true).
    #[serde(default = "default_true")]
    pub fail_on_impossible: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_mode: ExecutionMode::default(),
            max_custom_type_depth: default_max_custom_type_depth(),
            fail_on_impossible: true,
        }
    }
}

/// How the engine executes a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Apply every rule with default decisions.
    #[default]
    Automatic,

    /// Apply rules, recording unanswered decision points as pending.
    Interactive,

    /// Report the matrix-derived analysis only; no schema is produced.
    AnalysisOnly,

    /// Execute fully and return the schema as a preview.
    DryRun,
}

impl ExecutionMode {
    /// Whether this mode produces a converted schema.
    pub fn executes(&self) -> bool {
        !matches!(self, ExecutionMode::AnalysisOnly)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionMode::Automatic => "automatic",
            ExecutionMode::Interactive => "interactive",
            ExecutionMode::AnalysisOnly => "analysis_only",
            ExecutionMode::DryRun => "dry_run",
        };
        f.write_str(s)
    }
}

impl FromStr for ExecutionMode {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "automatic" | "auto" => Ok(ExecutionMode::Automatic),
            "interactive" => Ok(ExecutionMode::Interactive),
            "analysis_only" | "analysis" => Ok(ExecutionMode::AnalysisOnly),
            "dry_run" => Ok(ExecutionMode::DryRun),
            other => Err(ConvertError::Config(format!(
                "Unknown execution mode '{}'. Expected automatic, interactive, analysis-only or dry-run",
                other
            ))),
        }
    }
}

// Default value functions for serde
fn default_moderate_minutes_max_objects() -> usize {
    10
}

fn default_moderate_hours_max_objects() -> usize {
    100
}

fn default_max_custom_type_depth() -> usize {
    8
}

fn default_true() -> bool {
    true
}
