//! Conversion result and report types.
//!
//! [`ConversionResult`] is the only artifact a host (RPC layer, CLI) needs
//! to serialize. A failed request has `success == false`, no schema and no
//! report; a request that ran has a schema (unless analysis-only) and may
//! still carry warnings and unsupported features.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ExecutionMode;
use crate::core::Schema;
use crate::dialect::ObjectType;
use crate::matrix::{ConversionComplexity, DurationEstimate};
use crate::paradigm::{ConversionStrategy, Paradigm, ParadigmCompatibility};
use crate::typemap::CustomTypeStrategy;

/// Warning severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// What a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    TypeConversion,
    LossyConversion,
    CustomType,
    Emulation,
    Unsupported,
    Excluded,
    Enrichment,
    Matrix,
}

/// A caveat attached to a completed conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionWarning {
    pub kind: WarningKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ConversionWarning {
    pub fn new(kind: WarningKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            object_type: None,
            object_name: None,
            message: message.into(),
            severity,
            suggestion: None,
        }
    }

    pub fn on(mut self, object_type: ObjectType, object_name: impl Into<String>) -> Self {
        self.object_type = Some(object_type);
        self.object_name = Some(object_name.into());
        self
    }

    pub fn for_type(mut self, object_type: ObjectType) -> Self {
        self.object_type = Some(object_type);
        self
    }

    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// A source feature the target cannot represent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedFeature {
    pub feature_type: String,
    pub object_type: ObjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<ObjectType>,
}

/// A decision point the request did not answer.
///
/// The default was applied provisionally; re-run with the answer in
/// `UserPreferences::decisions` under `id` to change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDecision {
    pub id: String,
    pub object_type: ObjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    pub question: String,
    pub options: Vec<String>,
    pub default: String,
}

/// Per-object-type counts. `converted + skipped + dropped == source_count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeStats {
    pub source_count: usize,
    pub converted: usize,
    pub skipped: usize,
    pub dropped: usize,
    pub success_rate: f64,
}

impl ObjectTypeStats {
    pub fn new(source_count: usize) -> Self {
        Self {
            source_count,
            ..Default::default()
        }
    }

    /// Whether every source object is accounted for.
    pub fn is_balanced(&self) -> bool {
        self.converted + self.skipped + self.dropped == self.source_count
    }

    fn finish(&mut self) {
        self.success_rate = if self.source_count == 0 {
            1.0
        } else {
            self.converted as f64 / self.source_count as f64
        };
    }
}

/// Structured report of one conversion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub request_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub source_db: String,
    pub target_db: String,
    pub mode: ExecutionMode,
    pub dry_run: bool,
    pub source_paradigms: BTreeSet<Paradigm>,
    pub target_paradigms: BTreeSet<Paradigm>,
    pub compatibility: ParadigmCompatibility,
    pub complexity: ConversionComplexity,
    pub strategies: Vec<ConversionStrategy>,
    pub estimator: String,
    pub estimated_success_rate: f64,
    pub estimated_duration: DurationEstimate,
    pub object_stats: BTreeMap<ObjectType, ObjectTypeStats>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_type_strategies: BTreeMap<CustomTypeStrategy, usize>,
    /// Converted objects over source objects, all types together.
    pub success_rate: f64,
    pub requires_user_input: bool,
    pub enrichment_used: bool,
    pub sample_data_used: bool,
    pub config_hash: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ConversionReport {
    /// Compute per-type and overall success rates.
    pub(crate) fn finish(&mut self) {
        let mut source = 0;
        let mut converted = 0;
        for stats in self.object_stats.values_mut() {
            stats.finish();
            source += stats.source_count;
            converted += stats.converted;
        }
        self.success_rate = if source == 0 {
            1.0
        } else {
            converted as f64 / source as f64
        };
    }

    /// Source objects across all types.
    pub fn total_source_objects(&self) -> usize {
        self.object_stats.values().map(|s| s.source_count).sum()
    }

    /// Converted objects across all types.
    pub fn total_converted(&self) -> usize {
        self.object_stats.values().map(|s| s.converted).sum()
    }
}

/// Outcome of one conversion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ConversionReport>,
    #[serde(default)]
    pub warnings: Vec<ConversionWarning>,
    #[serde(default)]
    pub unsupported_features: Vec<UnsupportedFeature>,
    #[serde(default)]
    pub pending_decisions: Vec<PendingDecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl ConversionResult {
    /// A request that could not be attempted.
    pub fn failed(error: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            success: false,
            schema: None,
            report: None,
            warnings: Vec::new(),
            unsupported_features: Vec::new(),
            pending_decisions: Vec::new(),
            error: Some(error.into()),
            elapsed_ms,
        }
    }

    /// Warnings at or above a severity.
    pub fn warnings_at_least(&self, severity: Severity) -> impl Iterator<Item = &ConversionWarning> {
        self.warnings.iter().filter(move |w| w.severity >= severity)
    }

    /// Whether the conversion ran but left caveats.
    pub fn has_caveats(&self) -> bool {
        self.success && (!self.warnings.is_empty() || !self.unsupported_features.is_empty())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_success_rate() {
        let mut stats = ObjectTypeStats::new(4);
        stats.converted = 3;
        stats.dropped = 1;
        assert!(stats.is_balanced());
        stats.finish();
        assert!((stats.success_rate - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_failed_result_has_no_schema() {
        let result = ConversionResult::failed("Unknown database: 'x'", 0);
        assert!(!result.success);
        assert!(result.schema.is_none());
        assert!(!result.has_caveats());
        let json = result.to_json().unwrap();
        assert!(json.contains("\"error\": \"Unknown database: 'x'\""));
    }

    #[test]
    fn test_severity_filter() {
        let mut result = ConversionResult::failed("x", 0);
        result.warnings.push(ConversionWarning::new(WarningKind::Matrix, Severity::Info, "note"));
        result
            .warnings
            .push(ConversionWarning::new(WarningKind::LossyConversion, Severity::Error, "lossy"));
        assert_eq!(result.warnings_at_least(Severity::Warning).count(), 1);
    }
}
