//! Conversion matrices between database pairs.
//!
//! A [`ConversionMatrix`] classifies one ordered database pair: paradigm
//! compatibility, overall complexity, a rule per object type the source
//! supports, the applicable structural strategies and the estimated
//! success rate and duration. Matrices are computed per request from the
//! read-only [`Registry`] and are never cached.

mod estimate;
mod path;

pub use estimate::{ConversionComplexity, DurationEstimate, HeuristicEstimator};
pub use path::{ConversionPath, PathFinder, PathStep};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Estimator, Registry};
use crate::dialect::{ObjectType, SupportState};
use crate::error::Result;
use crate::paradigm::{ConversionStrategy, Paradigm, ParadigmCompatibility};

/// Identical-paradigm pairs with at most this many unsupported object
/// types are Simple; more are Moderate.
const SIMPLE_UNSUPPORTED_MAX: usize = 3;

/// What happens to objects of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    /// Target supports the type; objects are carried over.
    Direct,
    /// Target emulates the type with its alternatives.
    Emulate,
    /// Target cannot represent the type.
    Drop,
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleAction::Direct => "direct",
            RuleAction::Emulate => "emulate",
            RuleAction::Drop => "drop",
        };
        f.write_str(s)
    }
}

/// Conversion rule for one object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectConversionRule {
    pub object_type: ObjectType,
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<ObjectType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ObjectConversionRule {
    /// Derive the rule from the target's support state (None = undefined).
    pub(crate) fn for_target(object_type: ObjectType, target: Option<&SupportState>) -> Self {
        let notes = |state: &SupportState| state.note().map(|n| vec![n.to_string()]).unwrap_or_default();
        match target {
            Some(state) if state.is_supported() => Self {
                object_type,
                action: RuleAction::Direct,
                alternatives: state.alternatives().to_vec(),
                notes: notes(state),
            },
            Some(state) if !state.alternatives().is_empty() => Self {
                object_type,
                action: RuleAction::Emulate,
                alternatives: state.alternatives().to_vec(),
                notes: notes(state),
            },
            Some(state) => Self {
                object_type,
                action: RuleAction::Drop,
                alternatives: Vec::new(),
                notes: notes(state),
            },
            None => Self {
                object_type,
                action: RuleAction::Drop,
                alternatives: Vec::new(),
                notes: vec![format!("{} is not defined for the target", object_type)],
            },
        }
    }
}

/// Classification of one ordered database pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionMatrix {
    pub source_db: String,
    pub target_db: String,
    pub source_paradigms: BTreeSet<Paradigm>,
    pub target_paradigms: BTreeSet<Paradigm>,
    pub compatibility: ParadigmCompatibility,
    pub complexity: ConversionComplexity,
    /// Rule per object type the source supports.
    pub object_conversions: BTreeMap<ObjectType, ObjectConversionRule>,
    /// Applicable structural strategies, precedence-sorted.
    pub strategies: Vec<ConversionStrategy>,
    pub requires_user_input: bool,
    pub requires_enrichment: bool,
    /// Estimated probability of success (0..=1).
    pub success_rate: f64,
    pub duration: DurationEstimate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ConversionMatrix {
    /// Whether the pair can be converted at all.
    pub fn is_feasible(&self) -> bool {
        self.complexity != ConversionComplexity::Impossible
    }

    /// Source object types the target does not support natively.
    pub fn unsupported_object_types(&self) -> Vec<ObjectType> {
        self.object_conversions
            .values()
            .filter(|rule| rule.action != RuleAction::Direct)
            .map(|rule| rule.object_type)
            .collect()
    }

    /// Rule for an object type, if the source supports it.
    pub fn rule(&self, object_type: ObjectType) -> Option<&ObjectConversionRule> {
        self.object_conversions.get(&object_type)
    }
}

/// Builds [`ConversionMatrix`] values from a shared registry.
#[derive(Clone)]
pub struct MatrixGenerator {
    registry: Arc<Registry>,
    estimator: Arc<dyn Estimator>,
}

impl MatrixGenerator {
    /// Create a generator with the default heuristic estimator.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            estimator: Arc::new(HeuristicEstimator::default()),
        }
    }

    /// Replace the estimator.
    pub fn with_estimator(mut self, estimator: Arc<dyn Estimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn estimator(&self) -> &Arc<dyn Estimator> {
        &self.estimator
    }

    /// Generate the matrix for `source -> target`.
    ///
    /// Fails with `UnknownDatabase` for unregistered identifiers and with
    /// `MatrixUnavailable` when either database lacks a feature-support or
    /// type profile.
    pub fn generate(&self, source: &str, target: &str) -> Result<ConversionMatrix> {
        let registry = &self.registry;
        let source_caps = registry.require_capabilities(source)?;
        let target_caps = registry.require_capabilities(target)?;
        let source_features = registry.require_feature_profile(source)?;
        let target_features = registry.require_feature_profile(target)?;
        registry.require_type_profile(source)?;
        registry.require_type_profile(target)?;

        let analyzer = registry.analyzer();
        let compatibility = analyzer.compatibility(&source_caps.paradigms, &target_caps.paradigms);

        let object_conversions: BTreeMap<ObjectType, ObjectConversionRule> = source_features
            .supported_types()
            .map(|object_type| {
                let rule = ObjectConversionRule::for_target(
                    object_type,
                    target_features.support(object_type),
                );
                (object_type, rule)
            })
            .collect();

        let unsupported = object_conversions
            .values()
            .filter(|rule| rule.action != RuleAction::Direct)
            .count();
        let all_dropped = object_conversions
            .values()
            .all(|rule| rule.action == RuleAction::Drop);

        let complexity = match compatibility {
            ParadigmCompatibility::Identical => {
                if unsupported == 0 {
                    ConversionComplexity::Trivial
                } else if unsupported <= SIMPLE_UNSUPPORTED_MAX {
                    ConversionComplexity::Simple
                } else {
                    ConversionComplexity::Moderate
                }
            }
            ParadigmCompatibility::Compatible => ConversionComplexity::Simple,
            ParadigmCompatibility::Partial => ConversionComplexity::Moderate,
            ParadigmCompatibility::Incompatible if all_dropped => ConversionComplexity::Impossible,
            ParadigmCompatibility::Incompatible => ConversionComplexity::Complex,
        };

        let strategies = analyzer.strategies(&source_caps.paradigms, &target_caps.paradigms);
        let requires_user_input =
            complexity >= ConversionComplexity::Complex || compatibility.is_at_most_partial();
        let requires_enrichment = compatibility.is_at_most_partial();

        let success_rate = self.estimator.success_rate(complexity, compatibility);
        let duration = self.estimator.duration(complexity, object_conversions.len());

        let preferences = &target_features.preferences;
        let mut notes = preferences.special_requirements.clone();
        if preferences
            .preferred_sources
            .iter()
            .any(|id| registry.normalize(id) == source_caps.id)
        {
            notes.push(format!(
                "{} is a preferred source for {}",
                source_caps.display_name, target_caps.display_name
            ));
        }
        let warnings = preferences.limitations.clone();

        debug!(
            "Matrix {} -> {}: {} paradigms, {} complexity, {} rules ({} unsupported)",
            source_caps.id,
            target_caps.id,
            compatibility,
            complexity,
            object_conversions.len(),
            unsupported
        );

        Ok(ConversionMatrix {
            source_db: source_caps.id.clone(),
            target_db: target_caps.id.clone(),
            source_paradigms: source_caps.paradigms.clone(),
            target_paradigms: target_caps.paradigms.clone(),
            compatibility,
            complexity,
            object_conversions,
            strategies,
            requires_user_input,
            requires_enrichment,
            success_rate,
            duration,
            notes,
            warnings,
        })
    }
}

impl fmt::Debug for MatrixGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixGenerator")
            .field("databases", &self.registry.len())
            .field("estimator", &self.estimator.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    fn generator() -> MatrixGenerator {
        MatrixGenerator::new(Arc::new(Registry::build()))
    }

    #[test]
    fn test_postgres_to_mongodb_is_complex() {
        let matrix = generator().generate("postgresql", "mongodb").unwrap();
        assert_eq!(matrix.compatibility, ParadigmCompatibility::Incompatible);
        assert_eq!(matrix.complexity, ConversionComplexity::Complex);
        assert!(matrix.requires_user_input);
        assert!(matrix.requires_enrichment);
        assert_eq!(matrix.strategies, vec![ConversionStrategy::Denormalization]);
        assert!(matrix.is_feasible());

        let tables = matrix.rule(ObjectType::Table).unwrap();
        assert_eq!(tables.action, RuleAction::Emulate);
        assert_eq!(tables.alternatives, vec![ObjectType::Collection]);
        assert_eq!(matrix.rule(ObjectType::Trigger).unwrap().action, RuleAction::Drop);
        assert!((matrix.success_rate - 0.42).abs() < 1e-9);
        assert_eq!(matrix.duration, DurationEstimate::HoursToDays);
    }

    #[test]
    fn test_identical_paradigms() {
        let matrix = generator().generate("postgresql", "mysql").unwrap();
        assert_eq!(matrix.compatibility, ParadigmCompatibility::Identical);
        assert!(matrix.complexity <= ConversionComplexity::Moderate);
        assert_eq!(matrix.strategies, vec![ConversionStrategy::Direct]);
        assert!(!matrix.requires_enrichment);

        let same = generator().generate("mysql", "mariadb").unwrap();
        assert_eq!(same.complexity, ConversionComplexity::Trivial);
        assert!(same.unsupported_object_types().is_empty());
        assert!(!same.requires_user_input);
    }

    #[test]
    fn test_compatible_and_partial_pairs() {
        let compatible = generator().generate("postgresql", "timescaledb").unwrap();
        assert_eq!(compatible.compatibility, ParadigmCompatibility::Compatible);
        assert_eq!(compatible.complexity, ConversionComplexity::Simple);

        let partial = generator().generate("dynamodb", "mongodb").unwrap();
        assert_eq!(partial.compatibility, ParadigmCompatibility::Compatible);

        let partial = generator().generate("arangodb", "elasticsearch").unwrap();
        assert_eq!(partial.compatibility, ParadigmCompatibility::Partial);
        assert_eq!(partial.complexity, ConversionComplexity::Moderate);
        assert!(partial.requires_user_input);
    }

    #[test]
    fn test_rules_cover_every_supported_source_type() {
        let registry = Arc::new(Registry::build());
        let generator = MatrixGenerator::new(registry.clone());
        let source = registry.feature_profile("neo4j").unwrap();
        let matrix = generator.generate("neo4j", "redis").unwrap();
        let expected: Vec<ObjectType> = source.supported_types().collect();
        let actual: Vec<ObjectType> = matrix.object_conversions.keys().copied().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_aliases_are_normalized() {
        let matrix = generator().generate("PG", "mongo").unwrap();
        assert_eq!(matrix.source_db, "postgresql");
        assert_eq!(matrix.target_db, "mongodb");
    }

    #[test]
    fn test_target_preferences_become_notes_and_warnings() {
        let matrix = generator().generate("postgresql", "sqlserver").unwrap();
        assert!(matrix.notes.iter().any(|n| n.contains("preferred source")));
        assert!(matrix.warnings.iter().any(|w| w.contains("900 bytes")));
    }

    #[test]
    fn test_unknown_and_unavailable_databases() {
        let err = generator().generate("postgresql", "nosuchdb").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownDatabase(_)));

        let mut registry = Registry::new();
        registry.register_capabilities(crate::core::DatabaseCapabilities::new(
            "bare",
            "Bare",
            &[Paradigm::Relational],
        ));
        registry.register_capabilities(crate::core::DatabaseCapabilities::new(
            "other",
            "Other",
            &[Paradigm::Relational],
        ));
        let err = MatrixGenerator::new(Arc::new(registry))
            .generate("bare", "other")
            .unwrap_err();
        assert!(matches!(err, ConvertError::MatrixUnavailable { .. }));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = generator();
        let first = generator.generate("oracle", "cassandra").unwrap();
        let second = generator.generate("oracle", "cassandra").unwrap();
        assert_eq!(first, second);
    }
}
