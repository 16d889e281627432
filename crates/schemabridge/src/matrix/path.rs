//! Direct and two-step conversion paths.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ConversionComplexity, ConversionMatrix, MatrixGenerator};
use crate::error::{ConvertError, Result};

/// One hop of a conversion path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub from: String,
    pub to: String,
    pub complexity: ConversionComplexity,
    pub is_direct: bool,
}

/// A direct or two-step route between two databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionPath {
    pub source_db: String,
    pub target_db: String,
    pub steps: Vec<PathStep>,
    pub total_complexity: ConversionComplexity,
    pub recommended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate: Option<String>,
}

impl ConversionPath {
    fn direct(matrix: &ConversionMatrix) -> Self {
        Self {
            source_db: matrix.source_db.clone(),
            target_db: matrix.target_db.clone(),
            steps: vec![PathStep {
                from: matrix.source_db.clone(),
                to: matrix.target_db.clone(),
                complexity: matrix.complexity,
                is_direct: true,
            }],
            total_complexity: matrix.complexity,
            recommended: matrix.is_feasible(),
            intermediate: None,
        }
    }

    fn via(first: &ConversionMatrix, second: &ConversionMatrix) -> Self {
        let total = first.complexity.max(second.complexity).worse();
        Self {
            source_db: first.source_db.clone(),
            target_db: second.target_db.clone(),
            steps: vec![
                PathStep {
                    from: first.source_db.clone(),
                    to: first.target_db.clone(),
                    complexity: first.complexity,
                    is_direct: false,
                },
                PathStep {
                    from: second.source_db.clone(),
                    to: second.target_db.clone(),
                    complexity: second.complexity,
                    is_direct: false,
                },
            ],
            total_complexity: total,
            recommended: total < ConversionComplexity::Impossible,
            intermediate: Some(first.target_db.clone()),
        }
    }

    /// Whether the path goes through an intermediate database.
    pub fn is_multi_step(&self) -> bool {
        self.steps.len() > 1
    }
}

/// Finds the best path between two databases.
#[derive(Debug, Clone)]
pub struct PathFinder {
    generator: MatrixGenerator,
}

impl PathFinder {
    pub fn new(generator: MatrixGenerator) -> Self {
        Self { generator }
    }

    /// The direct step when it is feasible; otherwise the best two-step
    /// path over every other registered database.
    ///
    /// Intermediates are scanned in sorted identifier order. The lowest
    /// combined complexity wins and ties keep the first one found.
    pub fn find_path(&self, source: &str, target: &str) -> Result<ConversionPath> {
        let direct = self.generator.generate(source, target)?;
        if direct.is_feasible() {
            return Ok(ConversionPath::direct(&direct));
        }

        let registry = self.generator.registry();
        let mut best: Option<ConversionPath> = None;
        for intermediate in registry.database_ids() {
            if intermediate == direct.source_db || intermediate == direct.target_db {
                continue;
            }
            let (first, second) = match (
                self.generator.generate(&direct.source_db, intermediate),
                self.generator.generate(intermediate, &direct.target_db),
            ) {
                (Ok(first), Ok(second)) => (first, second),
                (Err(e), _) | (_, Err(e)) => {
                    debug!("Skipping intermediate {}: {}", intermediate, e);
                    continue;
                }
            };
            if !first.is_feasible()
                || !second.is_feasible()
                || first.complexity > ConversionComplexity::Complex
                || second.complexity > ConversionComplexity::Complex
            {
                continue;
            }

            let candidate = ConversionPath::via(&first, &second);
            let better = best
                .as_ref()
                .map_or(true, |b| candidate.total_complexity < b.total_complexity);
            if better {
                best = Some(candidate);
            }
        }

        match best {
            Some(path) => {
                info!(
                    "Path {} -> {} via {} ({})",
                    path.source_db,
                    path.target_db,
                    path.intermediate.as_deref().unwrap_or("-"),
                    path.total_complexity
                );
                Ok(path)
            }
            None => Err(ConvertError::NoPathFound {
                source_db: direct.source_db,
                target_db: direct.target_db,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DatabaseCapabilities, Registry};
    use crate::dialect::{DatabaseTypeProfile, FeatureProfile, ObjectType};
    use crate::paradigm::Paradigm;
    use std::sync::Arc;

    fn register(registry: &mut Registry, id: &str, paradigms: &[Paradigm], features: FeatureProfile) {
        registry.register_database(
            DatabaseCapabilities::new(id, id.to_uppercase(), paradigms),
            DatabaseTypeProfile::builder(id).build(),
            features.for_database(id),
        );
    }

    /// A -> B is impossible; A -> I and I -> B are both Moderate.
    fn bridged_registry() -> Registry {
        let mut registry = Registry::new();
        register(
            &mut registry,
            "a",
            &[Paradigm::Graph, Paradigm::KeyValue],
            FeatureProfile::new("a").full(&[ObjectType::Node]),
        );
        register(
            &mut registry,
            "i",
            &[Paradigm::Graph, Paradigm::Vector],
            FeatureProfile::new("i").full(&[ObjectType::Node, ObjectType::VectorIndex]),
        );
        register(
            &mut registry,
            "b",
            &[Paradigm::Vector, Paradigm::Columnar],
            FeatureProfile::new("b").full(&[ObjectType::VectorIndex, ObjectType::Table]),
        );
        registry
    }

    fn finder(registry: Registry) -> PathFinder {
        PathFinder::new(MatrixGenerator::new(Arc::new(registry)))
    }

    #[test]
    fn test_direct_path_when_feasible() {
        let path = finder(Registry::build()).find_path("postgresql", "mongodb").unwrap();
        assert_eq!(path.steps.len(), 1);
        assert!(path.steps[0].is_direct);
        assert_eq!(path.total_complexity, ConversionComplexity::Complex);
        assert!(path.recommended);
        assert!(path.intermediate.is_none());
    }

    #[test]
    fn test_two_step_path_is_one_level_worse() {
        let finder = finder(bridged_registry());
        let direct = finder.generator.generate("a", "b").unwrap();
        assert_eq!(direct.complexity, ConversionComplexity::Impossible);

        let path = finder.find_path("a", "b").unwrap();
        assert!(path.is_multi_step());
        assert_eq!(path.intermediate.as_deref(), Some("i"));
        assert_eq!(path.steps[0].complexity, ConversionComplexity::Moderate);
        assert_eq!(path.steps[1].complexity, ConversionComplexity::Moderate);
        assert_eq!(path.total_complexity, ConversionComplexity::Complex);
        assert!(path.recommended);
        assert!(path.steps.iter().all(|s| !s.is_direct));
    }

    #[test]
    fn test_lowest_complexity_intermediate_wins() {
        let mut registry = bridged_registry();
        // "c" sorts before "i" but both of its steps are Complex
        register(
            &mut registry,
            "c",
            &[Paradigm::Document],
            FeatureProfile::new("c")
                .full(&[ObjectType::Collection])
                .unsupported(ObjectType::Node, &[ObjectType::Collection], "nodes become documents"),
        );
        register(
            &mut registry,
            "b",
            &[Paradigm::Vector, Paradigm::Columnar],
            FeatureProfile::new("b")
                .full(&[ObjectType::VectorIndex, ObjectType::Table])
                .unsupported(ObjectType::Collection, &[ObjectType::Table], "documents become rows"),
        );
        let finder = finder(registry);
        assert_eq!(
            finder.generator.generate("c", "b").unwrap().complexity,
            ConversionComplexity::Complex
        );

        let path = finder.find_path("a", "b").unwrap();
        assert_eq!(path.intermediate.as_deref(), Some("i"));
        assert_eq!(path.total_complexity, ConversionComplexity::Complex);
    }

    #[test]
    fn test_no_path_found() {
        let mut registry = bridged_registry();
        let mut isolated = Registry::new();
        register(
            &mut isolated,
            "a",
            &[Paradigm::Graph],
            FeatureProfile::new("a").full(&[ObjectType::Node]),
        );
        register(
            &mut isolated,
            "b",
            &[Paradigm::Vector],
            FeatureProfile::new("b").full(&[ObjectType::VectorIndex]),
        );
        let err = finder(isolated).find_path("a", "b").unwrap_err();
        assert!(matches!(err, ConvertError::NoPathFound { .. }));

        // Unknown databases fail before any scan
        registry.register_alias("alpha", "a");
        let err = finder(registry).find_path("alpha", "zzz").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownDatabase(_)));
    }
}
