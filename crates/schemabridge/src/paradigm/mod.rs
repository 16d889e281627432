//! Paradigm compatibility and high-level strategy selection.
//!
//! Databases are grouped into data-model families ([`Paradigm`]). Two
//! paradigm sets are classified into a [`ParadigmCompatibility`], and every
//! ordered paradigm pair maps to the structural [`ConversionStrategy`] that
//! is known to work best for it. The pair table is explicit and built once;
//! pairs that are not listed fall back to [`ConversionStrategy::Hybrid`].

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Data-model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paradigm {
    Relational,
    Document,
    Graph,
    KeyValue,
    Columnar,
    WideColumn,
    SearchIndex,
    Vector,
    TimeSeries,
    ObjectStore,
}

impl Paradigm {
    /// All ten paradigms.
    pub const ALL: [Paradigm; 10] = [
        Paradigm::Relational,
        Paradigm::Document,
        Paradigm::Graph,
        Paradigm::KeyValue,
        Paradigm::Columnar,
        Paradigm::WideColumn,
        Paradigm::SearchIndex,
        Paradigm::Vector,
        Paradigm::TimeSeries,
        Paradigm::ObjectStore,
    ];

    /// Stable string key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Paradigm::Relational => "relational",
            Paradigm::Document => "document",
            Paradigm::Graph => "graph",
            Paradigm::KeyValue => "key_value",
            Paradigm::Columnar => "columnar",
            Paradigm::WideColumn => "wide_column",
            Paradigm::SearchIndex => "search_index",
            Paradigm::Vector => "vector",
            Paradigm::TimeSeries => "time_series",
            Paradigm::ObjectStore => "object_store",
        }
    }
}

impl fmt::Display for Paradigm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Paradigm {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Paradigm::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == key)
            .ok_or_else(|| ConvertError::Config(format!("Unknown paradigm: '{}'", s)))
    }
}

/// Format a paradigm set as `[relational, time_series]`.
pub fn format_paradigms(paradigms: &BTreeSet<Paradigm>) -> String {
    let names: Vec<&str> = paradigms.iter().map(Paradigm::as_str).collect();
    format!("[{}]", names.join(", "))
}

/// Overlap between two paradigm sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParadigmCompatibility {
    /// The sets are equal.
    Identical,
    /// One set contains the other.
    Compatible,
    /// Non-empty overlap, neither contains the other.
    Partial,
    /// No overlap.
    Incompatible,
}

impl ParadigmCompatibility {
    /// Partial or Incompatible.
    pub fn is_at_most_partial(&self) -> bool {
        matches!(
            self,
            ParadigmCompatibility::Partial | ParadigmCompatibility::Incompatible
        )
    }
}

impl fmt::Display for ParadigmCompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParadigmCompatibility::Identical => "identical",
            ParadigmCompatibility::Compatible => "compatible",
            ParadigmCompatibility::Partial => "partial",
            ParadigmCompatibility::Incompatible => "incompatible",
        };
        f.write_str(s)
    }
}

/// Structural transformation applied between paradigms.
///
/// Variant order is the tie-break precedence: when several strategies apply
/// to one database pair they are reported in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStrategy {
    Direct,
    Normalization,
    Denormalization,
    Decomposition,
    Aggregation,
    Hybrid,
}

impl fmt::Display for ConversionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversionStrategy::Direct => "direct",
            ConversionStrategy::Normalization => "normalization",
            ConversionStrategy::Denormalization => "denormalization",
            ConversionStrategy::Decomposition => "decomposition",
            ConversionStrategy::Aggregation => "aggregation",
            ConversionStrategy::Hybrid => "hybrid",
        };
        f.write_str(s)
    }
}

/// Classify the overlap of two paradigm sets.
pub fn compatibility(
    source: &BTreeSet<Paradigm>,
    target: &BTreeSet<Paradigm>,
) -> ParadigmCompatibility {
    if source == target {
        return ParadigmCompatibility::Identical;
    }
    let overlap = source.intersection(target).count();
    if overlap == 0 {
        ParadigmCompatibility::Incompatible
    } else if overlap == source.len() || overlap == target.len() {
        ParadigmCompatibility::Compatible
    } else {
        ParadigmCompatibility::Partial
    }
}

/// Strategy lookup over ordered paradigm pairs.
#[derive(Debug, Clone)]
pub struct ParadigmAnalyzer {
    table: HashMap<(Paradigm, Paradigm), ConversionStrategy>,
    default_strategy: ConversionStrategy,
}

impl Default for ParadigmAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ParadigmAnalyzer {
    /// Build the pair table.
    pub fn new() -> Self {
        use ConversionStrategy::*;
        use Paradigm::*;

        let cross: &[(Paradigm, Paradigm, ConversionStrategy)] = &[
            (Relational, Document, Denormalization),
            (Relational, Graph, Decomposition),
            (Relational, KeyValue, Denormalization),
            (Relational, Columnar, Denormalization),
            (Relational, WideColumn, Denormalization),
            (Relational, SearchIndex, Denormalization),
            (Relational, Vector, Aggregation),
            (Relational, TimeSeries, Aggregation),
            (Relational, ObjectStore, Denormalization),
            (Document, Relational, Normalization),
            (Document, Graph, Decomposition),
            (Document, KeyValue, Denormalization),
            (Document, Columnar, Normalization),
            (Document, WideColumn, Denormalization),
            (Document, SearchIndex, Denormalization),
            (Document, Vector, Aggregation),
            (Document, TimeSeries, Aggregation),
            (Document, ObjectStore, Denormalization),
            (Graph, Relational, Decomposition),
            (Graph, Document, Aggregation),
            (Graph, KeyValue, Decomposition),
            (Graph, Columnar, Decomposition),
            (Graph, WideColumn, Decomposition),
            (Graph, SearchIndex, Aggregation),
            (Graph, Vector, Aggregation),
            (Graph, TimeSeries, Aggregation),
            (Graph, ObjectStore, Aggregation),
            (KeyValue, Relational, Normalization),
            (KeyValue, Document, Aggregation),
            (KeyValue, Graph, Decomposition),
            (KeyValue, Columnar, Normalization),
            (KeyValue, WideColumn, Aggregation),
            (KeyValue, SearchIndex, Aggregation),
            (KeyValue, Vector, Aggregation),
            (KeyValue, TimeSeries, Aggregation),
            (KeyValue, ObjectStore, Denormalization),
            (Columnar, Relational, Normalization),
            (Columnar, Document, Denormalization),
            (Columnar, Graph, Decomposition),
            (Columnar, KeyValue, Denormalization),
            (Columnar, WideColumn, Denormalization),
            (Columnar, SearchIndex, Denormalization),
            (Columnar, Vector, Aggregation),
            (Columnar, TimeSeries, Aggregation),
            (Columnar, ObjectStore, Denormalization),
            (WideColumn, Relational, Normalization),
            (WideColumn, Document, Aggregation),
            (WideColumn, Graph, Decomposition),
            (WideColumn, KeyValue, Decomposition),
            (WideColumn, Columnar, Normalization),
            (WideColumn, SearchIndex, Denormalization),
            (WideColumn, Vector, Aggregation),
            (WideColumn, TimeSeries, Aggregation),
            (WideColumn, ObjectStore, Denormalization),
            (SearchIndex, Relational, Normalization),
            (SearchIndex, Document, Aggregation),
            (SearchIndex, Graph, Decomposition),
            (SearchIndex, KeyValue, Decomposition),
            (SearchIndex, Columnar, Normalization),
            (SearchIndex, WideColumn, Denormalization),
            (SearchIndex, Vector, Aggregation),
            (SearchIndex, TimeSeries, Aggregation),
            (SearchIndex, ObjectStore, Denormalization),
            (Vector, Relational, Normalization),
            (Vector, Document, Denormalization),
            (Vector, Graph, Decomposition),
            (Vector, KeyValue, Decomposition),
            (Vector, Columnar, Normalization),
            (Vector, WideColumn, Denormalization),
            (Vector, SearchIndex, Hybrid),
            (Vector, TimeSeries, Hybrid),
            (Vector, ObjectStore, Denormalization),
            (TimeSeries, Relational, Normalization),
            (TimeSeries, Document, Aggregation),
            (TimeSeries, Graph, Decomposition),
            (TimeSeries, KeyValue, Decomposition),
            (TimeSeries, Columnar, Denormalization),
            (TimeSeries, WideColumn, Denormalization),
            (TimeSeries, SearchIndex, Aggregation),
            (TimeSeries, Vector, Aggregation),
            (TimeSeries, ObjectStore, Denormalization),
            (ObjectStore, Relational, Normalization),
            (ObjectStore, Document, Aggregation),
            (ObjectStore, Graph, Decomposition),
            (ObjectStore, KeyValue, Decomposition),
            (ObjectStore, Columnar, Normalization),
            (ObjectStore, WideColumn, Normalization),
            (ObjectStore, SearchIndex, Aggregation),
            (ObjectStore, Vector, Aggregation),
            (ObjectStore, TimeSeries, Hybrid),
        ];

        let mut table = HashMap::with_capacity(Paradigm::ALL.len() * Paradigm::ALL.len());
        for paradigm in Paradigm::ALL {
            table.insert((paradigm, paradigm), Direct);
        }
        for (source, target, strategy) in cross {
            table.insert((*source, *target), *strategy);
        }

        Self {
            table,
            default_strategy: Hybrid,
        }
    }

    /// Classify two paradigm sets.
    pub fn compatibility(
        &self,
        source: &BTreeSet<Paradigm>,
        target: &BTreeSet<Paradigm>,
    ) -> ParadigmCompatibility {
        compatibility(source, target)
    }

    /// Best-known strategy for one ordered paradigm pair.
    pub fn strategy(&self, source: Paradigm, target: Paradigm) -> Vec<ConversionStrategy> {
        vec![self.lookup(source, target)]
    }

    /// Whether the pair has an explicit table entry.
    pub fn has_entry(&self, source: Paradigm, target: Paradigm) -> bool {
        self.table.contains_key(&(source, target))
    }

    fn lookup(&self, source: Paradigm, target: Paradigm) -> ConversionStrategy {
        self.table
            .get(&(source, target))
            .copied()
            .unwrap_or(self.default_strategy)
    }

    /// Strategies for multi-paradigm databases: the product of both sets,
    /// de-duplicated and ordered by precedence.
    pub fn strategies(
        &self,
        source: &BTreeSet<Paradigm>,
        target: &BTreeSet<Paradigm>,
    ) -> Vec<ConversionStrategy> {
        let strategies: BTreeSet<ConversionStrategy> = source
            .iter()
            .flat_map(|s| target.iter().map(move |t| (*s, *t)))
            .map(|(s, t)| self.lookup(s, t))
            .collect();
        strategies.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(paradigms: &[Paradigm]) -> BTreeSet<Paradigm> {
        paradigms.iter().copied().collect()
    }

    #[test]
    fn test_every_pair_has_an_entry() {
        let analyzer = ParadigmAnalyzer::new();
        for source in Paradigm::ALL {
            for target in Paradigm::ALL {
                assert!(
                    analyzer.has_entry(source, target),
                    "missing strategy for {} -> {}",
                    source,
                    target
                );
            }
        }
    }

    #[test]
    fn test_same_paradigm_is_direct() {
        let analyzer = ParadigmAnalyzer::new();
        for paradigm in Paradigm::ALL {
            assert_eq!(analyzer.strategy(paradigm, paradigm), vec![ConversionStrategy::Direct]);
        }
    }

    #[test]
    fn test_known_cross_paradigm_strategies() {
        let analyzer = ParadigmAnalyzer::new();
        assert_eq!(
            analyzer.strategy(Paradigm::Relational, Paradigm::Document),
            vec![ConversionStrategy::Denormalization]
        );
        assert_eq!(
            analyzer.strategy(Paradigm::Relational, Paradigm::Graph),
            vec![ConversionStrategy::Decomposition]
        );
        assert_eq!(
            analyzer.strategy(Paradigm::Document, Paradigm::Relational),
            vec![ConversionStrategy::Normalization]
        );
    }

    #[test]
    fn test_compatibility_classification() {
        use Paradigm::*;
        assert_eq!(
            compatibility(&set(&[Relational]), &set(&[Relational])),
            ParadigmCompatibility::Identical
        );
        assert_eq!(
            compatibility(&set(&[Relational]), &set(&[Relational, TimeSeries])),
            ParadigmCompatibility::Compatible
        );
        assert_eq!(
            compatibility(&set(&[Document, KeyValue]), &set(&[Document, Graph])),
            ParadigmCompatibility::Partial
        );
        assert_eq!(
            compatibility(&set(&[Relational]), &set(&[Document])),
            ParadigmCompatibility::Incompatible
        );
    }

    #[test]
    fn test_multi_paradigm_strategies_are_deduplicated_and_ordered() {
        use Paradigm::*;
        let analyzer = ParadigmAnalyzer::new();
        let strategies = analyzer.strategies(
            &set(&[Graph, Document, KeyValue]),
            &set(&[Relational, Document]),
        );
        // document->document is direct; document->relational normalization;
        // graph->relational decomposition; graph->document aggregation;
        // key_value->relational normalization; key_value->document aggregation
        assert_eq!(
            strategies,
            vec![
                ConversionStrategy::Direct,
                ConversionStrategy::Normalization,
                ConversionStrategy::Decomposition,
                ConversionStrategy::Aggregation,
            ]
        );
    }

    #[test]
    fn test_precedence_order() {
        assert!(ConversionStrategy::Direct < ConversionStrategy::Normalization);
        assert!(ConversionStrategy::Normalization < ConversionStrategy::Denormalization);
        assert!(ConversionStrategy::Aggregation < ConversionStrategy::Hybrid);
    }
}
