//! Primitive type resolution between two database type profiles.
//!
//! A native spelling is resolved in three hops: source name to canonical
//! type, canonical type to target entry, target entry back to a spelling
//! with the source's parameters re-attached. When the target has no entry
//! for the canonical type the resolver walks the canonical widening chain
//! ([`CanonicalType::fallbacks`]) breadth-first and uses the closest type
//! the target names.

use std::collections::{BTreeMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dialect::{normalize_type_name, CanonicalType, DatabaseTypeProfile, TypeInfo};
use crate::error::{ConvertError, Result};

/// How a type was carried across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    /// Same canonical type on both sides.
    Direct,
    /// A different canonical type (widening fallback or user override).
    Transform,
}

impl std::fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionKind::Direct => f.write_str("direct"),
            ConversionKind::Transform => f.write_str("transform"),
        }
    }
}

/// Result of resolving one primitive type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Type string as given.
    pub original: String,
    /// Target spelling, parameters included.
    pub converted: String,
    /// Canonical type of the source spelling.
    pub canonical: CanonicalType,
    /// Canonical type of the chosen target entry.
    pub target_canonical: CanonicalType,
    pub kind: ConversionKind,
    /// Whether values may lose range, precision or structure.
    pub lossy: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Human-readable summary of the decision.
    pub note: String,
}

/// Resolve a native type spelling from `source` to `target`.
pub fn resolve(
    source: &DatabaseTypeProfile,
    target: &DatabaseTypeProfile,
    type_name: &str,
) -> Result<ConversionOutcome> {
    TypeResolver::new(source, target).resolve(type_name)
}

/// Primitive resolver for one ordered profile pair.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    source: &'a DatabaseTypeProfile,
    target: &'a DatabaseTypeProfile,
    overrides: Option<&'a BTreeMap<String, String>>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(source: &'a DatabaseTypeProfile, target: &'a DatabaseTypeProfile) -> Self {
        Self {
            source,
            target,
            overrides: None,
        }
    }

    /// Use caller-supplied replacements, keyed by normalized source
    /// spelling. Overrides win over the catalog.
    pub fn with_overrides(mut self, overrides: &'a BTreeMap<String, String>) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn source(&self) -> &'a DatabaseTypeProfile {
        self.source
    }

    pub fn target(&self) -> &'a DatabaseTypeProfile {
        self.target
    }

    /// Resolve one type spelling.
    pub fn resolve(&self, type_name: &str) -> Result<ConversionOutcome> {
        let normalized = normalize_type_name(type_name);
        if normalized.is_empty() {
            return Err(ConvertError::unknown_type(&self.source.database, type_name));
        }

        if let Some(outcome) = self.apply_override(type_name, &normalized) {
            return Ok(outcome);
        }

        if let Some(element) = normalized.strip_suffix("[]") {
            return self.resolve_array(type_name, element.trim());
        }

        let (source_info, params) = self.lookup_source(type_name, &normalized)?;
        let canonical = source_info.canonical;

        if let Some(outcome) = self.resolve_unsigned(type_name, canonical, params.as_deref()) {
            return Ok(outcome);
        }

        let (target_info, path_lossy) = self.target_for(canonical)?;
        let mut warnings = Vec::new();
        let mut lossy = path_lossy;

        let converted = match &params {
            Some(params) if target_info.accepts_parameters() => {
                format!("{}({})", target_info.name, params)
            }
            Some(_) => target_info.name.clone(),
            None => with_default_parameters(&target_info, canonical),
        };

        // Declared parameters are compared against the target bound; without
        // them the two entries' bounds are compared.
        let declared = params.as_deref().and_then(declared_bound);
        match (declared, target_info.bound()) {
            (Some(declared), Some(bound)) if declared > bound => {
                lossy = true;
                warnings.push(format!(
                    "declared size {} exceeds the {} maximum of {} for {}",
                    declared, self.target.database, bound, target_info.name
                ));
            }
            (None, Some(bound)) if source_info.bound().is_some_and(|b| b > bound) => {
                lossy = true;
                warnings.push(format!(
                    "{} allows up to {} but {} {} allows {}",
                    source_info.name,
                    source_info.bound().unwrap_or_default(),
                    self.target.database,
                    target_info.name,
                    bound
                ));
            }
            _ => {}
        }

        let kind = if target_info.canonical == canonical {
            ConversionKind::Direct
        } else {
            if path_lossy {
                warnings.push(format!(
                    "{} has no {} type; widened to {} with possible loss",
                    self.target.database, canonical, target_info.canonical
                ));
            }
            ConversionKind::Transform
        };

        let note = match kind {
            ConversionKind::Direct => format!("{} -> {} ({})", normalized, converted, canonical),
            ConversionKind::Transform => format!(
                "{} -> {} ({} substituted by {})",
                normalized, converted, canonical, target_info.canonical
            ),
        };
        debug!(
            "{}: {} -> {}: {}",
            self.source.database, self.target.database, type_name, note
        );

        Ok(ConversionOutcome {
            original: type_name.to_string(),
            converted,
            canonical,
            target_canonical: target_info.canonical,
            kind,
            lossy,
            warnings,
            note,
        })
    }

    fn apply_override(&self, type_name: &str, normalized: &str) -> Option<ConversionOutcome> {
        let overrides = self.overrides?;
        let base = split_parameters(normalized).map(|(base, _)| base);
        let replacement = overrides
            .get(normalized)
            .or_else(|| base.as_ref().and_then(|b| overrides.get(b)))?;

        let canonical = self
            .lookup_source(type_name, normalized)
            .map(|(info, _)| info.canonical)
            .unwrap_or(CanonicalType::Unknown);
        let target_canonical = self
            .target
            .type_info(replacement)
            .or_else(|| {
                split_parameters(&normalize_type_name(replacement))
                    .and_then(|(base, _)| self.target.type_info(&base))
            })
            .map(|info| info.canonical)
            .unwrap_or(CanonicalType::Unknown);

        Some(ConversionOutcome {
            original: type_name.to_string(),
            converted: replacement.clone(),
            canonical,
            target_canonical,
            kind: ConversionKind::Transform,
            lossy: false,
            warnings: Vec::new(),
            note: format!("{} -> {} (user override)", normalized, replacement),
        })
    }

    /// Find the source entry, stripping parameters only when the full
    /// spelling is not itself an entry (`nvarchar(max)`, `number(10)`).
    fn lookup_source(
        &self,
        type_name: &str,
        normalized: &str,
    ) -> Result<(TypeInfo, Option<String>)> {
        if let Some(info) = self.source.type_info(normalized) {
            return Ok((info, None));
        }
        let (base, params) = split_parameters(normalized)
            .ok_or_else(|| ConvertError::unknown_type(&self.source.database, type_name))?;
        let info = self
            .source
            .type_info(&base)
            .ok_or_else(|| ConvertError::unknown_type(&self.source.database, type_name))?;
        let params = if params.is_empty() { None } else { Some(params) };
        Ok((info, params))
    }

    /// Unsigned integers land on a signed entry that takes the modifier.
    fn resolve_unsigned(
        &self,
        type_name: &str,
        canonical: CanonicalType,
        params: Option<&str>,
    ) -> Option<ConversionOutcome> {
        if self.target.native_type_for(canonical).is_some() {
            return None;
        }
        let signed = CanonicalType::ALL
            .iter()
            .copied()
            .find(|c| c.unsigned_variant() == Some(canonical))?;
        let info = self.target.native_type_for(signed)?;
        if !info.supports_unsigned {
            return None;
        }
        let converted = match params {
            Some(params) => format!("{}({}) unsigned", info.name, params),
            None => format!("{} unsigned", info.name),
        };
        Some(ConversionOutcome {
            original: type_name.to_string(),
            note: format!("{} -> {} ({})", normalize_type_name(type_name), converted, canonical),
            converted,
            canonical,
            target_canonical: canonical,
            kind: ConversionKind::Direct,
            lossy: false,
            warnings: Vec::new(),
        })
    }

    fn resolve_array(&self, type_name: &str, element: &str) -> Result<ConversionOutcome> {
        let element_outcome = self.resolve(element)?;
        let mut warnings = element_outcome.warnings.clone();

        if let Some(template) = &self.target.custom_types.arrays {
            if template.syntax.contains("{element}") && !template.is_statement() {
                let converted = template.render(&[("element", &element_outcome.converted)]);
                return Ok(ConversionOutcome {
                    original: type_name.to_string(),
                    note: format!("{}[] -> {} (array)", element, converted),
                    converted,
                    canonical: CanonicalType::Array,
                    target_canonical: CanonicalType::Array,
                    kind: ConversionKind::Direct,
                    lossy: element_outcome.lossy,
                    warnings,
                });
            }
        }

        let (target_info, path_lossy) = self.target_for(CanonicalType::Array)?;
        let kind = if target_info.canonical == CanonicalType::Array {
            ConversionKind::Direct
        } else {
            ConversionKind::Transform
        };
        if path_lossy {
            warnings.push(format!(
                "{} has no array type; elements of {} stored as {}",
                self.target.database, element_outcome.converted, target_info.name
            ));
        }
        Ok(ConversionOutcome {
            original: type_name.to_string(),
            converted: target_info.name.clone(),
            canonical: CanonicalType::Array,
            target_canonical: target_info.canonical,
            kind,
            lossy: element_outcome.lossy || path_lossy,
            note: format!("{}[] -> {} (array substituted by {})", element, target_info.name, target_info.canonical),
            warnings,
        })
    }

    /// Target entry for a canonical type, widening breadth-first through
    /// the fallback chains when needed. Returns whether any step on the
    /// chosen chain is lossy.
    fn target_for(&self, canonical: CanonicalType) -> Result<(TypeInfo, bool)> {
        if let Some(info) = self.target.native_type_for(canonical) {
            return Ok((info.clone(), false));
        }

        let mut visited = HashSet::from([canonical]);
        let mut queue = VecDeque::from([(canonical, false)]);
        while let Some((current, lossy_so_far)) = queue.pop_front() {
            for step in current.fallbacks() {
                if !visited.insert(step.canonical) {
                    continue;
                }
                let lossy = lossy_so_far || step.lossy;
                if let Some(info) = self.target.native_type_for(step.canonical) {
                    return Ok((info.clone(), lossy));
                }
                queue.push_back((step.canonical, lossy));
            }
        }

        Err(ConvertError::no_equivalent(&self.target.database, canonical))
    }
}

/// Split `base(params) rest` into (`base rest`, `params`).
fn split_parameters(normalized: &str) -> Option<(String, String)> {
    let open = normalized.find('(')?;
    let close = open + normalized[open..].find(')')?;
    let params = normalized[open + 1..close].trim().to_string();
    let base = format!("{} {}", &normalized[..open], &normalized[close + 1..]);
    Some((normalize_type_name(&base), params))
}

/// First numeric parameter (length or precision).
fn declared_bound(params: &str) -> Option<u64> {
    params.split(',').next()?.trim().parse().ok()
}

/// Spelling for a target entry when the source declared no parameters.
fn with_default_parameters(info: &TypeInfo, canonical: CanonicalType) -> String {
    if info.accepts_length {
        let length = canonical
            .natural_length()
            .or(info.default_length)
            .map(|len| info.max_length.map_or(len, |max| len.min(max)));
        if let Some(length) = length {
            return format!("{}({})", info.name, length);
        }
    } else if info.accepts_precision {
        if let Some((precision, scale)) = info.default_precision {
            return format!("{}({},{})", info.name, precision, scale);
        }
    }
    info.name.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Registry;

    fn profiles(source: &str, target: &str) -> (std::sync::Arc<DatabaseTypeProfile>, std::sync::Arc<DatabaseTypeProfile>) {
        let registry = Registry::build();
        (
            registry.type_profile(source).unwrap(),
            registry.type_profile(target).unwrap(),
        )
    }

    #[test]
    fn test_postgres_integer_to_mongodb() {
        let (pg, mongo) = profiles("postgresql", "mongodb");
        let outcome = resolve(&pg, &mongo, "integer").unwrap();
        assert_eq!(outcome.converted, "int32");
        assert_eq!(outcome.canonical, CanonicalType::Int32);
        assert_eq!(outcome.kind, ConversionKind::Direct);
        assert!(!outcome.lossy);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let (pg, mysql) = profiles("postgresql", "mysql");
        let first = resolve(&pg, &mysql, "numeric(12, 4)").unwrap();
        for _ in 0..10 {
            assert_eq!(resolve(&pg, &mysql, "numeric(12, 4)").unwrap(), first);
        }
    }

    #[test]
    fn test_varchar_length_is_preserved() {
        let (pg, mysql) = profiles("postgresql", "mysql");
        let outcome = resolve(&pg, &mysql, "VARCHAR(255)").unwrap();
        assert_eq!(outcome.converted, "varchar(255)");
        assert_eq!(outcome.kind, ConversionKind::Direct);
        assert!(!outcome.lossy);

        let (mysql, sqlserver) = profiles("mysql", "sqlserver");
        let outcome = resolve(&mysql, &sqlserver, "varchar(255)").unwrap();
        assert_eq!(outcome.converted, "nvarchar(255)");
    }

    #[test]
    fn test_declared_length_overflow_is_lossy() {
        let (pg, mysql) = profiles("postgresql", "mysql");
        let outcome = resolve(&pg, &mysql, "varchar(70000)").unwrap();
        assert_eq!(outcome.converted, "varchar(70000)");
        assert!(outcome.lossy);
        assert!(outcome.warnings[0].contains("65535"));
    }

    #[test]
    fn test_precision_is_reattached() {
        let (pg, mysql) = profiles("postgresql", "mysql");
        let outcome = resolve(&pg, &mysql, "decimal(10,2)").unwrap();
        assert_eq!(outcome.converted, "decimal(10,2)");
    }

    #[test]
    fn test_unknown_type() {
        let (pg, mysql) = profiles("postgresql", "mysql");
        let err = resolve(&pg, &mysql, "widget").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownType { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_widening_fallback_is_transform() {
        // MySQL int unsigned has no PostgreSQL counterpart: widened to bigint
        let (mysql, pg) = profiles("mysql", "postgresql");
        let outcome = resolve(&mysql, &pg, "int unsigned").unwrap();
        assert_eq!(outcome.canonical, CanonicalType::UInt32);
        assert_eq!(outcome.converted, "bigint");
        assert_eq!(outcome.kind, ConversionKind::Transform);
        assert!(!outcome.lossy);
    }

    #[test]
    fn test_unsigned_keeps_modifier_when_target_supports_it() {
        let (mysql, mariadb) = profiles("mysql", "mariadb");
        let outcome = resolve(&mysql, &mariadb, "int unsigned").unwrap();
        assert_eq!(outcome.converted, "int unsigned");
        assert_eq!(outcome.kind, ConversionKind::Direct);
    }

    #[test]
    fn test_lossy_widening_is_flagged() {
        let (pg, couch) = profiles("postgresql", "couchdb");
        let outcome = resolve(&pg, &couch, "bigint").unwrap();
        assert_eq!(outcome.converted, "number");
        assert!(outcome.lossy);
        assert_eq!(outcome.kind, ConversionKind::Transform);
        assert!(!outcome.warnings.is_empty());
    }

    #[test]
    fn test_direct_only_when_canonical_types_match() {
        let (pg, mongo) = profiles("postgresql", "mongodb");
        for name in ["integer", "text", "uuid", "jsonb", "timestamp", "point", "xml"] {
            let outcome = resolve(&pg, &mongo, name).unwrap();
            assert_eq!(
                outcome.kind == ConversionKind::Direct,
                outcome.canonical == outcome.target_canonical,
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_natural_length_for_uuid_as_string() {
        let (pg, mysql) = profiles("postgresql", "mysql");
        let outcome = resolve(&pg, &mysql, "uuid").unwrap();
        assert_eq!(outcome.kind, ConversionKind::Transform);
        assert!(outcome.converted.ends_with("(36)"), "{}", outcome.converted);
    }

    #[test]
    fn test_array_suffix() {
        let (pg, cassandra) = profiles("postgresql", "cassandra");
        let outcome = resolve(&pg, &cassandra, "integer[]").unwrap();
        assert_eq!(outcome.canonical, CanonicalType::Array);
        assert_eq!(outcome.converted, "list<int>");

        let (pg, mysql) = profiles("postgresql", "mysql");
        let outcome = resolve(&pg, &mysql, "text[]").unwrap();
        assert_eq!(outcome.converted, "json");
        assert!(outcome.lossy);
    }

    #[test]
    fn test_no_equivalent() {
        let (pg, hbase) = profiles("postgresql", "hbase");
        // geometry widens to json or string; hbase has string
        assert!(resolve(&pg, &hbase, "geometry").is_ok());

        let empty = DatabaseTypeProfile::builder("empty")
            .ty("number", CanonicalType::Float64, &[])
            .build();
        let err = resolve(&pg, &empty, "uuid").unwrap_err();
        assert!(matches!(err, ConvertError::NoEquivalent { .. }));
    }

    #[test]
    fn test_override_wins() {
        let (pg, mysql) = profiles("postgresql", "mysql");
        let mut overrides = BTreeMap::new();
        overrides.insert("text".to_string(), "mediumtext".to_string());
        let resolver = TypeResolver::new(&pg, &mysql).with_overrides(&overrides);
        let outcome = resolver.resolve("TEXT").unwrap();
        assert_eq!(outcome.converted, "mediumtext");
        assert_eq!(outcome.kind, ConversionKind::Transform);
        assert!(outcome.note.contains("override"));
    }

    #[test]
    fn test_split_parameters() {
        assert_eq!(
            split_parameters("int(10) unsigned"),
            Some(("int unsigned".to_string(), "10".to_string()))
        );
        assert_eq!(
            split_parameters("numeric(10,2)"),
            Some(("numeric".to_string(), "10,2".to_string()))
        );
        assert_eq!(split_parameters("text"), None);
        assert_eq!(declared_bound("max"), None);
        assert_eq!(declared_bound("10,2"), Some(10));
    }
}
