//! Custom type strategy resolution.
//!
//! User-defined types (enums, composites, domains, arrays, ...) are mapped
//! by a decision table keyed by category and the target's capability
//! flags. Every category has a primary and a fallback strategy; when the
//! primary strategy cannot be applied (a structural failure, e.g. a
//! composite field whose type does not resolve) the fallback is tried and
//! the outcome is flagged `used_fallback`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::primitive::TypeResolver;
use crate::core::identifier::{derived_name, quote_values, validate_check_expression};
use crate::core::{CompositeField, CustomTypeCategory, CustomTypeDefinition, CustomTypeDescriptor};
use crate::dialect::{CanonicalType, DatabaseTypeProfile, NativeImplementation};
use crate::error::{ConvertError, Result};

/// Enums with more values than this become lookup tables when the target
/// has no native enum.
pub const LOOKUP_TABLE_THRESHOLD: usize = 64;

/// Placeholder for the column a generated constraint applies to.
pub const COLUMN_PLACEHOLDER: &str = "{column}";

/// Default recursion guard for nested composites.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// How a custom type is carried into the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomTypeStrategy {
    /// Native type of the same category.
    Direct,
    /// String column plus a check constraint listing the allowed values.
    EmulateWithConstraint,
    /// Plain string column.
    AsString,
    /// JSON (or document) column.
    #[serde(rename = "as_json")]
    AsJson,
    /// Separate lookup table referenced by the column.
    LookupTable,
    /// Composite fields expanded into sibling columns.
    Flatten,
    /// Base type plus the domain's check constraints.
    CheckConstraint,
    /// Not convertible.
    Unsupported,
}

impl std::fmt::Display for CustomTypeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CustomTypeStrategy::Direct => "direct",
            CustomTypeStrategy::EmulateWithConstraint => "emulate_with_constraint",
            CustomTypeStrategy::AsString => "as_string",
            CustomTypeStrategy::AsJson => "as_json",
            CustomTypeStrategy::LookupTable => "lookup_table",
            CustomTypeStrategy::Flatten => "flatten",
            CustomTypeStrategy::CheckConstraint => "check_constraint",
            CustomTypeStrategy::Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

/// An object produced alongside a converted custom type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SupplementaryObject {
    /// Sibling column named `<column>_<suffix>`.
    Column { suffix: String, data_type: String },
    /// Check constraint; the expression uses [`COLUMN_PLACEHOLDER`].
    Constraint { name: String, expression: String },
    /// Lookup table holding the allowed values.
    LookupTable {
        name: String,
        key_type: String,
        values: Vec<String>,
    },
}

/// Result of resolving one custom type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTypeConversionOutcome {
    pub type_name: String,
    pub category: CustomTypeCategory,
    /// Strategy that produced this outcome.
    pub strategy: CustomTypeStrategy,
    /// Strategy the decision table picked first.
    pub primary_strategy: CustomTypeStrategy,
    /// Replacement type for fields of this type (None when flattened).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_type: Option<String>,
    /// Native definition statement, when the target needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supplementary: Vec<SupplementaryObject>,
    /// True only when the primary strategy was attempted and failed.
    pub used_fallback: bool,
    pub requires_user_input: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Primary and fallback strategy for a descriptor on a target.
pub fn select_strategies(
    descriptor: &CustomTypeDescriptor,
    target: &DatabaseTypeProfile,
) -> (CustomTypeStrategy, CustomTypeStrategy) {
    use CustomTypeStrategy::*;

    let custom = &target.custom_types;
    let json_or_string = if custom.supports_json() { AsJson } else { AsString };

    match &descriptor.definition {
        CustomTypeDefinition::Enum { values } => {
            let primary = if custom.supports_enum() {
                Direct
            } else if values.len() > LOOKUP_TABLE_THRESHOLD {
                LookupTable
            } else if target.constraints.check {
                EmulateWithConstraint
            } else {
                AsString
            };
            (primary, AsString)
        }
        CustomTypeDefinition::Composite { .. } => {
            let primary = if custom.supports_composite() {
                Direct
            } else if custom.supports_json() {
                AsJson
            } else {
                Flatten
            };
            (primary, Flatten)
        }
        CustomTypeDefinition::Domain { .. } => {
            let primary = if custom.supports_domain() {
                Direct
            } else if target.constraints.check {
                CheckConstraint
            } else {
                AsString
            };
            (primary, AsString)
        }
        CustomTypeDefinition::Array { .. } => {
            let primary = if custom.supports_array() { Direct } else { json_or_string };
            (primary, AsJson)
        }
        CustomTypeDefinition::Range { .. } => {
            let primary = if custom.supports_range() { Direct } else { json_or_string };
            (primary, AsString)
        }
        CustomTypeDefinition::Spatial { .. } => {
            let primary = if custom.supports_spatial() { Direct } else { json_or_string };
            (primary, AsString)
        }
        CustomTypeDefinition::Temporal { .. }
        | CustomTypeDefinition::Binary { .. }
        | CustomTypeDefinition::Other { .. } => (json_or_string, AsString),
    }
}

/// Resolve a custom type with no catalog for nested references.
pub fn resolve_custom(
    descriptor: &CustomTypeDescriptor,
    source: &DatabaseTypeProfile,
    target: &DatabaseTypeProfile,
) -> Result<CustomTypeConversionOutcome> {
    CustomTypeResolver::new(TypeResolver::new(source, target)).resolve(descriptor)
}

/// Result of applying one strategy.
#[derive(Debug, Default)]
struct Applied {
    converted_type: Option<String>,
    definition: Option<String>,
    supplementary: Vec<SupplementaryObject>,
    requires_user_input: bool,
    warnings: Vec<String>,
    notes: Vec<String>,
}

/// Custom type resolver for one ordered profile pair.
///
/// `catalog` holds the source schema's other custom types so composite
/// fields and array elements that reference them can be resolved.
#[derive(Debug, Clone, Copy)]
pub struct CustomTypeResolver<'a> {
    types: TypeResolver<'a>,
    catalog: &'a [CustomTypeDescriptor],
    max_depth: usize,
}

impl<'a> CustomTypeResolver<'a> {
    pub fn new(types: TypeResolver<'a>) -> Self {
        Self {
            types,
            catalog: &[],
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_catalog(mut self, catalog: &'a [CustomTypeDescriptor]) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    fn target(&self) -> &'a DatabaseTypeProfile {
        self.types.target()
    }

    /// Resolve a descriptor. Fails only when both the primary and the
    /// fallback strategy fail.
    pub fn resolve(&self, descriptor: &CustomTypeDescriptor) -> Result<CustomTypeConversionOutcome> {
        self.resolve_at(descriptor, 0)
    }

    fn resolve_at(
        &self,
        descriptor: &CustomTypeDescriptor,
        depth: usize,
    ) -> Result<CustomTypeConversionOutcome> {
        let (primary, fallback) = select_strategies(descriptor, self.target());
        debug!(
            "Custom type {} ({}): primary {}, fallback {}",
            descriptor.name,
            descriptor.category(),
            primary,
            fallback
        );

        let primary_error = match self.apply(primary, descriptor, depth) {
            Ok(applied) => return Ok(self.outcome(descriptor, primary, primary, false, applied)),
            Err(e) => e,
        };

        if primary == fallback {
            return Err(ConvertError::CustomTypeConversion {
                type_name: descriptor.name.clone(),
                message: primary_error.to_string(),
            });
        }

        warn!(
            "Custom type {}: {} failed ({}), trying {}",
            descriptor.name, primary, primary_error, fallback
        );
        match self.apply(fallback, descriptor, depth) {
            Ok(mut applied) => {
                applied
                    .warnings
                    .push(format!("{} strategy failed: {}", primary, primary_error));
                Ok(self.outcome(descriptor, fallback, primary, true, applied))
            }
            Err(fallback_error) => Err(ConvertError::CustomTypeConversion {
                type_name: descriptor.name.clone(),
                message: format!("{}; fallback: {}", primary_error, fallback_error),
            }),
        }
    }

    fn outcome(
        &self,
        descriptor: &CustomTypeDescriptor,
        strategy: CustomTypeStrategy,
        primary: CustomTypeStrategy,
        used_fallback: bool,
        applied: Applied,
    ) -> CustomTypeConversionOutcome {
        CustomTypeConversionOutcome {
            type_name: descriptor.name.clone(),
            category: descriptor.category(),
            strategy,
            primary_strategy: primary,
            converted_type: applied.converted_type,
            definition: applied.definition,
            supplementary: applied.supplementary,
            used_fallback,
            requires_user_input: applied.requires_user_input,
            warnings: applied.warnings,
            notes: applied.notes,
        }
    }

    fn apply(
        &self,
        strategy: CustomTypeStrategy,
        descriptor: &CustomTypeDescriptor,
        depth: usize,
    ) -> Result<Applied> {
        let fail = |message: String| ConvertError::strategy_failed(&descriptor.name, strategy, message);
        match strategy {
            CustomTypeStrategy::Direct => self.apply_direct(descriptor, depth).map_err(|e| fail(e.to_string())),
            CustomTypeStrategy::EmulateWithConstraint => self.apply_constraint_enum(descriptor).map_err(fail),
            CustomTypeStrategy::AsString => self.apply_as_string(descriptor).map_err(fail),
            CustomTypeStrategy::AsJson => self.apply_as_json(descriptor).map_err(fail),
            CustomTypeStrategy::LookupTable => self.apply_lookup_table(descriptor).map_err(fail),
            CustomTypeStrategy::Flatten => self.apply_flatten(descriptor, depth).map_err(fail),
            CustomTypeStrategy::CheckConstraint => self.apply_check_domain(descriptor).map_err(fail),
            CustomTypeStrategy::Unsupported => Err(fail("no conversion available".to_string())),
        }
    }

    fn apply_direct(&self, descriptor: &CustomTypeDescriptor, depth: usize) -> Result<Applied> {
        let custom = &self.target().custom_types;
        let missing = || {
            ConvertError::Config(format!(
                "{} has no native {} implementation",
                self.target().database,
                descriptor.category()
            ))
        };
        let mut applied = Applied::default();

        let (native, substitutions): (&NativeImplementation, Vec<(&str, String)>) =
            match &descriptor.definition {
                CustomTypeDefinition::Enum { values } => {
                    if values.is_empty() {
                        return Err(ConvertError::Config("enum has no values".into()));
                    }
                    (custom.enums.as_ref().ok_or_else(missing)?, vec![("values", quote_values(values))])
                }
                CustomTypeDefinition::Composite { fields } => {
                    if fields.is_empty() {
                        return Err(ConvertError::Config("composite has no fields".into()));
                    }
                    let mut rendered = Vec::with_capacity(fields.len());
                    for field in fields {
                        let data_type = self.field_type(&field.data_type, depth).map_err(|e| {
                            ConvertError::Config(format!("field {}: {}", field.name, e))
                        })?;
                        rendered.push(format!("{} {}", field.name, data_type));
                    }
                    (
                        custom.composites.as_ref().ok_or_else(missing)?,
                        vec![("fields", rendered.join(", "))],
                    )
                }
                CustomTypeDefinition::Domain { base_type, constraints } => {
                    let native = custom.domains.as_ref().ok_or_else(missing)?;
                    let base = self.types.resolve(base_type)?.converted;
                    for constraint in constraints {
                        validate_check_expression(constraint)?;
                    }
                    let checks = if native.has_placeholder("checks") {
                        constraints.iter().map(|c| format!(" CHECK ({})", c)).collect()
                    } else if constraints.is_empty() {
                        String::new()
                    } else if self.target().constraints.check {
                        applied.supplementary = domain_constraints(&descriptor.name, constraints);
                        applied.notes.push(format!(
                            "{} domain constraints moved to column check constraints",
                            constraints.len()
                        ));
                        String::new()
                    } else {
                        applied.warnings.push(format!(
                            "domain constraints not enforced: {}",
                            constraints.join(" AND ")
                        ));
                        String::new()
                    };
                    (native, vec![("base", base), ("checks", checks)])
                }
                CustomTypeDefinition::Array { element_type } => {
                    let element = self.field_type(element_type, depth)?;
                    (custom.arrays.as_ref().ok_or_else(missing)?, vec![("element", element)])
                }
                CustomTypeDefinition::Range { subtype } => {
                    let base = self
                        .types
                        .resolve(subtype)
                        .map_err(|e| ConvertError::Config(format!("range subtype {}: {}", subtype, e)))?
                        .converted;
                    (custom.ranges.as_ref().ok_or_else(missing)?, vec![("base", base)])
                }
                CustomTypeDefinition::Spatial { geometry, srid } => {
                    if let Some(srid) = srid {
                        applied.notes.push(format!("SRID {}", srid));
                    }
                    (
                        custom.spatial.as_ref().ok_or_else(missing)?,
                        vec![("base", geometry.clone())],
                    )
                }
                _ => return Err(missing()),
            };

        let mut pairs: Vec<(&str, &str)> = vec![("name", descriptor.name.as_str())];
        pairs.extend(substitutions.iter().map(|(k, v)| (*k, v.as_str())));
        let rendered = native.render(&pairs);

        if native.is_statement() {
            applied.definition = Some(rendered);
            applied.converted_type = Some(descriptor.name.clone());
        } else {
            applied.converted_type = Some(rendered);
        }
        applied.warnings.extend(native.limitations.iter().cloned());
        Ok(applied)
    }

    fn apply_constraint_enum(&self, descriptor: &CustomTypeDescriptor) -> std::result::Result<Applied, String> {
        let CustomTypeDefinition::Enum { values } = &descriptor.definition else {
            return Err("only enums can be emulated with a value constraint".into());
        };
        if values.is_empty() {
            return Err("enum has no values".into());
        }
        if !self.target().constraints.check {
            return Err(format!("{} does not enforce check constraints", self.target().database));
        }
        let longest = values.iter().map(|v| v.chars().count() as u64).max();
        let column_type = self.string_type(longest)?;
        Ok(Applied {
            converted_type: Some(column_type),
            supplementary: vec![SupplementaryObject::Constraint {
                name: derived_name(&descriptor.name, "check"),
                expression: format!("{} IN ({})", COLUMN_PLACEHOLDER, quote_values(values)),
            }],
            notes: vec![format!("{} values enforced by a check constraint", values.len())],
            ..Default::default()
        })
    }

    fn apply_check_domain(&self, descriptor: &CustomTypeDescriptor) -> std::result::Result<Applied, String> {
        let CustomTypeDefinition::Domain { base_type, constraints } = &descriptor.definition else {
            return Err("only domains carry check constraints".into());
        };
        if !self.target().constraints.check {
            return Err(format!("{} does not enforce check constraints", self.target().database));
        }
        let base = self
            .types
            .resolve(base_type)
            .map_err(|e| format!("base type {}: {}", base_type, e))?;

        for constraint in constraints {
            validate_check_expression(constraint).map_err(|e| e.to_string())?;
        }

        Ok(Applied {
            converted_type: Some(base.converted),
            supplementary: domain_constraints(&descriptor.name, constraints),
            warnings: base.warnings,
            ..Default::default()
        })
    }

    fn apply_as_string(&self, descriptor: &CustomTypeDescriptor) -> std::result::Result<Applied, String> {
        let hint = match &descriptor.definition {
            CustomTypeDefinition::Enum { values } => values.iter().map(|v| v.chars().count() as u64).max(),
            _ => None,
        };
        let column_type = self.string_type(hint)?;
        let mut notes = Vec::new();
        if let CustomTypeDefinition::Enum { values } = &descriptor.definition {
            notes.push(format!("allowed values: {}", values.join(", ")));
        }
        Ok(Applied {
            converted_type: Some(column_type),
            warnings: vec![format!(
                "type safety reduced: {} {} stored as a plain string",
                descriptor.category(),
                descriptor.name
            )],
            notes,
            ..Default::default()
        })
    }

    fn apply_as_json(&self, descriptor: &CustomTypeDescriptor) -> std::result::Result<Applied, String> {
        let column_type = self.json_type()?;
        let mut notes = Vec::new();
        match &descriptor.definition {
            CustomTypeDefinition::Composite { fields } => notes.push(format!(
                "fields {} stored as JSON object keys",
                fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(", ")
            )),
            CustomTypeDefinition::Array { element_type } => {
                notes.push(format!("{} elements stored as a JSON array", element_type))
            }
            CustomTypeDefinition::Spatial { .. } => notes.push("stored as GeoJSON".to_string()),
            _ => {}
        }
        Ok(Applied {
            converted_type: Some(column_type),
            notes,
            ..Default::default()
        })
    }

    fn apply_lookup_table(&self, descriptor: &CustomTypeDescriptor) -> std::result::Result<Applied, String> {
        let CustomTypeDefinition::Enum { values } = &descriptor.definition else {
            return Err("only enums can become lookup tables".into());
        };
        if values.is_empty() {
            return Err("enum has no values".into());
        }
        let longest = values.iter().map(|v| v.chars().count() as u64).max();
        let key_type = self.string_type(longest)?;
        let table = derived_name(&descriptor.name, "values");
        Ok(Applied {
            converted_type: Some(key_type.clone()),
            supplementary: vec![SupplementaryObject::LookupTable {
                name: table.clone(),
                key_type,
                values: values.clone(),
            }],
            requires_user_input: true,
            warnings: vec![format!(
                "{} values moved to lookup table {}; confirm the reference column",
                values.len(),
                table
            )],
            ..Default::default()
        })
    }

    fn apply_flatten(&self, descriptor: &CustomTypeDescriptor, depth: usize) -> std::result::Result<Applied, String> {
        let CustomTypeDefinition::Composite { fields } = &descriptor.definition else {
            return Err("only composites can be flattened".into());
        };
        let columns = self.flatten_fields(fields, depth)?;
        Ok(Applied {
            notes: vec![format!("expanded into {} columns", columns.len())],
            supplementary: columns,
            ..Default::default()
        })
    }

    fn flatten_fields(
        &self,
        fields: &[CompositeField],
        depth: usize,
    ) -> std::result::Result<Vec<SupplementaryObject>, String> {
        if fields.is_empty() {
            return Err("composite has no fields".into());
        }
        if depth >= self.max_depth {
            return Err(format!("nesting exceeds {} levels", self.max_depth));
        }

        let mut columns = Vec::new();
        for field in fields {
            if field.name.trim().is_empty() {
                return Err("composite field with empty name".into());
            }
            if let Some(nested) = self.lookup(&field.data_type) {
                if let CustomTypeDefinition::Composite { fields: inner } = &nested.definition {
                    for column in self.flatten_fields(inner, depth + 1)? {
                        if let SupplementaryObject::Column { suffix, data_type } = column {
                            columns.push(SupplementaryObject::Column {
                                suffix: derived_name(&field.name, &suffix),
                                data_type,
                            });
                        }
                    }
                    continue;
                }
            }
            let data_type = self
                .field_type(&field.data_type, depth)
                .map_err(|e| format!("field {}: {}", field.name, e))?;
            columns.push(SupplementaryObject::Column {
                suffix: field.name.clone(),
                data_type,
            });
        }
        Ok(columns)
    }

    /// Target spelling of a field or element type, which may itself be a
    /// custom type from the catalog.
    fn field_type(&self, data_type: &str, depth: usize) -> Result<String> {
        if let Some(nested) = self.lookup(data_type) {
            if depth + 1 >= self.max_depth {
                return Err(ConvertError::Config(format!(
                    "nesting exceeds {} levels at {}",
                    self.max_depth, nested.name
                )));
            }
            let outcome = self.resolve_at(nested, depth + 1)?;
            return outcome.converted_type.ok_or_else(|| {
                ConvertError::Config(format!("{} has no single-column representation", nested.name))
            });
        }
        Ok(self.types.resolve(data_type)?.converted)
    }

    fn lookup(&self, name: &str) -> Option<&'a CustomTypeDescriptor> {
        let name = name.trim();
        self.catalog.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// A string column type, sized when the target takes a length.
    fn string_type(&self, length_hint: Option<u64>) -> std::result::Result<String, String> {
        let target = self.target();
        if let Some(info) = target.native_type_for(CanonicalType::Varchar) {
            if info.accepts_length {
                let length = length_hint
                    .map(|len| len.max(1))
                    .or(info.default_length)
                    .unwrap_or(255);
                let length = info.max_length.map_or(length, |max| length.min(max));
                return Ok(format!("{}({})", info.name, length));
            }
            return Ok(info.name.clone());
        }
        [CanonicalType::String, CanonicalType::Text, CanonicalType::Clob]
            .iter()
            .find_map(|c| target.native_name_for(*c))
            .map(str::to_string)
            .ok_or_else(|| format!("{} has no string type", target.database))
    }

    /// A JSON-capable column type.
    fn json_type(&self) -> std::result::Result<String, String> {
        let target = self.target();
        let native = [
            CanonicalType::Json,
            CanonicalType::Document,
            CanonicalType::Object,
            CanonicalType::Map,
        ]
        .iter()
        .find_map(|c| target.native_name_for(*c));
        if let Some(name) = native {
            return Ok(name.to_string());
        }
        // Engines that validate JSON stored as text (SQL Server, SQLite)
        if target.custom_types.supports_json() {
            if let Some(name) = target.native_name_for(CanonicalType::Text) {
                return Ok(name.to_string());
            }
        }
        Err(format!("{} has no JSON type", target.database))
    }
}

/// Column check constraints for a domain's (already validated) expressions.
fn domain_constraints(domain: &str, constraints: &[String]) -> Vec<SupplementaryObject> {
    constraints
        .iter()
        .enumerate()
        .map(|(i, constraint)| {
            let suffix = if constraints.len() == 1 {
                "check".to_string()
            } else {
                format!("check{}", i + 1)
            };
            SupplementaryObject::Constraint {
                name: derived_name(domain, &suffix),
                expression: substitute_value_keyword(constraint),
            }
        })
        .collect()
}

/// Replace the domain keyword `VALUE` with [`COLUMN_PLACEHOLDER`].
/// Quoted literals and identifiers are copied unchanged; a doubled quote
/// closes and reopens the literal, which leaves it intact.
fn substitute_value_keyword(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len());
    let mut word = String::new();
    let mut quote: Option<char> = None;
    let flush = |word: &mut String, out: &mut String| {
        if word.eq_ignore_ascii_case("value") {
            out.push_str(COLUMN_PLACEHOLDER);
        } else {
            out.push_str(word);
        }
        word.clear();
    };
    for c in expression.chars() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
        } else if c.is_alphanumeric() || c == '_' {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            if c == '\'' || c == '"' {
                quote = Some(c);
            }
            out.push(c);
        }
    }
    flush(&mut word, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Registry;
    use crate::dialect::ConstraintSupport;
    use std::sync::Arc;

    fn profile(id: &str) -> Arc<DatabaseTypeProfile> {
        Registry::build().type_profile(id).unwrap()
    }

    fn user_status() -> CustomTypeDescriptor {
        CustomTypeDescriptor::enumeration("user_status", &["active", "inactive", "pending"])
    }

    #[test]
    fn test_enum_to_native_enum_is_direct() {
        let outcome = resolve_custom(&user_status(), &profile("postgresql"), &profile("mysql")).unwrap();
        assert_eq!(outcome.strategy, CustomTypeStrategy::Direct);
        assert!(!outcome.used_fallback);
        assert_eq!(
            outcome.converted_type.as_deref(),
            Some("ENUM('active', 'inactive', 'pending')")
        );
        assert!(outcome.definition.is_none());
    }

    #[test]
    fn test_enum_definition_statement() {
        let outcome =
            resolve_custom(&user_status(), &profile("mysql"), &profile("postgresql")).unwrap();
        assert_eq!(outcome.strategy, CustomTypeStrategy::Direct);
        assert_eq!(outcome.converted_type.as_deref(), Some("user_status"));
        assert_eq!(
            outcome.definition.as_deref(),
            Some("CREATE TYPE user_status AS ENUM ('active', 'inactive', 'pending')")
        );
    }

    #[test]
    fn test_enum_without_enum_or_check_is_string() {
        let outcome = resolve_custom(&user_status(), &profile("postgresql"), &profile("mongodb")).unwrap();
        assert_eq!(outcome.strategy, CustomTypeStrategy::AsString);
        assert_eq!(outcome.converted_type.as_deref(), Some("string"));
        assert!(outcome.warnings.iter().any(|w| w.contains("type safety reduced")));
        assert!(!outcome.used_fallback);
    }

    #[test]
    fn test_enum_with_check_constraints_is_emulated() {
        let outcome = resolve_custom(&user_status(), &profile("postgresql"), &profile("sqlserver")).unwrap();
        assert_eq!(outcome.strategy, CustomTypeStrategy::EmulateWithConstraint);
        assert_eq!(outcome.converted_type.as_deref(), Some("nvarchar(8)"));
        match &outcome.supplementary[0] {
            SupplementaryObject::Constraint { name, expression } => {
                assert_eq!(name, "user_status_check");
                assert_eq!(expression, "{column} IN ('active', 'inactive', 'pending')");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_large_enum_becomes_lookup_table() {
        let values: Vec<String> = (0..100).map(|i| format!("code_{}", i)).collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let descriptor = CustomTypeDescriptor::enumeration("country_code", &refs);
        let outcome = resolve_custom(&descriptor, &profile("postgresql"), &profile("sqlserver")).unwrap();
        assert_eq!(outcome.strategy, CustomTypeStrategy::LookupTable);
        assert!(outcome.requires_user_input);
        assert!(matches!(
            &outcome.supplementary[0],
            SupplementaryObject::LookupTable { name, values, .. } if name == "country_code_values" && values.len() == 100
        ));
    }

    #[test]
    fn test_composite_decision_rows() {
        let address = CustomTypeDescriptor::composite(
            "address",
            vec![
                CompositeField::new("street", "text"),
                CompositeField::new("zip", "varchar(10)"),
            ],
        );

        let direct = resolve_custom(&address, &profile("postgresql"), &profile("oracle")).unwrap();
        assert_eq!(direct.strategy, CustomTypeStrategy::Direct);
        assert_eq!(
            direct.definition.as_deref(),
            Some("CREATE TYPE address AS OBJECT (street clob, zip varchar2(10))")
        );

        let json = resolve_custom(&address, &profile("postgresql"), &profile("mysql")).unwrap();
        assert_eq!(json.strategy, CustomTypeStrategy::AsJson);
        assert_eq!(json.converted_type.as_deref(), Some("json"));

        let flat = resolve_custom(&address, &profile("postgresql"), &profile("hbase")).unwrap();
        assert_eq!(flat.strategy, CustomTypeStrategy::Flatten);
        assert!(flat.converted_type.is_none());
        assert_eq!(flat.supplementary.len(), 2);
    }

    #[test]
    fn test_nested_composites_flatten_recursively() {
        let catalog = vec![
            CustomTypeDescriptor::composite(
                "geo",
                vec![CompositeField::new("lat", "double precision"), CompositeField::new("lon", "double precision")],
            ),
            CustomTypeDescriptor::composite(
                "place",
                vec![CompositeField::new("label", "text"), CompositeField::new("position", "geo")],
            ),
        ];
        let pg = profile("postgresql");
        let hbase = profile("hbase");
        let resolver = CustomTypeResolver::new(TypeResolver::new(&pg, &hbase)).with_catalog(&catalog);
        let outcome = resolver.resolve(&catalog[1]).unwrap();
        assert_eq!(outcome.strategy, CustomTypeStrategy::Flatten);
        let suffixes: Vec<&str> = outcome
            .supplementary
            .iter()
            .filter_map(|s| match s {
                SupplementaryObject::Column { suffix, .. } => Some(suffix.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(suffixes, vec!["label", "position_lat", "position_lon"]);
    }

    #[test]
    fn test_fallback_after_structural_failure() {
        // Native arrays whose element type does not resolve
        let target = DatabaseTypeProfile::builder("udt_only")
            .ty("text", CanonicalType::Text, &[])
            .custom_types(crate::dialect::CustomTypeCapabilities {
                arrays: Some(NativeImplementation::new("{element} list")),
                ..Default::default()
            })
            .build();
        let pg = profile("postgresql");
        let tags = CustomTypeDescriptor::array("tags", "widget");
        let err = resolve_custom(&tags, &pg, &target).unwrap_err();
        // Direct fails (widget does not resolve), AsJson fails (no JSON type)
        assert!(matches!(err, ConvertError::CustomTypeConversion { .. }));

        let tags = CustomTypeDescriptor::array("tags", "widget");
        let with_json = DatabaseTypeProfile::builder("udt_json")
            .ty("text", CanonicalType::Text, &[])
            .ty("json", CanonicalType::Json, &[])
            .custom_types(crate::dialect::CustomTypeCapabilities {
                arrays: Some(NativeImplementation::new("{element} list")),
                json: Some(NativeImplementation::new("json")),
                ..Default::default()
            })
            .build();
        let outcome = resolve_custom(&tags, &pg, &with_json).unwrap();
        assert_eq!(outcome.primary_strategy, CustomTypeStrategy::Direct);
        assert_eq!(outcome.strategy, CustomTypeStrategy::AsJson);
        assert!(outcome.used_fallback);
        assert_eq!(outcome.converted_type.as_deref(), Some("json"));
    }

    #[test]
    fn test_same_primary_and_fallback_fails_without_retry() {
        // Composite on a target with neither composites nor JSON: Flatten is
        // both primary and fallback.
        let broken = CustomTypeDescriptor::composite("broken", vec![CompositeField::new("x", "widget")]);
        let err = resolve_custom(&broken, &profile("postgresql"), &profile("hbase")).unwrap_err();
        assert!(matches!(err, ConvertError::CustomTypeConversion { .. }));
        assert!(!err.to_string().contains("fallback"));
    }

    #[test]
    fn test_domain_as_check_constraint() {
        let positive = CustomTypeDescriptor::domain("positive_int", "integer", &["VALUE > 0"]);
        let outcome = resolve_custom(&positive, &profile("postgresql"), &profile("mysql")).unwrap();
        assert_eq!(outcome.strategy, CustomTypeStrategy::CheckConstraint);
        assert_eq!(outcome.converted_type.as_deref(), Some("int"));
        assert_eq!(
            outcome.supplementary,
            vec![SupplementaryObject::Constraint {
                name: "positive_int_check".into(),
                expression: "{column} > 0".into(),
            }]
        );
    }

    #[test]
    fn test_domain_with_unsafe_constraint_falls_back() {
        let evil = CustomTypeDescriptor::domain("evil", "integer", &["VALUE > 0; DROP TABLE users"]);
        let outcome = resolve_custom(&evil, &profile("postgresql"), &profile("mysql")).unwrap();
        assert_eq!(outcome.strategy, CustomTypeStrategy::AsString);
        assert!(outcome.used_fallback);
    }

    #[test]
    fn test_used_fallback_implies_primary_attempted() {
        let registry = Registry::build();
        let pg = registry.type_profile("postgresql").unwrap();
        let descriptors = vec![
            user_status(),
            CustomTypeDescriptor::domain("email", "text", &["VALUE LIKE '%@%'"]),
            CustomTypeDescriptor::array("scores", "integer"),
            CustomTypeDescriptor::composite("pair", vec![CompositeField::new("a", "integer")]),
        ];
        for id in registry.database_ids() {
            let target = registry.type_profile(id).unwrap();
            for descriptor in &descriptors {
                if let Ok(outcome) = resolve_custom(descriptor, &pg, &target) {
                    if outcome.used_fallback {
                        assert_ne!(outcome.strategy, outcome.primary_strategy, "{} on {}", descriptor.name, id);
                    } else {
                        assert_eq!(outcome.strategy, outcome.primary_strategy, "{} on {}", descriptor.name, id);
                    }
                }
            }
        }
    }

    #[test]
    fn test_check_support_drives_enum_row() {
        let no_check = DatabaseTypeProfile::builder("plain")
            .sized("varchar", CanonicalType::Varchar, Some(100), None, &[])
            .constraints(ConstraintSupport::none())
            .build();
        let (primary, fallback) = select_strategies(&user_status(), &no_check);
        assert_eq!(primary, CustomTypeStrategy::AsString);
        assert_eq!(fallback, CustomTypeStrategy::AsString);
    }

    #[test]
    fn test_substitute_value_keyword() {
        assert_eq!(substitute_value_keyword("VALUE > 0 AND value < 10"), "{column} > 0 AND {column} < 10");
        assert_eq!(substitute_value_keyword("values_count > 0"), "values_count > 0");
    }

    #[test]
    fn test_substitute_value_keyword_skips_quoted_text() {
        assert_eq!(substitute_value_keyword("VALUE <> 'value'"), "{column} <> 'value'");
        assert_eq!(
            substitute_value_keyword("VALUE <> 'it''s value' AND \"value\" > 0"),
            "{column} <> 'it''s value' AND \"value\" > 0"
        );
        assert_eq!(substitute_value_keyword("'value' = VALUE"), "'value' = {column}");
    }

    #[test]
    fn test_direct_domain_keeps_its_checks() {
        let positive = CustomTypeDescriptor::domain("positive_int", "int", &["VALUE > 0"]);
        let outcome = resolve_custom(&positive, &profile("mysql"), &profile("postgresql")).unwrap();
        assert_eq!(outcome.strategy, CustomTypeStrategy::Direct);
        assert_eq!(outcome.converted_type.as_deref(), Some("positive_int"));
        assert_eq!(
            outcome.definition.as_deref(),
            Some("CREATE DOMAIN positive_int AS integer CHECK (VALUE > 0)")
        );
        assert!(outcome.supplementary.is_empty());

        let plain = CustomTypeDescriptor::domain("amount", "int", &[]);
        let outcome = resolve_custom(&plain, &profile("mysql"), &profile("postgresql")).unwrap();
        assert_eq!(outcome.definition.as_deref(), Some("CREATE DOMAIN amount AS integer"));
    }

    #[test]
    fn test_direct_alias_type_moves_checks_to_columns() {
        let positive = CustomTypeDescriptor::domain("positive_int", "integer", &["VALUE > 0"]);
        let outcome = resolve_custom(&positive, &profile("postgresql"), &profile("sqlserver")).unwrap();
        assert_eq!(outcome.strategy, CustomTypeStrategy::Direct);
        assert_eq!(outcome.definition.as_deref(), Some("CREATE TYPE positive_int FROM int"));
        assert_eq!(
            outcome.supplementary,
            vec![SupplementaryObject::Constraint {
                name: "positive_int_check".into(),
                expression: "{column} > 0".into(),
            }]
        );
    }

    #[test]
    fn test_direct_domain_rejects_unsafe_constraint() {
        let evil = CustomTypeDescriptor::domain("evil", "int", &["VALUE > 0; DROP TABLE users"]);
        let outcome = resolve_custom(&evil, &profile("mysql"), &profile("postgresql")).unwrap();
        assert_eq!(outcome.primary_strategy, CustomTypeStrategy::Direct);
        assert_eq!(outcome.strategy, CustomTypeStrategy::AsString);
        assert!(outcome.used_fallback);
        assert!(outcome.definition.is_none());
    }

    #[test]
    fn test_empty_enum_never_renders_direct() {
        let empty = CustomTypeDescriptor::enumeration("nothing", &[]);
        let outcome = resolve_custom(&empty, &profile("postgresql"), &profile("mysql")).unwrap();
        assert_eq!(outcome.strategy, CustomTypeStrategy::AsString);
        assert!(outcome.used_fallback);
        assert_ne!(outcome.converted_type.as_deref(), Some("ENUM()"));
    }

    #[test]
    fn test_direct_composite_with_unresolved_field_fails() {
        let broken = CustomTypeDescriptor::composite("broken", vec![CompositeField::new("x", "widget")]);
        let err = resolve_custom(&broken, &profile("postgresql"), &profile("oracle")).unwrap_err();
        // Flatten cannot resolve the field either
        match err {
            ConvertError::CustomTypeConversion { type_name, message } => {
                assert_eq!(type_name, "broken");
                assert!(message.contains("widget"));
                assert!(message.contains("fallback"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_direct_range_with_unresolved_subtype_falls_back() {
        let span = CustomTypeDescriptor {
            name: "span".into(),
            definition: CustomTypeDefinition::Range { subtype: "widget".into() },
        };
        let outcome = resolve_custom(&span, &profile("mysql"), &profile("postgresql")).unwrap();
        assert_eq!(outcome.primary_strategy, CustomTypeStrategy::Direct);
        assert_eq!(outcome.strategy, CustomTypeStrategy::AsString);
        assert!(outcome.used_fallback);
        assert!(outcome.definition.is_none());
    }
}
