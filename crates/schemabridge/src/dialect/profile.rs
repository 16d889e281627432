//! Per-database type profiles built on the canonical type system.
//!
//! A [`DatabaseTypeProfile`] answers two questions for one database
//! technology: "what does this database call canonical type T?" and "what
//! can its custom-type system express?". Profiles are produced by the
//! factories in [`crate::drivers`] and are immutable once built, so an
//! `Arc<DatabaseTypeProfile>` can be shared across any number of requests.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::canonical::CanonicalType;

/// Metadata for one native type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Native spelling, lower-case (e.g. "varchar", "double precision").
    pub name: String,
    /// The canonical type this native type maps to.
    pub canonical: CanonicalType,
    /// Whether columns of this type may hold NULL.
    pub nullable: bool,
    /// Maximum length for character/binary types (None = unbounded).
    pub max_length: Option<u64>,
    /// Length applied when none is declared.
    pub default_length: Option<u64>,
    /// Maximum precision for exact numerics.
    pub max_precision: Option<u32>,
    /// Maximum scale for exact numerics.
    pub max_scale: Option<u32>,
    /// Precision/scale applied when none is declared.
    pub default_precision: Option<(u32, u32)>,
    /// Whether the type accepts a length parameter, e.g. `varchar(n)`.
    pub accepts_length: bool,
    /// Whether the type accepts precision/scale parameters.
    pub accepts_precision: bool,
    /// Whether an `unsigned` modifier is meaningful.
    pub supports_unsigned: bool,
    /// Alternative spellings that resolve to this entry.
    pub aliases: Vec<String>,
}

impl TypeInfo {
    /// Create a plain, unparameterized type entry.
    pub fn new(name: impl Into<String>, canonical: CanonicalType) -> Self {
        Self {
            name: normalize_type_name(&name.into()),
            canonical,
            nullable: true,
            max_length: None,
            default_length: None,
            max_precision: None,
            max_scale: None,
            default_precision: None,
            accepts_length: false,
            accepts_precision: false,
            supports_unsigned: false,
            aliases: Vec::new(),
        }
    }

    /// Whether the native type takes any parameters.
    pub fn accepts_parameters(&self) -> bool {
        self.accepts_length || self.accepts_precision
    }

    /// The declared upper bound used for lossy-conversion detection.
    pub fn bound(&self) -> Option<u64> {
        self.max_length
            .or_else(|| self.max_precision.map(u64::from))
    }
}

/// How a database natively implements a custom-type category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeImplementation {
    /// Syntax template. Placeholders: `{name}` (type name), `{values}`
    /// (quoted, comma-separated enum values), `{fields}` (composite
    /// `name type` list), `{element}` (element type), `{base}` (domain base
    /// or range subtype), `{checks}` (domain ` CHECK (...)` clauses).
    pub syntax: String,
    /// Known limitations of the native implementation.
    pub limitations: Vec<String>,
}

impl NativeImplementation {
    /// Create an implementation description with no recorded limitations.
    pub fn new(syntax: impl Into<String>) -> Self {
        Self {
            syntax: syntax.into(),
            limitations: Vec::new(),
        }
    }

    /// Add a limitation note.
    pub fn with_limitation(mut self, limitation: impl Into<String>) -> Self {
        self.limitations.push(limitation.into());
        self
    }

    /// Whether the template is a standalone DDL statement (`CREATE TYPE ...`)
    /// rather than an inline type expression (`ENUM(...)`, `{element}[]`).
    pub fn is_statement(&self) -> bool {
        self.syntax
            .trim_start()
            .get(..7)
            .is_some_and(|head| head.eq_ignore_ascii_case("create "))
    }

    pub fn has_placeholder(&self, key: &str) -> bool {
        self.syntax.contains(&format!("{{{}}}", key))
    }

    /// Fill the syntax template. Placeholders without a substitution are
    /// left as written.
    pub fn render(&self, substitutions: &[(&str, &str)]) -> String {
        substitutions
            .iter()
            .fold(self.syntax.clone(), |acc, (key, value)| {
                acc.replace(&format!("{{{}}}", key), value)
            })
    }
}

/// Custom-type capability flags, each paired with the native
/// implementation when supported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTypeCapabilities {
    pub enums: Option<NativeImplementation>,
    pub composites: Option<NativeImplementation>,
    pub domains: Option<NativeImplementation>,
    pub arrays: Option<NativeImplementation>,
    pub ranges: Option<NativeImplementation>,
    pub json: Option<NativeImplementation>,
    pub xml: Option<NativeImplementation>,
    pub spatial: Option<NativeImplementation>,
}

impl CustomTypeCapabilities {
    pub fn supports_enum(&self) -> bool {
        self.enums.is_some()
    }

    pub fn supports_composite(&self) -> bool {
        self.composites.is_some()
    }

    pub fn supports_domain(&self) -> bool {
        self.domains.is_some()
    }

    pub fn supports_array(&self) -> bool {
        self.arrays.is_some()
    }

    pub fn supports_range(&self) -> bool {
        self.ranges.is_some()
    }

    pub fn supports_json(&self) -> bool {
        self.json.is_some()
    }

    pub fn supports_xml(&self) -> bool {
        self.xml.is_some()
    }

    pub fn supports_spatial(&self) -> bool {
        self.spatial.is_some()
    }
}

/// Constraint kinds a database can enforce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSupport {
    pub primary_key: bool,
    pub foreign_key: bool,
    pub unique: bool,
    pub check: bool,
    pub not_null: bool,
    pub default_value: bool,
    pub auto_increment: bool,
}

impl ConstraintSupport {
    /// Everything a full SQL engine enforces.
    pub fn relational() -> Self {
        Self {
            primary_key: true,
            foreign_key: true,
            unique: true,
            check: true,
            not_null: true,
            default_value: true,
            auto_increment: true,
        }
    }

    /// Nothing enforced by the engine.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Type metadata for one database technology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseTypeProfile {
    /// Registry identifier (e.g. "postgresql").
    pub database: String,
    /// Native types keyed by normalized name.
    types: BTreeMap<String, TypeInfo>,
    /// Alias spelling → primary name.
    aliases: HashMap<String, String>,
    /// Preferred native name per canonical type.
    defaults: HashMap<CanonicalType, String>,
    /// Custom-type capability flags.
    pub custom_types: CustomTypeCapabilities,
    /// Enforceable constraints.
    pub constraints: ConstraintSupport,
}

impl DatabaseTypeProfile {
    /// Start building a profile.
    pub fn builder(database: impl Into<String>) -> TypeProfileBuilder {
        TypeProfileBuilder::new(database)
    }

    /// Look up a native type by name.
    ///
    /// Checks the direct table first, then aliases. The name is case and
    /// whitespace normalized, and a trailing `unsigned` modifier is
    /// stripped before lookup; when the matched type supports unsigned
    /// values the returned entry carries the unsigned canonical type.
    pub fn type_info(&self, native_name: &str) -> Option<TypeInfo> {
        let normalized = normalize_type_name(native_name);
        if let Some(info) = self.lookup(&normalized) {
            return Some(info.clone());
        }

        let stripped = normalized
            .strip_suffix(" unsigned")
            .or_else(|| normalized.strip_prefix("unsigned "))?;
        let info = self.lookup(stripped.trim())?;
        let mut info = info.clone();
        if info.supports_unsigned {
            if let Some(unsigned) = info.canonical.unsigned_variant() {
                info.canonical = unsigned;
            }
        }
        Some(info)
    }

    fn lookup(&self, normalized: &str) -> Option<&TypeInfo> {
        self.types.get(normalized).or_else(|| {
            self.aliases
                .get(normalized)
                .and_then(|primary| self.types.get(primary))
        })
    }

    /// Look up the native entry for a canonical type.
    ///
    /// Checks the default-mapping table first, then scans all entries (in
    /// name order) for one with a matching canonical type.
    pub fn native_type_for(&self, canonical: CanonicalType) -> Option<&TypeInfo> {
        if let Some(name) = self.defaults.get(&canonical) {
            if let Some(info) = self.types.get(name) {
                return Some(info);
            }
        }
        self.types.values().find(|info| info.canonical == canonical)
    }

    /// The native name for a canonical type.
    pub fn native_name_for(&self, canonical: CanonicalType) -> Option<&str> {
        self.native_type_for(canonical).map(|info| info.name.as_str())
    }

    /// Whether any native type maps to the canonical type.
    pub fn has_canonical(&self, canonical: CanonicalType) -> bool {
        self.native_type_for(canonical).is_some()
    }

    /// Number of native type entries (aliases excluded).
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// All native type entries in name order.
    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.values()
    }
}

/// Builder for [`DatabaseTypeProfile`].
///
/// Entries are added in the order a profile factory lists them; the
/// `*_default` variants also register the entry as the preferred native
/// spelling of its canonical type.
#[derive(Debug)]
pub struct TypeProfileBuilder {
    profile: DatabaseTypeProfile,
}

impl TypeProfileBuilder {
    fn new(database: impl Into<String>) -> Self {
        Self {
            profile: DatabaseTypeProfile {
                database: database.into(),
                types: BTreeMap::new(),
                aliases: HashMap::new(),
                defaults: HashMap::new(),
                custom_types: CustomTypeCapabilities::default(),
                constraints: ConstraintSupport::none(),
            },
        }
    }

    /// Add a fully specified entry.
    pub fn entry(mut self, info: TypeInfo) -> Self {
        for alias in &info.aliases {
            self.profile
                .aliases
                .insert(normalize_type_name(alias), info.name.clone());
        }
        self.profile.types.insert(info.name.clone(), info);
        self
    }

    /// Add a plain type with optional aliases.
    pub fn ty(self, name: &str, canonical: CanonicalType, aliases: &[&str]) -> Self {
        let mut info = TypeInfo::new(name, canonical);
        info.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self.entry(info)
    }

    /// Add an integer type that accepts an `unsigned` modifier.
    pub fn unsigned_int(self, name: &str, canonical: CanonicalType, aliases: &[&str]) -> Self {
        let mut info = TypeInfo::new(name, canonical);
        info.supports_unsigned = true;
        info.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self.entry(info)
    }

    /// Add a length-parameterized type (`varchar(n)`).
    pub fn sized(
        self,
        name: &str,
        canonical: CanonicalType,
        max_length: Option<u64>,
        default_length: Option<u64>,
        aliases: &[&str],
    ) -> Self {
        let mut info = TypeInfo::new(name, canonical);
        info.accepts_length = true;
        info.max_length = max_length;
        info.default_length = default_length;
        info.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self.entry(info)
    }

    /// Add an unparameterized type with a fixed upper bound (`tinytext`).
    pub fn bounded(self, name: &str, canonical: CanonicalType, max_length: u64) -> Self {
        let mut info = TypeInfo::new(name, canonical);
        info.max_length = Some(max_length);
        self.entry(info)
    }

    /// Add a precision/scale-parameterized type (`numeric(p,s)`).
    pub fn numeric(
        self,
        name: &str,
        canonical: CanonicalType,
        max_precision: Option<u32>,
        max_scale: Option<u32>,
        aliases: &[&str],
    ) -> Self {
        let mut info = TypeInfo::new(name, canonical);
        info.accepts_precision = true;
        info.max_precision = max_precision;
        info.max_scale = max_scale;
        info.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self.entry(info)
    }

    /// Register the preferred native name for a canonical type.
    pub fn default_for(mut self, canonical: CanonicalType, name: &str) -> Self {
        self.profile
            .defaults
            .insert(canonical, normalize_type_name(name));
        self
    }

    /// Set the default precision/scale of an existing numeric entry.
    pub fn default_precision(mut self, name: &str, precision: u32, scale: u32) -> Self {
        if let Some(info) = self.profile.types.get_mut(&normalize_type_name(name)) {
            info.default_precision = Some((precision, scale));
        }
        self
    }

    /// Set custom-type capabilities.
    pub fn custom_types(mut self, capabilities: CustomTypeCapabilities) -> Self {
        self.profile.custom_types = capabilities;
        self
    }

    /// Set constraint support.
    pub fn constraints(mut self, constraints: ConstraintSupport) -> Self {
        self.profile.constraints = constraints;
        self
    }

    /// Finish the profile.
    pub fn build(self) -> DatabaseTypeProfile {
        self.profile
    }
}

/// Normalize a native type spelling: trim, lower-case, collapse runs of
/// whitespace and drop spaces around parentheses and commas.
pub fn normalize_type_name(name: &str) -> String {
    let collapsed = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    collapsed
        .replace(" (", "(")
        .replace("( ", "(")
        .replace(" )", ")")
        .replace(", ", ",")
        .replace(" ,", ",")
}
