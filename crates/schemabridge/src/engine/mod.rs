//! Conversion engine - request workflow coordinator.
//!
//! A request moves through `validate -> matrix lookup -> report` for
//! analysis-only mode, and `validate -> matrix lookup -> apply rules ->
//! convert types -> report` otherwise. Validation and matrix lookup
//! failures abort the request; failures on a single field or custom type
//! degrade to "keep the original + warning".

mod report;

pub use report::{
    ConversionReport, ConversionResult, ConversionWarning, ObjectTypeStats, PendingDecision,
    Severity, UnsupportedFeature, WarningKind,
};

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, ExecutionMode};
use crate::core::identifier::derived_name;
use crate::core::{
    CustomTypeDescriptor, Estimator, Field, Registry, Schema, SchemaObject, CONTAINER_KINDS,
};
use crate::dialect::{normalize_type_name, FeatureProfile, ObjectType};
use crate::error::{ConvertError, Result};
use crate::matrix::{
    ConversionComplexity, ConversionMatrix, ConversionPath, HeuristicEstimator, MatrixGenerator,
    ObjectConversionRule, PathFinder, RuleAction,
};
use crate::paradigm::format_paradigms;
use crate::typemap::custom::COLUMN_PLACEHOLDER;
use crate::typemap::{
    select_strategies, ConversionOutcome, CustomTypeConversionOutcome, CustomTypeResolver,
    CustomTypeStrategy, SupplementaryObject, TypeResolver,
};

/// Decision answer that drops the objects of an emulated type.
pub const DECISION_DROP: &str = "drop";
/// Decision answer that keeps emulated objects in their own container.
pub const DECISION_KEEP: &str = "keep";
/// Decision answer that skips a custom type.
pub const DECISION_SKIP: &str = "skip";

/// Per-request user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Object types left out entirely (counted as skipped).
    #[serde(default)]
    pub excluded_object_types: BTreeSet<ObjectType>,

    /// Object and custom type names left out (counted as skipped).
    #[serde(default)]
    pub excluded_objects: BTreeSet<String>,

    /// Source type spelling -> target type spelling, applied before lookup.
    #[serde(default)]
    pub type_overrides: BTreeMap<String, String>,

    /// Answers to decision points, keyed by `PendingDecision::id`.
    #[serde(default)]
    pub decisions: BTreeMap<String, String>,

    #[serde(default)]
    pub enrichment_available: bool,

    #[serde(default)]
    pub sample_data_available: bool,

    /// When false, lossy conversions are reported with severity Error.
    #[serde(default = "default_true")]
    pub allow_lossy: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            excluded_object_types: BTreeSet::new(),
            excluded_objects: BTreeSet::new(),
            type_overrides: BTreeMap::new(),
            decisions: BTreeMap::new(),
            enrichment_available: false,
            sample_data_available: false,
            allow_lossy: true,
        }
    }
}

impl UserPreferences {
    fn is_excluded(&self, name: &str) -> bool {
        self.excluded_objects
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(name))
    }
}

fn default_true() -> bool {
    true
}

/// One conversion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    #[serde(default)]
    pub schema: Option<Schema>,
    pub source_db: String,
    pub target_db: String,
    #[serde(default)]
    pub preferences: UserPreferences,
    /// Falls back to `engine.default_mode` from the configuration.
    #[serde(default)]
    pub mode: Option<ExecutionMode>,
}

impl ConversionRequest {
    pub fn new(schema: Schema, source_db: impl Into<String>, target_db: impl Into<String>) -> Self {
        Self {
            schema: Some(schema),
            source_db: source_db.into(),
            target_db: target_db.into(),
            preferences: UserPreferences::default(),
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_preferences(mut self, preferences: UserPreferences) -> Self {
        self.preferences = preferences;
        self
    }
}

/// Schema conversion engine.
///
/// Holds only read-only state, so one engine serves any number of
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct ConversionEngine {
    registry: Arc<Registry>,
    config: Config,
    generator: MatrixGenerator,
    cancel: CancellationToken,
}

impl ConversionEngine {
    /// Create an engine with the heuristic estimator from `config`.
    pub fn new(registry: Arc<Registry>, config: Config) -> Self {
        let estimator = Arc::new(HeuristicEstimator::new(config.estimator.clone()));
        let generator = MatrixGenerator::new(registry.clone()).with_estimator(estimator);
        Self {
            registry,
            config,
            generator,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the success-rate and duration estimator.
    pub fn with_estimator(mut self, estimator: Arc<dyn Estimator>) -> Self {
        self.generator = self.generator.with_estimator(estimator);
        self
    }

    /// Poll `token` between object-type passes.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Conversion matrix for a database pair.
    pub fn matrix(&self, source: &str, target: &str) -> Result<ConversionMatrix> {
        self.generator.generate(source, target)
    }

    /// Direct or two-step conversion path for a database pair.
    pub fn find_path(&self, source: &str, target: &str) -> Result<ConversionPath> {
        PathFinder::new(self.generator.clone()).find_path(source, target)
    }

    /// Resolve one primitive type between two databases.
    pub fn resolve_type(&self, source: &str, target: &str, type_name: &str) -> Result<ConversionOutcome> {
        self.registry.require_capabilities(source)?;
        self.registry.require_capabilities(target)?;
        let source_types = self.registry.require_type_profile(source)?;
        let target_types = self.registry.require_type_profile(target)?;
        TypeResolver::new(&source_types, &target_types).resolve(type_name)
    }

    /// Run a request. Never fails: fatal errors become `success == false`
    /// with the error message and no schema.
    pub fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        let start = Instant::now();
        match self.try_convert(request) {
            Ok(result) => result,
            Err(e) => {
                warn!("Conversion {} -> {} failed: {}", request.source_db, request.target_db, e);
                ConversionResult::failed(e.to_string(), start.elapsed().as_millis() as u64)
            }
        }
    }

    /// Run a request, returning fatal errors.
    pub fn try_convert(&self, request: &ConversionRequest) -> Result<ConversionResult> {
        let start = Instant::now();
        let started_at = Utc::now();
        let mode = request.mode.unwrap_or(self.config.engine.default_mode);

        let schema = self.validate(request)?;
        let source_db = self.registry.normalize(&request.source_db);
        let target_db = self.registry.normalize(&request.target_db);

        info!(
            "Starting conversion of {} ({} objects) from {} to {} in {} mode",
            schema.name,
            schema.total_objects(),
            source_db,
            target_db,
            mode
        );

        let matrix = self.generator.generate(&source_db, &target_db)?;
        if matrix.complexity == ConversionComplexity::Impossible && self.config.engine.fail_on_impossible {
            return Err(self.impossible(&matrix));
        }
        self.check_cancelled()?;

        let source_types = self.registry.require_type_profile(&source_db)?;
        let target_types = self.registry.require_type_profile(&target_db)?;
        let target_features = self.registry.require_feature_profile(&target_db)?;
        let overrides: BTreeMap<String, String> = request
            .preferences
            .type_overrides
            .iter()
            .map(|(from, to)| (normalize_type_name(from), to.clone()))
            .collect();
        let types = TypeResolver::new(&source_types, &target_types).with_overrides(&overrides);
        let custom = CustomTypeResolver::new(types)
            .with_catalog(&schema.types)
            .with_max_depth(self.config.engine.max_custom_type_depth);

        let mut run = Run {
            mode,
            preferences: &request.preferences,
            matrix: &matrix,
            target_features: &target_features,
            types,
            custom,
            custom_outcomes: BTreeMap::new(),
            warnings: Vec::new(),
            unsupported: Vec::new(),
            pending: Vec::new(),
            stats: BTreeMap::new(),
            strategy_counts: BTreeMap::new(),
            requires_user_input: matrix.requires_user_input,
        };
        run.matrix_warnings();

        let converted = if mode.executes() {
            Some(self.execute(&mut run, schema)?)
        } else {
            run.analyze(schema);
            None
        };

        let mut report = ConversionReport {
            request_id: Uuid::new_v4(),
            started_at,
            source_db: matrix.source_db.clone(),
            target_db: matrix.target_db.clone(),
            mode,
            dry_run: mode == ExecutionMode::DryRun,
            source_paradigms: matrix.source_paradigms.clone(),
            target_paradigms: matrix.target_paradigms.clone(),
            compatibility: matrix.compatibility,
            complexity: matrix.complexity,
            strategies: matrix.strategies.clone(),
            estimator: self.generator.estimator().name().to_string(),
            estimated_success_rate: matrix.success_rate,
            estimated_duration: self
                .generator
                .estimator()
                .duration(matrix.complexity, schema.total_objects()),
            object_stats: std::mem::take(&mut run.stats),
            custom_type_strategies: std::mem::take(&mut run.strategy_counts),
            success_rate: 0.0,
            requires_user_input: run.requires_user_input || !run.pending.is_empty(),
            enrichment_used: matrix.requires_enrichment && request.preferences.enrichment_available,
            sample_data_used: matrix.requires_enrichment && request.preferences.sample_data_available,
            config_hash: self.config.hash(),
            notes: matrix.notes.clone(),
        };
        report.finish();

        info!(
            "Conversion {} -> {} finished: {}/{} objects converted, {} warnings, {} pending decisions",
            report.source_db,
            report.target_db,
            report.total_converted(),
            report.total_source_objects(),
            run.warnings.len(),
            run.pending.len()
        );

        Ok(ConversionResult {
            success: true,
            schema: converted,
            report: Some(report),
            warnings: run.warnings,
            unsupported_features: run.unsupported,
            pending_decisions: run.pending,
            error: None,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Request-level checks, done before any matrix lookup.
    fn validate<'r>(&self, request: &'r ConversionRequest) -> Result<&'r Schema> {
        let schema = request.schema.as_ref().ok_or(ConvertError::MissingSchema)?;

        let source_key = request.source_db.trim().to_lowercase();
        let target_key = request.target_db.trim().to_lowercase();
        if source_key == target_key {
            return Err(ConvertError::SameDatabase(source_key));
        }

        let source = self.registry.require_capabilities(&request.source_db)?;
        let target = self.registry.require_capabilities(&request.target_db)?;
        if source.id == target.id {
            return Err(ConvertError::SameDatabase(source.id.clone()));
        }

        schema.validate()?;
        Ok(schema)
    }

    fn impossible(&self, matrix: &ConversionMatrix) -> ConvertError {
        let suggestion = match self.find_path(&matrix.source_db, &matrix.target_db) {
            Ok(path) => match path.intermediate {
                Some(via) if path.recommended => {
                    format!("; consider converting through {} ({})", via, path.total_complexity)
                }
                _ => String::new(),
            },
            Err(_) => String::new(),
        };
        ConvertError::ImpossibleConversion {
            source_db: matrix.source_db.clone(),
            target_db: matrix.target_db.clone(),
            source_paradigms: format_paradigms(&matrix.source_paradigms),
            target_paradigms: format_paradigms(&matrix.target_paradigms),
            suggestion,
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            warn!("Conversion cancelled");
            return Err(ConvertError::Cancelled);
        }
        Ok(())
    }

    fn execute(&self, run: &mut Run<'_>, source: &Schema) -> Result<Schema> {
        let mut target = Schema::new(source.name.clone());

        run.convert_custom_types(source, &mut target);
        for kind in CONTAINER_KINDS {
            self.check_cancelled()?;
            let objects = source.objects(kind);
            if objects.is_empty() {
                continue;
            }
            run.convert_kind(kind, objects, &mut target);
        }
        self.check_cancelled()?;
        Ok(target)
    }
}

/// Mutable state of one request.
struct Run<'a> {
    mode: ExecutionMode,
    preferences: &'a UserPreferences,
    matrix: &'a ConversionMatrix,
    target_features: &'a FeatureProfile,
    types: TypeResolver<'a>,
    custom: CustomTypeResolver<'a>,
    /// Keyed by lower-case type name; Err holds the reason the type has no
    /// conversion.
    custom_outcomes: BTreeMap<String, std::result::Result<CustomTypeConversionOutcome, String>>,
    warnings: Vec<ConversionWarning>,
    unsupported: Vec<UnsupportedFeature>,
    pending: Vec<PendingDecision>,
    stats: BTreeMap<ObjectType, ObjectTypeStats>,
    strategy_counts: BTreeMap<CustomTypeStrategy, usize>,
    requires_user_input: bool,
}

/// Where the objects of one kind go.
#[derive(Clone, Copy)]
enum Placement {
    Into(ObjectType),
    Drop,
}

impl<'a> Run<'a> {
    fn matrix_warnings(&mut self) {
        for limitation in &self.matrix.warnings {
            self.warnings.push(ConversionWarning::new(
                WarningKind::Matrix,
                Severity::Info,
                format!("{}: {}", self.matrix.target_db, limitation),
            ));
        }
        if self.matrix.requires_enrichment && !self.preferences.enrichment_available {
            self.warnings.push(
                ConversionWarning::new(
                    WarningKind::Enrichment,
                    Severity::Info,
                    format!(
                        "{} paradigms: access patterns and relationship hints are not available",
                        self.matrix.compatibility
                    ),
                )
                .suggest("provide schema enrichment to guide denormalization"),
            );
        }
    }

    fn rule(&self, kind: ObjectType) -> ObjectConversionRule {
        self.matrix
            .rule(kind)
            .cloned()
            .unwrap_or_else(|| ObjectConversionRule::for_target(kind, self.target_features.support(kind)))
    }

    /// Container kinds among `alternatives` the target supports.
    fn container_alternatives(&self, alternatives: &[ObjectType]) -> Vec<ObjectType> {
        alternatives
            .iter()
            .copied()
            .filter(|alt| CONTAINER_KINDS.contains(alt) && self.target_features.supports(*alt))
            .collect()
    }

    /// Answer for a decision point; records it as pending when unanswered
    /// in interactive mode.
    fn decide(&mut self, decision: PendingDecision) -> String {
        if let Some(answer) = self.preferences.decisions.get(&decision.id) {
            let answer = answer.trim().to_lowercase();
            if decision.options.iter().any(|o| *o == answer) {
                return answer;
            }
            self.warnings.push(
                ConversionWarning::new(
                    WarningKind::Emulation,
                    Severity::Warning,
                    format!("answer '{}' to {} is not an option; using {}", answer, decision.id, decision.default),
                )
                .for_type(decision.object_type),
            );
        } else if self.mode == ExecutionMode::Interactive {
            let default = decision.default.clone();
            self.pending.push(decision);
            return default;
        }
        decision.default
    }

    fn placement(&mut self, kind: ObjectType, rule: &ObjectConversionRule) -> Placement {
        match rule.action {
            RuleAction::Direct => Placement::Into(kind),
            RuleAction::Drop => Placement::Drop,
            RuleAction::Emulate => {
                let containers = self.container_alternatives(&rule.alternatives);
                let mut options: Vec<String> = containers.iter().map(|c| c.to_string()).collect();
                if options.is_empty() {
                    options.push(DECISION_KEEP.to_string());
                }
                options.push(DECISION_DROP.to_string());
                let default = options[0].clone();
                let answer = self.decide(PendingDecision {
                    id: format!("emulate.{}", kind),
                    object_type: kind,
                    object_name: None,
                    question: format!(
                        "{} does not support {}; how should these objects be converted?",
                        self.matrix.target_db, kind
                    ),
                    options,
                    default,
                });
                if answer == DECISION_DROP {
                    return Placement::Drop;
                }
                if answer == DECISION_KEEP {
                    return Placement::Into(kind);
                }
                match containers.into_iter().find(|c| c.as_str() == answer) {
                    Some(container) => Placement::Into(container),
                    None => Placement::Into(kind),
                }
            }
        }
    }

    fn convert_kind(&mut self, kind: ObjectType, objects: &[SchemaObject], target: &mut Schema) {
        let mut stats = ObjectTypeStats::new(objects.len());

        if self.preferences.excluded_object_types.contains(&kind) {
            stats.skipped = objects.len();
            self.warnings.push(
                ConversionWarning::new(
                    WarningKind::Excluded,
                    Severity::Info,
                    format!("{} {} objects excluded by request", objects.len(), kind),
                )
                .for_type(kind),
            );
            self.stats.insert(kind, stats);
            return;
        }

        let rule = self.rule(kind);
        let placement = self.placement(kind, &rule);
        debug!("{}: {} objects, rule {}", kind, objects.len(), rule.action);

        for object in objects {
            if self.preferences.is_excluded(&object.name) {
                stats.skipped += 1;
                continue;
            }
            match placement {
                Placement::Drop => {
                    stats.dropped += 1;
                    self.drop_object(kind, object, &rule);
                }
                Placement::Into(destination) => {
                    stats.converted += 1;
                    if rule.action == RuleAction::Emulate {
                        self.note_emulation(kind, destination, object, &rule);
                    }
                    let converted = self.convert_object(kind, object);
                    if let Some(container) = target.objects_mut(destination) {
                        container.push(converted);
                    }
                }
            }
        }
        self.stats.insert(kind, stats);
    }

    fn drop_object(&mut self, kind: ObjectType, object: &SchemaObject, rule: &ObjectConversionRule) {
        let description = if rule.notes.is_empty() {
            format!("{} does not support {}", self.matrix.target_db, kind)
        } else {
            rule.notes.join("; ")
        };
        warn!("Dropping {} {}: {}", kind, object.name, description);
        self.warnings.push(
            ConversionWarning::new(
                WarningKind::Unsupported,
                Severity::Warning,
                format!("{} dropped: {}", object.name, description),
            )
            .on(kind, &object.name),
        );
        self.unsupported.push(UnsupportedFeature {
            feature_type: kind.to_string(),
            object_type: kind,
            object_name: Some(object.name.clone()),
            description,
            alternatives: rule.alternatives.clone(),
        });
    }

    fn note_emulation(
        &mut self,
        kind: ObjectType,
        destination: ObjectType,
        object: &SchemaObject,
        rule: &ObjectConversionRule,
    ) {
        let message = if destination == kind {
            format!(
                "{} kept as {}; {} emulates it with {}",
                object.name,
                kind,
                self.matrix.target_db,
                rule.alternatives
                    .iter()
                    .map(ObjectType::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        } else {
            format!("{} converted from {} to {}", object.name, kind, destination)
        };
        let mut warning = ConversionWarning::new(WarningKind::Emulation, Severity::Info, message).on(kind, &object.name);
        if let Some(note) = rule.notes.first() {
            warning = warning.suggest(note.clone());
        }
        self.warnings.push(warning);
    }

    fn convert_object(&mut self, kind: ObjectType, object: &SchemaObject) -> SchemaObject {
        let mut converted = SchemaObject {
            name: object.name.clone(),
            fields: Vec::with_capacity(object.fields.len()),
            definition: object.definition.clone(),
            constraints: object.constraints.clone(),
            properties: object.properties.clone(),
        };
        for field in &object.fields {
            self.convert_field(kind, &object.name, field, &mut converted);
        }
        converted
    }

    fn convert_field(&mut self, kind: ObjectType, object_name: &str, field: &Field, out: &mut SchemaObject) {
        let key = field.data_type.trim().to_lowercase();
        if let Some(outcome) = self.custom_outcomes.get(&key) {
            match outcome {
                Ok(outcome) => apply_custom_outcome(field, outcome, out),
                Err(reason) => {
                    let message = format!(
                        "{}.{} keeps type {}: {}",
                        object_name, field.name, field.data_type, reason
                    );
                    out.fields.push(field.clone());
                    self.warnings.push(
                        ConversionWarning::new(WarningKind::CustomType, Severity::Warning, message)
                            .on(kind, object_name),
                    );
                }
            }
            return;
        }

        match self.types.resolve(&field.data_type) {
            Ok(outcome) => {
                if outcome.lossy {
                    let severity = if self.preferences.allow_lossy {
                        Severity::Warning
                    } else {
                        Severity::Error
                    };
                    let detail = if outcome.warnings.is_empty() {
                        outcome.note.clone()
                    } else {
                        outcome.warnings.join("; ")
                    };
                    self.warnings.push(
                        ConversionWarning::new(
                            WarningKind::LossyConversion,
                            severity,
                            format!("{}.{}: {}", object_name, field.name, detail),
                        )
                        .on(kind, object_name),
                    );
                }
                out.fields.push(Field {
                    name: field.name.clone(),
                    data_type: outcome.converted,
                    nullable: field.nullable,
                });
            }
            Err(e) => {
                out.fields.push(field.clone());
                self.warnings.push(
                    ConversionWarning::new(
                        WarningKind::TypeConversion,
                        Severity::Warning,
                        format!("{}.{} keeps type {}: {}", object_name, field.name, field.data_type, e),
                    )
                    .on(kind, object_name)
                    .suggest("add a type override for this type"),
                );
            }
        }
    }

    fn convert_custom_types(&mut self, source: &Schema, target: &mut Schema) {
        if source.types.is_empty() {
            return;
        }
        let mut stats = ObjectTypeStats::new(source.types.len());
        let excluded_kind = self
            .preferences
            .excluded_object_types
            .contains(&ObjectType::CustomType);

        for descriptor in &source.types {
            let key = descriptor.name.to_lowercase();
            if excluded_kind || self.preferences.is_excluded(&descriptor.name) {
                stats.skipped += 1;
                self.custom_outcomes.insert(key, Err("excluded by request".to_string()));
                continue;
            }

            let outcome = match self.custom.resolve(descriptor) {
                Ok(outcome) => outcome,
                Err(e) => {
                    stats.dropped += 1;
                    warn!("Custom type {} dropped: {}", descriptor.name, e);
                    self.warnings.push(
                        ConversionWarning::new(WarningKind::CustomType, Severity::Error, e.to_string())
                            .on(ObjectType::CustomType, &descriptor.name),
                    );
                    self.unsupported.push(UnsupportedFeature {
                        feature_type: descriptor.category().to_string(),
                        object_type: ObjectType::CustomType,
                        object_name: Some(descriptor.name.clone()),
                        description: e.to_string(),
                        alternatives: Vec::new(),
                    });
                    self.custom_outcomes.insert(key, Err(e.to_string()));
                    continue;
                }
            };

            if outcome.requires_user_input {
                self.requires_user_input = true;
                let default = outcome.strategy.to_string();
                let answer = self.decide(PendingDecision {
                    id: format!("custom_type.{}", descriptor.name),
                    object_type: ObjectType::CustomType,
                    object_name: Some(descriptor.name.clone()),
                    question: format!(
                        "{} {} needs {} on {}; apply it or skip the type?",
                        descriptor.category(),
                        descriptor.name,
                        outcome.strategy,
                        self.matrix.target_db
                    ),
                    options: vec![default.clone(), DECISION_SKIP.to_string()],
                    default,
                });
                if answer == DECISION_SKIP {
                    stats.skipped += 1;
                    self.custom_outcomes.insert(key, Err("skipped by decision".to_string()));
                    continue;
                }
            }

            stats.converted += 1;
            *self.strategy_counts.entry(outcome.strategy).or_insert(0) += 1;
            self.record_custom_outcome(descriptor, &outcome, target);
            self.custom_outcomes.insert(key, Ok(outcome));
        }
        self.stats.insert(ObjectType::CustomType, stats);
    }

    fn record_custom_outcome(
        &mut self,
        descriptor: &CustomTypeDescriptor,
        outcome: &CustomTypeConversionOutcome,
        target: &mut Schema,
    ) {
        let severity = if outcome.used_fallback { Severity::Warning } else { Severity::Info };
        for message in &outcome.warnings {
            self.warnings.push(
                ConversionWarning::new(WarningKind::CustomType, severity, message.clone())
                    .on(ObjectType::CustomType, &descriptor.name),
            );
        }

        // Types that need a definition statement stay in the catalog
        if outcome.strategy == CustomTypeStrategy::Direct && outcome.definition.is_some() {
            target.types.push(descriptor.clone());
        }

        for supplementary in &outcome.supplementary {
            if let SupplementaryObject::LookupTable { name, key_type, values } = supplementary {
                self.add_lookup_table(name, key_type, values, target);
            }
        }
    }

    fn add_lookup_table(&mut self, name: &str, key_type: &str, values: &[String], target: &mut Schema) {
        let container = CONTAINER_KINDS
            .iter()
            .copied()
            .find(|kind| kind.is_field_container() && self.target_features.supports(*kind));
        let Some(container) = container else {
            self.warnings.push(ConversionWarning::new(
                WarningKind::CustomType,
                Severity::Warning,
                format!("{} has no container for lookup table {}", self.matrix.target_db, name),
            ));
            return;
        };
        let mut table = SchemaObject::new(name, vec![Field::new("value", key_type).not_null()]);
        table.properties.insert("values".to_string(), values.join(","));
        if let Some(objects) = target.objects_mut(container) {
            objects.push(table);
        }
    }

    /// Matrix-derived statistics without producing a schema.
    fn analyze(&mut self, source: &Schema) {
        for kind in CONTAINER_KINDS {
            let objects = source.objects(kind);
            if objects.is_empty() {
                continue;
            }
            let mut stats = ObjectTypeStats::new(objects.len());
            if self.preferences.excluded_object_types.contains(&kind) {
                stats.skipped = objects.len();
            } else {
                let rule = self.rule(kind);
                for object in objects {
                    if self.preferences.is_excluded(&object.name) {
                        stats.skipped += 1;
                    } else if rule.action == RuleAction::Drop {
                        stats.dropped += 1;
                        self.unsupported.push(UnsupportedFeature {
                            feature_type: kind.to_string(),
                            object_type: kind,
                            object_name: Some(object.name.clone()),
                            description: rule.notes.join("; "),
                            alternatives: Vec::new(),
                        });
                    } else {
                        stats.converted += 1;
                    }
                }
            }
            self.stats.insert(kind, stats);
        }

        if source.types.is_empty() {
            return;
        }
        let target_types = self.types.target();
        let mut stats = ObjectTypeStats::new(source.types.len());
        for descriptor in &source.types {
            if self.preferences.excluded_object_types.contains(&ObjectType::CustomType)
                || self.preferences.is_excluded(&descriptor.name)
            {
                stats.skipped += 1;
                continue;
            }
            let (primary, _) = select_strategies(descriptor, target_types);
            stats.converted += 1;
            *self.strategy_counts.entry(primary).or_insert(0) += 1;
        }
        self.stats.insert(ObjectType::CustomType, stats);
    }
}

/// Rewrite one field with a custom type outcome.
fn apply_custom_outcome(field: &Field, outcome: &CustomTypeConversionOutcome, out: &mut SchemaObject) {
    match &outcome.converted_type {
        Some(data_type) => out.fields.push(Field {
            name: field.name.clone(),
            data_type: data_type.clone(),
            nullable: field.nullable,
        }),
        None => {
            for supplementary in &outcome.supplementary {
                if let SupplementaryObject::Column { suffix, data_type } = supplementary {
                    out.fields.push(Field {
                        name: derived_name(&field.name, suffix),
                        data_type: data_type.clone(),
                        nullable: field.nullable,
                    });
                }
            }
        }
    }

    for supplementary in &outcome.supplementary {
        match supplementary {
            SupplementaryObject::Constraint { expression, .. } => {
                out.constraints
                    .push(expression.replace(COLUMN_PLACEHOLDER, &field.name));
            }
            SupplementaryObject::LookupTable { name, .. } => {
                out.properties
                    .insert(format!("{}.references", field.name), name.clone());
            }
            SupplementaryObject::Column { .. } => {}
        }
    }
}
