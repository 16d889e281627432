//! Error types for the conversion engine.

use thiserror::Error;

/// Main error type for conversion operations.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Configuration error (invalid YAML, out-of-range constants, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The conversion request carried no source schema.
    #[error("Conversion request has no source schema")]
    MissingSchema,

    /// The database identifier is not registered.
    #[error("Unknown database: '{0}'")]
    UnknownDatabase(String),

    /// Source and target database are the same.
    #[error("Source and target database are both '{0}' - nothing to convert")]
    SameDatabase(String),

    /// A database lacks a feature-support or type profile.
    #[error("Conversion matrix unavailable for {database}: {reason}")]
    MatrixUnavailable { database: String, reason: String },

    /// A native type name is not known to the source profile.
    #[error("Unknown type '{type_name}' for database {database}")]
    UnknownType { database: String, type_name: String },

    /// The canonical type has no native counterpart in the target.
    #[error("No equivalent of canonical type {canonical} in database {database}")]
    NoEquivalent { database: String, canonical: String },

    /// A custom type descriptor failed ingestion validation.
    #[error("Invalid custom type '{name}': {reason}")]
    InvalidCustomType { name: String, reason: String },

    /// A single custom-type strategy could not be applied.
    #[error("Strategy {strategy} failed for type '{type_name}': {message}")]
    StrategyFailed {
        type_name: String,
        strategy: String,
        message: String,
    },

    /// Both the primary and the fallback strategy failed.
    #[error("Custom type '{type_name}' could not be converted: {message}")]
    CustomTypeConversion { type_name: String, message: String },

    /// No direct or single-hop conversion path exists.
    #[error("No conversion path found from {source_db} to {target_db}")]
    NoPathFound { source_db: String, target_db: String },

    /// The paradigms involved make the conversion impossible.
    #[error("Conversion from {source_db} {source_paradigms} to {target_db} {target_paradigms} is impossible{suggestion}")]
    ImpossibleConversion {
        source_db: String,
        target_db: String,
        source_paradigms: String,
        target_paradigms: String,
        suggestion: String,
    },

    /// Conversion was cancelled by the host.
    #[error("Conversion cancelled")]
    Cancelled,

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Create an UnknownType error.
    pub fn unknown_type(database: impl Into<String>, type_name: impl Into<String>) -> Self {
        ConvertError::UnknownType {
            database: database.into(),
            type_name: type_name.into(),
        }
    }

    /// Create a NoEquivalent error.
    pub fn no_equivalent(database: impl Into<String>, canonical: impl ToString) -> Self {
        ConvertError::NoEquivalent {
            database: database.into(),
            canonical: canonical.to_string(),
        }
    }

    /// Create a MatrixUnavailable error.
    pub fn matrix_unavailable(database: impl Into<String>, reason: impl Into<String>) -> Self {
        ConvertError::MatrixUnavailable {
            database: database.into(),
            reason: reason.into(),
        }
    }

    /// Create a StrategyFailed error.
    pub fn strategy_failed(
        type_name: impl Into<String>,
        strategy: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        ConvertError::StrategyFailed {
            type_name: type_name.into(),
            strategy: strategy.to_string(),
            message: message.into(),
        }
    }

    /// Create an InvalidCustomType error.
    pub fn invalid_custom_type(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConvertError::InvalidCustomType {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error aborts a whole request rather than a single item.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ConvertError::UnknownType { .. }
                | ConvertError::NoEquivalent { .. }
                | ConvertError::StrategyFailed { .. }
                | ConvertError::CustomTypeConversion { .. }
        )
    }

    /// Process exit code for this error family.
    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::Config(_) | ConvertError::Yaml(_) | ConvertError::Json(_) => 2,
            ConvertError::MissingSchema
            | ConvertError::UnknownDatabase(_)
            | ConvertError::SameDatabase(_)
            | ConvertError::InvalidCustomType { .. } => 3,
            ConvertError::MatrixUnavailable { .. }
            | ConvertError::NoPathFound { .. }
            | ConvertError::ImpossibleConversion { .. } => 4,
            ConvertError::UnknownType { .. }
            | ConvertError::NoEquivalent { .. }
            | ConvertError::StrategyFailed { .. }
            | ConvertError::CustomTypeConversion { .. } => 5,
            ConvertError::Cancelled => 130,
            ConvertError::Io(_) => 1,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_item_errors_are_not_fatal() {
        assert!(!ConvertError::unknown_type("postgresql", "foo").is_fatal());
        assert!(!ConvertError::no_equivalent("redis", "geometry").is_fatal());
        assert!(ConvertError::MissingSchema.is_fatal());
        assert!(ConvertError::SameDatabase("mysql".into()).is_fatal());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ConvertError::Config("x".into()).exit_code(), 2);
        assert_eq!(ConvertError::UnknownDatabase("x".into()).exit_code(), 3);
        assert_eq!(ConvertError::Cancelled.exit_code(), 130);
    }

    #[test]
    fn test_format_detailed_includes_message() {
        let err = ConvertError::unknown_type("mongodb", "widget");
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: Unknown type 'widget'"));
    }
}
