//! Identifier and expression helpers shared by the resolvers.
//!
//! Converted schemas carry names and constraint expressions that a caller
//! will eventually splice into DDL for the target database. Everything the
//! engine derives (flattened column names, lookup tables, check
//! expressions) goes through these helpers so that the output never
//! contains an identifier or expression a target could misinterpret.

use crate::error::{ConvertError, Result};

/// Maximum identifier length (conservative limit across databases).
/// - PostgreSQL: 63 bytes
/// - SQL Server: 128 characters
/// - MongoDB field names: unbounded, but index names are capped
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier.
///
/// Rejects empty names, names containing null bytes and names longer than
/// [`MAX_IDENTIFIER_LENGTH`] bytes.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ConvertError::Config("Identifier cannot be empty".to_string()));
    }

    if name.contains('\0') {
        return Err(ConvertError::Config(format!(
            "Identifier contains null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ConvertError::Config(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Build a derived identifier `base_suffix`, e.g. a flattened column
/// (`address_street`) or a lookup table (`user_status_values`).
///
/// The base is truncated on a character boundary so the result stays
/// within [`MAX_IDENTIFIER_LENGTH`].
pub fn derived_name(base: &str, suffix: &str) -> String {
    let suffix_len = suffix.len() + 1;
    let budget = MAX_IDENTIFIER_LENGTH.saturating_sub(suffix_len);
    let mut end = base.len().min(budget);
    while !base.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}_{}", &base[..end], suffix)
}

/// Quote enum values as a comma-separated SQL literal list.
///
/// Single quotes inside values are doubled.
pub fn quote_values(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate a check-constraint expression before it is attached to a
/// converted schema.
///
/// Domain constraints come from the source schema and must be a single
/// boolean expression. Rejects statement separators, SQL comment markers
/// and `EXEC`/`EXECUTE` keywords.
pub fn validate_check_expression(expression: &str) -> Result<()> {
    if expression.trim().is_empty() {
        return Err(ConvertError::Config(
            "Check expression cannot be empty".to_string(),
        ));
    }

    if expression.contains(';') {
        return Err(ConvertError::Config(format!(
            "Check expression contains a statement separator: {:?}",
            expression
        )));
    }

    if expression.contains("--") || expression.contains("/*") || expression.contains("*/") {
        return Err(ConvertError::Config(format!(
            "Check expression contains comment markers: {:?}",
            expression
        )));
    }

    let lower = expression.to_lowercase();
    if lower.split_whitespace().any(|word| {
        word == "exec"
            || word == "execute"
            || word.starts_with("exec(")
            || word.starts_with("execute(")
    }) {
        return Err(ConvertError::Config(format!(
            "Check expression contains EXEC/EXECUTE keyword: {:?}",
            expression
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Identifier tests
    // =========================================================================

    #[test]
    fn test_validate_identifier_normal() {
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("my_table").is_ok());
        assert!(validate_identifier("column with spaces").is_ok());
        assert!(validate_identifier("日本語").is_ok());
    }

    #[test]
    fn test_validate_identifier_rejects_empty() {
        let result = validate_identifier("  ");
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_identifier_rejects_null_byte() {
        let result = validate_identifier("table\0name");
        assert!(result.unwrap_err().to_string().contains("null byte"));
    }

    #[test]
    fn test_validate_identifier_length_limit() {
        assert!(validate_identifier(&"a".repeat(MAX_IDENTIFIER_LENGTH)).is_ok());
        let result = validate_identifier(&"a".repeat(MAX_IDENTIFIER_LENGTH + 1));
        assert!(result.unwrap_err().to_string().contains("maximum length"));
    }

    // =========================================================================
    // Derived names
    // =========================================================================

    #[test]
    fn test_derived_name() {
        assert_eq!(derived_name("address", "street"), "address_street");
    }

    #[test]
    fn test_derived_name_truncates_base() {
        let base = "b".repeat(200);
        let name = derived_name(&base, "values");
        assert_eq!(name.len(), MAX_IDENTIFIER_LENGTH);
        assert!(name.ends_with("_values"));
        assert!(validate_identifier(&name).is_ok());
    }

    #[test]
    fn test_derived_name_respects_char_boundaries() {
        let base = "é".repeat(100);
        let name = derived_name(&base, "x");
        assert!(name.len() <= MAX_IDENTIFIER_LENGTH);
        assert!(name.ends_with("_x"));
    }

    #[test]
    fn test_quote_values_escapes_quotes() {
        let values = vec!["active".to_string(), "it's".to_string()];
        assert_eq!(quote_values(&values), "'active', 'it''s'");
    }

    // =========================================================================
    // Check expressions
    // =========================================================================

    #[test]
    fn test_check_expression_valid() {
        assert!(validate_check_expression("value > 0").is_ok());
        assert!(validate_check_expression("status IN ('a', 'b')").is_ok());
        assert!(validate_check_expression("executed_at IS NOT NULL").is_ok());
    }

    #[test]
    fn test_check_expression_rejects_injection_patterns() {
        assert!(validate_check_expression("1=1; DROP TABLE users").is_err());
        assert!(validate_check_expression("1=1 -- comment").is_err());
        assert!(validate_check_expression("1=1 /* x */").is_err());
        assert!(validate_check_expression("EXEC sp_who").is_err());
        assert!(validate_check_expression("").is_err());
    }
}
