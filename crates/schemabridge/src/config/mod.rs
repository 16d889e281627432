//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML (the form `init-config` writes).
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Compute a SHA256 hash of the configuration, stamped into reports so
    /// callers know which constants produced an estimate.
    pub fn hash(&self) -> String {
        let yaml = serde_yaml::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(yaml.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_yields_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.engine.max_custom_type_depth, 8);
        assert!(config.engine.fail_on_impossible);
        assert_eq!(config.estimator.success_rates.moderate, 0.85);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let yaml = r#"
estimator:
  success_rates:
    complex: 0.5
engine:
  default_mode: dry_run
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.estimator.success_rates.complex, 0.5);
        assert_eq!(config.estimator.success_rates.simple, 0.95);
        assert_eq!(config.engine.default_mode, ExecutionMode::DryRun);
        assert_eq!(config.estimator.moderate_hours_max_objects, 100);
    }

    #[test]
    fn test_invalid_yaml_values_rejected() {
        let yaml = "estimator:\n  compatibility_factors:\n    identical: 2.0\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_hash_is_stable_and_sensitive() {
        let a = Config::default();
        let mut b = Config::default();
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.hash().len(), 64);
        b.engine.max_custom_type_depth = 4;
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_yaml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, Config::default().to_yaml().unwrap()).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_execution_mode_parsing() {
        assert_eq!("analysis-only".parse::<ExecutionMode>().unwrap(), ExecutionMode::AnalysisOnly);
        assert_eq!("Dry-Run".parse::<ExecutionMode>().unwrap(), ExecutionMode::DryRun);
        assert!("turbo".parse::<ExecutionMode>().is_err());
    }
}
