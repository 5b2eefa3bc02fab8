//! # Configuration Management for SoftHaus
//!
//! This crate provides the configuration structures for the soft-delete layer:
//! the per-schema options (`indexFields`, `overrideMethods`, `use$neOperator`,
//! `validateBeforeDelete`) and per-collection overrides.
//!
//! Parsing is permissive: unrecognized selections resolve to "none" and
//! non-boolean toggles keep their defaults instead of failing.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{Selection, SoftDeleteConfig};
//!
//! let options = SoftDeleteConfig::new()
//!     .with_index_fields(Selection::All)
//!     .with_override_methods(Selection::list(["find", "findOne", "count"]))
//!     .with_validate_before_delete(false);
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [soft_delete]
//! indexFields = "all"
//! overrideMethods = true
//! "use$neOperator" = false
//! validateBeforeDelete = true
//!
//! [collections.audit_logs]
//! override_methods = ["find", "aggregate"]
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from softhaus.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./softhaus.toml";
const CONFIG_PATH_ENV: &str = "SOFTHAUS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A permissive "which of these" option.
///
/// Accepts a boolean, the keyword `"all"`, or an explicit list of names.
/// Any other shape deserializes to [`Selection::Unrecognized`] and selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Flag(bool),
    List(Vec<String>),
    Keyword(String),
    #[default]
    #[serde(skip)]
    None,
    #[serde(skip)]
    All,
    Unrecognized(IgnoredAnyValue),
}

/// Marker for values that were present but had an unusable shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IgnoredAnyValue;

impl<'de> Deserialize<'de> for IgnoredAnyValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        IgnoredAny::deserialize(deserializer)?;
        Ok(IgnoredAnyValue)
    }
}

impl Selection {
    /// Build an explicit list selection
    pub fn list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::List(names.into_iter().map(Into::into).collect())
    }

    /// Whether every candidate is selected (`true` or `"all"`)
    pub fn selects_all(&self) -> bool {
        match self {
            Selection::All | Selection::Flag(true) => true,
            Selection::Keyword(keyword) => keyword == "all",
            _ => false,
        }
    }

    /// Whether `name` is selected. Unknown names in a list are simply never asked about.
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Selection::List(names) => names.iter().any(|n| n == name),
            other => other.selects_all(),
        }
    }

    /// Filter `candidates` down to the selected ones, keeping the candidates' order
    pub fn resolve<'a>(&self, candidates: &[&'a str]) -> Vec<&'a str> {
        candidates
            .iter()
            .copied()
            .filter(|candidate| self.contains(candidate))
            .collect()
    }

    /// Whether this selection picks nothing at all
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::List(names) => names.is_empty(),
            other => !other.selects_all(),
        }
    }
}

impl Serialize for Selection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selection::Flag(flag) => serializer.serialize_bool(*flag),
            Selection::List(names) => names.serialize(serializer),
            Selection::Keyword(keyword) => serializer.serialize_str(keyword),
            Selection::All => serializer.serialize_str("all"),
            Selection::None | Selection::Unrecognized(_) => serializer.serialize_bool(false),
        }
    }
}

/// A boolean toggle that ignores non-boolean values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(untagged)]
pub enum Toggle {
    Set(bool),
    #[default]
    #[serde(skip)]
    Unset,
    Ignored(IgnoredAnyValue),
}

impl Toggle {
    /// The toggle's value, or `default` when unset or not a boolean
    pub fn or(self, default: bool) -> bool {
        match self {
            Toggle::Set(value) => value,
            _ => default,
        }
    }
}

impl Serialize for Toggle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Toggle::Set(value) => serializer.serialize_bool(*value),
            _ => serializer.serialize_none(),
        }
    }
}

/// Soft-delete options for one schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoftDeleteConfig {
    /// Which marker fields (`deleted`, `deleted_at`) get a secondary index
    #[serde(default, alias = "indexFields")]
    pub index_fields: Selection,
    /// Which base operations get filtered variants
    #[serde(default, alias = "overrideMethods")]
    pub override_methods: Selection,
    /// Operator form (`{"$eq": null}`) vs shorthand form for the read predicate
    #[serde(default, alias = "use$neOperator")]
    pub use_ne_operator: Toggle,
    /// When false, instance deletes skip schema validation
    #[serde(default, alias = "validateBeforeDelete")]
    pub validate_before_delete: Toggle,
}

impl SoftDeleteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index_fields(mut self, selection: Selection) -> Self {
        self.index_fields = selection;
        self
    }

    pub fn with_override_methods(mut self, selection: Selection) -> Self {
        self.override_methods = selection;
        self
    }

    pub fn with_use_ne_operator(mut self, value: bool) -> Self {
        self.use_ne_operator = Toggle::Set(value);
        self
    }

    pub fn with_validate_before_delete(mut self, value: bool) -> Self {
        self.validate_before_delete = Toggle::Set(value);
        self
    }

    /// Effective `use$neOperator` (defaults to true)
    pub fn use_ne_operator(&self) -> bool {
        self.use_ne_operator.or(true)
    }

    /// Effective `validateBeforeDelete` (defaults to true)
    pub fn validate_before_delete(&self) -> bool {
        self.validate_before_delete.or(true)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Options applied to every collection without its own block
    #[serde(default)]
    pub soft_delete: SoftDeleteConfig,
    /// Per-collection replacements for `soft_delete`
    #[serde(default)]
    pub collections: HashMap<String, SoftDeleteConfig>,
}

impl AppConfig {
    /// Load configuration from the TOML file named by `SOFTHAUS_CONFIG` or the default path
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine; the variable may come from the real environment
        dotenvy::dotenv().ok();

        let config = if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified in .env file as {} or in {} file",
                CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH
            )))
        }?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Effective options for a collection
    pub fn for_collection(&self, collection: &str) -> &SoftDeleteConfig {
        self.collections.get(collection).unwrap_or(&self.soft_delete)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.collections.keys().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "Collection names cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_keywords() {
        assert!(Selection::Keyword("all".to_string()).selects_all());
        assert!(Selection::Flag(true).selects_all());
        assert!(!Selection::Flag(false).selects_all());
        assert!(!Selection::Keyword("everything".to_string()).selects_all());
        assert!(Selection::None.is_empty());
    }

    #[test]
    fn test_selection_resolve_ignores_unknown_names() {
        let selection = Selection::list(["find", "bogus", "count"]);
        let resolved = selection.resolve(&["count", "find", "findOne"]);
        assert_eq!(resolved, vec!["count", "find"]);
    }

    #[test]
    fn test_defaults() {
        let config = SoftDeleteConfig::new();
        assert!(config.use_ne_operator());
        assert!(config.validate_before_delete());
        assert!(config.index_fields.is_empty());
        assert!(config.override_methods.is_empty());
    }

    #[test]
    fn test_toml_camel_case_aliases() {
        let config = AppConfig::from_toml_str(
            r#"
            [soft_delete]
            indexFields = ["deleted_at"]
            overrideMethods = "all"
            "use$neOperator" = false
            validateBeforeDelete = false
            "#,
        )
        .unwrap();

        let options = &config.soft_delete;
        assert!(options.index_fields.contains("deleted_at"));
        assert!(!options.index_fields.contains("deleted"));
        assert!(options.override_methods.selects_all());
        assert!(!options.use_ne_operator());
        assert!(!options.validate_before_delete());
    }

    #[test]
    fn test_malformed_values_are_ignored() {
        let config = AppConfig::from_toml_str(
            r#"
            [soft_delete]
            index_fields = 42
            override_methods = { nested = true }
            use_ne_operator = "yes"
            "#,
        )
        .unwrap();

        let options = &config.soft_delete;
        assert!(options.index_fields.is_empty());
        assert!(options.override_methods.is_empty());
        assert!(options.use_ne_operator());
    }

    #[test]
    fn test_collection_override() {
        let config = AppConfig::from_toml_str(
            r#"
            [soft_delete]
            override_methods = true

            [collections.audit]
            override_methods = ["find"]
            "#,
        )
        .unwrap();

        assert!(config.for_collection("users").override_methods.selects_all());
        let audit = config.for_collection("audit");
        assert!(audit.override_methods.contains("find"));
        assert!(!audit.override_methods.contains("count"));
    }

    #[test]
    fn test_from_file() {
        let path =
            std::env::temp_dir().join(format!("softhaus-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[soft_delete]\nindexFields = true\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert!(config.soft_delete.index_fields.selects_all());

        std::fs::remove_file(&path).ok();
    }
}
