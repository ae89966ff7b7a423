//! Connection and table-prefix configuration.

use crate::error::{DbError, DbResult};
use serde::Deserialize;

/// Default placeholder substituted by the configured table prefix.
pub const DEFAULT_PREFIX_PLACEHOLDER: &str = "#__";

/// Environment variable holding the database path (required by [`DbConfig::from_env`]).
pub const ENV_DATABASE: &str = "SQLFLUENT_DATABASE";
/// Environment variable holding the table prefix.
pub const ENV_TABLE_PREFIX: &str = "SQLFLUENT_TABLE_PREFIX";
/// Environment variable overriding the prefix placeholder.
pub const ENV_PREFIX_PLACEHOLDER: &str = "SQLFLUENT_PREFIX_PLACEHOLDER";

/// Table-name prefix substitution.
///
/// Every occurrence of `placeholder` is replaced by `prefix`:
///
/// ```
/// use sqlfluent::TablePrefix;
///
/// let prefix = TablePrefix::new("app_");
/// assert_eq!(prefix.apply("#__users"), "app_users");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePrefix {
    placeholder: String,
    prefix: String,
}

impl Default for TablePrefix {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PREFIX_PLACEHOLDER.to_string(),
            prefix: String::new(),
        }
    }
}

impl TablePrefix {
    /// Create a prefix using the default `#__` placeholder.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Override the placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Replace every placeholder occurrence in `text` with the prefix.
    pub fn apply(&self, text: &str) -> String {
        if self.placeholder.is_empty() {
            return text.to_string();
        }
        text.replace(&self.placeholder, &self.prefix)
    }
}

fn default_placeholder() -> String {
    DEFAULT_PREFIX_PLACEHOLDER.to_string()
}

/// Database configuration.
///
/// `database` is a SQLite file path or `:memory:`. The struct derives
/// `Deserialize` so it can be embedded in an application's own config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DbConfig {
    /// Database file path, or `:memory:`.
    pub database: String,
    /// Prefix substituted for the placeholder in table names.
    #[serde(default)]
    pub table_prefix: String,
    /// Placeholder replaced by `table_prefix`.
    #[serde(default = "default_placeholder")]
    pub prefix_placeholder: String,
}

impl DbConfig {
    /// Create a configuration for the given database path.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table_prefix: String::new(),
            prefix_placeholder: default_placeholder(),
        }
    }

    /// Configuration for a private in-memory database.
    pub fn memory() -> Self {
        Self::new(":memory:")
    }

    /// Set the table prefix.
    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Set the prefix placeholder.
    pub fn prefix_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.prefix_placeholder = placeholder.into();
        self
    }

    /// Read the configuration from `SQLFLUENT_*` environment variables.
    ///
    /// `SQLFLUENT_DATABASE` is required; the prefix variables are optional.
    pub fn from_env() -> DbResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup (env, map, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let database = lookup(ENV_DATABASE).ok_or_else(|| {
            DbError::configuration(format!("database information is missing ({ENV_DATABASE})"))
        })?;
        let mut config = Self::new(database);
        if let Some(prefix) = lookup(ENV_TABLE_PREFIX) {
            config.table_prefix = prefix;
        }
        if let Some(placeholder) = lookup(ENV_PREFIX_PLACEHOLDER) {
            config.prefix_placeholder = placeholder;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can be used to open a connection.
    pub fn validate(&self) -> DbResult<()> {
        if self.database.trim().is_empty() {
            return Err(DbError::configuration("database information is missing"));
        }
        if !self.table_prefix.is_empty() && self.prefix_placeholder.is_empty() {
            return Err(DbError::configuration(
                "a table prefix requires a non-empty prefix placeholder",
            ));
        }
        Ok(())
    }

    /// The [`TablePrefix`] described by this configuration.
    pub fn prefix(&self) -> TablePrefix {
        TablePrefix::new(self.table_prefix.clone()).with_placeholder(self.prefix_placeholder.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn prefix_replaces_every_placeholder() {
        let prefix = TablePrefix::new("t_");
        assert_eq!(
            prefix.apply("#__users u JOIN #__roles r"),
            "t_users u JOIN t_roles r"
        );
    }

    #[test]
    fn default_prefix_strips_placeholder() {
        assert_eq!(TablePrefix::default().apply("#__users"), "users");
    }

    #[test]
    fn custom_placeholder() {
        let prefix = TablePrefix::new("x_").with_placeholder("{p}");
        assert_eq!(prefix.apply("{p}items"), "x_items");
        assert_eq!(prefix.apply("#__items"), "#__items");
    }

    #[test]
    fn from_lookup_requires_database() {
        let env: HashMap<&str, &str> = HashMap::from([(ENV_TABLE_PREFIX, "app_")]);
        let err = DbConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn from_lookup_reads_optional_prefix() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_DATABASE, ":memory:"), (ENV_TABLE_PREFIX, "app_")]);
        let config = DbConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.database, ":memory:");
        assert_eq!(config.prefix().apply("#__users"), "app_users");
    }

    #[test]
    fn validate_rejects_blank_database() {
        assert!(DbConfig::new("  ").validate().unwrap_err().is_configuration());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: DbConfig = serde_json::from_str(r#"{"database":"app.db"}"#).unwrap();
        assert_eq!(config, DbConfig::new("app.db"));
    }
}
