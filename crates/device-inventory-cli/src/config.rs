//! CLI configuration.

/// Default connection target.
pub const DEFAULT_STORE_URL: &str = "sqlite:inventory.db";

/// Default log filter when neither `RUST_LOG` nor `INVENTORY_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Connection target of the device store
    pub store_url: String,

    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `INVENTORY_STORE_URL`: connection target, e.g. `sqlite:///var/lib/inventory.db`
    /// - `INVENTORY_LOG`: log filter fallback, e.g. `debug`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("INVENTORY_STORE_URL").filter(|u| !u.is_empty()) {
            config.store_url = url;
        }

        if let Some(filter) = lookup("INVENTORY_LOG").filter(|f| !f.is_empty()) {
            config.log_filter = filter;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_without_variables() {
        assert_eq!(CliConfig::from_lookup(|_| None), CliConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let vars = HashMap::from([
            ("INVENTORY_STORE_URL", "memory:".to_string()),
            ("INVENTORY_LOG", "debug".to_string()),
        ]);
        let config = CliConfig::from_lookup(|key| vars.get(key).cloned());

        assert_eq!(config.store_url, "memory:");
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn empty_variables_are_ignored() {
        let config = CliConfig::from_lookup(|_| Some(String::new()));
        assert_eq!(config, CliConfig::default());
    }
}
