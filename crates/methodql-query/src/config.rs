//! Grammar configuration options

use methodql_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// What to do with an `OrderBy` property that has no `Asc`/`Desc`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MissingDirection {
    /// The tree is invalid and completion only offers `Asc`/`Desc`
    #[default]
    Reject,
    /// The item sorts ascending and the tree stays valid
    Ascending,
}

/// Options for configuring the query grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Keywords a query name may start with
    pub prefixes: Vec<String>,

    /// Policy for order items without a direction
    pub missing_direction: MissingDirection,
}

impl GrammarConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration that sorts undirected order items ascending
    pub fn lenient() -> Self {
        Self {
            missing_direction: MissingDirection::Ascending,
            ..Default::default()
        }
    }

    /// Load a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GrammarConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the accepted prefixes
    pub fn prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Accept one more prefix
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Set the missing-direction policy
    pub fn missing_direction(mut self, policy: MissingDirection) -> Self {
        self.missing_direction = policy;
        self
    }

    /// Check that every prefix can start a query name
    pub fn validate(&self) -> Result<()> {
        if self.prefixes.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one query prefix is required".to_string(),
            ));
        }
        for (i, prefix) in self.prefixes.iter().enumerate() {
            let starts_lower = prefix.chars().next().is_some_and(|c| c.is_ascii_lowercase());
            if !starts_lower || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(Error::InvalidArgument(format!(
                    "query prefix '{}' must be a lowercase-initial word",
                    prefix
                )));
            }
            if self.prefixes[..i].contains(prefix) {
                return Err(Error::InvalidArgument(format!(
                    "query prefix '{}' is listed twice",
                    prefix
                )));
            }
        }
        Ok(())
    }
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            prefixes: vec!["find".to_string(), "read".to_string(), "query".to_string()],
            missing_direction: MissingDirection::Reject,
        }
    }
}
