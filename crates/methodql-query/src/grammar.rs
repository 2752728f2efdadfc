//! Configured entry point for parsing and completion

use crate::config::GrammarConfig;
use crate::tree::PartTree;
use methodql_core::{EntityProperties, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// A validated grammar configuration
///
/// Cheap to clone; every tree it parses keeps a handle to it so that
/// completion can be computed later.
#[derive(Debug, Clone, Default)]
pub struct QueryGrammar {
    config: Arc<GrammarConfig>,
}

impl QueryGrammar {
    /// Create a grammar, rejecting unusable configurations
    pub fn new(config: GrammarConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            "Created query grammar with prefixes {:?} and {:?} missing directions",
            config.prefixes, config.missing_direction
        );
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &GrammarConfig {
        &self.config
    }

    /// Parse a query name against an entity's properties
    pub fn parse(&self, source: &str, properties: &EntityProperties) -> Result<PartTree> {
        let tree = PartTree::parse(source, properties, self)?;
        debug!(
            "Parsed query name '{}' (valid: {}, parts: {})",
            source,
            tree.is_valid(),
            tree.parts().count()
        );
        Ok(tree)
    }

    /// All valid continuations of `source`
    pub fn options(&self, source: &str, properties: &EntityProperties) -> Result<BTreeSet<String>> {
        Ok(self.parse(source, properties)?.options())
    }

    /// Returns true if `source` parses into a valid tree
    pub fn is_valid(&self, source: &str, properties: &EntityProperties) -> bool {
        self.parse(source, properties)
            .map(|tree| tree.is_valid())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingDirection;
    use methodql_core::{Error, PropertyDescriptor, TypeCategory};

    fn properties() -> EntityProperties {
        EntityProperties::new(vec![
            PropertyDescriptor::new("name", TypeCategory::String),
            PropertyDescriptor::new("age", TypeCategory::PrimitiveNumber),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let err = QueryGrammar::new(GrammarConfig::new().prefixes(["Find"])).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_custom_prefixes() {
        let grammar = QueryGrammar::new(GrammarConfig::new().prefixes(["get", "count"])).unwrap();
        let props = properties();
        assert!(grammar.is_valid("getByName", &props));
        assert!(grammar.is_valid("countByAgeLessThan", &props));
        assert!(!grammar.is_valid("findByName", &props));
        assert!(!grammar.is_valid("findBy Name", &props));

        let options = grammar.options("", &props).unwrap();
        assert_eq!(
            options.into_iter().collect::<Vec<_>>(),
            vec!["count".to_string(), "get".to_string()]
        );
    }

    #[test]
    fn test_longest_prefix_wins() {
        let grammar =
            QueryGrammar::new(GrammarConfig::new().prefixes(["find", "findAll"])).unwrap();
        let tree = grammar.parse("findAllByName", &properties()).unwrap();
        assert_eq!(tree.prefix(), Some("findAll"));
        assert!(tree.is_valid());
    }

    #[test]
    fn test_options_extend_to_longer_prefix() {
        let grammar =
            QueryGrammar::new(GrammarConfig::new().prefixes(["find", "findAll"])).unwrap();
        let props = properties();

        let options = grammar.options("find", &props).unwrap();
        assert!(options.contains("findAll"));
        assert!(options.contains("findBy"));
        assert!(options.contains("findName"));

        let options = grammar.options("findA", &props).unwrap();
        assert_eq!(
            options.into_iter().collect::<Vec<_>>(),
            vec!["findAge".to_string(), "findAll".to_string()]
        );

        let options = grammar.options("findAll", &props).unwrap();
        assert!(options.contains("findAllBy"));
        assert!(!options.contains("findAll"));
    }

    #[test]
    fn test_trees_share_grammar() {
        let grammar = QueryGrammar::new(
            GrammarConfig::new().missing_direction(MissingDirection::Ascending),
        )
        .unwrap();
        let tree = grammar.parse("findByNameOrderByAge", &properties()).unwrap();
        assert!(tree.is_valid());
        assert_eq!(
            tree.grammar().config().missing_direction,
            MissingDirection::Ascending
        );
    }
}
