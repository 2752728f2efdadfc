//! methodql Query-Name Grammar
//!
//! Parses identifier-style query names such as
//! `findDistinctTop10ByTextIgnoreCaseAndNumberOrderByTextAsc` into a
//! [`PartTree`] and lists the valid continuations of a partially typed one.
//!
//! # Overview
//!
//! The grammar engine implements:
//! - Camel-hump lexing with keyword matching on hump boundaries
//! - Longest-match property resolution
//! - The operator catalog per property category
//! - Predicate trees of `And`/`Or` joined parts
//! - `AllIgnoreCase` and `OrderBy` clauses
//! - Predictive completion from the point where the input ends

mod completion;
pub mod config;
pub mod grammar;
pub mod lexer;
pub mod operator;
pub mod order;
pub mod part;
pub mod predicate;
pub mod resolver;
pub mod tree;

pub use config::{GrammarConfig, MissingDirection};
pub use grammar::QueryGrammar;
pub use lexer::{Hump, tokenize};
pub use operator::OperatorKind;
pub use order::{Direction, OrderClause, OrderItem};
pub use part::{IgnoreCaseMode, Part};
pub use predicate::{Conjunction, OrPart, PredicateTree};
pub use resolver::{PropertyMatch, resolve};
pub use tree::{Defect, Limit, PartTree};

use methodql_core::{EntityProperties, Result};
use std::collections::BTreeSet;

/// Parse with the default grammar
pub fn parse(source: &str, properties: &EntityProperties) -> Result<PartTree> {
    QueryGrammar::default().parse(source, properties)
}

/// Complete with the default grammar
pub fn options(source: &str, properties: &EntityProperties) -> Result<BTreeSet<String>> {
    QueryGrammar::default().options(source, properties)
}
