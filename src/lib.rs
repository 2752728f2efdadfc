//! methodql - Query-name grammar for derived finder methods
//!
//! This is the main library crate that re-exports all methodql components.

pub use methodql_core as core;
pub use methodql_query as query;

// Re-export commonly used types
pub use methodql_core::{EntityProperties, Error, PropertyDescriptor, Result, TypeCategory};

pub use methodql_query::{
    Defect, Direction, GrammarConfig, IgnoreCaseMode, Limit, MissingDirection, OperatorKind,
    Part, PartTree, QueryGrammar, options, parse,
};
