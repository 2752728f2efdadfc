//! Query-name completion
//!
//! Parsing records where the input ran out (the *frontier*): a grammar stage
//! plus the unparsed residue of a half-typed token. Completion lists what
//! may follow at that stage, keeps the candidates that extend the residue
//! and appends them to the source.

use crate::config::MissingDirection;
use crate::lexer::{
    ALL_IGNORE_CASE, BY, CONJUNCTIONS, DIRECTIONS, DISTINCT, IGNORE_CASE, LIMITS,
    NUMBER_PLACEHOLDER, OR, ORDER_BY,
};
use crate::tree::PartTree;
use std::collections::BTreeSet;
use tracing::trace;

/// Grammar position at which input ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Stage {
    /// Nothing matched yet
    Prefix,
    /// After the prefix, before `By` or a subject property
    Subject {
        distinct: bool,
        limited: bool,
        counted: bool,
    },
    /// After a subject property
    SubjectProperty,
    /// After `By` or a conjunction
    PredicateStart { after_or: bool },
    /// Inside a predicate part with a resolved property
    Predicate,
    /// After `AllIgnoreCase`
    AllIgnoreCase,
    /// After `OrderBy`
    OrderStart,
    /// After an order property
    OrderProperty,
    /// After an order direction
    OrderDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frontier {
    pub stage: Stage,
    pub residue: String,
}

impl Frontier {
    pub fn new(stage: Stage, residue: &str) -> Self {
        Self {
            stage,
            residue: residue.to_string(),
        }
    }
}

pub(crate) fn options(tree: &PartTree) -> BTreeSet<String> {
    let frontier = tree.frontier();
    let source = tree.source();
    let mut options = BTreeSet::new();

    let Some(stem) = source.strip_suffix(frontier.residue.as_str()) else {
        return options;
    };

    for candidate in candidates(tree, &frontier.stage) {
        if candidate.starts_with(&frontier.residue) {
            options.insert(format!("{}{}", stem, candidate));
        }
    }
    // A shorter prefix may have matched where a longer one is still being typed
    for prefix in &tree.grammar().config().prefixes {
        if prefix.len() > source.len() && prefix.starts_with(source) {
            options.insert(prefix.clone());
        }
    }
    if tree.is_valid() {
        options.insert(source.to_string());
    }

    trace!(
        "Completed '{}' at {:?} with {} options",
        source,
        frontier.stage,
        options.len()
    );
    options
}

fn candidates(tree: &PartTree, stage: &Stage) -> Vec<String> {
    let properties = || tree.properties().identifiers();

    match stage {
        Stage::Prefix => tree.grammar().config().prefixes.clone(),
        Stage::Subject {
            distinct,
            limited,
            counted,
        } => {
            let mut result = Vec::new();
            if !distinct && !limited {
                result.push(DISTINCT.to_string());
            }
            if !limited {
                result.extend(keywords(LIMITS));
            }
            if *limited && !counted {
                result.push(NUMBER_PLACEHOLDER.to_string());
            }
            result.push(BY.to_string());
            result.extend(properties());
            result
        }
        Stage::SubjectProperty => keywords(&[BY]),
        Stage::PredicateStart { after_or } => {
            let mut result = properties();
            if *after_or {
                // `Or` followed by `derBy` reads as `OrderBy`
                result.push(ORDER_BY[OR.len()..].to_string());
            }
            result
        }
        Stage::Predicate => {
            let mut result = Vec::new();
            if let Some(part) = tree.predicate().last_part() {
                if part.has_operator() {
                    result.extend(keywords(&part.operator_extensions()));
                } else {
                    result.extend(keywords(&part.supported_operator_keywords()));
                }
                if part.ignore_case_token().is_empty() {
                    result.extend(keywords(IGNORE_CASE));
                }
            }
            result.extend(keywords(CONJUNCTIONS));
            result.extend(keywords(ALL_IGNORE_CASE));
            result.push(ORDER_BY.to_string());
            result
        }
        Stage::AllIgnoreCase => keywords(&[ORDER_BY]),
        Stage::OrderStart | Stage::OrderDirection => properties(),
        Stage::OrderProperty => {
            let mut result = keywords(DIRECTIONS);
            if tree.grammar().config().missing_direction == MissingDirection::Ascending {
                result.extend(properties());
            }
            result
        }
    }
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
