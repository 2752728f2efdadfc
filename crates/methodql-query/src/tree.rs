//! Query-name tree
//!
//! `PartTree` is the parsed form of a whole query name:
//!
//! ```text
//! find Distinct Top10 Text By TextIgnoreCase And NumberIsNull AllIgnoreCase OrderBy TextAsc
//! ^    ^        ^     ^       ^                                ^             ^
//! prefix        limit subject predicate tree                   all-ignore    order clause
//! ```
//!
//! Parsing walks an immutable [`Cursor`] through one step per grammar
//! section. A step either hands the next cursor on or stops with the
//! completion frontier reached so far. Only structural breakage is an
//! error; anything else leaves a [`Defect`] and an invalid tree.

use crate::completion::{self, Frontier, Stage};
use crate::config::{GrammarConfig, MissingDirection};
use crate::grammar::QueryGrammar;
use crate::lexer::{
    ALL_IGNORE_CASE, BY, Cursor, DIRECTIONS, DISTINCT, LIMITS, ORDER_BY, PREDICATE_TERMINATORS,
    Segments,
};
use crate::order::{Direction, OrderClause, OrderItem};
use crate::part::{IgnoreCaseMode, Part};
use crate::predicate::{Conjunction, OrPart, PredicateTree};
use crate::resolver;
use methodql_core::{EntityProperties, Error, PropertyDescriptor, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::trace;

/// Result-count limit written after `Top` or `First`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Limit {
    /// Bare `Top`/`First`
    Implicit,
    Explicit(u32),
}

/// Why a parsed tree is not a valid query name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Defect {
    MissingPrefix,
    MissingBy,
    InvalidLimit(String),
    UnresolvedSubjectProperty(String),
    EmptyPredicate,
    UnresolvedProperty(String),
    UnparsedOperator { property: String, text: String },
    DanglingConjunction(Conjunction),
    DuplicateAllIgnoreCase,
    UnexpectedInput(String),
    EmptyOrderClause,
    UnresolvedOrderProperty(String),
    MissingDirection(String),
}

impl std::fmt::Display for Defect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Defect::MissingPrefix => write!(f, "query name does not start with a known prefix"),
            Defect::MissingBy => write!(f, "missing 'By'"),
            Defect::InvalidLimit(digits) => write!(f, "invalid result limit '{}'", digits),
            Defect::UnresolvedSubjectProperty(text) => {
                write!(f, "unknown subject property '{}'", text)
            }
            Defect::EmptyPredicate => write!(f, "no predicate after 'By'"),
            Defect::UnresolvedProperty(text) => write!(f, "unknown property in '{}'", text),
            Defect::UnparsedOperator { property, text } => {
                write!(f, "unrecognized operator '{}' after '{}'", text, property)
            }
            Defect::DanglingConjunction(conjunction) => {
                write!(f, "'{}' is not followed by a predicate", conjunction.keyword())
            }
            Defect::DuplicateAllIgnoreCase => write!(f, "'AllIgnoreCase' given more than once"),
            Defect::UnexpectedInput(text) => write!(f, "unexpected input '{}'", text),
            Defect::EmptyOrderClause => write!(f, "no property after 'OrderBy'"),
            Defect::UnresolvedOrderProperty(text) => {
                write!(f, "unknown order property in '{}'", text)
            }
            Defect::MissingDirection(property) => {
                write!(f, "order property '{}' has no direction", property)
            }
        }
    }
}

/// Parsed query name
#[derive(Debug, Clone, Serialize)]
pub struct PartTree {
    source: String,
    prefix: Option<String>,
    distinct: bool,
    limit: Option<Limit>,
    subject_property: Option<PropertyDescriptor>,
    predicate: PredicateTree,
    all_ignore_case: Option<&'static str>,
    order: OrderClause,
    defects: Vec<Defect>,
    #[serde(skip)]
    frontier: Frontier,
    #[serde(skip)]
    grammar: QueryGrammar,
    #[serde(skip)]
    properties: EntityProperties,
}

impl PartTree {
    /// Parse with the default grammar
    pub fn new(source: &str, properties: &EntityProperties) -> Result<Self> {
        QueryGrammar::default().parse(source, properties)
    }

    pub(crate) fn parse(
        source: &str,
        properties: &EntityProperties,
        grammar: &QueryGrammar,
    ) -> Result<Self> {
        if let Some(bad) = source
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '_')
        {
            return Err(Error::InvalidArgument(format!(
                "query name '{}' contains '{}'",
                source, bad
            )));
        }

        let segments = Segments::new(source);
        let ctx = Context {
            source,
            properties,
            config: grammar.config(),
        };
        let (parsed, frontier) = parse_query(Cursor::new(source, &segments), &ctx)?;
        trace!(
            "Parsed '{}' up to {:?} with {} defects",
            source,
            frontier.stage,
            parsed.defects.len()
        );

        Ok(Self {
            source: source.to_string(),
            prefix: parsed.prefix,
            distinct: parsed.subject.distinct,
            limit: parsed.subject.limit,
            subject_property: parsed.subject.property,
            predicate: parsed.predicate,
            all_ignore_case: parsed.all_ignore_case,
            order: parsed.order,
            defects: parsed.defects,
            frontier,
            grammar: grammar.clone(),
            properties: properties.clone(),
        })
    }

    /// Returns true if the whole source is a well-formed query name
    pub fn is_valid(&self) -> bool {
        self.defects.is_empty()
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn limit(&self) -> Option<Limit> {
        self.limit
    }

    /// The explicit result limit, if one was written
    pub fn max_results(&self) -> Option<u32> {
        match self.limit {
            Some(Limit::Explicit(n)) => Some(n),
            _ => None,
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn subject_property(&self) -> Option<&PropertyDescriptor> {
        self.subject_property.as_ref()
    }

    pub fn predicate(&self) -> &PredicateTree {
        &self.predicate
    }

    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.predicate.parts()
    }

    pub fn all_ignore_case(&self) -> bool {
        self.all_ignore_case.is_some()
    }

    /// The `AllIgnoreCase` spelling used, if any
    pub fn all_ignore_case_token(&self) -> Option<&'static str> {
        self.all_ignore_case
    }

    /// Case handling for `part`; `AllIgnoreCase` overrides per-part markers
    pub fn effective_ignore_case(&self, part: &Part) -> IgnoreCaseMode {
        if self.all_ignore_case() {
            IgnoreCaseMode::All
        } else {
            part.ignore_case()
        }
    }

    pub fn order(&self) -> &OrderClause {
        &self.order
    }

    /// Direction of an order item; an unwritten direction sorts ascending
    pub fn direction_of(&self, item: &OrderItem) -> Direction {
        item.direction().unwrap_or_default()
    }

    pub fn defects(&self) -> &[Defect] {
        &self.defects
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of arguments bound by all predicate parts together
    pub fn parameter_count(&self) -> usize {
        self.parts().map(Part::argument_count).sum()
    }

    pub fn properties(&self) -> &EntityProperties {
        &self.properties
    }

    pub fn grammar(&self) -> &QueryGrammar {
        &self.grammar
    }

    pub(crate) fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Every valid continuation of the source, the source itself included
    /// when it is already a valid query name
    pub fn options(&self) -> BTreeSet<String> {
        completion::options(self)
    }
}

/// Canonical form: `First` prints as `Top`, everything else as written.
/// Re-parsing the output of a valid tree yields an equal tree.
impl std::fmt::Display for PartTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(prefix) = &self.prefix else {
            return f.write_str(&self.source);
        };
        f.write_str(prefix)?;
        if self.distinct {
            f.write_str(DISTINCT)?;
        }
        match self.limit {
            Some(Limit::Implicit) => f.write_str(LIMITS[0])?,
            Some(Limit::Explicit(n)) => write!(f, "{}{}", LIMITS[0], n)?,
            None => {}
        }
        if let Some(subject) = &self.subject_property {
            f.write_str(&subject.identifier())?;
        }
        if self.defects.contains(&Defect::MissingBy) {
            return Ok(());
        }
        write!(f, "{}{}", BY, self.predicate)?;
        if let Some(token) = self.all_ignore_case {
            f.write_str(token)?;
        }
        if !self.order.is_empty() || self.defects.contains(&Defect::EmptyOrderClause) {
            write!(f, "{}", self.order)?;
        }
        Ok(())
    }
}

struct Context<'c> {
    source: &'c str,
    properties: &'c EntityProperties,
    config: &'c GrammarConfig,
}

/// Outcome of one parse step
enum Next<'a> {
    Continue(Cursor<'a>),
    Halt(Frontier),
}

#[derive(Debug, Default)]
struct Subject {
    distinct: bool,
    limit: Option<Limit>,
    property: Option<PropertyDescriptor>,
}

#[derive(Debug, Default)]
struct Parsed {
    prefix: Option<String>,
    subject: Subject,
    predicate: PredicateTree,
    all_ignore_case: Option<&'static str>,
    order: OrderClause,
    defects: Vec<Defect>,
}

fn parse_query(start: Cursor<'_>, ctx: &Context<'_>) -> Result<(Parsed, Frontier)> {
    let mut parsed = Parsed::default();

    let Some((prefix, cursor)) = start.eat_longest(&ctx.config.prefixes) else {
        parsed.defects.push(Defect::MissingPrefix);
        return Ok((parsed, Frontier::new(Stage::Prefix, start.rest())));
    };
    parsed.prefix = Some(prefix.to_string());

    let (subject, next) = parse_subject(cursor, ctx, &mut parsed.defects);
    parsed.subject = subject;
    let cursor = match next {
        Next::Continue(cursor) => cursor,
        Next::Halt(frontier) => return Ok((parsed, frontier)),
    };

    let (predicate, next) = parse_predicate(cursor, ctx, &mut parsed.defects)?;
    parsed.predicate = predicate;
    let cursor = match next {
        Next::Continue(cursor) => cursor,
        Next::Halt(frontier) => return Ok((parsed, frontier)),
    };

    let (token, next) = parse_all_ignore_case(cursor, &mut parsed.defects);
    parsed.all_ignore_case = token;
    let cursor = match next {
        Next::Continue(cursor) => cursor,
        Next::Halt(frontier) => return Ok((parsed, frontier)),
    };

    let Some(cursor) = cursor.eat(ORDER_BY) else {
        parsed
            .defects
            .push(Defect::UnexpectedInput(cursor.rest().to_string()));
        return Ok((parsed, Frontier::new(Stage::AllIgnoreCase, cursor.rest())));
    };

    let (order, frontier) = parse_order(cursor, ctx, &mut parsed.defects);
    parsed.order = order;
    Ok((parsed, frontier))
}

/// `[Distinct] [Top|First [digits]] [property] By`
fn parse_subject<'a>(
    cursor: Cursor<'a>,
    ctx: &Context<'_>,
    defects: &mut Vec<Defect>,
) -> (Subject, Next<'a>) {
    let (distinct, cursor) = match cursor.eat(DISTINCT) {
        Some(next) => (true, next),
        None => (false, cursor),
    };
    let (limit, counted, cursor) = match cursor.eat_longest(LIMITS) {
        Some((_, next)) => {
            let (digits, next) = next.take_digits();
            (Some(parse_limit(digits, defects)), !digits.is_empty(), next)
        }
        None => (None, false, cursor),
    };

    let mut subject = Subject {
        distinct,
        limit,
        property: None,
    };

    if let Some(next) = cursor.eat(BY) {
        return (subject, Next::Continue(next));
    }

    let found = resolver::resolve(cursor.rest(), ctx.properties);
    if let Some(found) = found {
        if let Some(next) = cursor.advance(found.len).eat(BY) {
            subject.property = Some(found.descriptor.clone());
            return (subject, Next::Continue(next));
        }
    }

    if let Some(at) = cursor.find_keyword(BY) {
        defects.push(Defect::UnresolvedSubjectProperty(
            cursor.slice_to(at).to_string(),
        ));
        return (subject, Next::Continue(at.advance(BY.len())));
    }

    defects.push(Defect::MissingBy);
    let frontier = match found {
        Some(found) => {
            subject.property = Some(found.descriptor.clone());
            Frontier::new(Stage::SubjectProperty, cursor.advance(found.len).rest())
        }
        None => Frontier::new(
            Stage::Subject {
                distinct,
                limited: limit.is_some(),
                counted,
            },
            cursor.rest(),
        ),
    };
    (subject, Next::Halt(frontier))
}

fn parse_limit(digits: &str, defects: &mut Vec<Defect>) -> Limit {
    if digits.is_empty() {
        return Limit::Implicit;
    }
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => Limit::Explicit(n),
        _ => {
            defects.push(Defect::InvalidLimit(digits.to_string()));
            Limit::Implicit
        }
    }
}

/// Parts joined by `And`/`Or`, up to `AllIgnoreCase`, `OrderBy` or the end
fn parse_predicate<'a>(
    start: Cursor<'a>,
    ctx: &Context<'_>,
    defects: &mut Vec<Defect>,
) -> Result<(PredicateTree, Next<'a>)> {
    if start.count_keyword(ORDER_BY) > 1 {
        return Err(Error::DuplicateOrderBy {
            query: ctx.source.to_string(),
        });
    }

    let mut branches = Vec::new();
    let mut group = Vec::new();
    let mut cursor = start;
    let mut joined_by: Option<Conjunction> = None;

    loop {
        let head = resolver::resolve(cursor.rest(), ctx.properties)
            .map_or(cursor, |found| cursor.advance(found.len));
        let terminator = head.find_first_of(PREDICATE_TERMINATORS);
        let end = terminator.map_or(cursor.end(), |(_, at)| at);
        let fragment = cursor.slice_to(end);
        let after_or = joined_by == Some(Conjunction::Or);

        if fragment.is_empty() {
            let next = match (terminator, joined_by) {
                (Some((keyword, _)), _) if Conjunction::from_keyword(keyword).is_some() => {
                    return Err(empty_branch(ctx, keyword));
                }
                (Some(_), Some(conjunction)) => {
                    return Err(empty_branch(ctx, conjunction.keyword()));
                }
                (Some(_), None) => {
                    defects.push(Defect::EmptyPredicate);
                    Next::Continue(end)
                }
                (None, Some(conjunction)) => {
                    defects.push(Defect::DanglingConjunction(conjunction));
                    Next::Halt(Frontier::new(Stage::PredicateStart { after_or }, ""))
                }
                (None, None) => {
                    defects.push(Defect::EmptyPredicate);
                    Next::Halt(Frontier::new(Stage::PredicateStart { after_or }, ""))
                }
            };
            close_group(&mut branches, group);
            return Ok((PredicateTree::new(branches), next));
        }

        let part = Part::new(fragment, ctx.properties);
        match part.property() {
            None => defects.push(Defect::UnresolvedProperty(fragment.to_string())),
            Some(property) if !part.residue().is_empty() => {
                defects.push(Defect::UnparsedOperator {
                    property: property.name().to_string(),
                    text: part.residue().to_string(),
                })
            }
            Some(_) => {}
        }

        let Some((keyword, at)) = terminator else {
            let frontier = if part.has_property() {
                Frontier::new(Stage::Predicate, part.residue())
            } else {
                Frontier::new(Stage::PredicateStart { after_or }, fragment)
            };
            group.push(part);
            close_group(&mut branches, group);
            return Ok((PredicateTree::new(branches), Next::Halt(frontier)));
        };
        group.push(part);

        match Conjunction::from_keyword(keyword) {
            Some(conjunction) => {
                if conjunction == Conjunction::Or {
                    close_group(&mut branches, std::mem::take(&mut group));
                }
                joined_by = Some(conjunction);
                cursor = at.advance(keyword.len());
            }
            None => {
                close_group(&mut branches, group);
                return Ok((PredicateTree::new(branches), Next::Continue(at)));
            }
        }
    }
}

fn close_group(branches: &mut Vec<OrPart>, group: Vec<Part>) {
    if !group.is_empty() {
        branches.push(OrPart::new(group));
    }
}

fn empty_branch(ctx: &Context<'_>, keyword: &str) -> Error {
    Error::EmptyBranch {
        query: ctx.source.to_string(),
        keyword: keyword.to_string(),
    }
}

/// `AllIgnoreCase` / `AllIgnoringCase` after the predicate
fn parse_all_ignore_case<'a>(
    cursor: Cursor<'a>,
    defects: &mut Vec<Defect>,
) -> (Option<&'static str>, Next<'a>) {
    let Some((token, mut cursor)) = cursor.eat_longest(ALL_IGNORE_CASE) else {
        return (None, Next::Continue(cursor));
    };
    while let Some((_, next)) = cursor.eat_longest(ALL_IGNORE_CASE) {
        defects.push(Defect::DuplicateAllIgnoreCase);
        cursor = next;
    }
    if cursor.is_at_end() {
        return (
            Some(token),
            Next::Halt(Frontier::new(Stage::AllIgnoreCase, "")),
        );
    }
    (Some(token), Next::Continue(cursor))
}

/// `(property [Asc|Desc])+` after `OrderBy`
fn parse_order(
    start: Cursor<'_>,
    ctx: &Context<'_>,
    defects: &mut Vec<Defect>,
) -> (OrderClause, Frontier) {
    let mut items = Vec::new();
    let mut cursor = start;
    let mut stage = Stage::OrderStart;

    loop {
        if cursor.is_at_end() {
            if items.is_empty() {
                defects.push(Defect::EmptyOrderClause);
            }
            return (OrderClause::new(items), Frontier::new(stage, ""));
        }

        let Some(found) = resolver::resolve(cursor.rest(), ctx.properties) else {
            defects.push(Defect::UnresolvedOrderProperty(cursor.rest().to_string()));
            return (OrderClause::new(items), Frontier::new(stage, cursor.rest()));
        };
        let property = found.descriptor.clone();
        cursor = cursor.advance(found.len);

        match cursor.eat_longest(DIRECTIONS) {
            Some((keyword, next)) => {
                items.push(OrderItem::new(property, Direction::from_keyword(keyword)));
                cursor = next;
                stage = Stage::OrderDirection;
            }
            None => {
                if ctx.config.missing_direction == MissingDirection::Reject {
                    defects.push(Defect::MissingDirection(property.name().to_string()));
                }
                items.push(OrderItem::new(property, None));
                stage = Stage::OrderProperty;
            }
        }
    }
}
