//! Query-name lexer using logos
//!
//! A query name has no whitespace, so tokens are the camel-case humps of the
//! identifier (`find`, `By`, `Text`, `10`). Keywords may only start and end
//! on hump boundaries, which is what keeps `Or` from matching inside
//! `Order` and `Top` from matching inside `Topic`.

use logos::Logos;
use methodql_core::{Error, Result};

pub const BY: &str = "By";
pub const DISTINCT: &str = "Distinct";
pub const LIMITS: &[&str] = &["Top", "First"];
pub const NUMBER_PLACEHOLDER: &str = "[Number]";
pub const AND: &str = "And";
pub const OR: &str = "Or";
pub const CONJUNCTIONS: &[&str] = &[OR, AND];
pub const IGNORE_CASE: &[&str] = &["IgnoreCase", "IgnoringCase"];
pub const ALL_IGNORE_CASE: &[&str] = &["AllIgnoreCase", "AllIgnoringCase"];
pub const ORDER_BY: &str = "OrderBy";
pub const DIRECTIONS: &[&str] = &["Asc", "Desc"];

/// Keywords that end a predicate part
pub const PREDICATE_TERMINATORS: &[&str] =
    &[AND, OR, "AllIgnoreCase", "AllIgnoringCase", ORDER_BY];

/// Camel-case humps
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hump {
    #[regex(r"[A-Z][a-z]*")]
    Word,

    #[regex(r"[a-z]+")]
    Lower,

    #[regex(r"[0-9]+")]
    Digits,

    #[regex(r"_+")]
    Underscore,
}

/// Tokenize a query name into humps
///
/// Fails on the first character that cannot be part of an identifier.
pub fn tokenize(input: &str) -> Result<Vec<(Hump, &str)>> {
    let mut lexer = Hump::lexer(input);
    let mut humps = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(hump) => humps.push((hump, lexer.slice())),
            Err(()) => {
                return Err(Error::InvalidArgument(format!(
                    "unexpected '{}' at offset {} in '{}'",
                    lexer.slice(),
                    lexer.span().start,
                    input
                )));
            }
        }
    }
    Ok(humps)
}

/// Start offsets of every hump in a source string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    starts: Vec<usize>,
    len: usize,
}

impl Segments {
    pub fn new(source: &str) -> Self {
        let starts = Hump::lexer(source)
            .spanned()
            .map(|(_, span)| span.start)
            .collect();
        Self {
            starts,
            len: source.len(),
        }
    }

    /// Returns true if `pos` starts a hump or is the end of input
    pub fn is_boundary(&self, pos: usize) -> bool {
        pos == self.len || self.starts.binary_search(&pos).is_ok()
    }

    fn starts_from(&self, pos: usize) -> &[usize] {
        let first = self.starts.partition_point(|&start| start < pos);
        &self.starts[first..]
    }
}

/// An immutable position in a query name
///
/// Every step returns a new cursor; nothing is consumed in place.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    source: &'a str,
    segments: &'a Segments,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str, segments: &'a Segments) -> Self {
        Self {
            source,
            segments,
            pos: 0,
        }
    }

    pub fn pos(self) -> usize {
        self.pos
    }

    /// The unconsumed input
    pub fn rest(self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn is_at_end(self) -> bool {
        self.pos >= self.source.len()
    }

    /// Text between this cursor and a later one
    pub fn slice_to(self, end: Cursor<'a>) -> &'a str {
        &self.source[self.pos..end.pos.max(self.pos)]
    }

    /// Cursor at the end of input
    pub fn end(self) -> Self {
        Self {
            pos: self.source.len(),
            ..self
        }
    }

    pub fn advance(self, len: usize) -> Self {
        Self {
            pos: (self.pos + len).min(self.source.len()),
            ..self
        }
    }

    /// Match `keyword` here if it ends on a hump boundary
    pub fn eat(self, keyword: &str) -> Option<Self> {
        if self.rest().starts_with(keyword) && self.segments.is_boundary(self.pos + keyword.len())
        {
            Some(self.advance(keyword.len()))
        } else {
            None
        }
    }

    /// Match the longest keyword of `table` here
    pub fn eat_longest<'k, S: AsRef<str>>(self, table: &'k [S]) -> Option<(&'k str, Self)> {
        table
            .iter()
            .map(|keyword| keyword.as_ref())
            .filter_map(|keyword| self.eat(keyword).map(|next| (keyword, next)))
            .max_by_key(|(keyword, _)| keyword.len())
    }

    /// Find the first hump at or after this cursor where a keyword of
    /// `table` matches. The returned cursor points at the keyword.
    pub fn find_first_of<'k, S: AsRef<str>>(self, table: &'k [S]) -> Option<(&'k str, Self)> {
        self.segments
            .starts_from(self.pos)
            .iter()
            .map(|&pos| Self { pos, ..self })
            .find_map(|at| at.eat_longest(table).map(|(keyword, _)| (keyword, at)))
    }

    /// Find the first occurrence of `keyword` at or after this cursor
    pub fn find_keyword(self, keyword: &str) -> Option<Self> {
        self.find_first_of(&[keyword]).map(|(_, at)| at)
    }

    /// Count occurrences of `keyword` at or after this cursor
    pub fn count_keyword(self, keyword: &str) -> usize {
        self.segments
            .starts_from(self.pos)
            .iter()
            .filter(|&&pos| Self { pos, ..self }.eat(keyword).is_some())
            .count()
    }

    /// Split off a run of ASCII digits
    pub fn take_digits(self) -> (&'a str, Self) {
        let len = self
            .rest()
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        (&self.rest()[..len], self.advance(len))
    }
}
