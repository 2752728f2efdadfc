//! Predicate parts
//!
//! A part is one comparison of a query name, such as `TextIsNotNull` or
//! `NumberGreaterThanIgnoreCase`: a property, an optional operator and an
//! optional ignore-case marker.

use crate::lexer::IGNORE_CASE;
use crate::operator::{self, GROUP_PREFIXES, OperatorKind};
use crate::resolver;
use methodql_core::{EntityProperties, PropertyDescriptor};
use serde::Serialize;

/// How letter case is treated when comparing a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum IgnoreCaseMode {
    #[default]
    Never,
    PerProperty,
    All,
}

/// A single predicate of a query name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    property: Option<PropertyDescriptor>,
    operator: Option<OperatorKind>,
    operator_keyword: &'static str,
    operator_group: &'static str,
    ignore_case: IgnoreCaseMode,
    ignore_case_token: &'static str,
    residue: String,
}

impl Part {
    /// Parse a fragment such as `TextIsNotNullIgnoreCase`
    pub fn new(fragment: &str, properties: &EntityProperties) -> Self {
        let (stripped, ignore_case_token) = strip_ignore_case(fragment);
        let ignore_case = if ignore_case_token.is_empty() {
            IgnoreCaseMode::Never
        } else {
            IgnoreCaseMode::PerProperty
        };

        let Some(found) = resolver::resolve(&stripped, properties) else {
            return Self {
                property: None,
                operator: None,
                operator_keyword: "",
                operator_group: "",
                ignore_case,
                ignore_case_token,
                residue: stripped,
            };
        };

        let rest = &stripped[found.len..];
        let (operator, operator_keyword) = match OperatorKind::extract(rest) {
            Some((op, keyword)) => (Some(op), keyword),
            None => (None, ""),
        };

        Self {
            property: Some(found.descriptor.clone()),
            operator,
            operator_keyword,
            operator_group: operator::group_of(operator_keyword),
            ignore_case,
            ignore_case_token,
            residue: rest[operator_keyword.len()..].to_string(),
        }
    }

    pub fn property(&self) -> Option<&PropertyDescriptor> {
        self.property.as_ref()
    }

    /// The operator, with implicit equality reported as `SimpleProperty`
    pub fn operator(&self) -> OperatorKind {
        self.operator.unwrap_or(OperatorKind::SimpleProperty)
    }

    /// The operator keyword as written, `""` for implicit equality
    pub fn operator_keyword(&self) -> &'static str {
        self.operator_keyword
    }

    pub fn operator_group(&self) -> &'static str {
        self.operator_group
    }

    pub fn ignore_case(&self) -> IgnoreCaseMode {
        self.ignore_case
    }

    pub fn ignore_case_token(&self) -> &'static str {
        self.ignore_case_token
    }

    /// Text left over after the operator keyword
    pub fn residue(&self) -> &str {
        &self.residue
    }

    pub fn argument_count(&self) -> usize {
        self.operator().argument_count()
    }

    pub fn has_property(&self) -> bool {
        self.property.is_some()
    }

    pub fn has_operator(&self) -> bool {
        self.operator.is_some() && !self.operator_keyword.is_empty()
    }

    /// Returns true if the whole fragment was understood
    pub fn is_complete(&self) -> bool {
        self.has_property() && self.residue.is_empty()
    }

    /// Operator keywords that may follow this part's property
    ///
    /// Without an active group this is every ungrouped keyword plus the
    /// group prefixes. Inside a group it is the group's keywords with the
    /// prefix stripped, so after `Is` the list reads `"", Not, Null, ...`.
    pub fn supported_operator_keywords(&self) -> Vec<&'static str> {
        let Some(property) = &self.property else {
            return Vec::new();
        };
        let keywords = OperatorKind::keywords_for(property.category());

        if self.operator_group.is_empty() {
            let mut supported: Vec<&'static str> = keywords
                .iter()
                .copied()
                .filter(|k| operator::group_of(k).is_empty())
                .collect();
            supported.extend(
                GROUP_PREFIXES
                    .iter()
                    .copied()
                    .filter(|group| keywords.iter().any(|k| k.starts_with(group))),
            );
            return supported;
        }

        let group = self.operator_group;
        let strip = operator::is_keyword(group);
        keywords
            .into_iter()
            .filter(|k| k.starts_with(group))
            .map(|k| if strip { &k[group.len()..] } else { k })
            .collect()
    }

    /// Keyword tails that extend the typed operator keyword
    ///
    /// After `Not` on a string property these are `Null`, `In`, `Like`,
    /// `Containing` and `Contains`.
    pub fn operator_extensions(&self) -> Vec<&'static str> {
        let Some(property) = &self.property else {
            return Vec::new();
        };
        if !self.has_operator() {
            return Vec::new();
        }
        let typed = self.operator_keyword;
        OperatorKind::keywords_for(property.category())
            .into_iter()
            .filter(|k| k.len() > typed.len() && k.starts_with(typed))
            .map(|k| &k[typed.len()..])
            .collect()
    }
}

impl std::fmt::Display for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.property {
            Some(property) => write!(
                f,
                "{}{}{}",
                property.identifier(),
                self.operator_keyword,
                self.ignore_case_token
            ),
            None => Ok(()),
        }
    }
}

/// Remove the first ignore-case marker found anywhere in `fragment`
fn strip_ignore_case(fragment: &str) -> (String, &'static str) {
    let found = IGNORE_CASE
        .iter()
        .filter_map(|token| fragment.find(token).map(|at| (at, *token)))
        .min_by_key(|(at, _)| *at);

    match found {
        Some((at, token)) => {
            let mut stripped = String::with_capacity(fragment.len() - token.len());
            stripped.push_str(&fragment[..at]);
            stripped.push_str(&fragment[at + token.len()..]);
            (stripped, token)
        }
        None => (fragment.to_string(), ""),
    }
}
