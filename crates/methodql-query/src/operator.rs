//! Operator catalog
//!
//! Every comparison a predicate part can express, with its keyword
//! spellings, the number of arguments it binds and the property categories
//! it applies to. Applicability drives completion only; the parser accepts
//! any operator after any property.

use methodql_core::TypeCategory;
use serde::{Deserialize, Serialize};

/// Keyword prefixes that open an operator group
pub const GROUP_PREFIXES: &[&str] = &["Is"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    SimpleProperty,
    NegatingSimpleProperty,
    IsNull,
    IsNotNull,
    In,
    NotIn,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Between,
    Before,
    After,
    Like,
    NotLike,
    StartingWith,
    EndingWith,
    Containing,
    NotContaining,
    Regex,
}

impl OperatorKind {
    /// All operators in catalog order
    pub const ALL: [OperatorKind; 20] = [
        OperatorKind::SimpleProperty,
        OperatorKind::NegatingSimpleProperty,
        OperatorKind::IsNull,
        OperatorKind::IsNotNull,
        OperatorKind::In,
        OperatorKind::NotIn,
        OperatorKind::LessThan,
        OperatorKind::LessThanEqual,
        OperatorKind::GreaterThan,
        OperatorKind::GreaterThanEqual,
        OperatorKind::Between,
        OperatorKind::Before,
        OperatorKind::After,
        OperatorKind::Like,
        OperatorKind::NotLike,
        OperatorKind::StartingWith,
        OperatorKind::EndingWith,
        OperatorKind::Containing,
        OperatorKind::NotContaining,
        OperatorKind::Regex,
    ];

    /// Keyword spellings, grouped spelling first
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            OperatorKind::SimpleProperty => &["Is", "Equals"],
            OperatorKind::NegatingSimpleProperty => &["IsNot", "Not"],
            OperatorKind::IsNull => &["IsNull", "Null"],
            OperatorKind::IsNotNull => &["IsNotNull", "NotNull"],
            OperatorKind::In => &["IsIn", "In"],
            OperatorKind::NotIn => &["IsNotIn", "NotIn"],
            OperatorKind::LessThan => &["IsLessThan", "LessThan"],
            OperatorKind::LessThanEqual => &["IsLessThanEqual", "LessThanEqual"],
            OperatorKind::GreaterThan => &["IsGreaterThan", "GreaterThan"],
            OperatorKind::GreaterThanEqual => &["IsGreaterThanEqual", "GreaterThanEqual"],
            OperatorKind::Between => &["IsBetween", "Between"],
            OperatorKind::Before => &["IsBefore", "Before"],
            OperatorKind::After => &["IsAfter", "After"],
            OperatorKind::Like => &["IsLike", "Like"],
            OperatorKind::NotLike => &["IsNotLike", "NotLike"],
            OperatorKind::StartingWith => &["IsStartingWith", "StartingWith", "StartsWith"],
            OperatorKind::EndingWith => &["IsEndingWith", "EndingWith", "EndsWith"],
            OperatorKind::Containing => &["IsContaining", "Containing", "Contains"],
            OperatorKind::NotContaining => &["IsNotContaining", "NotContaining", "NotContains"],
            OperatorKind::Regex => &["MatchesRegex", "Matches", "Regex"],
        }
    }

    /// Number of arguments the operator binds
    pub fn argument_count(self) -> usize {
        match self {
            OperatorKind::IsNull | OperatorKind::IsNotNull => 0,
            OperatorKind::Between => 2,
            _ => 1,
        }
    }

    /// Returns true if the operator makes sense for a property of `category`
    pub fn is_applicable_to(self, category: TypeCategory) -> bool {
        match self {
            OperatorKind::SimpleProperty
            | OperatorKind::NegatingSimpleProperty
            | OperatorKind::In
            | OperatorKind::NotIn => true,
            OperatorKind::IsNull | OperatorKind::IsNotNull => category.is_nullable(),
            OperatorKind::LessThan
            | OperatorKind::LessThanEqual
            | OperatorKind::GreaterThan
            | OperatorKind::GreaterThanEqual => category.is_numeric(),
            OperatorKind::Between => category.is_numeric() || category == TypeCategory::Date,
            OperatorKind::Before | OperatorKind::After => category == TypeCategory::Date,
            OperatorKind::Like
            | OperatorKind::NotLike
            | OperatorKind::StartingWith
            | OperatorKind::EndingWith
            | OperatorKind::Containing
            | OperatorKind::NotContaining
            | OperatorKind::Regex => category == TypeCategory::String,
        }
    }

    /// The group prefix shared by one of this operator's spellings
    pub fn group_prefix(self) -> Option<&'static str> {
        GROUP_PREFIXES
            .iter()
            .copied()
            .find(|group| self.keywords().iter().any(|k| k.starts_with(group)))
    }

    /// Operators applicable to `category`, in catalog order
    pub fn operators_for(category: TypeCategory) -> Vec<OperatorKind> {
        Self::ALL
            .into_iter()
            .filter(|op| op.is_applicable_to(category))
            .collect()
    }

    /// Every keyword spelling applicable to `category`, in catalog order
    pub fn keywords_for(category: TypeCategory) -> Vec<&'static str> {
        Self::operators_for(category)
            .into_iter()
            .flat_map(|op| op.keywords().iter().copied())
            .collect()
    }

    /// Extract the longest operator keyword that prefixes `remaining`
    ///
    /// All spellings are considered regardless of category. `None` means
    /// no operator was written, which is implicit equality.
    pub fn extract(remaining: &str) -> Option<(OperatorKind, &'static str)> {
        Self::ALL
            .into_iter()
            .flat_map(|op| op.keywords().iter().map(move |k| (op, *k)))
            .filter(|(_, keyword)| remaining.starts_with(keyword))
            .max_by_key(|(_, keyword)| keyword.len())
    }
}

impl std::fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The group prefix `keyword` starts with, or `""`
pub fn group_of(keyword: &str) -> &'static str {
    GROUP_PREFIXES
        .iter()
        .copied()
        .find(|group| keyword.starts_with(group))
        .unwrap_or("")
}

/// Returns true if `word` is a spelling of any operator
pub fn is_keyword(word: &str) -> bool {
    OperatorKind::ALL
        .iter()
        .any(|op| op.keywords().contains(&word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_longest_keyword() {
        assert_eq!(
            OperatorKind::extract("IsNotNull"),
            Some((OperatorKind::IsNotNull, "IsNotNull"))
        );
        assert_eq!(
            OperatorKind::extract("IsNot"),
            Some((OperatorKind::NegatingSimpleProperty, "IsNot"))
        );
        assert_eq!(
            OperatorKind::extract("IsLessThanEqual"),
            Some((OperatorKind::LessThanEqual, "IsLessThanEqual"))
        );
        assert_eq!(
            OperatorKind::extract("ContainsXyz"),
            Some((OperatorKind::Containing, "Contains"))
        );
        assert_eq!(OperatorKind::extract("Xyz"), None);
        assert_eq!(OperatorKind::extract(""), None);
    }

    #[test]
    fn test_argument_counts() {
        assert_eq!(OperatorKind::IsNull.argument_count(), 0);
        assert_eq!(OperatorKind::SimpleProperty.argument_count(), 1);
        assert_eq!(OperatorKind::Between.argument_count(), 2);
    }

    #[test]
    fn test_string_keywords() {
        let keywords = OperatorKind::keywords_for(TypeCategory::String);
        assert!(keywords.contains(&"StartsWith"));
        assert!(keywords.contains(&"MatchesRegex"));
        assert!(keywords.contains(&"IsNull"));
        assert!(!keywords.contains(&"LessThan"));
        assert!(!keywords.contains(&"Before"));
        assert!(!keywords.contains(&"Between"));
    }

    #[test]
    fn test_category_operator_sets() {
        let primitive = OperatorKind::operators_for(TypeCategory::PrimitiveNumber);
        assert!(!primitive.contains(&OperatorKind::IsNull));
        assert!(!primitive.contains(&OperatorKind::IsNotNull));
        assert!(primitive.contains(&OperatorKind::Between));

        let date = OperatorKind::operators_for(TypeCategory::Date);
        assert!(date.contains(&OperatorKind::Before));
        assert!(date.contains(&OperatorKind::Between));
        assert!(!date.contains(&OperatorKind::GreaterThan));

        let other = OperatorKind::operators_for(TypeCategory::Other);
        assert_eq!(
            other,
            vec![
                OperatorKind::SimpleProperty,
                OperatorKind::NegatingSimpleProperty,
                OperatorKind::IsNull,
                OperatorKind::IsNotNull,
                OperatorKind::In,
                OperatorKind::NotIn,
            ]
        );
    }

    #[test]
    fn test_groups() {
        assert_eq!(group_of("IsNotNull"), "Is");
        assert_eq!(group_of("Null"), "");
        assert_eq!(OperatorKind::In.group_prefix(), Some("Is"));
        assert_eq!(OperatorKind::Regex.group_prefix(), None);
        assert!(is_keyword("Is"));
        assert!(!is_keyword("Isn"));
    }
}
