//! Predicate tree: OR-groups of AND-joined parts

use crate::lexer::{AND, OR};
use crate::part::Part;
use serde::Serialize;

/// Keyword joining two parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    pub fn keyword(self) -> &'static str {
        match self {
            Conjunction::And => AND,
            Conjunction::Or => OR,
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            AND => Some(Conjunction::And),
            OR => Some(Conjunction::Or),
            _ => None,
        }
    }
}

/// Parts joined by `And`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrPart {
    parts: Vec<Part>,
}

impl OrPart {
    pub(crate) fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }
}

/// Branches joined by `Or`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PredicateTree {
    branches: Vec<OrPart>,
}

impl PredicateTree {
    pub(crate) fn new(branches: Vec<OrPart>) -> Self {
        Self { branches }
    }

    pub fn branches(&self) -> &[OrPart] {
        &self.branches
    }

    /// All parts, branch by branch
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.branches.iter().flat_map(|branch| branch.iter())
    }

    pub fn last_part(&self) -> Option<&Part> {
        self.branches.last().and_then(|branch| branch.parts.last())
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

impl std::fmt::Display for PredicateTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                f.write_str(OR)?;
            }
            for (j, part) in branch.parts.iter().enumerate() {
                if j > 0 {
                    f.write_str(AND)?;
                }
                write!(f, "{}", part)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use methodql_core::{EntityProperties, PropertyDescriptor, TypeCategory};

    #[test]
    fn test_conjunction_keywords() {
        assert_eq!(Conjunction::from_keyword("Or"), Some(Conjunction::Or));
        assert_eq!(Conjunction::from_keyword("And"), Some(Conjunction::And));
        assert_eq!(Conjunction::from_keyword("OrderBy"), None);
        assert_eq!(Conjunction::And.keyword(), "And");
    }

    #[test]
    fn test_display_and_parts() {
        let props = EntityProperties::new(vec![
            PropertyDescriptor::new("text", TypeCategory::String),
            PropertyDescriptor::new("number", TypeCategory::BoxedNumber),
        ])
        .unwrap();
        let tree = PredicateTree::new(vec![
            OrPart::new(vec![
                Part::new("TextIsNull", &props),
                Part::new("NumberBetween", &props),
            ]),
            OrPart::new(vec![Part::new("Text", &props)]),
        ]);

        assert_eq!(tree.to_string(), "TextIsNullAndNumberBetweenOrText");
        assert_eq!(tree.parts().count(), 3);
        assert_eq!(tree.last_part().map(|p| p.to_string()), Some("Text".to_string()));
        assert!(PredicateTree::default().last_part().is_none());
    }
}
