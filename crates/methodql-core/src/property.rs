//! Property metadata consumed by the query-name grammar
//!
//! The surrounding type system decides which properties an entity has and
//! what kind of value each one holds. The grammar only needs the name and a
//! coarse [`TypeCategory`], delivered as an immutable [`EntityProperties`]
//! snapshot.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Coarse value category of a property, used to pick applicable operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCategory {
    /// Text values
    String,
    /// Nullable numeric values (`Integer`, `Long`, `BigDecimal`...)
    BoxedNumber,
    /// Numeric values that can never be null
    PrimitiveNumber,
    /// Dates and timestamps
    Date,
    /// Anything else (enums, booleans, references)
    Other,
}

impl TypeCategory {
    /// Returns true for both boxed and primitive numbers
    pub fn is_numeric(self) -> bool {
        matches!(self, TypeCategory::BoxedNumber | TypeCategory::PrimitiveNumber)
    }

    /// Returns true if a value of this category can be null
    pub fn is_nullable(self) -> bool {
        !matches!(self, TypeCategory::PrimitiveNumber)
    }

    /// Get the display name of this category
    pub fn name(self) -> &'static str {
        match self {
            TypeCategory::String => "string",
            TypeCategory::BoxedNumber => "boxed number",
            TypeCategory::PrimitiveNumber => "primitive number",
            TypeCategory::Date => "date",
            TypeCategory::Other => "other",
        }
    }
}

/// A known property of the queried entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    name: String,
    category: TypeCategory,
}

impl PropertyDescriptor {
    /// Create a new descriptor
    pub fn new<S: Into<String>>(name: S, category: TypeCategory) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }

    /// Get the property name as declared (`primitiveInt`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the type category
    pub fn category(&self) -> TypeCategory {
        self.category
    }

    /// The form the property takes inside a query name (`PrimitiveInt`)
    pub fn identifier(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => {
                let mut identifier = String::with_capacity(self.name.len());
                identifier.push(first.to_ascii_uppercase());
                identifier.push_str(chars.as_str());
                identifier
            }
            None => String::new(),
        }
    }

    /// Length in bytes of the identifier form
    pub fn identifier_len(&self) -> usize {
        self.name.len()
    }

    /// Returns true if `candidate` starts with this property's identifier form
    pub fn is_identifier_prefix_of(&self, candidate: &str) -> bool {
        let mut name = self.name.chars();
        let mut rest = candidate.chars();
        match (name.next(), rest.next()) {
            (Some(n), Some(c)) if n.to_ascii_uppercase() == c => {
                rest.as_str().starts_with(name.as_str())
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for PropertyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.category.name())
    }
}

/// Ordered, immutable snapshot of an entity's properties
///
/// Cloning is cheap and the snapshot can be shared across threads while
/// query names are parsed against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PropertyDescriptor>", into = "Vec<PropertyDescriptor>")]
pub struct EntityProperties {
    descriptors: Arc<[PropertyDescriptor]>,
}

impl EntityProperties {
    /// Create a snapshot, rejecting names that cannot appear in a query name
    pub fn new<I>(descriptors: I) -> Result<Self>
    where
        I: IntoIterator<Item = PropertyDescriptor>,
    {
        let descriptors: Vec<PropertyDescriptor> = descriptors.into_iter().collect();
        let mut seen = HashSet::new();

        for descriptor in &descriptors {
            let name = descriptor.name();
            if name.is_empty() {
                return Err(Error::InvalidArgument(
                    "property name must not be empty".to_string(),
                ));
            }
            if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(Error::InvalidArgument(format!(
                    "property name '{}' is not an identifier",
                    name
                )));
            }
            if !seen.insert(descriptor.identifier()) {
                return Err(Error::InvalidArgument(format!(
                    "property '{}' is declared more than once",
                    name
                )));
            }
        }

        Ok(Self {
            descriptors: descriptors.into(),
        })
    }

    /// Parse a JSON array of descriptors
    pub fn from_json(json: &str) -> Result<Self> {
        let descriptors: Vec<PropertyDescriptor> = serde_json::from_str(json)?;
        Self::new(descriptors)
    }

    /// Iterate over descriptors in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.descriptors.iter()
    }

    /// Identifier forms of all properties, in declaration order
    pub fn identifiers(&self) -> Vec<String> {
        self.descriptors.iter().map(|d| d.identifier()).collect()
    }

    /// Get the number of properties
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl TryFrom<Vec<PropertyDescriptor>> for EntityProperties {
    type Error = Error;

    fn try_from(descriptors: Vec<PropertyDescriptor>) -> Result<Self> {
        Self::new(descriptors)
    }
}

impl From<EntityProperties> for Vec<PropertyDescriptor> {
    fn from(properties: EntityProperties) -> Self {
        properties.descriptors.to_vec()
    }
}

impl<'a> IntoIterator for &'a EntityProperties {
    type Item = &'a PropertyDescriptor;
    type IntoIter = std::slice::Iter<'a, PropertyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identifier_form() {
        let prop = PropertyDescriptor::new("primitiveInt", TypeCategory::PrimitiveNumber);
        assert_eq!(prop.identifier(), "PrimitiveInt");
        assert_eq!(prop.identifier_len(), 12);
        assert!(prop.is_identifier_prefix_of("PrimitiveIntIsNull"));
        assert!(!prop.is_identifier_prefix_of("primitiveInt"));
        assert!(!prop.is_identifier_prefix_of("Primitive"));
    }

    #[test]
    fn test_category_flags() {
        assert!(TypeCategory::BoxedNumber.is_numeric());
        assert!(TypeCategory::PrimitiveNumber.is_numeric());
        assert!(!TypeCategory::Date.is_numeric());
        assert!(!TypeCategory::PrimitiveNumber.is_nullable());
        assert!(TypeCategory::Other.is_nullable());
    }

    #[test]
    fn test_entity_properties() {
        let props = EntityProperties::new(vec![
            PropertyDescriptor::new("text", TypeCategory::String),
            PropertyDescriptor::new("number", TypeCategory::BoxedNumber),
        ])
        .unwrap();

        assert_eq!(props.len(), 2);
        assert_eq!(props.identifiers(), vec!["Text", "Number"]);
        let categories: Vec<_> = props.iter().map(|p| p.category()).collect();
        assert_eq!(categories, vec![TypeCategory::String, TypeCategory::BoxedNumber]);
    }

    #[test]
    fn test_rejects_bad_names() {
        let empty = EntityProperties::new(vec![PropertyDescriptor::new("", TypeCategory::Other)]);
        assert!(matches!(empty, Err(Error::InvalidArgument(_))));

        let spaced =
            EntityProperties::new(vec![PropertyDescriptor::new("first name", TypeCategory::String)]);
        assert!(matches!(spaced, Err(Error::InvalidArgument(_))));

        let duplicate = EntityProperties::new(vec![
            PropertyDescriptor::new("text", TypeCategory::String),
            PropertyDescriptor::new("Text", TypeCategory::String),
        ]);
        assert!(matches!(duplicate, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_json_round_trip_validates() {
        let props = EntityProperties::from_json(
            r#"[{"name":"text","category":"String"},{"name":"date","category":"Date"}]"#,
        )
        .unwrap();
        assert_eq!(props.identifiers(), vec!["Text", "Date"]);

        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(EntityProperties::from_json(&json).unwrap(), props);

        let bad = EntityProperties::from_json(r#"[{"name":"","category":"String"}]"#);
        assert!(matches!(bad, Err(Error::InvalidArgument(_))));
    }

    proptest! {
        #[test]
        fn identifier_form_prefixes_itself(name in "[a-z][a-zA-Z0-9_]{0,12}", tail in "[A-Z][a-z]{0,6}") {
            let descriptor = PropertyDescriptor::new(name, TypeCategory::Other);
            let candidate = format!("{}{}", descriptor.identifier(), tail);
            prop_assert!(descriptor.is_identifier_prefix_of(&candidate));
            prop_assert_eq!(descriptor.identifier().len(), descriptor.identifier_len());
        }
    }
}
