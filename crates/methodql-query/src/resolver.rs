//! Property resolution at the head of a query-name fragment

use methodql_core::{EntityProperties, PropertyDescriptor};

/// A property found at the start of a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyMatch<'a> {
    pub descriptor: &'a PropertyDescriptor,
    /// Length of the matched identifier in bytes
    pub len: usize,
}

/// Resolve the longest property identifier that prefixes `candidate`
///
/// Matching is case sensitive against the identifier form, so `Text`
/// resolves `text` but `text` resolves nothing. When one identifier is a
/// prefix of another (`Order`, `OrderId`) the longer one wins.
pub fn resolve<'a>(candidate: &str, properties: &'a EntityProperties) -> Option<PropertyMatch<'a>> {
    properties
        .iter()
        .filter(|descriptor| descriptor.is_identifier_prefix_of(candidate))
        .max_by_key(|descriptor| descriptor.identifier_len())
        .map(|descriptor| PropertyMatch {
            descriptor,
            len: descriptor.identifier_len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use methodql_core::TypeCategory;
    use proptest::prelude::*;

    fn properties() -> EntityProperties {
        EntityProperties::new(vec![
            PropertyDescriptor::new("order", TypeCategory::Other),
            PropertyDescriptor::new("orderId", TypeCategory::BoxedNumber),
            PropertyDescriptor::new("text", TypeCategory::String),
        ])
        .unwrap()
    }

    #[test]
    fn test_longest_match() {
        let props = properties();
        let found = resolve("OrderIdIsNull", &props).unwrap();
        assert_eq!(found.descriptor.name(), "orderId");
        assert_eq!(found.len, 7);

        let found = resolve("OrderIsNull", &props).unwrap();
        assert_eq!(found.descriptor.name(), "order");
    }

    #[test]
    fn test_no_match() {
        let props = properties();
        assert!(resolve("Te", &props).is_none());
        assert!(resolve("text", &props).is_none());
        assert!(resolve("", &props).is_none());
        assert!(resolve("Text", &EntityProperties::default()).is_none());
    }

    #[test]
    fn test_match_is_not_boundary_bound() {
        let props = properties();
        let found = resolve("Textual", &props).unwrap();
        assert_eq!(found.descriptor.name(), "text");
    }

    proptest! {
        #[test]
        fn resolved_identifier_prefixes_candidate(candidate in "[A-Z][a-zA-Z]{0,16}") {
            let props = properties();
            if let Some(found) = resolve(&candidate, &props) {
                prop_assert!(candidate.starts_with(&found.descriptor.identifier()));
                prop_assert!(props
                    .iter()
                    .filter(|d| d.is_identifier_prefix_of(&candidate))
                    .all(|d| d.identifier_len() <= found.len));
            }
        }
    }
}
