//! `OrderBy` clause

use crate::lexer::ORDER_BY;
use methodql_core::PropertyDescriptor;
use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Asc => "Asc",
            Direction::Desc => "Desc",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Asc" => Some(Direction::Asc),
            "Desc" => Some(Direction::Desc),
            _ => None,
        }
    }
}

/// One sort key; the direction is `None` when it was not written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    property: PropertyDescriptor,
    direction: Option<Direction>,
}

impl OrderItem {
    pub fn new(property: PropertyDescriptor, direction: Option<Direction>) -> Self {
        Self {
            property,
            direction,
        }
    }

    pub fn property(&self) -> &PropertyDescriptor {
        &self.property
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderClause {
    items: Vec<OrderItem>,
}

impl OrderClause {
    pub(crate) fn new(items: Vec<OrderItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl std::fmt::Display for OrderClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(ORDER_BY)?;
        for item in &self.items {
            f.write_str(&item.property.identifier())?;
            if let Some(direction) = item.direction {
                f.write_str(direction.keyword())?;
            }
        }
        Ok(())
    }
}
