//! methodql Core Library
//!
//! This crate provides the property metadata and error handling shared by
//! the methodql query-name grammar.
//!
//! # Modules
//!
//! - `property` - Property descriptors, type categories and entity snapshots
//! - `error` - Error types and result aliases

pub mod error;
pub mod property;

pub use error::{Error, Result};
pub use property::{EntityProperties, PropertyDescriptor, TypeCategory};
