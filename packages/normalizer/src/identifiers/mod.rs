//! Identifier resolution for published quantity names.

mod catalog;
mod resolver;

pub use catalog::{parse_correlation_names, IdentifierCatalog};
pub use resolver::{AbbreviationTable, IdentifierResolver, ResolverCache};
