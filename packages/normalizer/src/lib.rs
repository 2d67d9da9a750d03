//! CODATA Normalizer - Normalize NIST fundamental physical constants tables.
//!
//! This crate reads the fixed-width "allascii" tables NIST publishes for each
//! CODATA adjustment, decodes every value into a canonical form, and merges
//! the years into versioned constants keyed by NIST identifier.
//!
//! # Example
//!
//! ```
//! use codata_normalizer::format::decompose;
//! use codata_normalizer::types::RawRecord;
//!
//! let raw = RawRecord::new(2022, "Newtonian constant of gravitation",
//!     "6.674 30 e-11", "0.000 15 e-11", "m^3 kg^-1 s^-2");
//! let value = decompose(&raw).unwrap();
//! assert_eq!(value.display_value, "6.67430e-11");
//! assert_eq!(value.exponent.as_deref(), Some("e-11"));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Published versions, file layout and validation
//! - [`types`]: Records, canonical values and constants
//! - [`error`]: Error types and Result alias
//! - [`format`]: Column layouts and value decomposition
//! - [`table`]: Whole-table parsing into per-year batches
//! - [`identifiers`]: Name to NIST identifier resolution
//! - [`aggregate`]: Merging years into versioned constants
//! - [`model`]: Quantity, unit and constant model
//! - [`output`]: JSON, CSV and YAML writers
//! - [`cli`]: Command-line interface
//! - [`normalizer`]: File-level normalizer service

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod identifiers;
pub mod model;
pub mod normalizer;
pub mod output;
pub mod table;
pub mod types;

// Re-export main functions
pub use aggregate::aggregate;
pub use normalizer::{aggregate_versions, build_catalog, normalize_year};

// Re-export commonly used items
pub use aggregate::{Aggregation, Manifest, WarningKind};
pub use error::{NormalizerError, Result};
pub use format::{decompose, FormatVariant};
pub use identifiers::{IdentifierCatalog, IdentifierResolver, ResolverCache};
pub use types::{CanonicalValue, Constant, ConstantVersion, RawRecord};
