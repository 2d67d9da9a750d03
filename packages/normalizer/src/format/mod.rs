//! Table formats and value decomposition.
//!
//! [`FormatVariant`] carries the column layout of each table generation and
//! [`decompose`] turns the value columns of a [`crate::types::RawRecord`]
//! into a [`crate::types::CanonicalValue`].

mod decompose;
mod grouping;
mod layout;

pub use decompose::{decode_record, decompose};
pub use grouping::{group_digits, reconstruct_uncertainty};
pub use layout::{split_line, ColumnRange, FormatVariant, TableLayout};
