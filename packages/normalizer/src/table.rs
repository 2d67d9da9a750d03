//! Reading published allascii tables.
//!
//! A table starts with a free-text preamble that ends at a line of dashes;
//! every following non-blank line is one constant.

use serde::Serialize;

use crate::config::TABLE_SEPARATOR;
use crate::error::{NormalizerError, Result};
use crate::format::{decode_record, FormatVariant};
use crate::types::{ConstantRecord, RawRecord};

/// A record that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub year: i32,
    pub quantity: String,
    /// Offending text (the value or uncertainty as cleaned).
    pub text: String,
    pub reason: String,
}

impl SkippedRecord {
    /// Skip entry for a value error; other errors are not per-record.
    fn from_malformed(error: &NormalizerError) -> Option<Self> {
        match error {
            NormalizerError::MalformedValue {
                year,
                quantity,
                text,
            } => Some(Self {
                year: *year,
                quantity: quantity.clone(),
                text: text.clone(),
                reason: error.to_string(),
            }),
            _ => None,
        }
    }
}

/// Decoded records of one publication year.
#[derive(Debug, Clone, Default)]
pub struct YearBatch {
    pub year: i32,
    pub records: Vec<ConstantRecord>,
    pub skipped: Vec<SkippedRecord>,
}

impl YearBatch {
    #[must_use]
    pub fn new(year: i32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }
}

/// Split the record lines of a table.
///
/// Tables without a separator line yield no records.
pub fn parse_table(text: &str, year: i32) -> Result<Vec<RawRecord>> {
    let variant = FormatVariant::for_year(year)?;
    tracing::debug!(year, layout = variant.as_str(), "Splitting table");

    let records = text
        .lines()
        .skip_while(|line| !line.trim().starts_with(TABLE_SEPARATOR))
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| variant.split(line, year))
        .collect();

    Ok(records)
}

/// Parse and decode a table.
///
/// Records whose value cannot be parsed are reported in
/// [`YearBatch::skipped`]; the rest of the table is still decoded.
pub fn decode_table(text: &str, year: i32) -> Result<YearBatch> {
    let mut batch = YearBatch::new(year);

    for raw in parse_table(text, year)? {
        match decode_record(raw) {
            Ok(record) => batch.records.push(record),
            Err(error) => {
                let skipped = SkippedRecord::from_malformed(&error).ok_or(error)?;
                tracing::error!(year, quantity = %skipped.quantity, "{}", skipped.reason);
                batch.skipped.push(skipped);
            }
        }
    }

    tracing::info!(
        year,
        records = batch.records.len(),
        skipped = batch.skipped.len(),
        "Decoded table"
    );
    Ok(batch)
}
