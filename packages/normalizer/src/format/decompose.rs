//! Decomposition of published value text into a [`CanonicalValue`].
//!
//! The two table encodings differ in where the uncertainty lives:
//!
//! - Modern tables carry it in its own column, or `(exact)` for defined values.
//! - Legacy tables append it to the value as parenthesized digits that apply
//!   to the last digits of the value, e.g. `931.494 028(23)` is
//!   931.494 028 ± 0.000 023 and `1.000 014 98(90) e-10` is
//!   1.000 014 98 e-10 ± 0.000 000 90 e-10.
//!
//! The ellipsis marker is removed before the exponent is matched, so
//! `1.234 5... e-3` and `1.234 5 e-3...` both yield the exponent `e-3`.

use std::sync::LazyLock;

use regex::Regex;

use super::grouping::reconstruct_uncertainty;
use super::layout::FormatVariant;
use crate::config::{ELLIPSIS, EXACT_MARKER};
use crate::error::{NormalizerError, Result};
use crate::types::{CanonicalValue, ConstantRecord, RawRecord};

/// Parenthesized uncertainty digits embedded in a legacy value.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static EMBEDDED_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\d+\)").expect("valid regex"));

/// Scientific-notation suffix at the end of a value.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static EXPONENT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"e[-+]?\d+$").expect("valid regex"));

/// Legacy value: main body, uncertainty digits, optional exponent.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LEGACY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9. ]+)\((\d+)\)\s*(e[-+]?\d+)?").expect("valid regex")
});

/// Decompose a raw record into its canonical value.
///
/// Fails only when the cleaned value or uncertainty text is not a number.
///
/// # Examples
/// ```
/// use codata_normalizer::format::decompose;
/// use codata_normalizer::types::RawRecord;
///
/// let raw = RawRecord::new(2006, "atomic mass unit-electron volt relationship",
///     "931.494 028(23) e6", "", "eV");
/// let value = decompose(&raw).unwrap();
/// assert_eq!(value.display_value, "931.494028e6");
/// assert_eq!(value.display_uncertainty.as_deref(), Some("0.000023e6"));
/// assert_eq!(value.exponent.as_deref(), Some("e6"));
/// ```
pub fn decompose(raw: &RawRecord) -> Result<CanonicalValue> {
    decompose_with_warnings(raw).map(|(value, _)| value)
}

/// Decode a raw record, keeping structural-anomaly warnings alongside the value.
pub fn decode_record(raw: RawRecord) -> Result<ConstantRecord> {
    let (value, warnings) = decompose_with_warnings(&raw)?;
    Ok(ConstantRecord {
        raw,
        value,
        warnings,
    })
}

fn decompose_with_warnings(raw: &RawRecord) -> Result<(CanonicalValue, Vec<String>)> {
    let variant = FormatVariant::for_year(raw.year)?;
    let mut warnings = Vec::new();

    // Truncation marker goes first so the exponent can anchor at the end.
    let is_truncated = raw.raw_value.contains(ELLIPSIS);
    let mut working = raw.raw_value.replace(ELLIPSIS, "").trim().to_string();

    let is_exact = match variant {
        FormatVariant::Modern => raw.raw_uncertainty == EXACT_MARKER,
        FormatVariant::Legacy => !EMBEDDED_DIGITS.is_match(&working),
    };

    let exponent = EXPONENT_SUFFIX
        .find(&working)
        .map(|m| m.as_str().to_string());

    let uncertainty_text = if is_exact {
        None
    } else {
        match variant {
            FormatVariant::Modern if raw.raw_uncertainty.is_empty() => {
                warnings.push("uncertainty column is empty".to_string());
                None
            }
            FormatVariant::Modern => Some(raw.raw_uncertainty.clone()),
            FormatVariant::Legacy => {
                let embedded = embedded_uncertainty(&working, exponent.as_deref());
                if embedded.is_none() {
                    warnings.push(format!("no uncertainty recoverable from '{working}'"));
                }
                working = EMBEDDED_DIGITS.replace_all(&working, "").to_string();
                embedded
            }
        }
    };

    for warning in &warnings {
        tracing::warn!(year = raw.year, quantity = %raw.quantity, "{warning}");
    }

    let display_value = strip_spaces(&working.replace(ELLIPSIS, ""));
    let numeric_value = parse_number(&display_value, raw)?;

    let (display_uncertainty, numeric_uncertainty) = match uncertainty_text {
        Some(text) => {
            let display = strip_spaces(&text);
            let numeric = parse_number(&display, raw)?;
            (Some(display), Some(numeric))
        }
        None => (None, None),
    };

    Ok((
        CanonicalValue {
            numeric_value,
            numeric_uncertainty,
            exponent,
            is_exact,
            is_truncated,
            display_value,
            display_uncertainty,
        },
        warnings,
    ))
}

/// Rebuild the uncertainty text blended into a legacy value.
///
/// Returns `None` when the value does not have the expected shape.
fn embedded_uncertainty(value: &str, exponent: Option<&str>) -> Option<String> {
    let caps = LEGACY_VALUE.captures(value)?;
    let main = strip_spaces(caps.get(1)?.as_str());
    let digits = caps.get(2)?.as_str();

    let decimals = main
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.chars().count());

    let mut text = reconstruct_uncertainty(decimals, digits);
    if let Some(exponent) = exponent {
        text.push(' ');
        text.push_str(exponent);
    }
    Some(text)
}

fn strip_spaces(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn parse_number(text: &str, raw: &RawRecord) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|_| NormalizerError::malformed(raw.year, &raw.quantity, text))
}
