//! Fixed-width table layouts and record splitting.

use serde::{Deserialize, Serialize};

use crate::config::{validate_year, MODERN_LAYOUT_SINCE};
use crate::error::Result;
use crate::types::RawRecord;

/// Character range of one column. `end: None` runs to the end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl ColumnRange {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    #[must_use]
    pub const fn open(start: usize) -> Self {
        Self { start, end: None }
    }

    /// Extract the trimmed column text from a line.
    ///
    /// Offsets count characters, not bytes. Lines shorter than the range
    /// yield an empty or partial field.
    #[must_use]
    pub fn extract<'a>(&self, line: &'a str) -> &'a str {
        let start = char_offset(line, self.start);
        let end = self.end.map_or(line.len(), |end| char_offset(line, end));
        line.get(start..end.max(start)).unwrap_or_default().trim()
    }
}

/// Byte offset of the `chars`-th character, clamped to the line length.
fn char_offset(line: &str, chars: usize) -> usize {
    line.char_indices()
        .nth(chars)
        .map_or(line.len(), |(offset, _)| offset)
}

/// Column boundaries of a published table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub quantity: ColumnRange,
    pub value: ColumnRange,
    /// Only tables from 2010 on have a separate uncertainty column.
    pub uncertainty: Option<ColumnRange>,
    pub unit: ColumnRange,
}

const MODERN_LAYOUT: TableLayout = TableLayout {
    quantity: ColumnRange::new(0, 60),
    value: ColumnRange::new(60, 85),
    uncertainty: Some(ColumnRange::new(85, 110)),
    unit: ColumnRange::open(110),
};

const LEGACY_LAYOUT: TableLayout = TableLayout {
    quantity: ColumnRange::new(0, 62),
    value: ColumnRange::new(62, 96),
    uncertainty: None,
    unit: ColumnRange::open(96),
};

/// Encoding of a published table, selected by publication year only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormatVariant {
    /// Before 2010: uncertainty embedded in the value as `(digits)`.
    Legacy,
    /// 2010 onwards: separate uncertainty column, `(exact)` for defined values.
    Modern,
}

impl FormatVariant {
    /// Select the variant for a publication year.
    ///
    /// # Examples
    /// ```
    /// use codata_normalizer::format::FormatVariant;
    ///
    /// assert_eq!(FormatVariant::for_year(2006).unwrap(), FormatVariant::Legacy);
    /// assert_eq!(FormatVariant::for_year(2010).unwrap(), FormatVariant::Modern);
    /// assert!(FormatVariant::for_year(1973).is_err());
    /// ```
    pub fn for_year(year: i32) -> Result<Self> {
        validate_year(year)?;
        if year >= MODERN_LAYOUT_SINCE {
            Ok(Self::Modern)
        } else {
            Ok(Self::Legacy)
        }
    }

    #[must_use]
    pub fn layout(self) -> &'static TableLayout {
        match self {
            Self::Legacy => &LEGACY_LAYOUT,
            Self::Modern => &MODERN_LAYOUT,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "LEGACY",
            Self::Modern => "MODERN",
        }
    }

    /// Carve one table line into a [`RawRecord`].
    ///
    /// Never fails: malformed lines produce whatever the column ranges cover,
    /// and problems surface later as unparseable values.
    #[must_use]
    pub fn split(self, line: &str, year: i32) -> RawRecord {
        let layout = self.layout();
        let raw_uncertainty = layout
            .uncertainty
            .map(|range| range.extract(line))
            .unwrap_or_default();

        RawRecord::new(
            year,
            layout.quantity.extract(line),
            layout.value.extract(line),
            raw_uncertainty,
            layout.unit.extract(line),
        )
    }
}

/// Split a line using the layout of its publication year.
pub fn split_line(line: &str, year: i32) -> Result<RawRecord> {
    Ok(FormatVariant::for_year(year)?.split(line, year))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lay out fields at the given character columns.
    fn columns(fields: &[(usize, &str)]) -> String {
        let mut line = String::new();
        for (start, text) in fields {
            while line.chars().count() < *start {
                line.push(' ');
            }
            line.push_str(text);
        }
        line
    }

    #[test]
    fn test_column_range_extract() {
        let range = ColumnRange::new(2, 6);
        assert_eq!(range.extract("ab cd  ef"), "cd");
        assert_eq!(range.extract("ab"), "");
        assert_eq!(ColumnRange::open(3).extract("abc def \n"), "def");
    }

    #[test]
    fn test_column_range_counts_characters() {
        let range = ColumnRange::new(3, 6);
        assert_eq!(range.extract("µ0 abc"), "abc");
    }

    #[test]
    fn test_for_year() {
        assert_eq!(FormatVariant::for_year(1998).unwrap(), FormatVariant::Legacy);
        assert_eq!(FormatVariant::for_year(2009).unwrap(), FormatVariant::Legacy);
        assert_eq!(FormatVariant::for_year(2010).unwrap(), FormatVariant::Modern);
        assert_eq!(FormatVariant::for_year(2022).unwrap(), FormatVariant::Modern);
        assert!(FormatVariant::for_year(1997).is_err());
    }

    #[test]
    fn test_as_str_matches_serialized_name() {
        for variant in [FormatVariant::Legacy, FormatVariant::Modern] {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, format!("\"{}\"", variant.as_str()));
        }
    }

    #[test]
    fn test_split_modern() {
        let line = columns(&[
            (0, "Newtonian constant of gravitation"),
            (60, "6.674 30 e-11"),
            (85, "0.000 15 e-11"),
            (110, "m^3 kg^-1 s^-2"),
        ]);
        let record = FormatVariant::Modern.split(&line, 2018);

        assert_eq!(record.year, 2018);
        assert_eq!(record.quantity, "Newtonian constant of gravitation");
        assert_eq!(record.raw_value, "6.674 30 e-11");
        assert_eq!(record.raw_uncertainty, "0.000 15 e-11");
        assert_eq!(record.unit, "m^3 kg^-1 s^-2");
    }

    #[test]
    fn test_split_legacy() {
        let line = columns(&[
            (0, "atomic mass constant energy equivalent in MeV"),
            (62, "931.494 028(23)"),
            (96, "MeV"),
        ]);
        let record = FormatVariant::Legacy.split(&line, 2006);

        assert_eq!(record.quantity, "atomic mass constant energy equivalent in MeV");
        assert_eq!(record.raw_value, "931.494 028(23)");
        assert_eq!(record.raw_uncertainty, "");
        assert_eq!(record.unit, "MeV");
    }

    #[test]
    fn test_split_short_line() {
        let record = FormatVariant::Modern.split("truncated line", 2018);
        assert_eq!(record.quantity, "truncated line");
        assert_eq!(record.raw_value, "");
        assert_eq!(record.raw_uncertainty, "");
        assert_eq!(record.unit, "");
    }

    #[test]
    fn test_split_line_rejects_unknown_year() {
        assert!(split_line("anything", 1969).is_err());
        assert_eq!(split_line("x", 2002).unwrap().year, 2002);
    }
}
