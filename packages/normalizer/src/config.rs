//! Configuration constants and validation functions for the normalizer.

use std::path::{Path, PathBuf};

use crate::error::{NormalizerError, Result};

/// Every CODATA adjustment published as an allascii table.
pub const ALL_VERSIONS: [i32; 7] = [1998, 2002, 2006, 2010, 2014, 2018, 2022];

/// First year with a machine-readable table.
pub const EARLIEST_TABLE_YEAR: i32 = 1998;

/// First year using the separate uncertainty column.
pub const MODERN_LAYOUT_SINCE: i32 = 2010;

/// Marker line separating the table preamble from the records.
pub const TABLE_SEPARATOR: &str = "----------";

/// Uncertainty marker used by defined (exact) constants since 2010.
pub const EXACT_MARKER: &str = "(exact)";

/// Marker for values cut short in the published table.
pub const ELLIPSIS: &str = "...";

/// Version string written into the aggregated model.
pub const MODEL_VERSION: &str = "0.1.0";

/// File name of the identifier crosswalk (JSON).
pub const IDS_JSON_FILE: &str = "nist_ids.json";

/// File name of the identifier crosswalk (CSV).
pub const IDS_CSV_FILE: &str = "nist_ids.csv";

/// Base name of the aggregated model output.
pub const MODEL_FILE_STEM: &str = "codata_constants";

/// Validate a publication year.
///
/// # Examples
/// ```
/// use codata_normalizer::config::validate_year;
///
/// assert!(validate_year(2018).is_ok());
/// assert!(validate_year(1986).is_err());
/// ```
pub fn validate_year(year: i32) -> Result<()> {
    if year < EARLIEST_TABLE_YEAR {
        return Err(NormalizerError::UnsupportedYear(year));
    }
    Ok(())
}

/// Validate a list of years, defaulting to [`ALL_VERSIONS`] when empty.
pub fn validate_years(years: &[i32]) -> Result<Vec<i32>> {
    if years.is_empty() {
        return Ok(ALL_VERSIONS.to_vec());
    }
    for &year in years {
        validate_year(year)?;
    }
    Ok(years.to_vec())
}

/// Path of the allascii table for a year: `<base>/<year>/allascii_<year>.txt`.
pub fn table_path(base: &Path, year: i32) -> PathBuf {
    base.join(year.to_string()).join(format!("allascii_{year}.txt"))
}

/// Path of the correlation coefficient file for a year.
pub fn correlation_path(base: &Path, year: i32) -> PathBuf {
    base.join(year.to_string()).join(format!("corrcoef{year}.txt"))
}

/// Sibling of a table path with another extension (`allascii_2018.json`).
pub fn table_output_path(base: &Path, year: i32, extension: &str) -> PathBuf {
    table_path(base, year).with_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_year() {
        assert!(validate_year(1998).is_ok());
        assert!(validate_year(2022).is_ok());
        assert!(validate_year(2030).is_ok());
        assert!(validate_year(1997).is_err());
        assert!(validate_year(0).is_err());
    }

    #[test]
    fn test_validate_years_defaults_to_all() {
        assert_eq!(validate_years(&[]).unwrap(), ALL_VERSIONS.to_vec());
        assert_eq!(validate_years(&[2018, 2006]).unwrap(), vec![2018, 2006]);
        assert!(validate_years(&[2018, 1973]).is_err());
    }

    #[test]
    fn test_table_path() {
        let path = table_path(Path::new("nist"), 2018);
        assert_eq!(path, Path::new("nist").join("2018").join("allascii_2018.txt"));
    }

    #[test]
    fn test_correlation_path() {
        let path = correlation_path(Path::new("nist"), 2006);
        assert_eq!(path, Path::new("nist").join("2006").join("corrcoef2006.txt"));
    }

    #[test]
    fn test_table_output_path() {
        let path = table_output_path(Path::new("nist"), 2022, "csv");
        assert_eq!(path, Path::new("nist").join("2022").join("allascii_2022.csv"));
    }
}
