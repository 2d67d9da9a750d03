//! File-level normalizer service that ties the components together.
//!
//! Input directories follow the NIST layout, one subdirectory per year:
//! `<base>/<year>/allascii_<year>.txt` and, when published,
//! `<base>/<year>/corrcoef<year>.txt`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::aggregate::{aggregate, Aggregation};
use crate::config::{correlation_path, table_path, validate_year, validate_years};
use crate::error::{NormalizerError, Result};
use crate::identifiers::{
    parse_correlation_names, IdentifierCatalog, IdentifierResolver, ResolverCache,
};
use crate::table::{decode_table, YearBatch};

/// Read the allascii table of a year.
pub fn read_table(base: &Path, year: i32) -> Result<String> {
    validate_year(year)?;
    let path = table_path(base, year);
    if !path.is_file() {
        return Err(NormalizerError::MissingTable { year, path });
    }
    Ok(fs::read_to_string(path)?)
}

/// Read and decode the table of a year.
pub fn normalize_year(base: &Path, year: i32) -> Result<YearBatch> {
    let text = read_table(base, year)?;
    decode_table(&text, year)
}

/// Build the identifier catalog from the correlation files of `years`.
///
/// Years without a correlation file contribute nothing.
pub fn build_catalog(base: &Path, years: &[i32]) -> Result<IdentifierCatalog> {
    let mut per_year = Vec::new();
    for &year in years {
        let path = correlation_path(base, year);
        if !path.is_file() {
            tracing::debug!(year, path = %path.display(), "No correlation file");
            continue;
        }
        let text = fs::read_to_string(&path)?;
        per_year.push((year, parse_correlation_names(&text)));
    }

    let catalog = IdentifierCatalog::build(per_year);
    tracing::info!(ids = catalog.len(), "Built identifier catalog");
    Ok(catalog)
}

/// Load a catalog previously saved as `nist_ids.json`.
pub fn load_catalog(path: &Path) -> Result<IdentifierCatalog> {
    let text = fs::read_to_string(path)?;
    let ids: BTreeMap<String, Vec<String>> = serde_json::from_str(&text)?;
    Ok(IdentifierCatalog::from_ids(ids))
}

/// Deduplicated years, newest first.
///
/// # Examples
/// ```
/// use codata_normalizer::normalizer::newest_first;
///
/// assert_eq!(newest_first(&[2010, 2022, 2010, 1998]), vec![2022, 2010, 1998]);
/// ```
#[must_use]
pub fn newest_first(years: &[i32]) -> Vec<i32> {
    let mut years = years.to_vec();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Result of aggregating a set of years.
#[derive(Debug, Clone)]
pub struct VersionsRun {
    pub aggregation: Aggregation,
    /// Years whose tables were read, newest first.
    pub years: Vec<i32>,
}

/// Normalize the tables of `years` and aggregate them newest first.
///
/// An empty `years` means every published version. Years without a table
/// are skipped; it is an error when none of them has one.
pub fn aggregate_versions(
    base: &Path,
    years: &[i32],
    resolver: &dyn IdentifierResolver,
) -> Result<VersionsRun> {
    let years = newest_first(&validate_years(years)?);

    let mut batches = Vec::with_capacity(years.len());
    let mut missing = None;
    for &year in &years {
        match normalize_year(base, year) {
            Ok(batch) => batches.push(batch),
            Err(NormalizerError::MissingTable { year, path }) => {
                tracing::warn!(year, path = %path.display(), "Table not found, skipping year");
                missing.get_or_insert(NormalizerError::MissingTable { year, path });
            }
            Err(e) => return Err(e),
        }
    }

    if batches.is_empty() {
        if let Some(error) = missing {
            return Err(error);
        }
    }

    let processed = batches.iter().map(|b| b.year).collect();
    let mut cache = ResolverCache::new(resolver);
    let aggregation = aggregate(batches, &mut cache);

    Ok(VersionsRun {
        aggregation,
        years: processed,
    })
}
