//! Per-year table and identifier crosswalk files.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::write_atomic;
use crate::config::{table_output_path, IDS_CSV_FILE, IDS_JSON_FILE};
use crate::error::{NormalizerError, Result};
use crate::identifiers::{IdentifierCatalog, ResolverCache};
use crate::table::YearBatch;
use crate::types::{CanonicalValue, ConstantRecord};

/// One row of a per-year JSON file: the published columns, the NIST id and
/// the canonical value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearEntry {
    pub year: i32,
    pub quantity: String,
    /// Value column as published.
    pub value: String,
    /// Uncertainty column as published.
    pub uncertainty: String,
    pub unit: String,
    pub nist_id: Option<String>,
    #[serde(flatten)]
    pub canonical: CanonicalValue,
}

/// Attach NIST ids to a year's decoded records.
pub fn year_entries(batch: &YearBatch, resolver: &mut ResolverCache<'_>) -> Vec<YearEntry> {
    batch
        .records
        .iter()
        .map(|record| {
            let nist_id = resolver.resolve(record.quantity());
            if nist_id.is_none() {
                tracing::warn!(
                    year = batch.year,
                    quantity = %record.quantity(),
                    "NIST identifier not found"
                );
            }
            YearEntry {
                year: record.raw.year,
                quantity: record.raw.quantity.clone(),
                value: record.raw.raw_value.clone(),
                uncertainty: record.raw.raw_uncertainty.clone(),
                unit: record.raw.unit.clone(),
                nist_id,
                canonical: record.value.clone(),
            }
        })
        .collect()
}

/// Pretty JSON array of year entries.
pub fn year_json(entries: &[YearEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// CSV with the published columns: `Quantity,Value,Uncertainty,Unit`.
pub fn year_csv(records: &[ConstantRecord]) -> Result<String> {
    csv_string(
        ["Quantity", "Value", "Uncertainty", "Unit"],
        records.iter().map(|r| {
            [
                r.raw.quantity.as_str(),
                r.raw.raw_value.as_str(),
                r.raw.raw_uncertainty.as_str(),
                r.raw.unit.as_str(),
            ]
        }),
    )
}

/// Write `allascii_<year>.json` and `.csv` next to the year's table.
pub fn save_year(
    base: &Path,
    batch: &YearBatch,
    resolver: &mut ResolverCache<'_>,
) -> Result<(PathBuf, PathBuf)> {
    let json_path = table_output_path(base, batch.year, "json");
    let csv_path = table_output_path(base, batch.year, "csv");

    let entries = year_entries(batch, resolver);
    write_atomic(&json_path, year_json(&entries)?.as_bytes())?;
    write_atomic(&csv_path, year_csv(&batch.records)?.as_bytes())?;

    tracing::info!(
        year = batch.year,
        json = %json_path.display(),
        csv = %csv_path.display(),
        "Saved year"
    );
    Ok((json_path, csv_path))
}

/// Id → names map as pretty JSON, sorted by id.
pub fn catalog_json(catalog: &IdentifierCatalog) -> Result<String> {
    Ok(serde_json::to_string_pretty(catalog.ids())?)
}

/// `id,name` CSV with one row per name.
pub fn ids_csv(catalog: &IdentifierCatalog) -> Result<String> {
    csv_string(["id", "name"], catalog.rows().map(|(id, name)| [id, name]))
}

/// Write `nist_ids.json` and `nist_ids.csv` into `dir`.
pub fn save_catalog(catalog: &IdentifierCatalog, dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let json_path = dir.join(IDS_JSON_FILE);
    let csv_path = dir.join(IDS_CSV_FILE);

    write_atomic(&json_path, catalog_json(catalog)?.as_bytes())?;
    write_atomic(&csv_path, ids_csv(catalog)?.as_bytes())?;

    Ok((json_path, csv_path))
}

fn csv_string<'a, const N: usize>(
    header: [&str; N],
    rows: impl Iterator<Item = [&'a str; N]>,
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| NormalizerError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        NormalizerError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}
