//! Aggregated constants and model documents.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use super::write_atomic;
use crate::aggregate::{Aggregation, Manifest};
use crate::config::{MODEL_FILE_STEM, MODEL_VERSION};
use crate::error::Result;
use crate::model::ConstantsModel;
use crate::types::Constant;

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// File extension for the format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Every constant collected across years, with the manifest of the run.
#[derive(Debug, Serialize)]
pub struct AggregatedDocument<'a> {
    pub version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub years: Vec<i32>,
    pub constants: Vec<&'a Constant>,
    pub provisional: Vec<&'a Constant>,
    pub manifest: &'a Manifest,
}

impl<'a> AggregatedDocument<'a> {
    #[must_use]
    pub fn new(aggregation: &'a Aggregation, years: &[i32]) -> Self {
        let mut years = years.to_vec();
        years.sort_unstable();
        Self {
            version: MODEL_VERSION,
            generated_at: Utc::now(),
            years,
            constants: aggregation.constants.values().collect(),
            provisional: aggregation.provisional.values().collect(),
            manifest: &aggregation.manifest,
        }
    }
}

/// The constants model with the warnings raised while building it.
#[derive(Debug, Serialize)]
pub struct ModelDocument<'a> {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub model: &'a ConstantsModel,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<'a> ModelDocument<'a> {
    #[must_use]
    pub fn new(model: &'a ConstantsModel, warnings: Vec<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            model,
            warnings,
        }
    }
}

/// Serialize a document.
///
/// YAML output starts with a document marker and has no trailing whitespace.
pub fn render<T: Serialize>(document: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(document)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(document)?;
            let lines: Vec<&str> = yaml.lines().map(str::trim_end).collect();
            Ok(format!("---\n{}\n", lines.join("\n")))
        }
    }
}

/// Write a document as `codata_constants.<ext>` into `dir`.
pub fn save_document<T: Serialize>(
    document: &T,
    dir: &Path,
    format: OutputFormat,
) -> Result<PathBuf> {
    let path = dir.join(format!("{MODEL_FILE_STEM}.{}", format.extension()));
    write_atomic(&path, render(document, format)?.as_bytes())?;
    Ok(path)
}
