//! Core data types for the normalizer.
//!
//! A published table row becomes a [`RawRecord`], decoding it yields a
//! [`CanonicalValue`], and aggregation across years collects those values
//! as [`ConstantVersion`]s of a [`Constant`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cross-reference scheme name for NIST short identifiers.
pub const NIST_SCHEME: &str = "NIST";

/// One row of a published table, split into its raw columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Publication year.
    pub year: i32,

    /// Quantity name as published.
    pub quantity: String,

    /// Value column. May embed the uncertainty and a trailing ellipsis.
    pub raw_value: String,

    /// Uncertainty column. Empty for tables before 2010.
    pub raw_uncertainty: String,

    /// Unit column (may be empty).
    pub unit: String,
}

impl RawRecord {
    /// Create a record from its columns.
    #[must_use]
    pub fn new(
        year: i32,
        quantity: impl Into<String>,
        raw_value: impl Into<String>,
        raw_uncertainty: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            year,
            quantity: quantity.into(),
            raw_value: raw_value.into(),
            raw_uncertainty: raw_uncertainty.into(),
            unit: unit.into(),
        }
    }
}

/// Normalized value of one record.
///
/// `exponent` is provenance only: `numeric_value` is parsed from the text as
/// written, suffix included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalValue {
    pub numeric_value: f64,

    /// Absent for exact constants and when no uncertainty was recoverable.
    pub numeric_uncertainty: Option<f64>,

    /// Power-of-ten suffix exactly as published, e.g. `e-10`.
    pub exponent: Option<String>,

    pub is_exact: bool,

    /// The published value ended in an ellipsis.
    pub is_truncated: bool,

    /// Value text with spaces and ellipsis removed.
    pub display_value: String,

    /// Uncertainty text with spaces removed.
    pub display_uncertainty: Option<String>,
}

/// A decoded table row: its raw columns, the canonical value and any
/// anomalies noticed while decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantRecord {
    pub raw: RawRecord,
    pub value: CanonicalValue,
    pub warnings: Vec<String>,
}

impl ConstantRecord {
    /// Publication year of the record.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.raw.year
    }

    /// Quantity name as published.
    #[must_use]
    pub fn quantity(&self) -> &str {
        &self.raw.quantity
    }
}

/// One year's value of a constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantVersion {
    pub year: i32,

    /// Identifier of the owning constant, `None` while it is provisional.
    pub constant_id: Option<String>,

    /// Quantity name as published that year.
    pub quantity: String,

    /// Unit as published that year.
    pub unit: String,

    #[serde(flatten)]
    pub value: CanonicalValue,
}

impl ConstantVersion {
    /// Build a version from a decoded record.
    #[must_use]
    pub fn from_record(record: &ConstantRecord, constant_id: Option<&str>) -> Self {
        Self {
            year: record.raw.year,
            constant_id: constant_id.map(String::from),
            quantity: record.raw.quantity.clone(),
            unit: record.raw.unit.clone(),
            value: record.value.clone(),
        }
    }
}

/// Whether a constant's identifier is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Known only by its published name.
    Provisional,
    /// Identifier assigned; aggregation never changes it afterwards.
    Resolved,
}

/// A logical constant tracked across publication years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    /// NIST identifier while aggregating. The constants model keys its copy
    /// by model id instead and keeps the NIST id under [`Constant::ids`].
    pub id: Option<String>,

    /// Name from the first record seen (the newest year, by convention).
    pub preferred_name: String,

    /// Every distinct published name, preferred name first.
    pub aliases: Vec<String>,

    /// Unit as published alongside the preferred name.
    pub unit: String,

    /// Identifier of the unit in the constants model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,

    /// Cross-reference identifiers keyed by scheme (`NIST`, `QUDT`, ...).
    #[serde(default)]
    pub ids: BTreeMap<String, String>,

    /// BIPM English name, set by the constants model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_bipm_en: Option<String>,

    /// BIPM French name, set by the constants model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_bipm_fr: Option<String>,

    /// Versions in ascending year order once aggregation has finished.
    pub versions: Vec<ConstantVersion>,
}

impl Constant {
    /// Start a constant known only by name.
    #[must_use]
    pub fn provisional(name: impl Into<String>, unit: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: None,
            aliases: vec![name.clone()],
            preferred_name: name,
            unit: unit.into(),
            unit_id: None,
            ids: BTreeMap::new(),
            name_bipm_en: None,
            name_bipm_fr: None,
            versions: Vec::new(),
        }
    }

    /// Start a constant with a resolved identifier.
    #[must_use]
    pub fn resolved(
        id: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        let mut constant = Self::provisional(name, unit);
        constant.assign_id(id.into());
        constant
    }

    #[must_use]
    pub fn status(&self) -> ResolutionStatus {
        if self.id.is_some() {
            ResolutionStatus::Resolved
        } else {
            ResolutionStatus::Provisional
        }
    }

    /// Assign an identifier to a provisional constant.
    ///
    /// Returns `false` and leaves the constant untouched when it already has one.
    pub fn assign_id(&mut self, id: String) -> bool {
        if self.id.is_some() {
            return false;
        }
        for version in &mut self.versions {
            version.constant_id = Some(id.clone());
        }
        self.ids.insert(NIST_SCHEME.to_string(), id.clone());
        self.id = Some(id);
        true
    }

    /// Record a published name, keeping first-seen order.
    pub fn add_alias(&mut self, name: &str) {
        if !self.aliases.iter().any(|a| a == name) {
            self.aliases.push(name.to_string());
        }
    }

    /// Append a version. Order is restored by [`Constant::sort_versions`].
    pub fn push_version(&mut self, mut version: ConstantVersion) {
        version.constant_id.clone_from(&self.id);
        self.versions.push(version);
    }

    /// Move another constant's names and versions into this one.
    pub fn absorb(&mut self, other: Constant) {
        for alias in &other.aliases {
            self.add_alias(alias);
        }
        for version in other.versions {
            self.push_version(version);
        }
    }

    /// Sort versions oldest first. Stable, so same-year entries keep their order.
    pub fn sort_versions(&mut self) {
        self.versions.sort_by_key(|v| v.year);
    }

    /// Years in which this constant was published.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.versions.iter().map(|v| v.year).collect()
    }
}
