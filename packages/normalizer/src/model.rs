//! The quantity → constant → version model.
//!
//! Quantities, units and constant metadata come from a definitions file
//! maintained by hand; version values come from an [`Aggregation`] and are
//! matched through each definition's NIST identifier.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregation;
use crate::config::MODEL_VERSION;
use crate::error::{NormalizerError, Result};
use crate::types::{Constant, NIST_SCHEME};

/// Cross-reference scheme name for QUDT identifiers.
pub const QUDT_SCHEME: &str = "QUDT";

/// A measurable quantity owning one constant per unit it is expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub has_parts: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_ratio: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_relationship: bool,
    #[serde(default)]
    pub constants: Vec<Constant>,
}

/// A unit, referenced from constants by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identifiers by scheme (`SI`, `UCUM`, `UOM`).
    #[serde(default)]
    pub ids: BTreeMap<String, String>,
}

/// Metadata of one constant in the definitions file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantDefinition {
    pub id: String,
    pub nist_id: String,
    pub name: String,
    pub quantity_id: String,
    #[serde(default)]
    pub unit_id: Option<String>,
    #[serde(default)]
    pub qudt_id: Option<String>,
    #[serde(default)]
    pub name_bipm_en: Option<String>,
    #[serde(default)]
    pub name_bipm_fr: Option<String>,
}

/// Hand-maintained definitions joined with aggregated values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinitions {
    #[serde(default)]
    pub quantities: Vec<Quantity>,
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub constants: Vec<ConstantDefinition>,
}

impl ModelDefinitions {
    /// Parse definitions from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let definitions: Self = serde_json::from_str(text)?;
        definitions.validate()?;
        Ok(definitions)
    }

    /// Read definitions from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject duplicate quantity, unit or constant ids.
    pub fn validate(&self) -> Result<()> {
        check_unique("quantity", self.quantities.iter().map(|q| q.id.as_str()))?;
        check_unique("unit", self.units.iter().map(|u| u.id.as_str()))?;
        check_unique("constant", self.constants.iter().map(|c| c.id.as_str()))?;
        Ok(())
    }
}

fn check_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(NormalizerError::InvalidDefinitions(format!(
                "duplicate {kind} id '{id}'"
            )));
        }
    }
    Ok(())
}

/// The complete constants model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantsModel {
    pub version: String,
    pub quantities: Vec<Quantity>,
    pub units: Vec<Unit>,
}

impl ConstantsModel {
    /// Constant by model id.
    #[must_use]
    pub fn constant(&self, id: &str) -> Option<&Constant> {
        self.quantities
            .iter()
            .flat_map(|q| q.constants.iter())
            .find(|c| c.id.as_deref() == Some(id))
    }

    /// Unit by id.
    #[must_use]
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }
}

/// Join definitions with aggregated constants.
///
/// Returns the model and the warnings raised while building it. Definitions
/// with an unknown quantity are skipped; definitions without aggregated
/// values keep an empty version list.
#[must_use]
pub fn build_model(
    definitions: ModelDefinitions,
    aggregation: &Aggregation,
) -> (ConstantsModel, Vec<String>) {
    let mut warnings = Vec::new();
    let mut quantities = definitions.quantities;
    let index: BTreeMap<String, usize> = quantities
        .iter()
        .enumerate()
        .map(|(position, q)| (q.id.clone(), position))
        .collect();

    for definition in definitions.constants {
        let Some(&position) = index.get(&definition.quantity_id) else {
            let warning = format!(
                "Quantity '{}' not found for constant '{}'",
                definition.quantity_id, definition.id
            );
            tracing::error!("{warning}");
            warnings.push(warning);
            continue;
        };

        let unknown_unit = definition
            .unit_id
            .as_deref()
            .is_some_and(|unit| !definitions.units.iter().any(|u| u.id == unit));
        if unknown_unit {
            let warning = format!("Unknown unit for constant '{}'", definition.id);
            tracing::warn!("{warning}");
            warnings.push(warning);
        }

        let constant = model_constant(definition, aggregation, &mut warnings);
        quantities[position].constants.push(constant);
    }

    (
        ConstantsModel {
            version: MODEL_VERSION.to_string(),
            quantities,
            units: definitions.units,
        },
        warnings,
    )
}

fn model_constant(
    definition: ConstantDefinition,
    aggregation: &Aggregation,
    warnings: &mut Vec<String>,
) -> Constant {
    let mut constant = match aggregation.get(&definition.nist_id) {
        Some(aggregated) => aggregated.clone(),
        None => {
            let warning = format!(
                "No published values for constant '{}' (NIST id '{}')",
                definition.id, definition.nist_id
            );
            tracing::warn!("{warning}");
            warnings.push(warning);
            Constant::provisional(definition.name.clone(), "")
        }
    };

    // The model copy is keyed by model id; the NIST id stays under `ids`.
    constant.id = Some(definition.id.clone());
    constant.preferred_name = definition.name.clone();
    if !constant.aliases.contains(&definition.name) {
        constant.aliases.insert(0, definition.name);
    }
    constant.unit_id = definition.unit_id;
    constant.name_bipm_en = definition.name_bipm_en;
    constant.name_bipm_fr = definition.name_bipm_fr;
    constant.ids.insert(NIST_SCHEME.to_string(), definition.nist_id);
    if let Some(qudt) = definition.qudt_id {
        constant.ids.insert(QUDT_SCHEME.to_string(), qudt);
    }
    for version in &mut constant.versions {
        version.constant_id = Some(definition.id.clone());
    }
    constant
}
