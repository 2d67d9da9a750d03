//! Aggregation of per-year records into versioned constants.
//!
//! Batches are folded in the order the caller supplies. By convention that
//! is newest year first, which makes the most recent name and unit of each
//! constant the preferred ones; version lists are sorted oldest first once
//! the fold completes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::identifiers::ResolverCache;
use crate::table::{SkippedRecord, YearBatch};
use crate::types::{Constant, ConstantRecord, ConstantVersion};

/// Kind of a non-fatal condition found while aggregating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// No identifier for the published name; kept as provisional.
    IdentifierNotFound,
    /// The record's text did not have the expected shape.
    StructuralAnomaly,
}

/// A warning attached to one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestWarning {
    pub year: i32,
    pub quantity: String,
    pub kind: WarningKind,
    pub message: String,
}

/// Records that were skipped or kept with warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub skipped: Vec<SkippedRecord>,
    pub warnings: Vec<ManifestWarning>,
}

impl Manifest {
    /// Warnings of one kind.
    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &ManifestWarning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty() && self.warnings.is_empty()
    }
}

/// Constants collected across years.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregation {
    /// Resolved constants by identifier.
    pub constants: BTreeMap<String, Constant>,
    /// Constants without identifier, by published name.
    pub provisional: BTreeMap<String, Constant>,
    pub manifest: Manifest,
}

impl Aggregation {
    /// Resolved constant by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Constant> {
        self.constants.get(id)
    }

    /// Number of constants, resolved and provisional.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constants.len() + self.provisional.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty() && self.provisional.is_empty()
    }

    /// Retry identifier resolution for provisional constants.
    ///
    /// The preferred name is tried first, then the other aliases. Promoted
    /// constants are merged into any resolved constant with the same id.
    /// Returns the number of constants promoted.
    pub fn promote(&mut self, resolver: &mut ResolverCache<'_>) -> usize {
        let provisional = std::mem::take(&mut self.provisional);
        let mut promoted = 0;

        for (name, mut constant) in provisional {
            let Some(id) = constant
                .aliases
                .iter()
                .find_map(|alias| resolver.resolve(alias))
            else {
                self.provisional.insert(name, constant);
                continue;
            };

            tracing::info!(quantity = %name, id = %id, "Promoted provisional constant");
            promoted += 1;

            match self.constants.get_mut(&id) {
                Some(existing) => {
                    existing.absorb(constant);
                    existing.sort_versions();
                }
                None => {
                    constant.assign_id(id.clone());
                    self.constants.insert(id, constant);
                }
            }
        }

        promoted
    }

    fn merge_batch(mut self, batch: YearBatch, resolver: &mut ResolverCache<'_>) -> Self {
        tracing::debug!(year = batch.year, records = batch.records.len(), "Merging year");
        self.manifest.skipped.extend(batch.skipped);
        for record in &batch.records {
            self.merge_record(record, resolver);
        }
        self
    }

    fn merge_record(&mut self, record: &ConstantRecord, resolver: &mut ResolverCache<'_>) {
        let name = record.quantity();
        let year = record.year();

        for warning in &record.warnings {
            self.manifest.warnings.push(ManifestWarning {
                year,
                quantity: name.to_string(),
                kind: WarningKind::StructuralAnomaly,
                message: warning.clone(),
            });
        }

        match resolver.resolve(name) {
            Some(id) => {
                let constant = self
                    .constants
                    .entry(id.clone())
                    .or_insert_with(|| Constant::resolved(id.clone(), name, &record.raw.unit));
                constant.add_alias(name);
                constant.push_version(ConstantVersion::from_record(record, Some(&id)));
            }
            None => {
                tracing::warn!(year, quantity = %name, "NIST identifier not found");
                self.manifest.warnings.push(ManifestWarning {
                    year,
                    quantity: name.to_string(),
                    kind: WarningKind::IdentifierNotFound,
                    message: format!("NIST identifier not found for '{name}'"),
                });
                let constant = self
                    .provisional
                    .entry(name.to_string())
                    .or_insert_with(|| Constant::provisional(name, &record.raw.unit));
                constant.push_version(ConstantVersion::from_record(record, None));
            }
        }
    }

    fn sort_versions(&mut self) {
        for constant in self
            .constants
            .values_mut()
            .chain(self.provisional.values_mut())
        {
            constant.sort_versions();
        }
    }
}

/// Fold year batches into constants.
///
/// The caller decides the batch order; see the module docs.
pub fn aggregate<I>(batches: I, resolver: &mut ResolverCache<'_>) -> Aggregation
where
    I: IntoIterator<Item = YearBatch>,
{
    let mut aggregation = batches
        .into_iter()
        .fold(Aggregation::default(), |aggregation, batch| {
            aggregation.merge_batch(batch, resolver)
        });
    aggregation.sort_versions();

    tracing::info!(
        resolved = aggregation.constants.len(),
        provisional = aggregation.provisional.len(),
        skipped = aggregation.manifest.skipped.len(),
        "Aggregated constants"
    );
    aggregation
}
