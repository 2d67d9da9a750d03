//! End-to-end integration tests for the normalizer pipeline.
//!
//! Uses a trimmed-down NIST directory with one legacy (2006) and one modern
//! (2018) table plus their correlation coefficient files.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use predicates::prelude::*;
use tempfile::tempdir;

use codata_normalizer::aggregate::WarningKind;
use codata_normalizer::config::table_path;
use codata_normalizer::model::{build_model, ModelDefinitions, QUDT_SCHEME};
use codata_normalizer::normalizer::{aggregate_versions, build_catalog, normalize_year, VersionsRun};
use codata_normalizer::types::{ResolutionStatus, NIST_SCHEME};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("nist")
}

fn definitions_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("definitions.json")
}

/// Copy the fixture tree so commands that write next to the tables do not
/// touch the checked-in files.
fn copy_fixtures(target: &Path) {
    for year in [2006, 2018] {
        let source = fixture_dir().join(year.to_string());
        let dest = target.join(year.to_string());
        fs::create_dir_all(&dest).unwrap();
        for entry in fs::read_dir(&source).unwrap() {
            let entry = entry.unwrap();
            fs::copy(entry.path(), dest.join(entry.file_name())).unwrap();
        }
    }
}

fn run_pipeline() -> VersionsRun {
    let base = fixture_dir();
    let catalog = build_catalog(&base, &[2006, 2018]).unwrap();
    aggregate_versions(&base, &[2006, 2018], &catalog).unwrap()
}

#[test]
fn test_legacy_table() {
    let batch = normalize_year(&fixture_dir(), 2006).unwrap();

    assert_eq!(batch.records.len(), 7);
    assert_eq!(batch.skipped.len(), 1);
    assert_eq!(batch.skipped[0].quantity, "broken constant");

    let lattice = &batch.records[0].value;
    assert_eq!(lattice.display_value, "192.0155762e-12");
    assert_eq!(lattice.display_uncertainty.as_deref(), Some("0.0000050e-12"));
    assert_eq!(lattice.exponent.as_deref(), Some("e-12"));

    let speed = &batch.records[2].value;
    assert!(speed.is_exact);
    assert_eq!(speed.numeric_value, 299_792_458.0);
    assert_eq!(speed.numeric_uncertainty, None);

    let impedance = &batch.records[4].value;
    assert!(impedance.is_exact);
    assert!(impedance.is_truncated);
    assert_eq!(impedance.display_value, "376.730313461");

    let moment = &batch.records[5].value;
    assert_eq!(moment.display_value, "-928.476377e-26");
    assert_eq!(moment.display_uncertainty.as_deref(), Some("0.000023e-26"));
}

#[test]
fn test_modern_table() {
    let batch = normalize_year(&fixture_dir(), 2018).unwrap();

    assert_eq!(batch.records.len(), 7);
    assert!(batch.skipped.is_empty());

    let gravitation = &batch.records[3];
    assert_eq!(gravitation.quantity(), "Newtonian constant of gravitation");
    assert_eq!(gravitation.raw.unit, "m^3 kg^-1 s^-2");
    assert_eq!(gravitation.value.display_value, "6.67430e-11");
    assert_eq!(gravitation.value.display_uncertainty.as_deref(), Some("0.00015e-11"));

    let charge = &batch.records[6];
    assert!(charge.value.is_exact);
    assert!(!charge.value.is_truncated);
}

#[test]
fn test_display_values_round_trip() {
    for year in [2006, 2018] {
        let batch = normalize_year(&fixture_dir(), year).unwrap();
        for record in &batch.records {
            let parsed: f64 = record.value.display_value.parse().unwrap();
            assert_eq!(parsed, record.value.numeric_value, "{}", record.quantity());
        }
    }
}

#[test]
fn test_aggregate_across_layouts() {
    let run = run_pipeline();
    let aggregation = &run.aggregation;

    assert_eq!(run.years, vec![2018, 2006]);
    assert_eq!(
        aggregation.constants.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["bg", "c", "d220sil", "e", "muem", "uev", "z0"]
    );

    let lattice = aggregation.get("d220sil").unwrap();
    assert_eq!(lattice.preferred_name, "lattice spacing of ideal Si (220)");
    assert_eq!(
        lattice.aliases,
        vec!["lattice spacing of ideal Si (220)", "lattice spacing of silicon"]
    );
    assert_eq!(lattice.years(), vec![2006, 2018]);

    let moment = aggregation.get("muem").unwrap();
    assert_eq!(moment.aliases, vec!["electron magnetic moment", "electron mag. mom."]);

    let impedance = aggregation.get("z0").unwrap();
    assert!(impedance.versions[0].value.is_exact);
    assert!(impedance.versions[0].value.is_truncated);
    assert!(!impedance.versions[1].value.is_exact);

    assert_eq!(aggregation.get("e").unwrap().years(), vec![2018]);
}

#[test]
fn test_aggregate_manifest() {
    let run = run_pipeline();
    let aggregation = &run.aggregation;

    let provisional = aggregation.provisional.get("mystery ratio").unwrap();
    assert_eq!(provisional.status(), ResolutionStatus::Provisional);
    assert_eq!(provisional.years(), vec![2006]);

    let not_found: Vec<_> = aggregation
        .manifest
        .warnings_of(WarningKind::IdentifierNotFound)
        .map(|w| w.quantity.as_str())
        .collect();
    assert_eq!(not_found, vec!["mystery ratio"]);

    assert_eq!(aggregation.manifest.skipped.len(), 1);
    assert_eq!(aggregation.manifest.skipped[0].year, 2006);
}

#[test]
fn test_build_model_from_fixtures() {
    let run = run_pipeline();
    let definitions = ModelDefinitions::load(&definitions_path()).unwrap();
    let (model, warnings) = build_model(definitions, &run.aggregation);

    assert!(warnings.is_empty(), "{warnings:?}");
    let speed = model.constant("SpeedOfLightInVacuum").unwrap();
    assert_eq!(speed.ids[NIST_SCHEME], "c");
    assert_eq!(speed.ids[QUDT_SCHEME], "SpeedOfLight_Vacuum");
    assert_eq!(speed.years(), vec![2006, 2018]);
    assert_eq!(
        speed.name_bipm_fr.as_deref(),
        Some("vitesse de la lumière dans le vide")
    );

    let lattice = model.constant("LatticeSpacingOfSilicon220").unwrap();
    assert_eq!(lattice.unit_id.as_deref(), Some("Meter"));
    assert_eq!(lattice.aliases.len(), 2);
}

#[test]
fn test_cli_convert_writes_json_and_csv() {
    let dir = tempdir().unwrap();
    copy_fixtures(dir.path());

    Command::cargo_bin("codata-normalizer")
        .unwrap()
        .args(["convert", "2018", "--input"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted"));

    let json_path = table_path(dir.path(), 2018).with_extension("json");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(json[2]["nist_id"], "c");
    assert_eq!(json[2]["is_exact"], true);

    let csv = fs::read_to_string(table_path(dir.path(), 2018).with_extension("csv")).unwrap();
    assert!(csv.starts_with("Quantity,Value,Uncertainty,Unit\n"));
}

#[test]
fn test_cli_ids_writes_crosswalk() {
    let output = tempdir().unwrap();

    Command::cargo_bin("codata-normalizer")
        .unwrap()
        .args(["ids", "--input"])
        .arg(fixture_dir())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success();

    let csv = fs::read_to_string(output.path().join("nist_ids.csv")).unwrap();
    assert!(csv.contains("d220sil,{220} lattice spacing of silicon"));
    assert!(!csv.contains("Constants"));
}

#[test]
fn test_cli_aggregate_yaml_model() {
    let output = tempdir().unwrap();

    Command::cargo_bin("codata-normalizer")
        .unwrap()
        .args(["aggregate", "2006", "2018", "--format", "yaml", "--input"])
        .arg(fixture_dir())
        .arg("--output")
        .arg(output.path())
        .arg("--definitions")
        .arg(definitions_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to:"));

    let yaml = fs::read_to_string(output.path().join("codata_constants.yaml")).unwrap();
    assert!(yaml.starts_with("---\n"));
    assert!(yaml.contains("id: NewtonianConstantOfGravitation"));
}

#[test]
fn test_cli_rejects_unsupported_year() {
    Command::cargo_bin("codata-normalizer")
        .unwrap()
        .args(["convert", "1986", "--input"])
        .arg(fixture_dir())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported publication year: 1986"));
}
