//! Command-line interface for the normalizer.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::validate_years;
use crate::error::{NormalizerError, Result};
use crate::identifiers::{IdentifierCatalog, ResolverCache};
use crate::model::{build_model, ModelDefinitions};
use crate::normalizer::{
    aggregate_versions, build_catalog, load_catalog, newest_first, normalize_year,
};
use crate::output::{
    save_catalog, save_document, save_year, AggregatedDocument, ModelDocument, OutputFormat,
};

/// CODATA Normalizer - Normalize NIST physical constants tables.
#[derive(Parser)]
#[command(name = "codata-normalizer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log progress (same as RUST_LOG=info)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the NIST identifier crosswalk from the correlation coefficient files.
    Ids {
        /// Directory holding one subdirectory per year
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory (default: the input directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert allascii tables to JSON and CSV, next to each table.
    Convert {
        /// Years to convert (default: every published version)
        years: Vec<i32>,

        /// Directory holding one subdirectory per year
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Identifier crosswalk to use instead of the correlation files
        #[arg(long)]
        ids: Option<PathBuf>,
    },

    /// Aggregate every year into versioned constants.
    Aggregate {
        /// Years to aggregate (default: every published version)
        years: Vec<i32>,

        /// Directory holding one subdirectory per year
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Output directory (default: the input directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Identifier crosswalk to use instead of the correlation files
        #[arg(long)]
        ids: Option<PathBuf>,

        /// Quantity/unit/constant definitions; writes the constants model
        #[arg(short, long)]
        definitions: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Ids { input, output } => ids_command(&input, output.as_deref()),
        Commands::Convert { years, input, ids } => convert_command(&years, &input, ids.as_deref()),
        Commands::Aggregate {
            years,
            input,
            output,
            ids,
            definitions,
            format,
        } => aggregate_command(
            &years,
            &input,
            output.as_deref(),
            ids.as_deref(),
            definitions.as_deref(),
            format,
        ),
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(NormalizerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Directory does not exist: {}", path.display()),
        )));
    }
    if !path.is_dir() {
        return Err(NormalizerError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Path is not a directory: {}", path.display()),
        )));
    }
    Ok(())
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Catalog from a saved crosswalk, or built from the correlation files.
fn catalog_for(input: &Path, ids: Option<&Path>) -> Result<IdentifierCatalog> {
    match ids {
        Some(path) => load_catalog(path),
        None => build_catalog(input, &validate_years(&[])?),
    }
}

fn ids_command(input: &Path, output: Option<&Path>) -> Result<()> {
    ensure_dir(input)?;
    let output = output.unwrap_or(input);

    let catalog = build_catalog(input, &validate_years(&[])?)?;
    let (json_path, csv_path) = save_catalog(&catalog, output)?;

    println!(
        "{} {} identifiers",
        style("Collected").bold(),
        style(catalog.len()).cyan()
    );
    println!("{} {}", style("Saved to:").green().bold(), json_path.display());
    println!("{} {}", style("Saved to:").green().bold(), csv_path.display());
    Ok(())
}

fn convert_command(years: &[i32], input: &Path, ids: Option<&Path>) -> Result<()> {
    ensure_dir(input)?;
    let years = newest_first(&validate_years(years)?);

    let catalog = catalog_for(input, ids)?;
    let mut cache = ResolverCache::new(&catalog);

    let pb = spinner();
    for year in years {
        pb.set_message(format!("Converting {year}..."));
        let batch = match normalize_year(input, year) {
            Ok(batch) => batch,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };
        let (json_path, csv_path) = match save_year(input, &batch, &mut cache) {
            Ok(paths) => paths,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        pb.println(format!(
            "{} {}: {} records -> {}, {}",
            style("Converted").green().bold(),
            style(year).cyan(),
            batch.records.len(),
            json_path.display(),
            csv_path.display()
        ));
        if !batch.skipped.is_empty() {
            pb.println(format!(
                "  Skipped: {}",
                style(batch.skipped.len()).yellow().bold()
            ));
        }
    }
    pb.finish_and_clear();
    Ok(())
}

fn aggregate_command(
    years: &[i32],
    input: &Path,
    output: Option<&Path>,
    ids: Option<&Path>,
    definitions: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    ensure_dir(input)?;
    let output = output.unwrap_or(input);
    let definitions = definitions.map(ModelDefinitions::load).transpose()?;

    let catalog = catalog_for(input, ids)?;

    let pb = spinner();
    pb.set_message("Aggregating versions...");
    let run = match aggregate_versions(input, years, &catalog) {
        Ok(run) => run,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    let aggregation = &run.aggregation;
    pb.set_message("Saving...");
    let saved = match definitions {
        Some(definitions) => {
            let (model, warnings) = build_model(definitions, aggregation);
            let warning_count = warnings.len();
            let path = save_document(&ModelDocument::new(&model, warnings), output, format);
            if warning_count > 0 {
                pb.println(format!(
                    "  Model warnings: {}",
                    style(warning_count).yellow().bold()
                ));
            }
            path
        }
        None => save_document(&AggregatedDocument::new(aggregation, &run.years), output, format),
    };
    pb.finish_and_clear();
    let path = saved?;

    println!("  Years: {}", run.years.len());
    println!("  Constants: {}", style(aggregation.constants.len()).green());
    if !aggregation.provisional.is_empty() {
        println!(
            "  Provisional: {}",
            style(aggregation.provisional.len()).yellow().bold()
        );
    }
    if !aggregation.manifest.skipped.is_empty() {
        println!(
            "  Skipped: {}",
            style(aggregation.manifest.skipped.len()).yellow().bold()
        );
    }
    println!();
    println!("{} {}", style("Saved to:").green().bold(), path.display());
    Ok(())
}
