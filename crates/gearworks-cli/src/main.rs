//! `gearworks` binary.
//!
//! Reads the raw gear catalogue from a collection directory, flattens and
//! costs every item, and replaces the target collection with the result.
//!
//! ```bash
//! # Transform data/raw_gear.json into data/gear.json
//! gearworks --data-dir data
//!
//! # Check a catalogue without writing anything
//! gearworks --data-dir data --dry-run -v
//! ```

mod config;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Args, RunConfig};
use gearworks_core::validation::NormalizeReport;
use gearworks_store::{DirStore, DryRun, TransformOutcome, dry_run, run_transform};

fn main() -> Result<()> {
    let config = RunConfig::from_env().with_args(Args::parse());
    logging::setup_logging(config.verbose)?;

    tracing::info!(
        data_dir = %config.data_dir.display(),
        source = %config.transform.source_collection,
        target = %config.transform.target_collection,
        max_depth = config.transform.max_depth,
        dry_run = config.dry_run,
        "starting gear transform"
    );

    let mut store = DirStore::open(&config.data_dir)
        .with_context(|| format!("opening store at {}", config.data_dir.display()))?;

    if config.dry_run {
        run_dry(&store, &config)
    } else {
        run(&mut store, &config)
    }
}

fn run(store: &mut DirStore, config: &RunConfig) -> Result<()> {
    let outcome = run_transform(store, &config.transform).context("gear transform failed")?;

    match outcome {
        TransformOutcome::Completed(summary) => {
            println!(
                "inserted {} records into '{}' ({} materials, {} final items)",
                summary.inserted,
                config.transform.target_collection,
                summary.materials,
                summary.finals
            );
            report_cost_defects(&NormalizeReport {
                cost_defects: summary.cost_defects,
            });
        }
        TransformOutcome::Skipped { documents_found } => {
            println!(
                "skipped: expected one document in '{}', found {documents_found}",
                config.transform.source_collection
            );
        }
    }
    Ok(())
}

fn run_dry(store: &DirStore, config: &RunConfig) -> Result<()> {
    match dry_run(store, &config.transform).context("gear dry run failed")? {
        DryRun::Ready(transformed) => {
            println!("dry run: {} records", transformed.records.len());
            for record in &transformed.records {
                println!(
                    "  {:<32} cost {:>8}  total {:>10}  materials {}",
                    record.gear_id.as_str(),
                    record.cost.to_string(),
                    record.total_cost.to_string(),
                    record.gear_materials.len()
                );
            }
            report_cost_defects(&transformed.report);
            Ok(())
        }
        DryRun::Dangling(dangling) => {
            for d in &dangling {
                println!(
                    "unresolved: '{}' slot {:?} -> '{}'",
                    d.gear_id, d.position, d.reference
                );
            }
            anyhow::bail!("{} unresolved slot references", dangling.len())
        }
        DryRun::Skipped { documents_found } => {
            println!(
                "skipped: expected one document in '{}', found {documents_found}",
                config.transform.source_collection
            );
            Ok(())
        }
    }
}

fn report_cost_defects(report: &NormalizeReport) {
    for defect in &report.cost_defects {
        println!("cost defect: '{}' has cost '{}'", defect.gear_id, defect.raw);
    }
}
