//! Append new plants to the catalog
//!
//! Reads the primary catalog and an extension file (`neue_pflanzen` array),
//! writes the merged catalog to a new file. The primary file is left as is.
//!
//! Usage:
//!   cargo run --bin merge_catalog -- heilkraeuter_db.json neue_pflanzen.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use herbal_catalog::extend::extend_files;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "merge_catalog", about = "Append an extension file's plants to the catalog")]
struct Args {
    /// Existing catalog document
    primary: PathBuf,

    /// Document holding the new plants
    extension: PathBuf,

    /// Where to write the merged catalog
    #[arg(short = 'o', long = "output", default_value = "heilkraeuter_db_erweitert.json")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "herbal_catalog=info,warn".into()),
        )
        .init();

    let args = Args::parse();

    let summary = extend_files(&args.primary, &args.extension, &args.output)
        .with_context(|| format!("Failed to extend {:?} with {:?}", args.primary, args.extension))?;

    println!("Plants before: {}", summary.count_before);
    println!("Plants after:  {}", summary.count_after);
    println!();
    println!("Added:");
    for (common, scientific) in &summary.added {
        println!("  - {} ({})", common, scientific);
    }
    println!();
    println!("Written to {:?}", args.output);
    println!("Review the file, then replace the primary catalog with it.");

    Ok(())
}
