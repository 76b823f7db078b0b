//! Report which catalog plants have an image on disk
//!
//! Usage:
//!   cargo run --bin check_images -- --catalog heilkraeuter_db.json --images images

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use herbal_catalog::images::{ImageProbe, ImageStatus, IMAGE_EXTENSIONS};
use herbal_catalog::CatalogConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "check_images", about = "Check image files referenced by the catalog")]
struct Args {
    /// Catalog document (default: $CATALOG_PATH or heilkraeuter_db.json)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Image directory (default: $IMAGES_DIR or images)
    #[arg(long)]
    images: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "herbal_catalog=warn".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = CatalogConfig::from_env();
    if let Some(catalog) = args.catalog {
        config.catalog_path = catalog;
    }
    if let Some(images) = args.images {
        config.images_dir = images;
    }

    if !config.images_dir.is_dir() {
        bail!("Image directory {:?} does not exist", config.images_dir);
    }

    let catalog = config.load_catalog()?;
    let probe = config.image_probe();
    let report = probe.survey(&catalog);
    let total = catalog.len().max(1) as f64;

    println!("\n{}", "=".repeat(60));
    println!("Image check: {} plants, directory {:?}", catalog.len(), probe.dir());
    println!("{}", "=".repeat(60));
    println!();
    println!("Found:           {:>3} ({:.1}%)", report.found(), report.found() as f64 / total * 100.0);
    println!("Missing:         {:>3} ({:.1}%)", report.missing(), report.missing() as f64 / total * 100.0);
    println!("Wrong extension: {:>3}", report.wrong_extension());
    println!();

    for entry in &report.entries {
        match &entry.status {
            ImageStatus::Found { path } => {
                println!("  ok       {} -> {:?}", entry.common_name, path);
            }
            ImageStatus::WrongExtension { recorded, actual } => {
                println!("  ext      {}: recorded {} but found {:?}", entry.common_name, recorded, actual);
            }
            ImageStatus::Missing { expected } => {
                println!("  missing  {}: expected {:?}", entry.common_name, expected);
            }
        }
    }

    println!();
    println!("Recognised extensions: {}", IMAGE_EXTENSIONS.join(" "));

    Ok(())
}
