//! Query the catalog from the command line
//!
//! Usage:
//!   cargo run --bin inspect_catalog -- symptoms
//!   cargo run --bin inspect_catalog -- symptom Erkältung
//!   cargo run --bin inspect_catalog -- month            (current month)
//!   cargo run --bin inspect_catalog -- resolve "Matricaria chamomilla"

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use herbal_catalog::{CatalogConfig, Month, NameResolver, PlantRecord};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inspect_catalog", about = "Look up plants in the catalog")]
struct Args {
    /// Catalog document (default: $CATALOG_PATH or heilkraeuter_db.json)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summary counts
    Stats,
    /// All distinct symptoms
    Symptoms,
    /// All distinct effects
    Effects,
    /// All plant names
    Names,
    /// Plants treating a symptom
    Symptom { symptom: String },
    /// Plants with an effect
    Effect { effect: String },
    /// One plant by name (case-insensitive)
    Plant { name: String },
    /// Plants harvested in a month (default: current month)
    Month { month: Option<String> },
    /// Match a scientific name against the catalog
    Resolve { scientific_name: String },
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
    let catalog = config.load_catalog()?;

    match args.command {
        Command::Stats => {
            println!("{}", serde_json::to_string_pretty(&catalog.stats())?);
        }
        Command::Symptoms => print_list(catalog.list_symptoms()),
        Command::Effects => print_list(catalog.list_effects()),
        Command::Names => print_list(catalog.list_names()),
        Command::Symptom { symptom } => {
            print_plants(&format!("for '{}'", symptom), &catalog.find_by_symptom(&symptom));
        }
        Command::Effect { effect } => {
            print_plants(&format!("with effect '{}'", effect), &catalog.find_by_effect(&effect));
        }
        Command::Plant { name } => match catalog.find_by_name(&name) {
            Some(plant) => println!("{}", serde_json::to_string_pretty(plant)?),
            None => println!("No plant named '{}'", name),
        },
        Command::Month { month } => {
            let month = month.unwrap_or_else(|| Month::current().name().to_string());
            print_plants(
                &format!("harvested in {}", month),
                &catalog.find_by_harvest_month_name(&month),
            );
        }
        Command::Resolve { scientific_name } => {
            match NameResolver::new(&catalog).resolve_with_tier(&scientific_name) {
                Some(hit) => println!(
                    "{} -> {} ({}) via {:?}",
                    scientific_name, hit.record.common_name, hit.record.scientific_name, hit.tier
                ),
                None => println!("{} -> no catalog match", scientific_name),
            }
        }
    }

    Ok(())
}

fn print_list(items: &[String]) {
    for item in items {
        println!("{}", item);
    }
}

fn print_plants(label: &str, plants: &[&PlantRecord]) {
    println!("{} plant(s) {}:", plants.len(), label);
    for plant in plants {
        println!("  - {} ({})", plant.common_name, plant.scientific_name);
    }
}
