//! Herbal Catalog
//!
//! Searchable reference catalog of European medicinal plants.
//!
//! The catalog is a static JSON document loaded once into memory:
//! - `catalog/`: load, sorted tag lists, lookup by symptom, effect, name and harvest month
//! - `resolver/`: tiered reconciliation of external scientific names against the catalog
//! - `extend/`, `images/`: offline dataset maintenance (merging, image checks)
//! - `api_server/` (feature `api`): JSON API over the catalog

pub mod error;
pub mod months;
pub mod model;
pub mod index;
pub mod catalog;
pub mod resolver;
pub mod extend;
pub mod images;
pub mod config;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use error::CatalogError;
pub use months::Month;
pub use model::{CatalogDocument, PlantRecord};
pub use catalog::{Catalog, CatalogStats, NamePolicy};
pub use resolver::{resolve, IdentificationCandidate, MatchTier, NameResolver, Reconciled, Resolution};
pub use config::CatalogConfig;

#[cfg(feature = "api")]
pub use api_server::{AppState, create_router};
