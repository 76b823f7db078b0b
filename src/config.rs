//! Runtime configuration from environment variables
//!
//! | Variable       | Default                 |
//! |----------------|-------------------------|
//! | `CATALOG_PATH` | `heilkraeuter_db.json`  |
//! | `IMAGES_DIR`   | `images`                |
//! | `PORT`         | `3000`                  |
//! | `STRICT_NAMES` | off (`1`/`true` = on)   |

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::catalog::{Catalog, NamePolicy};
use crate::images::ImageProbe;

pub const DEFAULT_CATALOG_PATH: &str = "heilkraeuter_db.json";
pub const DEFAULT_IMAGES_DIR: &str = "images";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub catalog_path: PathBuf,
    pub images_dir: PathBuf,
    pub port: u16,
    pub name_policy: NamePolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            port: DEFAULT_PORT,
            name_policy: NamePolicy::FirstMatch,
        }
    }
}

impl CatalogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let catalog_path = lookup("CATALOG_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.catalog_path);

        let images_dir = lookup("IMAGES_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.images_dir);

        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(defaults.port);

        let strict = lookup("STRICT_NAMES")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            catalog_path,
            images_dir,
            port,
            name_policy: if strict { NamePolicy::Strict } else { NamePolicy::FirstMatch },
        }
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        Catalog::open(&self.catalog_path, self.name_policy)
            .with_context(|| format!("Failed to load catalog: {:?}", self.catalog_path))
    }

    pub fn image_probe(&self) -> ImageProbe {
        ImageProbe::new(&self.images_dir)
    }

    pub fn log_summary(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  CATALOG_PATH: {:?}", self.catalog_path);
        tracing::info!("  IMAGES_DIR: {:?}", self.images_dir);
        tracing::info!("  PORT: {}", self.port);
        tracing::info!("  STRICT_NAMES: {}", self.name_policy == NamePolicy::Strict);
    }
}
