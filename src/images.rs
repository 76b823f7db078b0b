//! Image file probing for plant records
//!
//! Records reference images as relative paths (`images/kamille.png`), but
//! files on disk are often saved with another extension. The probe looks for
//! the referenced file first, then for the same stem with each known
//! extension. Records without an image reference get a stem derived from
//! their common name: lower-cased, whitespace removed
//! (`Echte Kamille` -> `echtekamille`).

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::catalog::Catalog;
use crate::model::PlantRecord;

/// Extension variants, probed in this order
pub const IMAGE_EXTENSIONS: [&str; 8] = [
    ".webp", ".jpg", ".jpeg", ".png", ".WEBP", ".JPG", ".JPEG", ".PNG",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageStatus {
    /// The referenced (or derived) file exists
    Found { path: PathBuf },
    /// The referenced file is missing but the stem exists with another extension
    WrongExtension { recorded: String, actual: PathBuf },
    /// Nothing found under any variant
    Missing { expected: PathBuf },
}

impl ImageStatus {
    /// File to display, if one exists
    pub fn path(&self) -> Option<&Path> {
        match self {
            ImageStatus::Found { path } => Some(path),
            ImageStatus::WrongExtension { actual, .. } => Some(actual),
            ImageStatus::Missing { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    pub common_name: String,
    #[serde(flatten)]
    pub status: ImageStatus,
}

/// Per-record probe results for a whole catalog, in catalog order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImageReport {
    pub entries: Vec<ImageEntry>,
}

impl ImageReport {
    pub fn found(&self) -> usize {
        self.count(|s| matches!(s, ImageStatus::Found { .. }))
    }

    pub fn wrong_extension(&self) -> usize {
        self.count(|s| matches!(s, ImageStatus::WrongExtension { .. }))
    }

    pub fn missing(&self) -> usize {
        self.count(|s| matches!(s, ImageStatus::Missing { .. }))
    }

    fn count(&self, pred: impl Fn(&ImageStatus) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.status)).count()
    }
}

#[derive(Debug, Clone)]
pub struct ImageProbe {
    dir: PathBuf,
}

impl ImageProbe {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn locate(&self, record: &PlantRecord) -> ImageStatus {
        match record.image_path.as_deref() {
            Some(recorded) => self.locate_recorded(recorded),
            None => self.locate_derived(&derived_stem(&record.common_name)),
        }
    }

    fn locate_recorded(&self, recorded: &str) -> ImageStatus {
        let file_name = Path::new(recorded)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(recorded));
        let expected = self.dir.join(&file_name);

        if expected.is_file() {
            return ImageStatus::Found { path: expected };
        }

        let stem = expected
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self.probe_variants(&stem) {
            Some(actual) => ImageStatus::WrongExtension {
                recorded: recorded.to_string(),
                actual,
            },
            None => ImageStatus::Missing { expected },
        }
    }

    fn locate_derived(&self, stem: &str) -> ImageStatus {
        match self.probe_variants(stem) {
            Some(path) => ImageStatus::Found { path },
            None => ImageStatus::Missing {
                expected: self.dir.join(format!("{}{}", stem, IMAGE_EXTENSIONS[0])),
            },
        }
    }

    fn probe_variants(&self, stem: &str) -> Option<PathBuf> {
        if stem.is_empty() {
            return None;
        }
        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}{}", stem, ext)))
            .find(|p| p.is_file())
    }

    pub fn survey(&self, catalog: &Catalog) -> ImageReport {
        let entries = catalog
            .iter()
            .map(|r| ImageEntry {
                common_name: r.common_name.clone(),
                status: self.locate(r),
            })
            .collect();
        ImageReport { entries }
    }
}

/// File stem derived from a common name
pub fn derived_stem(common_name: &str) -> String {
    common_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
