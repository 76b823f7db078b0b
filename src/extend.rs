//! Offline dataset extension
//!
//! Appends the records of an extension document to a primary catalog
//! document and writes the result as a new file. The catalog itself never
//! changes at runtime; the merged file is simply the next `load()` input.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::model::{CatalogDocument, RECORDS_KEY};

/// Key used by extension files for their new records
pub const EXTENSION_KEY: &str = "neue_pflanzen";

/// Outcome of a file-level extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionSummary {
    pub count_before: usize,
    pub count_after: usize,
    /// (common name, scientific name) of every appended record
    pub added: Vec<(String, String)>,
}

/// Parse an extension document. Records are read from `neue_pflanzen`,
/// falling back to `pflanzen` so a full catalog can serve as an extension.
pub fn parse_extension(bytes: &[u8]) -> Result<CatalogDocument> {
    let root: Value = serde_json::from_slice(bytes)
        .map_err(|e| CatalogError::malformed(format!("invalid JSON: {}", e)))?;

    let key = if root.get(EXTENSION_KEY).is_some() {
        EXTENSION_KEY
    } else {
        RECORDS_KEY
    };
    CatalogDocument::from_value_with_key(root, key)
}

/// Primary records first, then extension records, both in their own order.
pub fn extend_document(primary: CatalogDocument, extension: CatalogDocument) -> CatalogDocument {
    let mut records = primary.records;
    records.extend(extension.records);
    CatalogDocument { records }
}

/// Read both documents, merge them, and write the result to `output`.
pub fn extend_files(primary: &Path, extension: &Path, output: &Path) -> Result<ExtensionSummary> {
    let primary_bytes = std::fs::read(primary).map_err(|e| CatalogError::io(primary, e))?;
    let extension_bytes = std::fs::read(extension).map_err(|e| CatalogError::io(extension, e))?;

    let primary_doc = CatalogDocument::from_slice(&primary_bytes)?;
    let extension_doc = parse_extension(&extension_bytes)?;

    let count_before = primary_doc.records.len();
    let added = extension_doc
        .records
        .iter()
        .map(|r| (r.common_name.clone(), r.scientific_name.clone()))
        .collect();

    let merged = extend_document(primary_doc, extension_doc);
    let count_after = merged.records.len();

    let json = merged.to_json_pretty()?;
    std::fs::write(output, json).map_err(|e| CatalogError::io(output, e))?;

    tracing::info!(
        "Extended catalog {:?} with {:?}: {} -> {} plants, written to {:?}",
        primary,
        extension,
        count_before,
        count_after,
        output
    );

    Ok(ExtensionSummary {
        count_before,
        count_after,
        added,
    })
}
