//! In-memory plant catalog and its lookup operations
//!
//! The catalog is loaded once and never mutated. All indexes are built at
//! load time; every query is a read over shared data, so a `Catalog` can sit
//! behind an `Arc` and serve any number of callers without locking.

use std::path::Path;
use std::time::Instant;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{CatalogError, Result};
use crate::index::FieldIndex;
use crate::model::{CatalogDocument, PlantRecord};
use crate::months::Month;

/// How duplicate common names are handled at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// Keep every record; name lookup returns the first in catalog order.
    #[default]
    FirstMatch,
    /// Reject the document with [`CatalogError::DuplicateName`].
    Strict,
}

/// Immutable, ordered collection of plant records plus lookup indexes
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<PlantRecord>,
    symptoms: FieldIndex,
    effects: FieldIndex,
    /// Distinct common names, sorted
    names: Vec<String>,
    /// Folded common name -> first position
    name_lookup: FxHashMap<String, usize>,
    /// One posting list per calendar month
    months: [Vec<usize>; 12],
}

impl Catalog {
    /// Parse a catalog document, keeping first-match semantics for duplicate names.
    pub fn load(source: &[u8]) -> Result<Self> {
        Self::load_with(source, NamePolicy::FirstMatch)
    }

    /// Parse a catalog document, rejecting duplicate common names.
    pub fn load_strict(source: &[u8]) -> Result<Self> {
        Self::load_with(source, NamePolicy::Strict)
    }

    pub fn load_with(source: &[u8], policy: NamePolicy) -> Result<Self> {
        let start = Instant::now();
        let document = CatalogDocument::from_slice(source)?;
        let catalog = Self::from_records(document.records, policy)?;

        tracing::info!(
            "Catalog loaded in {:?} ({} plants, {} symptoms, {} effects)",
            start.elapsed(),
            catalog.len(),
            catalog.symptoms.len(),
            catalog.effects.len()
        );

        Ok(catalog)
    }

    /// Read and parse a catalog file
    pub fn open(path: impl AsRef<Path>, policy: NamePolicy) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| CatalogError::io(path, e))?;
        tracing::info!("Loading catalog from {:?}", path);
        Self::load_with(&bytes, policy)
    }

    /// Build a catalog from already-parsed records, preserving their order.
    pub fn from_records(records: Vec<PlantRecord>, policy: NamePolicy) -> Result<Self> {
        let mut name_lookup: FxHashMap<String, usize> = FxHashMap::default();
        for (pos, record) in records.iter().enumerate() {
            let key = name_key(&record.common_name);
            if let Some(&first) = name_lookup.get(&key) {
                match policy {
                    NamePolicy::Strict => {
                        return Err(CatalogError::DuplicateName {
                            name: record.common_name.clone(),
                            first,
                            second: pos,
                        })
                    }
                    NamePolicy::FirstMatch => {
                        tracing::warn!(
                            "Duplicate common name '{}' (records {} and {}); lookups return record {}",
                            record.common_name, first, pos, first
                        );
                    }
                }
            } else {
                name_lookup.insert(key, pos);
            }

            for entry in record.inert_month_entries() {
                tracing::warn!(
                    "'{}' lists unrecognised harvest month '{}'; it will never match",
                    record.common_name, entry
                );
            }
        }

        let symptoms = FieldIndex::build(
            records
                .iter()
                .enumerate()
                .map(|(i, r)| (i, r.symptoms.iter().map(String::as_str))),
        );
        let effects = FieldIndex::build(
            records
                .iter()
                .enumerate()
                .map(|(i, r)| (i, r.effects.iter().map(String::as_str))),
        );
        let mut names: Vec<String> = records.iter().map(|r| r.common_name.clone()).collect();
        names.sort();
        names.dedup();

        let mut months: [Vec<usize>; 12] = Default::default();
        for (pos, record) in records.iter().enumerate() {
            for month in record.harvest_months() {
                let slot = &mut months[month.index()];
                if slot.last() != Some(&pos) {
                    slot.push(pos);
                }
            }
        }

        Ok(Self {
            records,
            symptoms,
            effects,
            names,
            name_lookup,
            months,
        })
    }

    // ------------------------------------------------------------------
    // Listing
    // ------------------------------------------------------------------

    /// Every distinct symptom, sorted ascending
    pub fn list_symptoms(&self) -> &[String] {
        self.symptoms.sorted_keys()
    }

    /// Every distinct effect, sorted ascending
    pub fn list_effects(&self) -> &[String] {
        self.effects.sorted_keys()
    }

    /// Every distinct common name, sorted ascending
    pub fn list_names(&self) -> &[String] {
        &self.names
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Records treating `symptom` (exact, case-sensitive), in catalog order.
    pub fn find_by_symptom(&self, symptom: &str) -> Vec<&PlantRecord> {
        self.collect(self.symptoms.positions(symptom))
    }

    /// Records with pharmacological effect `effect` (exact, case-sensitive), in catalog order.
    pub fn find_by_effect(&self, effect: &str) -> Vec<&PlantRecord> {
        self.collect(self.effects.positions(effect))
    }

    /// Case-insensitive exact match on the common name; first match in catalog order.
    pub fn find_by_name(&self, name: &str) -> Option<&PlantRecord> {
        self.name_lookup
            .get(&name_key(name))
            .map(|&pos| &self.records[pos])
    }

    /// Records harvestable in `month`, in catalog order.
    pub fn find_by_harvest_month(&self, month: Month) -> Vec<&PlantRecord> {
        self.collect(&self.months[month.index()])
    }

    /// Like [`Catalog::find_by_harvest_month`] for a raw month string.
    /// A string that is not a canonical month name finds nothing.
    pub fn find_by_harvest_month_name(&self, month: &str) -> Vec<&PlantRecord> {
        match Month::from_name(month) {
            Some(m) => self.find_by_harvest_month(m),
            None => Vec::new(),
        }
    }

    fn collect(&self, positions: &[usize]) -> Vec<&PlantRecord> {
        positions.iter().map(|&pos| &self.records[pos]).collect()
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    /// All records in source order
    pub fn records(&self) -> &[PlantRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlantRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Document form of this catalog, suitable for writing back to disk
    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            records: self.records.clone(),
        }
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            plant_count: self.records.len(),
            symptom_count: self.symptoms.len(),
            effect_count: self.effects.len(),
            months_with_harvest: self.months.iter().filter(|m| !m.is_empty()).count(),
            plants_with_image: self.records.iter().filter(|r| r.image_path.is_some()).count(),
        }
    }
}

/// Lookup key for common names. Lower-casing alone keeps `ß` apart from its
/// upper-case spelling `SS`, so it is expanded after lower-casing.
fn name_key(name: &str) -> String {
    name.to_lowercase().replace('ß', "ss")
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a PlantRecord;
    type IntoIter = std::slice::Iter<'a, PlantRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub plant_count: usize,
    pub symptom_count: usize,
    pub effect_count: usize,
    pub months_with_harvest: usize,
    pub plants_with_image: usize,
}
