//! Plant records and the on-disk catalog document
//!
//! Field names follow the historical dataset file (`heilkraeuter_db.json`):
//! a top-level `pflanzen` array whose entries carry German keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::months::Month;

/// Top-level key holding the record collection.
pub const RECORDS_KEY: &str = "pflanzen";

/// One medicinal plant entry
///
/// Immutable once loaded. Tag lists keep their source order for display;
/// membership tests are exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantRecord {
    /// Common (German) name, the key for name lookup
    #[serde(rename = "deutsch")]
    pub common_name: String,

    /// Binomial, possibly followed by authority or variety tokens
    #[serde(rename = "lateinisch")]
    pub scientific_name: String,

    #[serde(rename = "symptome")]
    pub symptoms: Vec<String>,

    #[serde(rename = "wirkung")]
    pub effects: Vec<String>,

    #[serde(rename = "zubereitung")]
    pub preparation: String,

    /// Free text, e.g. "Mai bis August"
    #[serde(rename = "bluete_erntezeit")]
    pub bloom_harvest_period: String,

    /// Raw month entries as stored. See [`PlantRecord::harvest_months`].
    #[serde(rename = "erntemonate", default, skip_serializing_if = "Vec::is_empty")]
    pub harvest_month_entries: Vec<String>,

    #[serde(rename = "vorkommen")]
    pub occurrence: String,

    #[serde(rename = "nahrungsmittel")]
    pub food_use: String,

    #[serde(rename = "nebenwirkungen")]
    pub side_effects: String,

    #[serde(rename = "kontraindikationen")]
    pub contraindications: String,

    /// Relative image reference, not validated here
    #[serde(rename = "bild", default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

impl PlantRecord {
    pub fn has_symptom(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|s| s == symptom)
    }

    pub fn has_effect(&self, effect: &str) -> bool {
        self.effects.iter().any(|e| e == effect)
    }

    /// Recognised harvest months, in stored order. Unrecognised entries are skipped.
    pub fn harvest_months(&self) -> impl Iterator<Item = Month> + '_ {
        self.harvest_month_entries
            .iter()
            .filter_map(|m| Month::from_name(m))
    }

    pub fn is_harvested_in(&self, month: Month) -> bool {
        self.harvest_months().any(|m| m == month)
    }

    /// Stored month entries that are not canonical month names
    pub fn inert_month_entries(&self) -> impl Iterator<Item = &str> + '_ {
        self.harvest_month_entries
            .iter()
            .map(|m| m.as_str())
            .filter(|m| Month::from_name(m).is_none())
    }

    /// Deserialize and validate a single record value.
    ///
    /// `index` is the record's position in its document, used for error reporting.
    pub fn from_value(index: usize, value: Value) -> Result<Self> {
        let record: PlantRecord = serde_json::from_value(value)
            .map_err(|e| CatalogError::malformed_record(index, e.to_string()))?;
        record.validate(index)?;
        Ok(record)
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.symptoms.is_empty() {
            return Err(CatalogError::malformed_record(
                index,
                format!("'{}' has no symptoms", self.common_name),
            ));
        }
        if self.effects.is_empty() {
            return Err(CatalogError::malformed_record(
                index,
                format!("'{}' has no effects", self.common_name),
            ));
        }
        Ok(())
    }
}

/// Serialized form of a whole catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogDocument {
    #[serde(rename = "pflanzen")]
    pub records: Vec<PlantRecord>,
}

impl CatalogDocument {
    /// Parse a document from raw bytes.
    ///
    /// Every record is validated; the first bad record aborts the parse.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let root: Value = serde_json::from_slice(bytes)
            .map_err(|e| CatalogError::malformed(format!("invalid JSON: {}", e)))?;
        Self::from_value_with_key(root, RECORDS_KEY)
    }

    /// Parse the record array stored under `key` in a JSON object.
    pub fn from_value_with_key(root: Value, key: &str) -> Result<Self> {
        let mut object = match root {
            Value::Object(map) => map,
            other => {
                return Err(CatalogError::malformed(format!(
                    "expected a JSON object at top level, found {}",
                    json_kind(&other)
                )))
            }
        };

        let entries = match object.remove(key) {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(CatalogError::malformed(format!(
                    "'{}' must be an array, found {}",
                    key,
                    json_kind(&other)
                )))
            }
            None => {
                return Err(CatalogError::malformed(format!(
                    "missing '{}' collection",
                    key
                )))
            }
        };

        let records = entries
            .into_iter()
            .enumerate()
            .map(|(i, v)| PlantRecord::from_value(i, v))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { records })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(CatalogError::Serialize)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
