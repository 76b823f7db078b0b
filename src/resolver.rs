//! Scientific-name reconciliation
//!
//! An image identification service reports species as free-form scientific
//! names ("Matricaria chamomilla L.", "matricaria recutita", ...). The
//! resolver maps such a string onto a catalog record with three tiers,
//! tried in order; the first tier that matches any record wins:
//!
//! 1. `Exact`        - whole normalized name equal
//! 2. `GenusSpecies` - first two whitespace tokens equal
//! 3. `Genus`        - record name starts with the query's first token
//!
//! Normalization is trim + lower-case on both sides. Within a tier, records
//! are tried in catalog order. Two catalog species of the same genus are
//! therefore indistinguishable at tier 3: the first one listed wins.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::Catalog;
use crate::model::PlantRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    GenusSpecies,
    Genus,
}

impl MatchTier {
    pub const ORDER: [MatchTier; 3] = [MatchTier::Exact, MatchTier::GenusSpecies, MatchTier::Genus];
}

/// A matched record and the tier that produced the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution<'a> {
    pub record: &'a PlantRecord,
    pub tier: MatchTier,
}

/// One ranked result from the identification service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentificationCandidate {
    pub scientific_name: String,
    /// Service confidence, passed through untouched
    #[serde(default)]
    pub score: f64,
}

/// An identification candidate paired with its catalog match, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciled<'a> {
    pub scientific_name: String,
    pub score: f64,
    pub record: Option<&'a PlantRecord>,
    pub tier: Option<MatchTier>,
}

/// Normalized view of a scientific name
struct NormalizedName {
    full: String,
}

impl NormalizedName {
    fn new(raw: &str) -> Self {
        Self {
            full: raw.trim().to_lowercase(),
        }
    }

    /// Up to two leading tokens (genus, species)
    fn genus_species(&self) -> SmallVec<[&str; 2]> {
        self.full.split_whitespace().take(2).collect()
    }

    fn genus(&self) -> Option<&str> {
        self.full.split_whitespace().next()
    }
}

/// Resolver bound to one catalog, with candidate names normalized up front
pub struct NameResolver<'a> {
    catalog: &'a Catalog,
    candidates: Vec<NormalizedName>,
}

impl<'a> NameResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        let candidates = catalog
            .iter()
            .map(|r| NormalizedName::new(&r.scientific_name))
            .collect();
        Self { catalog, candidates }
    }

    /// Best catalog record for `raw_name`, or `None`.
    pub fn resolve(&self, raw_name: &str) -> Option<&'a PlantRecord> {
        self.resolve_with_tier(raw_name).map(|r| r.record)
    }

    /// Like [`NameResolver::resolve`], also reporting which tier matched.
    pub fn resolve_with_tier(&self, raw_name: &str) -> Option<Resolution<'a>> {
        let query = NormalizedName::new(raw_name);
        // An empty genus would prefix-match every record
        query.genus()?;

        for tier in MatchTier::ORDER {
            if let Some(pos) = self.candidates.iter().position(|c| tier_matches(tier, &query, c)) {
                let record = &self.catalog.records()[pos];
                tracing::debug!(
                    "Resolved '{}' to '{}' via {:?}",
                    raw_name.trim(),
                    record.scientific_name,
                    tier
                );
                return Some(Resolution { record, tier });
            }
        }

        tracing::debug!("No catalog match for '{}'", raw_name.trim());
        None
    }

    /// Match every identification candidate, keeping the service's ranking.
    pub fn reconcile(&self, candidates: &[IdentificationCandidate]) -> Vec<Reconciled<'a>> {
        candidates
            .iter()
            .map(|c| {
                let resolution = self.resolve_with_tier(&c.scientific_name);
                Reconciled {
                    scientific_name: c.scientific_name.clone(),
                    score: c.score,
                    record: resolution.map(|r| r.record),
                    tier: resolution.map(|r| r.tier),
                }
            })
            .collect()
    }
}

fn tier_matches(tier: MatchTier, query: &NormalizedName, candidate: &NormalizedName) -> bool {
    match tier {
        MatchTier::Exact => query.full == candidate.full,
        MatchTier::GenusSpecies => {
            // A one-token candidate is compared against the query's first token only
            let candidate = candidate.genus_species();
            let query = query.genus_species();
            !candidate.is_empty()
                && query.len() >= candidate.len()
                && query[..candidate.len()] == candidate[..]
        }
        MatchTier::Genus => query
            .genus()
            .is_some_and(|genus| candidate.full.starts_with(genus)),
    }
}

/// One-shot resolution without keeping a resolver around
pub fn resolve<'a>(raw_name: &str, catalog: &'a Catalog) -> Option<&'a PlantRecord> {
    NameResolver::new(catalog).resolve(raw_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NamePolicy;
    use serde_json::json;

    fn catalog(latin_names: &[&str]) -> Catalog {
        let records: Vec<serde_json::Value> = latin_names
            .iter()
            .enumerate()
            .map(|(i, latin)| {
                json!({
                    "deutsch": format!("Pflanze {}", i),
                    "lateinisch": latin,
                    "symptome": ["Husten"],
                    "wirkung": ["schleimlösend"],
                    "zubereitung": "Tee",
                    "bluete_erntezeit": "Sommer",
                    "vorkommen": "Garten",
                    "nahrungsmittel": "-",
                    "nebenwirkungen": "-",
                    "kontraindikationen": "-"
                })
            })
            .collect();
        let bytes = serde_json::to_vec(&json!({ "pflanzen": records })).unwrap();
        Catalog::load_with(&bytes, NamePolicy::FirstMatch).unwrap()
    }

    #[test]
    fn test_exact_match_after_normalization() {
        let cat = catalog(&["Salvia officinalis", "Matricaria chamomilla L."]);
        let resolver = NameResolver::new(&cat);

        let hit = resolver.resolve_with_tier("  MATRICARIA chamomilla l.  ").unwrap();
        assert_eq!(hit.record.common_name, "Pflanze 1");
        assert_eq!(hit.tier, MatchTier::Exact);
    }

    #[test]
    fn test_genus_species_ignores_authority() {
        let cat = catalog(&["Salvia officinalis", "Matricaria chamomilla L."]);
        let resolver = NameResolver::new(&cat);

        let hit = resolver.resolve_with_tier("matricaria chamomilla").unwrap();
        assert_eq!(hit.record.common_name, "Pflanze 1");
        assert_eq!(hit.tier, MatchTier::GenusSpecies);

        let hit = resolver.resolve_with_tier("Salvia officinalis Mill.").unwrap();
        assert_eq!(hit.record.common_name, "Pflanze 0");
        assert_eq!(hit.tier, MatchTier::GenusSpecies);
    }

    #[test]
    fn test_genus_collision_takes_first_in_catalog_order() {
        let cat = catalog(&["Mentha spicata", "Matricaria chamomilla L.", "Matricaria discoidea"]);
        let resolver = NameResolver::new(&cat);

        let hit = resolver.resolve_with_tier("Matricaria recutita Smith").unwrap();
        assert_eq!(hit.tier, MatchTier::Genus);
        assert_eq!(hit.record.scientific_name, "Matricaria chamomilla L.");
    }

    #[test]
    fn test_earlier_tier_beats_earlier_record() {
        // Record 0 would satisfy tier 3, record 1 satisfies tier 1
        let cat = catalog(&["Mentha spicata", "Mentha x piperita"]);
        let hit = NameResolver::new(&cat).resolve_with_tier("Mentha x piperita").unwrap();
        assert_eq!(hit.tier, MatchTier::Exact);
        assert_eq!(hit.record.common_name, "Pflanze 1");
    }

    #[test]
    fn test_single_token_candidate() {
        let cat = catalog(&["Taraxacum"]);
        let resolver = NameResolver::new(&cat);

        let hit = resolver.resolve_with_tier("Taraxacum").unwrap();
        assert_eq!(hit.tier, MatchTier::Exact);

        let hit = resolver.resolve_with_tier("Taraxacum officinale").unwrap();
        assert_eq!(hit.tier, MatchTier::GenusSpecies);
    }

    #[test]
    fn test_genus_only_entry_beats_other_species_at_tier_two() {
        let cat = catalog(&["Mentha spicata", "Mentha"]);
        let resolver = NameResolver::new(&cat);

        let hit = resolver.resolve_with_tier("Mentha piperita").unwrap();
        assert_eq!(hit.tier, MatchTier::GenusSpecies);
        assert_eq!(hit.record.common_name, "Pflanze 1");

        // The bare genus is an exact hit on the genus-only entry
        let hit = resolver.resolve_with_tier("Mentha").unwrap();
        assert_eq!(hit.tier, MatchTier::Exact);
        assert_eq!(hit.record.common_name, "Pflanze 1");
    }

    #[test]
    fn test_no_match_and_blank_query() {
        let cat = catalog(&["Salvia officinalis"]);
        let resolver = NameResolver::new(&cat);
        assert!(resolver.resolve("Zzyxia nonexistens").is_none());
        assert!(resolver.resolve("").is_none());
        assert!(resolver.resolve("   ").is_none());
        assert!(resolve("Salvia pratensis", &cat).is_some());
    }

    #[test]
    fn test_reconcile_keeps_service_ranking() {
        let cat = catalog(&["Salvia officinalis", "Matricaria chamomilla L."]);
        let candidates = vec![
            IdentificationCandidate { scientific_name: "Zzyxia nonexistens".into(), score: 0.61 },
            IdentificationCandidate { scientific_name: "Matricaria chamomilla".into(), score: 0.22 },
        ];

        let out = NameResolver::new(&cat).reconcile(&candidates);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].scientific_name, "Zzyxia nonexistens");
        assert!(out[0].record.is_none());
        assert_eq!(out[0].tier, None);
        assert_eq!(out[1].record.unwrap().common_name, "Pflanze 1");
        assert_eq!(out[1].tier, Some(MatchTier::GenusSpecies));
        assert_eq!(out[1].score, 0.22);
    }
}
