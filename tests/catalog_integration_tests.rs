//! Catalog Integration Tests
//!
//! Loads the sample catalog and checks the lookup contracts against a plain
//! linear scan over the records.

use herbal_catalog::{
    Catalog, CatalogError, MatchTier, Month, NamePolicy, NameResolver, PlantRecord,
};

const SAMPLE: &[u8] = include_bytes!("fixtures/heilkraeuter_sample.json");

fn sample_catalog() -> Catalog {
    Catalog::load(SAMPLE).expect("sample catalog should load")
}

fn names(records: &[&PlantRecord]) -> Vec<String> {
    records.iter().map(|r| r.common_name.clone()).collect()
}

fn assert_sorted_distinct(items: &[String]) {
    for pair in items.windows(2) {
        assert!(pair[0] < pair[1], "{:?} not strictly ascending", pair);
    }
}

// =========================================================================
// Loading
// =========================================================================

#[test]
fn test_sample_loads_in_source_order() {
    let catalog = sample_catalog();
    assert_eq!(catalog.len(), 7);

    let order: Vec<&str> = catalog.iter().map(|r| r.common_name.as_str()).collect();
    assert_eq!(
        order,
        vec![
            "Salbei",
            "Echte Kamille",
            "Pfefferminze",
            "Große Brennnessel",
            "Strahlenlose Kamille",
            "Thymian",
            "Mistel",
        ]
    );
}

#[test]
fn test_sample_is_strictly_unique() {
    assert!(Catalog::load_with(SAMPLE, NamePolicy::Strict).is_ok());
}

#[test]
fn test_round_trip_preserves_records() {
    let catalog = sample_catalog();
    let json = catalog.to_document().to_json_pretty().unwrap();
    let reloaded = Catalog::load(json.as_bytes()).unwrap();

    assert_eq!(catalog.records(), reloaded.records());
}

#[test]
fn test_load_is_all_or_nothing() {
    let mut doc: serde_json::Value = serde_json::from_slice(SAMPLE).unwrap();
    doc["pflanzen"][4]
        .as_object_mut()
        .unwrap()
        .remove("kontraindikationen");
    let bytes = serde_json::to_vec(&doc).unwrap();

    match Catalog::load(&bytes) {
        Err(CatalogError::Malformed { record, reason }) => {
            assert_eq!(record, Some(4));
            assert!(reason.contains("kontraindikationen"));
        }
        other => panic!("expected Malformed, got {:?}", other.map(|c| c.len())),
    }
}

// =========================================================================
// Sorted lists
// =========================================================================

#[test]
fn test_lists_sorted_without_duplicates() {
    let catalog = sample_catalog();
    assert_sorted_distinct(catalog.list_symptoms());
    assert_sorted_distinct(catalog.list_effects());
    assert_sorted_distinct(catalog.list_names());

    // "krampflösend" appears on four plants but is listed once
    let count = catalog
        .list_effects()
        .iter()
        .filter(|e| e.as_str() == "krampflösend")
        .count();
    assert_eq!(count, 1);
    assert_eq!(catalog.list_names().len(), catalog.len());
}

// =========================================================================
// Lookups vs linear scan
// =========================================================================

#[test]
fn test_find_by_symptom_matches_linear_scan() {
    let catalog = sample_catalog();
    for symptom in catalog.list_symptoms() {
        let found = catalog.find_by_symptom(symptom);
        let expected: Vec<&PlantRecord> =
            catalog.iter().filter(|r| r.symptoms.contains(symptom)).collect();

        assert!(!found.is_empty());
        assert_eq!(found, expected, "symptom {}", symptom);
        assert!(found.iter().all(|r| r.has_symptom(symptom)));
    }
}

#[test]
fn test_find_by_effect_matches_linear_scan() {
    let catalog = sample_catalog();
    for effect in catalog.list_effects() {
        let found = catalog.find_by_effect(effect);
        let expected: Vec<&PlantRecord> =
            catalog.iter().filter(|r| r.effects.contains(effect)).collect();
        assert_eq!(found, expected, "effect {}", effect);
    }

    assert_eq!(
        names(&catalog.find_by_effect("krampflösend")),
        vec!["Echte Kamille", "Pfefferminze", "Strahlenlose Kamille", "Thymian"]
    );
}

#[test]
fn test_unknown_symptom_is_empty_not_error() {
    let catalog = sample_catalog();
    assert!(catalog.find_by_symptom("Schluckauf").is_empty());
    assert!(catalog.find_by_symptom("erkältung").is_empty());
    assert!(catalog.find_by_symptom("").is_empty());
}

#[test]
fn test_find_by_name_any_casing() {
    let catalog = sample_catalog();
    for record in catalog.records() {
        for query in [
            record.common_name.clone(),
            record.common_name.to_lowercase(),
            record.common_name.to_uppercase(),
        ] {
            let found = catalog.find_by_name(&query).expect("name should resolve");
            assert_eq!(found, record);
        }
    }
    assert!(catalog.find_by_name("Brennnessel").is_none());
}

#[test]
fn test_find_by_harvest_month() {
    let catalog = sample_catalog();

    assert_eq!(names(&catalog.find_by_harvest_month(Month::Januar)), vec!["Mistel"]);
    assert!(catalog.find_by_harvest_month(Month::Februar).is_empty());
    assert_eq!(
        names(&catalog.find_by_harvest_month_name("März")),
        vec!["Große Brennnessel"]
    );

    for month in Month::ALL {
        let found = catalog.find_by_harvest_month(month);
        let expected: Vec<&PlantRecord> =
            catalog.iter().filter(|r| r.is_harvested_in(month)).collect();
        assert_eq!(found, expected, "month {}", month);
    }

    // "Frühling" is stored on a record but is not a month
    assert!(catalog.find_by_harvest_month_name("Frühling").is_empty());
    assert_eq!(
        catalog.find_by_name("Große Brennnessel").unwrap().harvest_month_entries.len(),
        4
    );
}

// =========================================================================
// Name resolution
// =========================================================================

#[test]
fn test_resolver_tiers_on_sample() {
    let catalog = sample_catalog();
    let resolver = NameResolver::new(&catalog);

    let hit = resolver.resolve_with_tier("matricaria chamomilla").unwrap();
    assert_eq!(hit.record.common_name, "Echte Kamille");
    assert!(matches!(hit.tier, MatchTier::Exact | MatchTier::GenusSpecies));

    // Different species of the same genus: first Matricaria in catalog order
    let hit = resolver.resolve_with_tier("Matricaria recutita Smith").unwrap();
    assert_eq!(hit.tier, MatchTier::Genus);
    assert_eq!(hit.record.common_name, "Echte Kamille");

    let hit = resolver.resolve_with_tier("Matricaria discoidea").unwrap();
    assert_eq!(hit.tier, MatchTier::GenusSpecies);
    assert_eq!(hit.record.common_name, "Strahlenlose Kamille");

    assert!(resolver.resolve("Zzyxia nonexistens").is_none());
}

#[test]
fn test_every_record_resolves_to_itself() {
    let catalog = sample_catalog();
    let resolver = NameResolver::new(&catalog);
    for record in catalog.records() {
        let hit = resolver.resolve_with_tier(&record.scientific_name).unwrap();
        assert_eq!(hit.record, record);
        assert_eq!(hit.tier, MatchTier::Exact);
    }
}

// =========================================================================
// Sharing
// =========================================================================

#[test]
fn test_catalog_shared_across_threads() {
    let catalog = std::sync::Arc::new(sample_catalog());

    std::thread::scope(|scope| {
        for symptom in ["Erkältung", "Husten", "Rheuma"] {
            let catalog = std::sync::Arc::clone(&catalog);
            scope.spawn(move || {
                assert!(!catalog.find_by_symptom(symptom).is_empty());
                assert!(NameResolver::new(&catalog).resolve("Thymus vulgaris").is_some());
            });
        }
    });
}
