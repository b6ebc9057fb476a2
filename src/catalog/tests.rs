use std::io::Write;

use super::*;

fn dataset_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp dataset");
    file.write_all(json.as_bytes()).expect("write dataset");
    file
}

#[test]
fn load_groups_preserve_order_and_defaults() {
    let file = dataset_file(
        r#"[
            {"original_id": "P1", "replacement_id": "R1", "name": "Gentle Lotion",
             "brand": "Acme", "category": "baby care", "price": 9.99,
             "brand_popularity": 7.0, "country": "USA", "reason_code": "tariff"},
            {"original_id": "P1", "replacement_id": "R2", "name": "Soft Wipes",
             "brand": "Beta", "category": "baby care", "price": 4.5},
            {"original_id": "P2", "replacement_id": "R3", "name": "Snack Bar",
             "brand": "Gamma", "category": "snacks", "price": 2.0}
        ]"#,
    );

    let store = CandidateStore::load_json(file.path()).expect("load dataset");
    assert_eq!(store.len(), 2);

    let group = store.group_for("P1").expect("group for P1");
    assert_eq!(group.len(), 2);
    assert_eq!(group[0].id, "R1");
    assert_eq!(group[0].reason_code, Some(ReasonCode::Tariff));
    assert_eq!(group[1].id, "R2");

    // Defaulted columns.
    assert_eq!(group[1].brand_popularity, DEFAULT_BRAND_POPULARITY);
    assert_eq!(group[1].country, DEFAULT_COUNTRY);
    assert_eq!(group[1].reason_code, None);

    assert!(store.group_for("P999").is_none());
}

#[test]
fn load_rejects_empty_dataset() {
    let file = dataset_file("[]");
    let err = CandidateStore::load_json(file.path()).unwrap_err();
    assert!(matches!(err, CatalogError::Empty { .. }));
}

#[test]
fn load_rejects_malformed_json() {
    let file = dataset_file("{not json");
    let err = CandidateStore::load_json(file.path()).unwrap_err();
    assert!(matches!(err, CatalogError::Parse { .. }));
}

#[test]
fn load_skips_records_with_empty_ids() {
    let file = dataset_file(
        r#"[
            {"original_id": "", "replacement_id": "R1", "name": "X", "brand": "B",
             "category": "c", "price": 1.0},
            {"original_id": "P1", "replacement_id": "R2", "name": "Y", "brand": "B",
             "category": "c", "price": 1.0}
        ]"#,
    );

    let store = CandidateStore::load_json(file.path()).expect("load dataset");
    assert_eq!(store.len(), 1);
    assert_eq!(store.group_for("P1").unwrap().len(), 1);
}

#[test]
fn negative_price_is_clamped() {
    let file = dataset_file(
        r#"[{"original_id": "P1", "replacement_id": "R1", "name": "X", "brand": "B",
             "category": "c", "price": -3.0}]"#,
    );

    let store = CandidateStore::load_json(file.path()).expect("load dataset");
    assert_eq!(store.group_for("P1").unwrap()[0].price, 0.0);
}

#[test]
fn distinct_candidates_dedupes_by_id() {
    let candidate = Candidate {
        id: "R1".to_string(),
        name: "X".to_string(),
        brand: "B".to_string(),
        category: "c".to_string(),
        price: 1.0,
        brand_popularity: 5.0,
        country: "USA".to_string(),
        reason_code: None,
    };

    let store = CandidateStore::from_groups([
        ("P1".to_string(), vec![candidate.clone()]),
        ("P2".to_string(), vec![candidate.clone()]),
    ]);

    assert_eq!(store.distinct_candidates().len(), 1);
}

#[test]
fn reason_code_round_trips_lowercase() {
    for code in ReasonCode::ALL {
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, format!("\"{}\"", code.as_str()));
        let back: ReasonCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }
}
