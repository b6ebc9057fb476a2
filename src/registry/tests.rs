use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::catalog::Candidate;
use crate::index::MockSimilarityIndex;
use crate::oracle::MockSelectionOracle;

fn candidate(id: &str, brand: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: format!("Product {id}"),
        brand: brand.to_string(),
        category: "baby care".to_string(),
        price: 9.99,
        brand_popularity: 6.0,
        country: "USA".to_string(),
        reason_code: None,
    }
}

fn store() -> Arc<CandidateStore> {
    Arc::new(CandidateStore::from_groups([(
        "P1".to_string(),
        vec![candidate("R1", "Acme"), candidate("R2", "Beta")],
    )]))
}

#[test]
fn unknown_original_id_yields_no_session() {
    let registry = SessionRegistry::new(store(), SessionPolicy::default());
    assert!(registry.session_for("nope").is_none());
    assert_eq!(registry.live_sessions(), 0);
}

#[test]
fn same_id_returns_the_same_session() {
    let registry = SessionRegistry::new(store(), SessionPolicy::default());

    let a = registry.session_for("P1").unwrap();
    let b = registry.session_for("P1").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(registry.live_sessions(), 1);
}

#[tokio::test]
async fn session_state_persists_across_lookups() {
    let registry = SessionRegistry::new(store(), SessionPolicy::default());
    let index = MockSimilarityIndex::new();
    let oracle = MockSelectionOracle::new();

    let first = {
        let session = registry.session_for("P1").unwrap();
        let mut guard = session.lock().await;
        guard.next(&index, &oracle).await
    };
    assert_eq!(first.replacement_id, "R1");

    // A second lookup sees the advanced cursor.
    let second = {
        let session = registry.session_for("P1").unwrap();
        let mut guard = session.lock().await;
        guard.next(&index, &oracle).await
    };
    assert_eq!(second.replacement_id, "R2");
}

#[test]
fn capacity_bound_evicts_old_sessions() {
    let groups: Vec<(String, Vec<Candidate>)> = (0..8)
        .map(|i| (format!("P{i}"), vec![candidate(&format!("R{i}"), "Acme")]))
        .collect();
    let store = Arc::new(CandidateStore::from_groups(groups));

    let registry = SessionRegistry::with_limits(
        store,
        SessionPolicy::default(),
        4,
        Duration::from_secs(3600),
    );

    for i in 0..8 {
        registry.session_for(&format!("P{i}"));
    }

    assert!(registry.live_sessions() <= 4);
}
