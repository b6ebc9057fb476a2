use super::prompt::{build_selection_prompt, parse_selection};
use super::*;
use crate::catalog::{Candidate, ReasonCode};

fn shortlist_entry(id: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: format!("Product {id}"),
        brand: "Acme".to_string(),
        category: "baby care".to_string(),
        price: 9.99,
        brand_popularity: 6.0,
        country: "USA".to_string(),
        reason_code: None,
    }
}

fn constraints() -> SelectionConstraints {
    SelectionConstraints {
        country: "USA".to_string(),
        category: "baby care".to_string(),
        min_price: 5.0,
        max_price: 20.0,
        min_popularity: 3.0,
        max_popularity: 9.0,
        avoid_brand: "Acme".to_string(),
        rejected: vec!["R9".to_string()],
        used: vec!["R1".to_string()],
        retry_instruction: None,
    }
}

#[test]
fn parse_accepts_plain_json() {
    let selection = parse_selection(
        r#"{"replacement_id": "R2", "name": "Soft Wipes", "brand": "Beta",
            "category": "baby care", "price": 4.5, "reason_code": "quality",
            "brand_popularity": 7.0}"#,
    )
    .expect("parse");

    assert_eq!(selection.replacement_id, "R2");
    assert_eq!(selection.reason_code, Some(ReasonCode::Quality));
}

#[test]
fn parse_strips_json_code_fence() {
    let reply = "```json\n{\"replacement_id\": \"R2\", \"name\": \"n\", \"brand\": \"b\", \"category\": \"c\"}\n```";
    let selection = parse_selection(reply).expect("parse");
    assert_eq!(selection.replacement_id, "R2");
    assert_eq!(selection.price, None);
}

#[test]
fn parse_strips_bare_code_fence() {
    let reply = "```\n{\"replacement_id\": \"R2\", \"name\": \"n\", \"brand\": \"b\", \"category\": \"c\"}\n```";
    assert!(parse_selection(reply).is_ok());
}

#[test]
fn parse_rejects_missing_required_fields() {
    let err = parse_selection(r#"{"replacement_id": "R2", "name": "n"}"#).unwrap_err();
    assert!(matches!(err, OracleError::MalformedResponse { .. }));
}

#[test]
fn parse_rejects_non_json() {
    let err = parse_selection("I would recommend the Soft Wipes.").unwrap_err();
    assert!(matches!(err, OracleError::MalformedResponse { .. }));
}

#[test]
fn prompt_carries_constraints_and_shortlist() {
    let shortlist = vec![shortlist_entry("R2"), shortlist_entry("R3")];
    let prompt = build_selection_prompt(&shortlist, &constraints());

    assert!(prompt.contains("\"USA\""));
    assert!(prompt.contains("$5.00 and $20.00"));
    assert!(prompt.contains("R9"));
    assert!(prompt.contains("R1"));
    assert!(prompt.contains("Product R2"));
    assert!(prompt.contains("different brand than: \"Acme\""));
}

#[test]
fn prompt_truncates_oversized_shortlists() {
    let shortlist: Vec<Candidate> = (0..40)
        .map(|i| shortlist_entry(&format!("R{i}")))
        .collect();
    let prompt = build_selection_prompt(&shortlist, &constraints());

    assert!(prompt.contains("\"R14\""));
    assert!(!prompt.contains(&format!("\"R{}\"", PROMPT_SHORTLIST_LIMIT)));
}

#[test]
fn prompt_appends_retry_instruction() {
    let mut c = constraints();
    c.retry_instruction = Some("Attempt 2: Please select a DIFFERENT product.".to_string());
    let prompt = build_selection_prompt(&[shortlist_entry("R2")], &c);
    assert!(prompt.ends_with("Attempt 2: Please select a DIFFERENT product."));
}

#[tokio::test]
async fn mock_provider_selects_first_unused_entry() {
    let oracle = GenaiOracle::new(OracleConfig::default().mock_provider(true));
    let shortlist = vec![shortlist_entry("R1"), shortlist_entry("R2")];

    let selection = oracle.select(&shortlist, &constraints()).await.expect("select");
    // R1 is in the used set, so the mock provider skips it.
    assert_eq!(selection.replacement_id, "R2");
}
