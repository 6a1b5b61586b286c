use super::dec;
use crate::core::errors::LedgerError;
use crate::core::splits::{SplitContext, SplitShape, SplitSource, equal_split, weighted_split};
use serde_json::json;

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_equal_split_gives_leftover_cent_to_payer() {
    let allocation = equal_split(dec("100.00"), &ids(&["a", "b", "c"]), "a");

    assert_eq!(allocation.get("a"), Some(dec("33.34")));
    assert_eq!(allocation.get("b"), Some(dec("33.33")));
    assert_eq!(allocation.get("c"), Some(dec("33.33")));
    assert_eq!(allocation.total(), dec("100.00"));
    let order: Vec<&str> = allocation.iter().map(|s| s.member_id.as_str()).collect();
    assert_eq!(order, vec!["a", "b", "c"]);
}

#[test]
fn test_equal_split_payer_outside_sharers() {
    let allocation = equal_split(dec("100.00"), &ids(&["b", "c", "d"]), "a");

    assert_eq!(allocation.get("a"), None);
    assert_eq!(allocation.get("b"), Some(dec("33.34")));
    assert_eq!(allocation.total(), dec("100.00"));
}

#[test]
fn test_equal_split_without_sharers_charges_payer() {
    let allocation = equal_split(dec("50"), &[], "a");

    assert_eq!(allocation.len(), 1);
    assert_eq!(allocation.get("a"), Some(dec("50")));
}

#[test]
fn test_equal_split_ignores_repeated_sharers() {
    let allocation = equal_split(dec("10"), &ids(&["a", "a", "b"]), "a");

    assert_eq!(allocation.len(), 2);
    assert_eq!(allocation.get("a"), Some(dec("5")));
    assert_eq!(allocation.get("b"), Some(dec("5")));
}

#[test]
fn test_weighted_split() {
    let weights = vec![("a".to_string(), dec("1")), ("b".to_string(), dec("2"))];

    let allocation = weighted_split(dec("100"), &weights, "a").unwrap();

    assert_eq!(allocation.get("a"), Some(dec("33.34")));
    assert_eq!(allocation.get("b"), Some(dec("66.66")));
    assert_eq!(allocation.total(), dec("100"));
}

#[test]
fn test_equal_split_of_a_few_cents_never_goes_negative() {
    let sharers: Vec<String> = (0..10).map(|i| format!("m{}", i)).collect();

    let allocation = equal_split(dec("0.05"), &sharers, "m0");

    assert!(allocation.iter().all(|s| !s.amount.is_sign_negative()));
    assert_eq!(allocation.total(), dec("0.05"));
    for (i, share) in allocation.iter().enumerate() {
        let expected = if i < 5 { dec("0.01") } else { dec("0.00") };
        assert_eq!(share.amount, expected, "share of {}", share.member_id);
    }
}

#[test]
fn test_leftover_cents_start_with_payer_then_follow_order() {
    let allocation = equal_split(dec("0.10"), &ids(&["a", "b", "c", "d"]), "c");

    assert_eq!(allocation.get("c"), Some(dec("0.03")));
    assert_eq!(allocation.get("a"), Some(dec("0.03")));
    assert_eq!(allocation.get("b"), Some(dec("0.02")));
    assert_eq!(allocation.get("d"), Some(dec("0.02")));
}

#[test]
fn test_weighted_split_of_a_few_cents_never_goes_negative() {
    let weights: Vec<(String, rust_decimal::Decimal)> = (0..10).map(|i| (format!("m{}", i), dec("1"))).collect();

    let allocation = weighted_split(dec("0.05"), &weights, "m9").unwrap();

    assert!(allocation.iter().all(|s| !s.amount.is_sign_negative()));
    assert!(allocation.iter().all(|s| s.amount <= dec("0.01")));
    assert_eq!(allocation.get("m9"), Some(dec("0.01")));
    assert_eq!(allocation.total(), dec("0.05"));
}

#[test]
fn test_weighted_split_rejects_zero_total() {
    let weights = vec![("a".to_string(), dec("0")), ("b".to_string(), dec("0"))];

    let result = weighted_split(dec("100"), &weights, "a");

    assert!(matches!(result, Err(LedgerError::InvalidWeights)));
    assert!(matches!(weighted_split(dec("10"), &[], "a"), Err(LedgerError::InvalidWeights)));
}

#[test]
fn test_member_map_is_used_directly() {
    let shape = SplitShape::from_raw(Some(&json!({ "a": "60", "b": 30 })));
    let roster = ids(&["a", "b"]);

    let (allocation, source) = shape.resolve(&SplitContext {
        amount: dec("90"),
        payer_id: "a",
        participant_ids: &[],
        roster: &roster,
        viewer_key: "a",
    });

    assert_eq!(source, SplitSource::Recorded);
    assert_eq!(allocation.get("a"), Some(dec("60")));
    assert_eq!(allocation.get("b"), Some(dec("30")));
}

#[test]
fn test_self_key_becomes_viewer_share() {
    let shape = SplitShape::from_raw(Some(&json!({ "self": 30, "b": 60 })));
    assert!(matches!(shape, SplitShape::ViewerRelative { .. }));
    let roster = ids(&["a", "b"]);

    let (allocation, source) = shape.resolve(&SplitContext {
        amount: dec("90"),
        payer_id: "b",
        participant_ids: &[],
        roster: &roster,
        viewer_key: "a",
    });

    assert_eq!(source, SplitSource::ViewerSentinel);
    assert_eq!(allocation.get("a"), Some(dec("30")));
    assert_eq!(allocation.get("b"), None);
    assert_eq!(allocation.get("self"), None);
}

#[test]
fn test_explicit_viewer_entry_wins_over_self_key() {
    let shape = SplitShape::from_raw(Some(&json!({ "self": 10, "a": 25, "b": 65 })));
    let roster = ids(&["a", "b"]);

    let (allocation, _) = shape.resolve(&SplitContext {
        amount: dec("90"),
        payer_id: "b",
        participant_ids: &[],
        roster: &roster,
        viewer_key: "a",
    });

    assert_eq!(allocation.get("a"), Some(dec("25")));
    assert_eq!(allocation.len(), 1);
}

#[test]
fn test_missing_splits_fall_back_to_participants() {
    let roster = ids(&["a", "b", "c", "d"]);
    let participants = ids(&["b", "c"]);

    for raw in [None, Some(json!(null)), Some(json!({}))] {
        let shape = SplitShape::from_raw(raw.as_ref());
        assert_eq!(shape, SplitShape::Unrecorded);
        let (allocation, source) = shape.resolve(&SplitContext {
            amount: dec("20"),
            payer_id: "a",
            participant_ids: &participants,
            roster: &roster,
            viewer_key: "a",
        });
        assert_eq!(source, SplitSource::EqualFallback);
        assert_eq!(allocation.get("b"), Some(dec("10")));
        assert_eq!(allocation.get("c"), Some(dec("10")));
        assert_eq!(allocation.get("a"), None);
    }
}

#[test]
fn test_malformed_splits_use_roster_when_no_participants() {
    let shape = SplitShape::from_raw(Some(&json!([10, 20])));
    assert_eq!(shape, SplitShape::Malformed);
    let roster = ids(&["a", "b"]);

    let (allocation, source) = shape.resolve(&SplitContext {
        amount: dec("30"),
        payer_id: "a",
        participant_ids: &[],
        roster: &roster,
        viewer_key: "a",
    });

    assert_eq!(source, SplitSource::EqualFallback);
    assert_eq!(allocation.get("a"), Some(dec("15")));
    assert_eq!(allocation.get("b"), Some(dec("15")));
}
