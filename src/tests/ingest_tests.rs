use super::{dec, sample_snapshot};
use crate::core::errors::{IntegrityWarning, LedgerError};
use crate::core::ingest::{Viewer, ingest};
use crate::core::models::group::GroupCategory;
use crate::core::models::rows::RawSnapshot;
use crate::core::reconciler::compute_group_summary;
use crate::core::splits::SplitSource;
use rust_decimal::Decimal;
use serde_json::json;

fn snapshot(value: serde_json::Value) -> RawSnapshot {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_embedded_and_table_participants_form_roster() {
    let raw = snapshot(json!({
        "groups": [{
            "id": "g1",
            "name": "Casa",
            "category": "House",
            "participants": [{ "id": "a", "name": "Ana" }, { "user_id": "b", "email": "b@x.com" }]
        }],
        "participants": [
            { "id": "p1", "group_id": "g1", "user_id": "c", "name": "Carla" },
            { "id": "p2", "group_id": "g1", "user_id": "a", "name": "Ana" }
        ]
    }));

    let ledger = ingest(&raw, &Viewer::new("a")).unwrap();
    let group = ledger.group("g1").unwrap();

    assert_eq!(group.category, GroupCategory::House);
    assert_eq!(group.member_ids(), vec!["a", "b", "c"]);
    assert_eq!(group.member("b").unwrap().name, "b@x.com");
    assert!(matches!(
        ledger.warnings.as_slice(),
        [IntegrityWarning::DuplicateMember { member_id, .. }] if member_id == "a"
    ));
}

#[test]
fn test_embedded_ids_without_names() {
    let raw = snapshot(json!({
        "groups": [{ "id": "g1", "name": "Trip", "participants": ["a", "b"] }]
    }));

    let ledger = ingest(&raw, &Viewer::new("a")).unwrap();
    let group = ledger.group("g1").unwrap();

    assert_eq!(group.member_ids(), vec!["a", "b"]);
    assert_eq!(group.category, GroupCategory::Other);
}

#[test]
fn test_repeated_group_rows_are_merged() {
    let raw = snapshot(json!({
        "groups": [
            { "id": "g1", "name": "Trip", "participants": ["a"] },
            { "id": "g1", "name": "Trip", "participants": ["a"] }
        ]
    }));

    let ledger = ingest(&raw, &Viewer::new("a")).unwrap();

    assert_eq!(ledger.groups.len(), 1);
}

#[test]
fn test_participant_row_without_group_is_rejected() {
    let raw = snapshot(json!({
        "groups": [{ "id": "g1", "participants": ["a"] }],
        "participants": [{ "id": "p1", "user_id": "b" }]
    }));

    let result = ingest(&raw, &Viewer::new("a"));

    assert!(matches!(result, Err(LedgerError::MissingField { field: "group_id", .. })));
}

#[test]
fn test_transaction_without_timestamp_is_rejected() {
    let raw = snapshot(json!({
        "groups": [{ "id": "g1", "participants": ["a"] }],
        "transactions": [{ "id": "t1", "group_id": "g1", "value": 10, "payer_id": "a" }]
    }));

    let result = ingest(&raw, &Viewer::new("a"));

    assert!(matches!(result, Err(LedgerError::MissingField { field: "created_at", .. })));
}

#[test]
fn test_unparseable_timestamp_is_rejected() {
    let raw = snapshot(json!({
        "groups": [{ "id": "g1", "participants": ["a"] }],
        "transactions": [{
            "id": "t1", "group_id": "g1", "value": 10, "payer_id": "a", "created_at": "ontem"
        }]
    }));

    let result = ingest(&raw, &Viewer::new("a"));

    assert!(matches!(
        result,
        Err(LedgerError::MalformedField { field: "created_at", record, .. }) if record == "t1"
    ));
}

#[test]
fn test_payment_without_recipient_is_rejected() {
    let raw = snapshot(json!({
        "groups": [{ "id": "g1", "participants": ["a", "b"] }],
        "payments": [{
            "id": "s1", "group_id": "g1", "from_user": "a", "amount": 5,
            "created_at": "2024-06-01T12:00:00Z"
        }]
    }));

    let result = ingest(&raw, &Viewer::new("a"));

    assert!(matches!(result, Err(LedgerError::MissingField { field: "to_user", .. })));
}

#[test]
fn test_unusable_amount_is_coerced_to_zero() {
    let raw = snapshot(json!({
        "groups": [{ "id": "g1", "participants": ["a", "b"] }],
        "transactions": [
            { "id": "t1", "group_id": "g1", "value": "abc", "payer_id": "a", "created_at": "2024-06-01T12:00:00Z" },
            { "id": "t2", "group_id": "g1", "value": -5, "payer_id": "a", "created_at": "2024-06-01T12:00:00Z" }
        ]
    }));

    let ledger = ingest(&raw, &Viewer::new("a")).unwrap();

    assert_eq!(ledger.expenses.len(), 2);
    for expense in &ledger.expenses {
        assert_eq!(expense.amount.value, Decimal::ZERO);
        assert!(expense.amount.coerced);
    }
    assert_eq!(ledger.expenses[0].amount.original, json!("abc"));
    let coerced = ledger
        .warnings
        .iter()
        .filter(|w| matches!(w, IntegrityWarning::CoercedAmount { .. }))
        .count();
    assert_eq!(coerced, 2);
}

#[test]
fn test_records_of_unknown_groups_are_skipped() {
    let raw = snapshot(json!({
        "groups": [{ "id": "g1", "participants": ["a"] }],
        "transactions": [
            { "id": "t1", "group_id": "zz", "value": 10, "payer_id": "a", "created_at": "2024-06-01T12:00:00Z" }
        ],
        "payments": [
            { "id": "s1", "group_id": "zz", "from_user": "a", "to_user": "b", "amount": 5,
              "created_at": "2024-06-01T12:00:00Z" }
        ]
    }));

    let ledger = ingest(&raw, &Viewer::new("a")).unwrap();

    assert!(ledger.expenses.is_empty());
    assert!(ledger.settlements.is_empty());
    assert_eq!(
        ledger
            .warnings
            .iter()
            .filter(|w| matches!(w, IntegrityWarning::OrphanRecord { .. }))
            .count(),
        2
    );
}

#[test]
fn test_split_sum_mismatch_is_warned() {
    let raw = snapshot(json!({
        "groups": [{ "id": "g1", "participants": ["a", "b"] }],
        "transactions": [{
            "id": "t1", "group_id": "g1", "value": 90, "payer_id": "a",
            "splits": { "a": 10, "b": 10 }, "created_at": "2024-06-01T12:00:00Z"
        }]
    }));

    let ledger = ingest(&raw, &Viewer::new("a")).unwrap();

    assert_eq!(
        ledger.warnings,
        vec![IntegrityWarning::SplitSumMismatch {
            expense_id: "t1".to_string(),
            amount: dec("90"),
            allocated: dec("20"),
        }]
    );
}

#[test]
fn test_self_key_resolved_for_viewer() {
    let raw = snapshot(json!({
        "groups": [{ "id": "g1", "participants": ["a", "b"] }],
        "transactions": [{
            "id": "t1", "group_id": "g1", "value": 50, "payer_id": "b",
            "splits": { "self": 20, "b": 30 }, "created_at": "2024-06-01T12:00:00Z"
        }]
    }));

    let ledger = ingest(&raw, &Viewer::new("a")).unwrap();
    let expense = &ledger.expenses[0];

    assert_eq!(expense.split_source, SplitSource::ViewerSentinel);
    assert_eq!(expense.splits.get("a"), Some(dec("20")));
    assert!(ledger
        .warnings
        .iter()
        .any(|w| matches!(w, IntegrityWarning::ViewerSentinelSplit { .. })));
}

#[test]
fn test_pending_invite_is_claimed_by_email() {
    let raw = snapshot(json!({
        "groups": [{ "id": "g1", "name": "Trip", "participants": ["a"] }],
        "participants": [{ "id": "p9", "group_id": "g1", "name": "Carla", "email": "Carla@Example.com" }],
        "transactions": [{
            "id": "t1", "group_id": "g1", "value": 40, "payer_id": "p9",
            "splits": { "a": 20, "p9": 20 }, "created_at": "2024-06-01T12:00:00Z"
        }]
    }));
    let viewer = Viewer::new("u-carla").with_email(Some("carla@example.com".to_string()));

    let ledger = ingest(&raw, &viewer).unwrap();
    let group = ledger.group("g1").unwrap();
    let member = group.member_for_user("u-carla").unwrap();

    assert_eq!(member.id, "p9");
    let summary = compute_group_summary(group, &ledger.expenses, &ledger.settlements, "u-carla");
    assert_eq!(summary.current_user_balance, dec("20"));
    assert!(summary.warnings.is_empty());
}

#[test]
fn test_records_may_reference_the_claimed_account() {
    let raw = snapshot(json!({
        "groups": [{ "id": "g1", "name": "Trip", "participants": ["a"] }],
        "participants": [{ "id": "p9", "group_id": "g1", "name": "Carla", "email": "carla@example.com" }],
        "transactions": [{
            "id": "t1", "group_id": "g1", "value": 40, "payer_id": "u-carla",
            "splits": { "a": 20, "u-carla": 20 }, "created_at": "2024-06-01T12:00:00Z"
        }],
        "payments": [{
            "id": "s1", "group_id": "g1", "from_user": "a", "to_user": "u-carla",
            "amount": 5, "created_at": "2024-06-01T13:00:00Z"
        }]
    }));
    let viewer = Viewer::new("u-carla").with_email(Some("carla@example.com".to_string()));

    let ledger = ingest(&raw, &viewer).unwrap();
    let group = ledger.group("g1").unwrap();
    let summary = compute_group_summary(group, &ledger.expenses, &ledger.settlements, "u-carla");

    assert_eq!(summary.current_user_balance, dec("25"));
    assert_eq!(summary.balance_of("p9"), Some(dec("25")));
    assert_eq!(summary.balance_of("a"), Some(dec("-25")));
    assert!(summary.warnings.is_empty());
}

#[test]
fn test_invite_without_row_id_gets_placeholder() {
    let raw = snapshot(json!({
        "groups": [{
            "id": "g1",
            "participants": [{ "id": "a", "name": "Ana" }, { "name": "Davi", "email": "Davi@x.com" }]
        }]
    }));

    let ledger = ingest(&raw, &Viewer::new("a")).unwrap();
    let group = ledger.group("g1").unwrap();

    assert!(group.is_member("invite:davi@x.com"));
    assert!(group.member("invite:davi@x.com").unwrap().is_invited());
}

#[test]
fn test_sample_snapshot_ingests_cleanly() {
    let ledger = ingest(&sample_snapshot(), &Viewer::new("ana")).unwrap();

    assert_eq!(ledger.groups.len(), 2);
    assert_eq!(ledger.expenses.len(), 2);
    assert_eq!(ledger.settlements.len(), 1);
    assert_eq!(ledger.expenses[1].split_source, SplitSource::EqualFallback);
    assert_eq!(ledger.expenses[1].splits.get("carla"), Some(dec("33.34")));
    assert!(ledger.warnings.is_empty());
}
