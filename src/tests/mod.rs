mod ingest_tests;
mod splits_tests;

use crate::core::models::{
    amount::RecordedAmount,
    expense::Expense,
    group::{Group, GroupCategory, Member},
    rows::RawSnapshot,
    settlement::Settlement,
};
use crate::core::services::LedgerService;
use crate::core::splits::{Allocation, SplitSource};
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

pub fn create_test_service() -> LedgerService<InMemoryLogging, InMemoryStorage, InMemoryCache> {
    create_test_service_with(InMemoryStorage::new())
}

pub fn create_test_service_with(
    storage: InMemoryStorage,
) -> LedgerService<InMemoryLogging, InMemoryStorage, InMemoryCache> {
    let logging = InMemoryLogging::new();
    let cache = InMemoryCache::new();
    LedgerService::new(storage, logging, cache)
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Fixed reference instant, offset by `minutes`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn group(id: &str, name: &str, members: &[(&str, &str)]) -> Group {
    members.iter().fold(Group::new(id, name, GroupCategory::Trip), |g, (mid, mname)| {
        g.with_member(Member::account(*mid, *mname, None))
    })
}

pub fn expense(id: &str, group_id: &str, amount: &str, payer: &str, splits: &[(&str, &str)], minutes: i64) -> Expense {
    Expense {
        id: id.to_string(),
        group_id: group_id.to_string(),
        description: None,
        amount: RecordedAmount::new(dec(amount)),
        payer_id: payer.to_string(),
        participant_ids: splits.iter().map(|(m, _)| m.to_string()).collect(),
        splits: splits.iter().map(|(m, a)| (m.to_string(), dec(a))).collect::<Allocation>(),
        split_source: SplitSource::Recorded,
        created_at: at(minutes),
    }
}

pub fn settlement(id: &str, group_id: &str, from: &str, to: &str, amount: &str, minutes: i64) -> Settlement {
    Settlement {
        id: id.to_string(),
        group_id: group_id.to_string(),
        from_member_id: from.to_string(),
        to_member_id: to.to_string(),
        amount: RecordedAmount::new(dec(amount)),
        created_at: at(minutes),
    }
}

/// Two groups seen by `ana`: a trip with a settlement and an
/// apartment whose expense has no recorded splits.
pub fn sample_snapshot() -> RawSnapshot {
    serde_json::from_value(json!({
        "groups": [
            {
                "id": "g1",
                "name": "Viagem Floripa",
                "category": "trip",
                "participants": [
                    { "id": "ana", "name": "Ana" },
                    { "id": "bruno", "name": "Bruno" }
                ]
            },
            { "id": "g2", "name": "Apê Centro", "category": "apartment", "participants": null }
        ],
        "participants": [
            { "id": "p1", "group_id": "g2", "user_id": "ana", "name": "Ana" },
            { "id": "p2", "group_id": "g2", "user_id": "carla", "name": "Carla" },
            { "id": "p3", "group_id": "g2", "user_id": "davi", "name": "Davi" }
        ],
        "transactions": [
            {
                "id": "t1",
                "group_id": "g1",
                "value": 90,
                "payer_id": "ana",
                "participants": ["ana", "bruno"],
                "splits": { "ana": 45, "bruno": 45 },
                "created_at": "2024-06-01T12:00:00Z"
            },
            {
                "id": "t2",
                "group_id": "g2",
                "value": "100.00",
                "payer_id": "carla",
                "participants": [],
                "splits": null,
                "created_at": "2024-06-01T13:00:00Z"
            }
        ],
        "payments": [
            {
                "id": "s1",
                "group_id": "g1",
                "from_user": "bruno",
                "to_user": "ana",
                "amount": 20,
                "created_at": "2024-06-01T14:00:00Z"
            }
        ]
    }))
    .unwrap()
}
