//! Normalization of raw store rows into the ledger model.
//!
//! Rows that would attribute money to nobody (no group, no payer, no
//! timestamp) are rejected with a [`LedgerError`]. Everything else that is
//! merely odd is accepted with an [`IntegrityWarning`].

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::constants::{DEFAULT_MEMBER_NAME, SPLIT_TOLERANCE};
use crate::core::errors::{IntegrityWarning, LedgerError, flag};
use crate::core::models::{
    amount::RecordedAmount,
    expense::Expense,
    group::{Group, GroupCategory, Member},
    rows::{GroupRow, ParticipantRow, PaymentRow, RawSnapshot, TransactionRow},
    settlement::Settlement,
};
use crate::core::splits::{SplitContext, SplitShape, SplitSource};

/// The user a snapshot is read for. Email and name are only used to link
/// pending invites to the account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl Viewer {
    pub fn new(user_id: impl Into<String>) -> Self {
        Viewer {
            user_id: user_id.into(),
            email: None,
            name: None,
        }
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email.filter(|e| !e.trim().is_empty());
        self
    }
}

/// A normalized snapshot, ready for the reconciler.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
    pub groups: Vec<Group>,
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,
    pub warnings: Vec<IntegrityWarning>,
}

impl Ledger {
    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }
}

pub fn ingest(raw: &RawSnapshot, viewer: &Viewer) -> Result<Ledger, LedgerError> {
    let mut ledger = Ledger::default();

    for row in &raw.groups {
        if ledger.group(&row.id).is_some() {
            debug!("Skipping repeated row for group {}", row.id);
            continue;
        }
        let group = group_from_row(row, &mut ledger.warnings);
        ledger.groups.push(group);
    }

    for row in &raw.participants {
        attach_participant(&mut ledger, row)?;
    }

    for group in ledger.groups.iter_mut() {
        if group.member_for_user(&viewer.user_id).is_none()
            && group.claim_placeholder(&viewer.user_id, viewer.email.as_deref(), viewer.name.as_deref())
        {
            debug!("Linked user {} to a pending invite in group {}", viewer.user_id, group.id);
        }
    }

    for row in &raw.transactions {
        if let Some(expense) = expense_from_row(&ledger.groups, row, viewer, &mut ledger.warnings)? {
            ledger.expenses.push(expense);
        }
    }

    for row in &raw.payments {
        if let Some(settlement) = settlement_from_row(&ledger.groups, row, &mut ledger.warnings)? {
            ledger.settlements.push(settlement);
        }
    }

    debug!(
        "Ingested {} groups, {} expenses, {} settlements with {} warnings",
        ledger.groups.len(),
        ledger.expenses.len(),
        ledger.settlements.len(),
        ledger.warnings.len()
    );
    Ok(ledger)
}

fn group_from_row(row: &GroupRow, warnings: &mut Vec<IntegrityWarning>) -> Group {
    let mut group = Group::new(
        row.id.clone(),
        row.name.clone().unwrap_or_default(),
        GroupCategory::parse(row.category.as_deref()),
    );
    let embedded: &[Value] = match &row.participants {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    };
    for member in embedded.iter().filter_map(member_from_embedded) {
        add_member(&mut group, member, warnings);
    }
    group
}

/// Embedded participants are either bare ids or objects keyed by
/// `id`/`user_id`/`uid` with an optional `name`/`email`.
fn member_from_embedded(item: &Value) -> Option<Member> {
    match item {
        Value::String(id) if !id.trim().is_empty() => Some(Member::account(id.clone(), id.clone(), None)),
        Value::Object(obj) => {
            let text = |key: &str| {
                obj.get(key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
            };
            let email = text("email");
            let name = display_name(text("name"), email.as_deref());
            let account = text("user_id").or_else(|| text("uid"));
            match (text("id"), account) {
                (Some(id), Some(user_id)) => Some(Member {
                    id,
                    account_id: Some(user_id),
                    name,
                    email,
                }),
                (Some(id), None) => Some(Member::account(id, name, email)),
                (None, Some(user_id)) => Some(Member::account(user_id, name, email)),
                (None, None) => Some(Member::invited(None, name, email)),
            }
        }
        _ => None,
    }
}

fn attach_participant(ledger: &mut Ledger, row: &ParticipantRow) -> Result<(), LedgerError> {
    let record = row.id.clone().unwrap_or_else(|| "<participant>".to_string());
    let group_id = required(&row.group_id, &record, "group_id")?;
    let email = row.email.clone().filter(|e| !e.trim().is_empty());
    let name = display_name(row.name.clone(), email.as_deref());
    let member = match row.user_id.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(user_id) => Member::account(user_id, name, email),
        None => Member::invited(row.id.clone(), name, email),
    };
    match ledger.groups.iter_mut().find(|g| g.id == group_id) {
        Some(group) => add_member(group, member, &mut ledger.warnings),
        None => flag(
            &mut ledger.warnings,
            IntegrityWarning::OrphanRecord {
                record_id: record,
                group_id,
            },
        ),
    }
    Ok(())
}

fn add_member(group: &mut Group, member: Member, warnings: &mut Vec<IntegrityWarning>) {
    let member_id = member.id.clone();
    if !group.add_member(member) {
        flag(
            warnings,
            IntegrityWarning::DuplicateMember {
                group_id: group.id.clone(),
                member_id,
            },
        );
    }
}

fn expense_from_row(
    groups: &[Group],
    row: &TransactionRow,
    viewer: &Viewer,
    warnings: &mut Vec<IntegrityWarning>,
) -> Result<Option<Expense>, LedgerError> {
    let id = required(&row.id, "<transaction>", "id")?;
    let group_id = required(&row.group_id, &id, "group_id")?;
    let payer_id = required(&row.payer_id, &id, "payer_id")?;
    let created_at = timestamp(&row.created_at, &id)?;

    let Some(group) = groups.iter().find(|g| g.id == group_id) else {
        flag(warnings, IntegrityWarning::OrphanRecord { record_id: id, group_id });
        return Ok(None);
    };

    let amount = recorded_amount(&id, &row.value, warnings);
    let participant_ids = row.participants.clone().unwrap_or_default();
    let roster = group.member_ids();
    let viewer_key = group
        .member_for_user(&viewer.user_id)
        .map(|m| m.id.clone())
        .unwrap_or_else(|| viewer.user_id.clone());

    let shape = SplitShape::from_raw(row.splits.as_ref());
    match &shape {
        SplitShape::Malformed => flag(warnings, IntegrityWarning::MalformedSplits { expense_id: id.clone() }),
        SplitShape::ViewerRelative { .. } => {
            flag(warnings, IntegrityWarning::ViewerSentinelSplit { expense_id: id.clone() })
        }
        _ => {}
    }
    let (splits, split_source) = shape.resolve(&SplitContext {
        amount: amount.value,
        payer_id: &payer_id,
        participant_ids: &participant_ids,
        roster: &roster,
        viewer_key: &viewer_key,
    });

    if split_source == SplitSource::Recorded && (splits.total() - amount.value).abs() > SPLIT_TOLERANCE {
        flag(
            warnings,
            IntegrityWarning::SplitSumMismatch {
                expense_id: id.clone(),
                amount: amount.value,
                allocated: splits.total(),
            },
        );
    }

    Ok(Some(Expense {
        id,
        group_id,
        description: row.description.clone(),
        amount,
        payer_id,
        participant_ids,
        splits,
        split_source,
        created_at,
    }))
}

fn settlement_from_row(
    groups: &[Group],
    row: &PaymentRow,
    warnings: &mut Vec<IntegrityWarning>,
) -> Result<Option<Settlement>, LedgerError> {
    let id = required(&row.id, "<payment>", "id")?;
    let group_id = required(&row.group_id, &id, "group_id")?;
    let from_member_id = required(&row.from_user, &id, "from_user")?;
    let to_member_id = required(&row.to_user, &id, "to_user")?;
    let created_at = timestamp(&row.created_at, &id)?;

    if !groups.iter().any(|g| g.id == group_id) {
        flag(warnings, IntegrityWarning::OrphanRecord { record_id: id, group_id });
        return Ok(None);
    }

    let amount = recorded_amount(&id, &row.amount, warnings);
    Ok(Some(Settlement {
        id,
        group_id,
        from_member_id,
        to_member_id,
        amount,
        created_at,
    }))
}

fn recorded_amount(record_id: &str, raw: &Value, warnings: &mut Vec<IntegrityWarning>) -> RecordedAmount {
    let amount = RecordedAmount::from_raw(raw);
    if amount.coerced {
        flag(
            warnings,
            IntegrityWarning::CoercedAmount {
                record_id: record_id.to_string(),
                original: raw.to_string(),
            },
        );
    }
    amount
}

/// RFC 3339 timestamp column.
fn timestamp(value: &Option<String>, record: &str) -> Result<DateTime<Utc>, LedgerError> {
    let raw = required(value, record, "created_at")?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| LedgerError::MalformedField {
            record: record.to_string(),
            field: "created_at",
            reason: e.to_string(),
        })
}

fn required(value: &Option<String>, record: &str, field: &'static str) -> Result<String, LedgerError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .ok_or_else(|| LedgerError::missing(record, field))
}

fn display_name(name: Option<String>, email: Option<&str>) -> String {
    name.filter(|n| !n.trim().is_empty())
        .or_else(|| email.map(String::from))
        .unwrap_or_else(|| DEFAULT_MEMBER_NAME.to_string())
}
