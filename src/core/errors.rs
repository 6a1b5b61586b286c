use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum LedgerError {
    /// A snapshot row lacks a field the reconciler needs to attribute money
    #[error("Record {record} is missing required field `{field}`")]
    MissingField { record: String, field: &'static str },

    /// A snapshot row carries a value that cannot be interpreted
    #[error("Record {record} has malformed field `{field}`: {reason}")]
    MalformedField {
        record: String,
        field: &'static str,
        reason: String,
    },

    #[error("Group {0} not found")]
    GroupNotFound(String),

    /// Weighted split with no positive total weight
    #[error("Split weights must add up to a positive total")]
    InvalidWeights,

    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

impl LedgerError {
    pub fn missing(record: impl Into<String>, field: &'static str) -> Self {
        LedgerError::MissingField {
            record: record.into(),
            field,
        }
    }

    pub fn invalid_input(field: &str, title: &str, description: impl Into<String>) -> Self {
        LedgerError::InvalidInput(
            field.to_string(),
            FieldError {
                field: field.to_string(),
                title: title.to_string(),
                description: description.into(),
            },
        )
    }
}

/// Non-fatal data problem found while ingesting or reconciling a snapshot.
/// The computation continues with the documented fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityWarning {
    UnknownPayer {
        expense_id: String,
        payer_id: String,
    },
    UnknownSplitMember {
        expense_id: String,
        member_id: String,
    },
    UnknownSettlementParty {
        settlement_id: String,
        member_id: String,
    },
    ViewerSentinelSplit {
        expense_id: String,
    },
    MalformedSplits {
        expense_id: String,
    },
    SplitSumMismatch {
        expense_id: String,
        amount: Decimal,
        allocated: Decimal,
    },
    CoercedAmount {
        record_id: String,
        original: String,
    },
    ViewerNotInRoster {
        group_id: String,
        user_id: String,
    },
    OrphanRecord {
        record_id: String,
        group_id: String,
    },
    DuplicateMember {
        group_id: String,
        member_id: String,
    },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::UnknownPayer { expense_id, payer_id } => {
                write!(f, "expense {} paid by {} who is not a group member", expense_id, payer_id)
            }
            IntegrityWarning::UnknownSplitMember { expense_id, member_id } => {
                write!(f, "expense {} allocates a share to non-member {}", expense_id, member_id)
            }
            IntegrityWarning::UnknownSettlementParty {
                settlement_id,
                member_id,
            } => write!(f, "settlement {} references non-member {}", settlement_id, member_id),
            IntegrityWarning::ViewerSentinelSplit { expense_id } => {
                write!(f, "expense {} uses the legacy `self` split key", expense_id)
            }
            IntegrityWarning::MalformedSplits { expense_id } => {
                write!(f, "expense {} has splits that are not a member map", expense_id)
            }
            IntegrityWarning::SplitSumMismatch {
                expense_id,
                amount,
                allocated,
            } => write!(
                f,
                "expense {} allocates {} of an amount of {}",
                expense_id, allocated, amount
            ),
            IntegrityWarning::CoercedAmount { record_id, original } => {
                write!(f, "record {} has unusable amount {}, counted as 0", record_id, original)
            }
            IntegrityWarning::ViewerNotInRoster { group_id, user_id } => {
                write!(f, "user {} is not on the roster of group {}", user_id, group_id)
            }
            IntegrityWarning::OrphanRecord { record_id, group_id } => {
                write!(f, "record {} belongs to unknown group {}", record_id, group_id)
            }
            IntegrityWarning::DuplicateMember { group_id, member_id } => {
                write!(f, "member {} listed twice in group {}", member_id, group_id)
            }
        }
    }
}

/// Traces `warning` and appends it to `warnings`.
pub(crate) fn flag(warnings: &mut Vec<IntegrityWarning>, warning: IntegrityWarning) {
    tracing::warn!(warning = %warning, "data integrity warning");
    warnings.push(warning);
}
