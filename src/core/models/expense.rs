use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::amount::RecordedAmount;
use super::group::{GroupId, MemberId};
use crate::core::splits::{Allocation, SplitSource};

/// An expense with its split already resolved to a canonical allocation.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Expense {
    pub id: String,
    pub group_id: GroupId,
    pub description: Option<String>,
    pub amount: RecordedAmount,
    pub payer_id: MemberId,
    pub participant_ids: Vec<MemberId>,
    pub splits: Allocation,
    pub split_source: SplitSource,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}
