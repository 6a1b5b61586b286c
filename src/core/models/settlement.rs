use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::amount::RecordedAmount;
use super::group::{GroupId, MemberId};

/// A direct transfer between two members of a group.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct Settlement {
    pub id: String,
    pub group_id: GroupId,
    pub from_member_id: MemberId,
    pub to_member_id: MemberId,
    pub amount: RecordedAmount,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}
