use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::group::{GroupCategory, GroupId, MemberId};
use crate::core::errors::IntegrityWarning;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MemberBalance {
    pub member_id: MemberId,
    pub name: String,
    #[schema(value_type = String, example = "45.00")]
    pub balance: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct GroupSummary {
    pub group_id: GroupId,
    pub group_name: String,
    pub category: GroupCategory,
    #[schema(value_type = String, example = "90.00")]
    pub total_spent: Decimal,
    /// Every roster member, in roster order
    pub per_member_balance: Vec<MemberBalance>,
    #[schema(value_type = String, example = "45.00")]
    pub current_user_balance: Decimal,
    #[schema(value_type = Vec<Object>)]
    pub warnings: Vec<IntegrityWarning>,
}

impl GroupSummary {
    pub fn balance_of(&self, member_id: &str) -> Option<Decimal> {
        self.per_member_balance
            .iter()
            .find(|b| b.member_id == member_id)
            .map(|b| b.balance)
    }

    pub fn member_count(&self) -> usize {
        self.per_member_balance.len()
    }
}

/// Card shown per group on the home screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GroupCard {
    pub id: GroupId,
    pub name: String,
    pub category: GroupCategory,
    #[schema(value_type = String, example = "90.00")]
    pub total_spent: Decimal,
    #[schema(value_type = String, example = "45.00")]
    pub balance: Decimal,
    pub participants: usize,
    pub members: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Overview {
    pub user_id: String,
    #[schema(value_type = String, example = "65.00")]
    pub global_balance: Decimal,
    pub groups: Vec<GroupCard>,
}
