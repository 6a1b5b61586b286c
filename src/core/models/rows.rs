//! Rows exactly as the hosted store returns them. Nearly every column is
//! optional or loosely typed; `core::ingest` turns them into the model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GroupRow {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Array of participant objects, array of ids, or null
    #[serde(default)]
    pub participants: Option<Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParticipantRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransactionRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub payer_id: Option<String>,
    #[serde(default)]
    pub participants: Option<Vec<String>>,
    #[serde(default)]
    pub splits: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PaymentRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub from_user: Option<String>,
    #[serde(default)]
    pub to_user: Option<String>,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Everything fetched for one viewer in one pass.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub groups: Vec<GroupRow>,
    #[serde(default)]
    pub participants: Vec<ParticipantRow>,
    #[serde(default)]
    pub transactions: Vec<TransactionRow>,
    #[serde(default)]
    pub payments: Vec<PaymentRow>,
}
