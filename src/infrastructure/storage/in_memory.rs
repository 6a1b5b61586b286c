use crate::core::errors::LedgerError;
use crate::core::models::rows::{GroupRow, ParticipantRow, PaymentRow, RawSnapshot, TransactionRow};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

pub struct InMemoryStorage {
    groups: RwLock<Vec<GroupRow>>,
    participants: RwLock<Vec<ParticipantRow>>,
    transactions: RwLock<Vec<TransactionRow>>,
    payments: RwLock<Vec<PaymentRow>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            groups: RwLock::new(Vec::new()),
            participants: RwLock::new(Vec::new()),
            transactions: RwLock::new(Vec::new()),
            payments: RwLock::new(Vec::new()),
        }
    }

    pub fn from_snapshot(snapshot: RawSnapshot) -> Self {
        InMemoryStorage {
            groups: RwLock::new(snapshot.groups),
            participants: RwLock::new(snapshot.participants),
            transactions: RwLock::new(snapshot.transactions),
            payments: RwLock::new(snapshot.payments),
        }
    }

    /// Seeds the store from a JSON document shaped like [`RawSnapshot`].
    pub fn from_json(json: &str) -> Result<Self, LedgerError> {
        let snapshot: RawSnapshot = serde_json::from_str(json)
            .map_err(|e| LedgerError::StorageError(format!("Invalid seed document: {}", e)))?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub async fn insert_group(&self, row: GroupRow) {
        self.groups.write().await.push(row);
    }

    pub async fn insert_participant(&self, row: ParticipantRow) {
        self.participants.write().await.push(row);
    }

    pub async fn insert_transaction(&self, row: TransactionRow) {
        self.transactions.write().await.push(row);
    }

    pub async fn insert_payment(&self, row: PaymentRow) {
        self.payments.write().await.push(row);
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn same_email(candidate: Option<&str>, email: Option<&str>) -> bool {
    match (candidate, email) {
        (Some(a), Some(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
        _ => false,
    }
}

fn embeds_user(row: &GroupRow, user_id: &str, email: Option<&str>) -> bool {
    let Some(Value::Array(items)) = &row.participants else {
        return false;
    };
    items.iter().any(|item| match item {
        Value::String(id) => id == user_id,
        Value::Object(obj) => {
            ["id", "user_id", "uid"]
                .iter()
                .any(|key| obj.get(*key).and_then(Value::as_str) == Some(user_id))
                || same_email(obj.get("email").and_then(Value::as_str), email)
        }
        _ => false,
    })
}

fn in_groups(group_id: &Option<String>, group_ids: &[String]) -> bool {
    group_id.as_ref().is_some_and(|id| group_ids.contains(id))
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn get_user_groups(&self, user_id: &str, email: Option<&str>) -> Result<Vec<GroupRow>, LedgerError> {
        let participants = self.participants.read().await;
        let joined: Vec<&str> = participants
            .iter()
            .filter(|p| p.user_id.as_deref() == Some(user_id) || same_email(p.email.as_deref(), email))
            .filter_map(|p| p.group_id.as_deref())
            .collect();
        Ok(self
            .groups
            .read()
            .await
            .iter()
            .filter(|g| embeds_user(g, user_id, email) || joined.contains(&g.id.as_str()))
            .cloned()
            .collect())
    }

    async fn get_participants(&self, group_ids: &[String]) -> Result<Vec<ParticipantRow>, LedgerError> {
        Ok(self
            .participants
            .read()
            .await
            .iter()
            .filter(|p| in_groups(&p.group_id, group_ids))
            .cloned()
            .collect())
    }

    async fn get_transactions(&self, group_ids: &[String]) -> Result<Vec<TransactionRow>, LedgerError> {
        Ok(self
            .transactions
            .read()
            .await
            .iter()
            .filter(|t| in_groups(&t.group_id, group_ids))
            .cloned()
            .collect())
    }

    async fn get_payments(&self, group_ids: &[String]) -> Result<Vec<PaymentRow>, LedgerError> {
        Ok(self
            .payments
            .read()
            .await
            .iter()
            .filter(|p| in_groups(&p.group_id, group_ids))
            .cloned()
            .collect())
    }
}
