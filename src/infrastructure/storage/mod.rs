use crate::core::errors::LedgerError;
use crate::core::models::rows::{GroupRow, ParticipantRow, PaymentRow, TransactionRow};
use async_trait::async_trait;

/// Read access to the hosted tables. Row order is the order the store
/// returns them in and is preserved downstream.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Groups the user appears in, either embedded or through `participants`.
    /// A pending invite addressed to `email` counts as membership.
    async fn get_user_groups(&self, user_id: &str, email: Option<&str>) -> Result<Vec<GroupRow>, LedgerError>;
    async fn get_participants(&self, group_ids: &[String]) -> Result<Vec<ParticipantRow>, LedgerError>;
    async fn get_transactions(&self, group_ids: &[String]) -> Result<Vec<TransactionRow>, LedgerError>;
    async fn get_payments(&self, group_ids: &[String]) -> Result<Vec<PaymentRow>, LedgerError>;
}

pub mod in_memory;
