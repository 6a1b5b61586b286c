pub mod cache_keys;
pub mod in_memory;

use crate::core::errors::LedgerError;
use crate::core::models::summary::Overview;
use async_trait::async_trait;

#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the stored overview unless it has expired.
    async fn get_overview(&self, user_id: &str) -> Result<Option<Overview>, LedgerError>;
    async fn save_overview(
        &self,
        user_id: &str,
        overview: &Overview,
        ttl: std::time::Duration,
    ) -> Result<(), LedgerError>;
    async fn invalidate_overview(&self, user_id: &str) -> Result<(), LedgerError>;
}
