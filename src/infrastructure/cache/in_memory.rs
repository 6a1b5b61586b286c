use crate::core::errors::LedgerError;
use crate::core::models::summary::Overview;
use crate::infrastructure::cache::{Cache, cache_keys::overview_key};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, (Overview, DateTime<Utc>)>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_overview(&self, user_id: &str) -> Result<Option<Overview>, LedgerError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&overview_key(user_id))
            .filter(|(_, expiry)| *expiry > Utc::now())
            .map(|(overview, _)| overview.clone()))
    }

    async fn save_overview(
        &self,
        user_id: &str,
        overview: &Overview,
        ttl: std::time::Duration,
    ) -> Result<(), LedgerError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| LedgerError::CacheError(format!("Failed to convert TTL: {}", e)))?;
        let mut entries = self.entries.write().await;
        entries.insert(overview_key(user_id), (overview.clone(), Utc::now() + ttl));
        Ok(())
    }

    async fn invalidate_overview(&self, user_id: &str) -> Result<(), LedgerError> {
        let mut entries = self.entries.write().await;
        entries.remove(&overview_key(user_id));
        entries.retain(|_, (_, expiry)| *expiry > Utc::now());
        Ok(())
    }
}
