use crate::config::CONFIG;
use crate::core::errors::LedgerError;
use crate::core::models::audit::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// App log held in memory. Once `capacity` entries are stored the oldest
/// entry is dropped for every new one.
#[derive(Clone)]
pub struct InMemoryLogging {
    entries: Arc<RwLock<VecDeque<AppLog>>>,
    capacity: usize,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::with_capacity(CONFIG.log_capacity)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        InMemoryLogging {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }
}

impl Default for InMemoryLogging {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), LedgerError> {
        let entry = AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            user_id: user_id.map(String::from),
            details,
            timestamp: Utc::now(),
        };
        let mut entries = self.entries.write().await;
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
        Ok(())
    }

    async fn get_logs(&self, action: Option<&str>) -> Result<Vec<AppLog>, LedgerError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|entry| action.is_none_or(|a| entry.action == a))
            .cloned()
            .collect())
    }
}
