use crate::config::CONFIG;
use crate::constants::{
    ACTIVITY_QUERIED, GROUP_SUMMARY_QUERIED, INTEGRITY_WARNING, MAX_FEED_LIMIT, OVERVIEW_QUERIED,
};
use crate::core::activity::{FeedLocale, build_activity_feed_with_locale};
use crate::core::errors::{IntegrityWarning, LedgerError};
use crate::core::ingest::{Ledger, Viewer, ingest};
use crate::core::models::{
    activity::ActivityItem,
    audit::AppLog,
    group::MemberId,
    rows::RawSnapshot,
    summary::{GroupCard, GroupSummary, Overview},
};
use crate::core::reconciler::{compute_global_balance, compute_group_summary};
use crate::core::splits::{Allocation, equal_split, weighted_split};
use crate::infrastructure::cache::Cache;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use rust_decimal::Decimal;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

pub struct LedgerService<L: LoggingService, S: Storage, C: Cache> {
    storage: S,
    logging: L,
    cache: C,
}

impl<L: LoggingService, S: Storage, C: Cache> LedgerService<L, S, C> {
    pub fn new(storage: S, logging: L, cache: C) -> Self {
        LedgerService {
            storage,
            logging,
            cache,
        }
    }

    /// Fetches and normalizes everything visible to `viewer`.
    pub async fn load_ledger(&self, viewer: &Viewer) -> Result<Ledger, LedgerError> {
        let groups = self
            .storage
            .get_user_groups(&viewer.user_id, viewer.email.as_deref())
            .await?;
        let group_ids: Vec<String> = groups.iter().map(|g| g.id.clone()).collect();
        let (participants, transactions, payments) = futures::try_join!(
            self.storage.get_participants(&group_ids),
            self.storage.get_transactions(&group_ids),
            self.storage.get_payments(&group_ids),
        )?;
        debug!(
            "Loaded {} groups, {} participants, {} transactions, {} payments for {}",
            groups.len(),
            participants.len(),
            transactions.len(),
            payments.len(),
            viewer.user_id
        );
        let snapshot = RawSnapshot {
            groups,
            participants,
            transactions,
            payments,
        };
        ingest(&snapshot, viewer)
    }

    pub async fn overview(&self, viewer: &Viewer) -> Result<Overview, LedgerError> {
        if let Some(cached) = self.cache.get_overview(&viewer.user_id).await? {
            debug!("Serving cached overview for {}", viewer.user_id);
            self.log_and_audit(
                OVERVIEW_QUERIED,
                json!({ "cached": true, "groups": cached.groups.len() }),
                Some(viewer.user_id.as_str()),
            )
            .await?;
            return Ok(cached);
        }

        let ledger = self.load_ledger(viewer).await?;
        let mut warnings = ledger.warnings.clone();
        let mut cards = Vec::with_capacity(ledger.groups.len());
        for group in &ledger.groups {
            let summary = compute_group_summary(group, &ledger.expenses, &ledger.settlements, &viewer.user_id);
            warnings.extend(summary.warnings.iter().cloned());
            cards.push(GroupCard {
                id: summary.group_id.clone(),
                name: summary.group_name.clone(),
                category: summary.category,
                total_spent: summary.total_spent,
                balance: summary.current_user_balance,
                participants: summary.member_count(),
                members: summary.per_member_balance.iter().map(|b| b.name.clone()).collect(),
            });
        }
        let overview = Overview {
            user_id: viewer.user_id.clone(),
            global_balance: compute_global_balance(
                &ledger.groups,
                &ledger.expenses,
                &ledger.settlements,
                &viewer.user_id,
            ),
            groups: cards,
        };

        self.record_warnings(&warnings, &viewer.user_id).await?;
        self.cache
            .save_overview(&viewer.user_id, &overview, Duration::from_secs(CONFIG.cache_ttl_secs))
            .await?;
        self.log_and_audit(
            OVERVIEW_QUERIED,
            json!({
                "cached": false,
                "groups": overview.groups.len(),
                "global_balance": overview.global_balance.to_string(),
            }),
            Some(viewer.user_id.as_str()),
        )
        .await?;
        Ok(overview)
    }

    pub async fn group_summary(&self, group_id: &str, viewer: &Viewer) -> Result<GroupSummary, LedgerError> {
        let ledger = self.load_ledger(viewer).await?;
        let group = ledger
            .group(group_id)
            .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
        let summary = compute_group_summary(group, &ledger.expenses, &ledger.settlements, &viewer.user_id);

        let mut warnings = ledger.warnings.clone();
        warnings.extend(summary.warnings.iter().cloned());
        self.record_warnings(&warnings, &viewer.user_id).await?;
        self.log_and_audit(
            GROUP_SUMMARY_QUERIED,
            json!({
                "group_id": group_id,
                "total_spent": summary.total_spent.to_string(),
                "current_user_balance": summary.current_user_balance.to_string(),
            }),
            Some(viewer.user_id.as_str()),
        )
        .await?;
        Ok(summary)
    }

    /// Newest-first feed of the viewer's groups. `limit` defaults to the
    /// configured feed size and must lie in `1..=MAX_FEED_LIMIT`.
    pub async fn activity(&self, viewer: &Viewer, limit: Option<usize>) -> Result<Vec<ActivityItem>, LedgerError> {
        let limit = limit.unwrap_or(CONFIG.feed_limit);
        if limit == 0 || limit > MAX_FEED_LIMIT {
            return Err(LedgerError::invalid_input(
                "limit",
                "Invalid limit",
                format!("limit must be between 1 and {}", MAX_FEED_LIMIT),
            ));
        }

        let ledger = self.load_ledger(viewer).await?;
        self.record_warnings(&ledger.warnings, &viewer.user_id).await?;
        let locale = FeedLocale::from_tag(&CONFIG.locale);
        let items = build_activity_feed_with_locale(
            &ledger.expenses,
            &ledger.settlements,
            &ledger.groups,
            &viewer.user_id,
            limit,
            &locale,
        );
        self.log_and_audit(
            ACTIVITY_QUERIED,
            json!({ "limit": limit, "items": items.len() }),
            Some(viewer.user_id.as_str()),
        )
        .await?;
        Ok(items)
    }

    /// Resolves how an expense would be divided: evenly across
    /// `participant_ids`, or proportionally when `weights` are given.
    pub fn preview_split(
        &self,
        amount: Decimal,
        payer_id: &str,
        participant_ids: &[MemberId],
        weights: Option<&[(MemberId, Decimal)]>,
    ) -> Result<Allocation, LedgerError> {
        if amount.is_sign_negative() {
            return Err(LedgerError::invalid_input(
                "amount",
                "Invalid amount",
                "amount cannot be negative",
            ));
        }
        if payer_id.trim().is_empty() {
            return Err(LedgerError::invalid_input(
                "payer_id",
                "Invalid payer_id",
                "payer_id cannot be empty",
            ));
        }
        match weights {
            Some(weights) => weighted_split(amount, weights, payer_id),
            None => Ok(equal_split(amount, participant_ids, payer_id)),
        }
    }

    pub async fn invalidate(&self, user_id: &str) -> Result<(), LedgerError> {
        info!("Invalidating cached overview for {}", user_id);
        self.cache.invalidate_overview(user_id).await
    }

    pub async fn get_app_logs(&self, action: Option<&str>) -> Result<Vec<AppLog>, LedgerError> {
        self.logging.get_logs(action).await
    }

    /// Records each distinct warning of one computation once.
    async fn record_warnings(&self, warnings: &[IntegrityWarning], user_id: &str) -> Result<(), LedgerError> {
        let mut recorded: Vec<&IntegrityWarning> = Vec::with_capacity(warnings.len());
        for warning in warnings {
            if recorded.contains(&warning) {
                continue;
            }
            recorded.push(warning);
            let details = serde_json::to_value(warning)
                .map_err(|e| LedgerError::LoggingError(format!("Failed to serialize warning: {}", e)))?;
            self.log_and_audit(INTEGRITY_WARNING, details, Some(user_id)).await?;
        }
        Ok(())
    }

    async fn log_and_audit(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), LedgerError> {
        self.logging.log_action(action, details, user_id).await
    }
}
