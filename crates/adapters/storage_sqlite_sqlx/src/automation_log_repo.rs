//! `SQLite` implementation of [`AutomationLogRepository`].

use std::time::Duration;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use adpilot_app::ports::automation_log_repo::unavailable;
use adpilot_app::ports::{AutomationLogRepository, Claim};
use adpilot_domain::decision::{BudgetAction, RuleTriggered};
use adpilot_domain::error::AdPilotError;
use adpilot_domain::id::{CampaignId, LogEntryId};
use adpilot_domain::log_entry::AutomationLogEntry;
use adpilot_domain::time::{Timestamp, earlier_by, now};

use crate::error::{StorageError, decode_error};
use crate::time;

struct Wrapper(AutomationLogEntry);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<AutomationLogEntry> {
        value.map(|w| w.0)
    }

    fn all(values: Vec<Self>) -> Vec<AutomationLogEntry> {
        values.into_iter().map(|w| w.0).collect()
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let campaign_id: String = row.try_get("campaign_id")?;
        let action: String = row.try_get("action")?;
        let rule_triggered: Option<String> = row.try_get("rule_triggered")?;
        let approved_at: Option<String> = row.try_get("approved_at")?;
        let created_at: String = row.try_get("created_at")?;

        let campaign_id = CampaignId::new(campaign_id).map_err(decode_error)?;
        let action: BudgetAction = action
            .parse()
            .map_err(|err: String| sqlx::Error::Decode(err.into()))?;
        let rule_triggered = rule_triggered
            .map(|value| {
                RuleTriggered::parse(&value).ok_or_else(|| {
                    sqlx::Error::Decode(format!("unknown rule_triggered: {value}").into())
                })
            })
            .transpose()?;
        let approved_at = approved_at.as_deref().map(time::decode).transpose()?;

        Ok(Self(AutomationLogEntry {
            id: LogEntryId::from_uuid(id),
            campaign_id,
            campaign_name: row.try_get("campaign_name")?,
            action,
            rule_triggered,
            old_budget: row.try_get("old_budget")?,
            new_budget: row.try_get("new_budget")?,
            budget_utilization: row.try_get("budget_utilization")?,
            today_acos: row.try_get("today_acos")?,
            acos_target: row.try_get("acos_target")?,
            acos_threshold: row.try_get("acos_threshold")?,
            reason: row.try_get("reason")?,
            approved: row.try_get("approved")?,
            approved_at,
            created_at: time::decode(&created_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO automation_log (
        id, campaign_id, campaign_name, action, rule_triggered,
        old_budget, new_budget, budget_utilization, today_acos,
        acos_target, acos_threshold, reason, approved, approved_at, created_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

// Claims and resolutions only match rows still awaiting a reviewer, so two
// requests racing on one entry cannot both succeed.
const CLAIM: &str = r"
    UPDATE automation_log
    SET claimed_at = ?
    WHERE id = ?
      AND action IN ('pending_increase', 'pending_decrease')
      AND (claimed_at IS NULL OR claimed_at < ?)
    RETURNING *
";

const RESOLVE: &str = r"
    UPDATE automation_log
    SET action = ?, approved = ?, approved_at = ?, reason = ?, new_budget = ?,
        claimed_at = NULL
    WHERE id = ?
      AND claimed_at = ?
      AND action IN ('pending_increase', 'pending_decrease')
";

const RELEASE: &str =
    "UPDATE automation_log SET claimed_at = NULL WHERE id = ? AND claimed_at = ?";

const SELECT_BY_ID: &str = "SELECT * FROM automation_log WHERE id = ?";
const SELECT_RECENT: &str =
    "SELECT * FROM automation_log ORDER BY created_at DESC, rowid DESC LIMIT ?";
const SELECT_PENDING: &str = r"
    SELECT * FROM automation_log
    WHERE action IN ('pending_increase', 'pending_decrease')
    ORDER BY created_at ASC, rowid ASC
";

/// `SQLite`-backed automation log.
#[derive(Clone)]
pub struct SqliteAutomationLogRepository {
    pool: SqlitePool,
}

impl SqliteAutomationLogRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AutomationLogRepository for SqliteAutomationLogRepository {
    async fn append(&self, entries: Vec<AutomationLogEntry>) -> Result<usize, AdPilotError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        for entry in &entries {
            sqlx::query(INSERT)
                .bind(entry.id.as_uuid())
                .bind(entry.campaign_id.as_str())
                .bind(&entry.campaign_name)
                .bind(entry.action.as_str())
                .bind(entry.rule_triggered.map(RuleTriggered::as_str))
                .bind(entry.old_budget)
                .bind(entry.new_budget)
                .bind(entry.budget_utilization)
                .bind(entry.today_acos)
                .bind(entry.acos_target)
                .bind(entry.acos_threshold)
                .bind(&entry.reason)
                .bind(entry.approved)
                .bind(entry.approved_at.map(time::encode))
                .bind(time::encode(entry.created_at))
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }

        tx.commit().await.map_err(StorageError::from)?;
        tracing::debug!(count = entries.len(), "automation log entries appended");
        Ok(entries.len())
    }

    async fn get_by_id(&self, id: LogEntryId) -> Result<Option<AutomationLogEntry>, AdPilotError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn claim(&self, id: LogEntryId, ttl: Duration) -> Result<Claim, AdPilotError> {
        let claimed_at = now();
        let row: Option<Wrapper> = sqlx::query_as(CLAIM)
            .bind(time::encode(claimed_at))
            .bind(id.as_uuid())
            .bind(time::encode(earlier_by(claimed_at, ttl)))
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        match Wrapper::maybe(row) {
            Some(entry) => Ok(Claim { entry, claimed_at }),
            None => Err(unavailable(id, self.get_by_id(id).await?.as_ref())),
        }
    }

    async fn resolve(
        &self,
        entry: AutomationLogEntry,
        claimed_at: Timestamp,
    ) -> Result<AutomationLogEntry, AdPilotError> {
        let result = sqlx::query(RESOLVE)
            .bind(entry.action.as_str())
            .bind(entry.approved)
            .bind(entry.approved_at.map(time::encode))
            .bind(&entry.reason)
            .bind(entry.new_budget)
            .bind(entry.id.as_uuid())
            .bind(time::encode(claimed_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            let current = self.get_by_id(entry.id).await?;
            return Err(unavailable(entry.id, current.as_ref()));
        }
        Ok(entry)
    }

    async fn release(&self, id: LogEntryId, claimed_at: Timestamp) -> Result<(), AdPilotError> {
        sqlx::query(RELEASE)
            .bind(id.as_uuid())
            .bind(time::encode(claimed_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<AutomationLogEntry>, AdPilotError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_RECENT)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::all(rows))
    }

    async fn find_pending(&self) -> Result<Vec<AutomationLogEntry>, AdPilotError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_PENDING)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::all(rows))
    }
}
