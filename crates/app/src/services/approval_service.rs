//! Approval service: reviewer decisions on pending budget changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use adpilot_domain::error::{AdPilotError, NotFoundError};
use adpilot_domain::id::LogEntryId;
use adpilot_domain::log_entry::AutomationLogEntry;
use adpilot_domain::time::now;

use crate::evaluation::{DEFAULT_WRITE_TIMEOUT, write_budget};
use crate::ports::{AutomationLogRepository, BudgetWriter, Claim};

pub const BUDGET_UPDATED: &str = "Budget updated";
pub const ACTION_REJECTED: &str = "Action rejected";

/// Slack added on top of the write timeout before a claim is abandoned.
const CLAIM_GRACE: Duration = Duration::from_secs(60);

/// Outcome of a successful approve/reject request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalResolution {
    pub success: bool,
    pub message: String,
    /// The entry as stored after resolution.
    pub entry: AutomationLogEntry,
}

/// Application service resolving pending automation log entries.
pub struct ApprovalService<L, B> {
    log: L,
    writer: B,
    write_timeout: Duration,
}

impl<L, B> ApprovalService<L, B>
where
    L: AutomationLogRepository,
    B: BudgetWriter,
{
    /// Create a new service.
    pub fn new(log: L, writer: B) -> Self {
        Self {
            log,
            writer,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    /// Override the budget write timeout.
    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Approve or reject a pending entry.
    ///
    /// The entry is claimed before anything else happens, so concurrent
    /// requests for one entry cannot both resolve it: the loser fails with
    /// [`AdPilotError::NotPending`] and never touches the account.
    /// Approving pushes the entry's `new_budget` next; the entry only
    /// changes once the write succeeded. Rejecting never touches the account.
    ///
    /// # Errors
    ///
    /// - [`AdPilotError::NotFound`] when no entry has this id.
    /// - [`AdPilotError::NotPending`] when the entry was already resolved or
    ///   another request is resolving it.
    /// - [`AdPilotError::BudgetUpdate`] when the budget write fails; the
    ///   entry stays pending.
    /// - a storage error when the resolved entry cannot be saved.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_approval(
        &self,
        id: LogEntryId,
        approved: bool,
    ) -> Result<ApprovalResolution, AdPilotError> {
        let entry = self
            .log
            .get_by_id(id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Pending action",
                id: id.to_string(),
            })?;
        entry.ensure_pending()?;

        let Claim {
            mut entry,
            claimed_at,
        } = self.log.claim(id, self.claim_ttl()).await?;

        let message = if approved {
            let written = write_budget(
                &self.writer,
                &entry.campaign_id,
                entry.new_budget,
                self.write_timeout,
            )
            .await;
            if let Err(err) = written {
                if let Err(release) = self.log.release(id, claimed_at).await {
                    tracing::warn!(error = %release, "unable to release claim");
                }
                return Err(err.into());
            }
            entry.approve(now())?;
            BUDGET_UPDATED
        } else {
            entry.reject(now())?;
            ACTION_REJECTED
        };

        let entry = self.log.resolve(entry, claimed_at).await?;
        tracing::info!(
            campaign_id = %entry.campaign_id,
            action = %entry.action,
            "pending action resolved"
        );

        Ok(ApprovalResolution {
            success: true,
            message: message.to_string(),
            entry,
        })
    }

    /// How long a claim protects an entry. Outlives the budget write so a
    /// slow writer never loses its claim mid-flight.
    fn claim_ttl(&self) -> Duration {
        self.write_timeout.saturating_add(CLAIM_GRACE)
    }

    /// Entries still waiting for a reviewer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_pending(&self) -> Result<Vec<AutomationLogEntry>, AdPilotError> {
        self.log.find_pending().await
    }

    /// The `limit` most recent log entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<AutomationLogEntry>, AdPilotError> {
        self.log.get_recent(limit).await
    }
}
