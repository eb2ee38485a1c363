//! Automation log repository port: persistence for budget decisions.

use std::future::Future;
use std::time::Duration;

use adpilot_domain::error::{AdPilotError, EntryState, NotFoundError, NotPendingError};
use adpilot_domain::id::LogEntryId;
use adpilot_domain::log_entry::AutomationLogEntry;
use adpilot_domain::time::Timestamp;

/// A pending entry reserved by one resolver.
///
/// `claimed_at` doubles as the ownership token handed back to
/// [`AutomationLogRepository::resolve`] and [`AutomationLogRepository::release`].
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub entry: AutomationLogEntry,
    pub claimed_at: Timestamp,
}

/// Error for a claim or resolution that matched no row, given the entry as
/// currently stored.
#[must_use]
pub fn unavailable(id: LogEntryId, current: Option<&AutomationLogEntry>) -> AdPilotError {
    let state = match current {
        None => {
            return NotFoundError {
                entity: "AutomationLogEntry",
                id: id.to_string(),
            }
            .into();
        }
        Some(entry) if entry.is_pending() => EntryState::Claimed,
        Some(entry) => EntryState::Settled(entry.action),
    };
    NotPendingError {
        id: id.to_string(),
        state,
    }
    .into()
}

/// Repository for persisting and querying [`AutomationLogEntry`] values.
pub trait AutomationLogRepository {
    /// Append a batch of entries. Either all entries are stored or none.
    fn append(
        &self,
        entries: Vec<AutomationLogEntry>,
    ) -> impl Future<Output = Result<usize, AdPilotError>> + Send;

    /// Get an entry by its unique identifier.
    fn get_by_id(
        &self,
        id: LogEntryId,
    ) -> impl Future<Output = Result<Option<AutomationLogEntry>, AdPilotError>> + Send;

    /// Atomically reserve a pending entry.
    ///
    /// At most one claim per entry is live at a time; a claim older than
    /// `ttl` counts as abandoned and may be taken over.
    ///
    /// Fails with [`AdPilotError::NotFound`] for an unknown id and with
    /// [`AdPilotError::NotPending`] when the entry is settled or held by a
    /// live claim.
    fn claim(
        &self,
        id: LogEntryId,
        ttl: Duration,
    ) -> impl Future<Output = Result<Claim, AdPilotError>> + Send;

    /// Store the resolution of a claimed entry and drop the claim.
    ///
    /// Only succeeds while the entry is still pending under the claim taken
    /// at `claimed_at`; otherwise nothing changes and the call fails with
    /// [`AdPilotError::NotPending`] (or [`AdPilotError::NotFound`]).
    fn resolve(
        &self,
        entry: AutomationLogEntry,
        claimed_at: Timestamp,
    ) -> impl Future<Output = Result<AutomationLogEntry, AdPilotError>> + Send;

    /// Drop a claim without resolving, leaving the entry pending.
    fn release(
        &self,
        id: LogEntryId,
        claimed_at: Timestamp,
    ) -> impl Future<Output = Result<(), AdPilotError>> + Send;

    /// Most recent entries first, at most `limit` of them.
    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AutomationLogEntry>, AdPilotError>> + Send;

    /// Entries still waiting for a reviewer, oldest first.
    fn find_pending(
        &self,
    ) -> impl Future<Output = Result<Vec<AutomationLogEntry>, AdPilotError>> + Send;
}
