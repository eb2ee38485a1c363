//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`AdPilotError`] via `#[from]` (adapters box theirs into
//! [`AdPilotError::Storage`]).

use crate::decision::BudgetAction;

/// Base error type shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum AdPilotError {
    #[error("Validation error")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    NotPending(#[from] NotPendingError),

    #[error(transparent)]
    BudgetUpdate(#[from] BudgetUpdateError),

    #[error("Storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated while building a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("campaign id must not be empty")]
    EmptyCampaignId,

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
}

/// A lookup by identifier returned nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// An approve/reject request targeted an entry that is no longer waiting
/// for a reviewer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Action is not pending approval (entry {id} is {state})")]
pub struct NotPendingError {
    pub id: String,
    pub state: EntryState,
}

/// Why an entry cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Already resolved, or never needed a reviewer.
    Settled(BudgetAction),
    /// Another request holds the entry while it applies its resolution.
    Claimed,
}

impl std::fmt::Display for EntryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Settled(action) => std::fmt::Display::fmt(action, f),
            Self::Claimed => f.write_str("being resolved by another request"),
        }
    }
}

/// The external budget writer refused or failed a budget change.
#[derive(Debug, thiserror::Error)]
#[error("Budget update failed for campaign {campaign_id}")]
pub struct BudgetUpdateError {
    pub campaign_id: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl BudgetUpdateError {
    /// Build an error wrapping the collaborator's failure.
    #[must_use]
    pub fn caused_by(
        campaign_id: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_not_found_into_base_error() {
        let err: AdPilotError = NotFoundError {
            entity: "AutomationLogEntry",
            id: "abc".to_string(),
        }
        .into();
        assert!(matches!(err, AdPilotError::NotFound(_)));
        assert_eq!(err.to_string(), "AutomationLogEntry not found: abc");
    }

    #[test]
    fn should_mention_action_in_not_pending_message() {
        let err = NotPendingError {
            id: "abc".to_string(),
            state: EntryState::Settled(BudgetAction::Rejected),
        };
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    fn should_explain_claimed_entries() {
        let err = NotPendingError {
            id: "abc".to_string(),
            state: EntryState::Claimed,
        };
        assert_eq!(
            err.to_string(),
            "Action is not pending approval (entry abc is being resolved by another request)"
        );
    }

    #[test]
    fn should_expose_source_of_budget_update_error() {
        use std::error::Error as _;

        let io = std::io::Error::other("connection reset");
        let err = BudgetUpdateError::caused_by("cmp-1", io);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Budget update failed for campaign cmp-1");
    }
}
