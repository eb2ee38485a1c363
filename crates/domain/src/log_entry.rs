//! Automation log: the append-only audit trail of budget decisions.
//!
//! One entry is written per evaluated campaign per run. Entries are never
//! deleted; a pending entry is mutated exactly once when a reviewer
//! approves or rejects it:
//!
//! ```text
//! pending_increase --approve--> increase   (approved = true)
//! pending_increase --reject---> rejected   (approved = false)
//! pending_decrease --approve--> decrease   (approved = true)
//! pending_decrease --reject---> rejected   (approved = false)
//! ```

use serde::{Deserialize, Serialize};

use crate::decision::{BudgetAction, Decision, RuleTriggered};
use crate::error::{AdPilotError, EntryState, NotPendingError};
use crate::id::{CampaignId, LogEntryId};
use crate::settings::AutomationSettings;
use crate::time::Timestamp;

/// A persisted budget decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationLogEntry {
    pub id: LogEntryId,
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub action: BudgetAction,
    pub rule_triggered: Option<RuleTriggered>,
    pub old_budget: f64,
    pub new_budget: f64,
    pub budget_utilization: f64,
    pub today_acos: f64,
    /// Target ACoS in effect when the decision was made.
    pub acos_target: f64,
    /// ACoS threshold in effect when the decision was made.
    pub acos_threshold: f64,
    pub reason: String,
    pub approved: bool,
    pub approved_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl AutomationLogEntry {
    /// Record a decision under the settings it was made with.
    #[must_use]
    pub fn record(
        decision: Decision,
        settings: &AutomationSettings,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: LogEntryId::new(),
            campaign_id: decision.campaign_id,
            campaign_name: decision.campaign_name,
            action: decision.action,
            rule_triggered: decision.rule_triggered,
            old_budget: decision.old_budget,
            new_budget: decision.new_budget,
            budget_utilization: decision.budget_utilization,
            today_acos: decision.today_acos,
            acos_target: settings.target_acos,
            acos_threshold: settings.acos_threshold,
            reason: decision.reason,
            approved: decision.approved,
            approved_at: decision.approved_at,
            created_at,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.action.is_pending()
    }

    /// Fail unless the entry is still waiting for a reviewer.
    ///
    /// # Errors
    ///
    /// Returns [`AdPilotError::NotPending`] for any resolved entry.
    pub fn ensure_pending(&self) -> Result<(), AdPilotError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(NotPendingError {
                id: self.id.to_string(),
                state: EntryState::Settled(self.action),
            }
            .into())
        }
    }

    /// Resolve a pending entry as approved.
    ///
    /// # Errors
    ///
    /// Returns [`AdPilotError::NotPending`] if the entry is already resolved;
    /// the entry is left untouched.
    pub fn approve(&mut self, at: Timestamp) -> Result<(), AdPilotError> {
        self.ensure_pending()?;
        if let Some(resolved) = self.action.approved() {
            self.action = resolved;
        }
        self.approved = true;
        self.approved_at = Some(at);
        Ok(())
    }

    /// Resolve a pending entry as rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AdPilotError::NotPending`] if the entry is already resolved;
    /// the entry is left untouched.
    pub fn reject(&mut self, at: Timestamp) -> Result<(), AdPilotError> {
        self.ensure_pending()?;
        self.action = BudgetAction::Rejected;
        self.approved = false;
        self.approved_at = Some(at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    fn pending_entry(action: BudgetAction) -> AutomationLogEntry {
        let decision = Decision {
            campaign_id: CampaignId::new("cmp-1").unwrap(),
            campaign_name: "Office Humor - Broad Match".to_string(),
            action,
            rule_triggered: Some(RuleTriggered::ScaleUp),
            old_budget: 45.0,
            new_budget: 54.0,
            budget_utilization: 92.89,
            today_acos: 23.69,
            reason: "Budget util 92.89% > 80% and ACoS 23.69% < target 30.00%.".to_string(),
            approved: false,
            approved_at: None,
            requires_write: false,
        };
        AutomationLogEntry::record(decision, &AutomationSettings::default(), now())
    }

    #[test]
    fn should_copy_settings_context_into_entry() {
        let entry = pending_entry(BudgetAction::PendingIncrease);
        assert_eq!(entry.acos_target, 30.0);
        assert_eq!(entry.acos_threshold, 40.0);
        assert!(entry.is_pending());
    }

    #[test]
    fn should_resolve_pending_increase_to_increase_on_approve() {
        let mut entry = pending_entry(BudgetAction::PendingIncrease);
        let at = now();
        entry.approve(at).unwrap();
        assert_eq!(entry.action, BudgetAction::Increase);
        assert!(entry.approved);
        assert_eq!(entry.approved_at, Some(at));
    }

    #[test]
    fn should_resolve_pending_decrease_to_decrease_on_approve() {
        let mut entry = pending_entry(BudgetAction::PendingDecrease);
        entry.approve(now()).unwrap();
        assert_eq!(entry.action, BudgetAction::Decrease);
    }

    #[test]
    fn should_mark_rejected_on_reject() {
        let mut entry = pending_entry(BudgetAction::PendingDecrease);
        let at = now();
        entry.reject(at).unwrap();
        assert_eq!(entry.action, BudgetAction::Rejected);
        assert!(!entry.approved);
        assert_eq!(entry.approved_at, Some(at));
    }

    #[test]
    fn should_refuse_to_resolve_twice() {
        let mut entry = pending_entry(BudgetAction::PendingIncrease);
        entry.reject(now()).unwrap();
        let snapshot = entry.clone();

        assert!(matches!(entry.approve(now()), Err(AdPilotError::NotPending(_))));
        assert!(matches!(entry.reject(now()), Err(AdPilotError::NotPending(_))));
        assert_eq!(entry, snapshot);
    }

    #[test]
    fn should_refuse_to_approve_applied_increase() {
        let mut entry = pending_entry(BudgetAction::Increase);
        assert!(matches!(entry.approve(now()), Err(AdPilotError::NotPending(_))));
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let entry = pending_entry(BudgetAction::PendingIncrease);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["action"], "pending_increase");
        assert_eq!(json["rule_triggered"], "scale_up");
        let parsed: AutomationLogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, entry);
    }
}
