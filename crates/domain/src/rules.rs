//! Budget rules: the scale-up / scale-down decision logic.
//!
//! Evaluation is pure: it reads a settings snapshot and one campaign
//! snapshot and returns a [`Decision`]. Pushing the new budget to the ads
//! platform is the caller's job (see [`Decision::requires_write`]).
//!
//! Rules, in priority order:
//!
//! 1. **Scale up** when utilization is above [`SCALE_UP_UTILIZATION`] and
//!    ACoS is below the target. The new budget grows by `scale_up_pct` but
//!    never more than doubles in one step.
//! 2. **Scale down** when ACoS is above the threshold. The new budget
//!    shrinks by `scale_down_pct` but never below the floor.
//! 3. Otherwise nothing changes.

use crate::campaign::CampaignSnapshot;
use crate::decision::{BudgetAction, Decision, RuleTriggered};
use crate::metrics::round2;
use crate::settings::{AutomationMode, AutomationSettings, FloorPolicy};
use crate::time::Timestamp;

/// Utilization (percent) a campaign must exceed before it can scale up.
pub const SCALE_UP_UTILIZATION: f64 = 80.0;

/// Largest multiple of the current budget a single scale-up may reach.
pub const MAX_SCALE_UP_FACTOR: f64 = 2.0;

/// Applies the budget rules under one settings snapshot.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    settings: AutomationSettings,
}

impl RuleEngine {
    #[must_use]
    pub fn new(settings: AutomationSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &AutomationSettings {
        &self.settings
    }

    /// Evaluate every enabled campaign.
    ///
    /// Returns nothing when automation is off. Decisions come back in input
    /// order, but each one depends only on its own campaign.
    #[must_use]
    pub fn evaluate(&self, campaigns: &[CampaignSnapshot], now: Timestamp) -> Vec<Decision> {
        campaigns
            .iter()
            .filter_map(|campaign| self.evaluate_campaign(campaign, now))
            .collect()
    }

    /// Evaluate a single campaign.
    ///
    /// Returns `None` when automation is off or the campaign is not enabled.
    #[must_use]
    pub fn evaluate_campaign(
        &self,
        campaign: &CampaignSnapshot,
        now: Timestamp,
    ) -> Option<Decision> {
        let mode = self.settings.automation_mode;
        if mode == AutomationMode::Off || !campaign.is_enabled() {
            return None;
        }

        let old_budget = round2(campaign.budget);
        let utilization = round2(campaign.utilization());
        let acos = round2(campaign.acos());

        let mut decision = Decision {
            campaign_id: campaign.id.clone(),
            campaign_name: campaign.name.clone(),
            action: BudgetAction::NoAction,
            rule_triggered: None,
            old_budget,
            new_budget: old_budget,
            budget_utilization: utilization,
            today_acos: acos,
            reason: format!("No rules triggered. Util {utilization:.2}%, ACoS {acos:.2}%."),
            approved: true,
            approved_at: Some(now),
            requires_write: false,
        };

        if utilization > SCALE_UP_UTILIZATION && acos < self.settings.target_acos {
            self.scale_up(&mut decision);
        } else if acos > self.settings.acos_threshold {
            self.scale_down(&mut decision);
        }

        Some(decision)
    }

    fn scale_up(&self, decision: &mut Decision) {
        let old = decision.old_budget;
        decision.rule_triggered = Some(RuleTriggered::ScaleUp);
        let scaled = old * (1.0 + self.settings.scale_up_pct / 100.0);
        decision.new_budget = round2(scaled.min(old * MAX_SCALE_UP_FACTOR));
        decision.reason = format!(
            "Budget util {:.2}% > 80% and ACoS {:.2}% < target {:.2}%.",
            decision.budget_utilization, decision.today_acos, self.settings.target_acos,
        );

        if self.settings.automation_mode == AutomationMode::Approval {
            mark_pending(decision, BudgetAction::PendingIncrease);
        } else {
            decision.action = BudgetAction::Increase;
            decision.requires_write = true;
        }
    }

    fn scale_down(&self, decision: &mut Decision) {
        let old = decision.old_budget;
        let floor = self.settings.budget_floor;
        decision.rule_triggered = Some(RuleTriggered::ScaleDown);
        decision.new_budget =
            round2((old * (1.0 - self.settings.scale_down_pct / 100.0)).max(floor));
        decision.reason = format!(
            "ACoS {:.2}% > threshold {:.2}%.",
            decision.today_acos, self.settings.acos_threshold,
        );

        let at_floor = decision.new_budget <= floor;
        let skip_floor = at_floor && self.settings.floor_policy == FloorPolicy::Skip;
        match self.settings.automation_mode {
            AutomationMode::Approval if skip_floor => hold_at_floor(decision, floor),
            AutomationMode::Approval => mark_pending(decision, BudgetAction::PendingDecrease),
            _ => {
                if at_floor {
                    hold_at_floor(decision, floor);
                } else {
                    decision.action = BudgetAction::Decrease;
                }
                // pushed even at the floor: a budget just above it settles on it
                decision.requires_write = true;
            }
        }
    }
}

fn mark_pending(decision: &mut Decision, action: BudgetAction) {
    decision.action = action;
    decision.approved = false;
    decision.approved_at = None;
}

fn hold_at_floor(decision: &mut Decision, floor: f64) {
    decision.action = BudgetAction::SkippedFloor;
    decision
        .reason
        .push_str(&format!(" Budget held at floor {floor:.2}."));
}
