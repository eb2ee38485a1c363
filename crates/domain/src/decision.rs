//! Decision: the outcome of evaluating one campaign against the budget rules.

use serde::{Deserialize, Serialize};

use crate::id::CampaignId;
use crate::time::Timestamp;

/// Suffix appended to a decision's reason when the budget write fails.
pub const BUDGET_UPDATE_FAILED: &str = " Budget update failed.";

/// What happened (or is waiting to happen) to a campaign's budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetAction {
    Increase,
    Decrease,
    /// A scale-down reached the floor; the budget is held there.
    SkippedFloor,
    NoAction,
    PendingIncrease,
    PendingDecrease,
    /// A pending change turned down by a reviewer.
    Rejected,
}

impl BudgetAction {
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::PendingIncrease | Self::PendingDecrease)
    }

    /// The terminal action a pending one resolves to when approved.
    #[must_use]
    pub fn approved(self) -> Option<Self> {
        match self {
            Self::PendingIncrease => Some(Self::Increase),
            Self::PendingDecrease => Some(Self::Decrease),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::SkippedFloor => "skipped_floor",
            Self::NoAction => "no_action",
            Self::PendingIncrease => "pending_increase",
            Self::PendingDecrease => "pending_decrease",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for BudgetAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BudgetAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            "skipped_floor" => Ok(Self::SkippedFloor),
            "no_action" => Ok(Self::NoAction),
            "pending_increase" => Ok(Self::PendingIncrease),
            "pending_decrease" => Ok(Self::PendingDecrease),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown budget action: {other}")),
        }
    }
}

/// Which budget rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTriggered {
    ScaleUp,
    ScaleDown,
}

impl RuleTriggered {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScaleUp => "scale_up",
            Self::ScaleDown => "scale_down",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scale_up" => Some(Self::ScaleUp),
            "scale_down" => Some(Self::ScaleDown),
            _ => None,
        }
    }
}

/// Result of evaluating a single campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub action: BudgetAction,
    pub rule_triggered: Option<RuleTriggered>,
    pub old_budget: f64,
    pub new_budget: f64,
    pub budget_utilization: f64,
    pub today_acos: f64,
    pub reason: String,
    pub approved: bool,
    pub approved_at: Option<Timestamp>,
    /// Whether `new_budget` must be pushed to the budget writer now.
    #[serde(skip)]
    pub requires_write: bool,
}

impl Decision {
    /// Note that pushing `new_budget` failed. The decision keeps the
    /// attempted budget: the log reflects intent, not confirmed state.
    pub fn record_write_failure(&mut self) {
        self.reason.push_str(BUDGET_UPDATE_FAILED);
    }
}
