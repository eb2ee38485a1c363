//! Run summary: the outcome of one scheduled evaluation run.

use serde::{Deserialize, Serialize};

use crate::decision::{BudgetAction, Decision};
use crate::log_entry::AutomationLogEntry;
use crate::settings::{AutomationMode, AutomationSettings};

/// Reported as the skip reason when automation is switched off.
pub const SKIPPED_MODE_OFF: &str = "automation_mode_off";

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub evaluated: u32,
    pub increased: u32,
    pub decreased: u32,
    pub skipped_floor: u32,
    pub no_action: u32,
    pub pending_increase: u32,
    pub pending_decrease: u32,
    pub update_errors: u32,
}

impl RunSummary {
    /// Count one evaluated decision.
    pub fn record(&mut self, decision: &Decision) {
        self.evaluated += 1;
        match decision.action {
            BudgetAction::Increase => self.increased += 1,
            BudgetAction::Decrease => self.decreased += 1,
            BudgetAction::SkippedFloor => self.skipped_floor += 1,
            BudgetAction::NoAction => self.no_action += 1,
            BudgetAction::PendingIncrease => self.pending_increase += 1,
            BudgetAction::PendingDecrease => self.pending_decrease += 1,
            BudgetAction::Rejected => {}
        }
    }

    pub fn record_update_error(&mut self) {
        self.update_errors += 1;
    }
}

/// Everything a caller learns from one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// `false` when the run was skipped entirely.
    pub ran: bool,
    pub mode: AutomationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    pub campaign_count: usize,
    pub settings: AutomationSettings,
    pub summary: RunSummary,
    pub log_entries: Vec<AutomationLogEntry>,
    /// Number of entries the log store accepted.
    pub log_inserted: usize,
    /// Why the log store refused the entries, if it did.
    pub log_error: Option<String>,
}

impl RunReport {
    /// Report for a run that did not evaluate anything.
    #[must_use]
    pub fn skipped(settings: AutomationSettings, reason: &str) -> Self {
        Self {
            ran: false,
            mode: settings.automation_mode,
            skip_reason: Some(reason.to_string()),
            campaign_count: 0,
            settings,
            summary: RunSummary::default(),
            log_entries: Vec::new(),
            log_inserted: 0,
            log_error: None,
        }
    }
}
