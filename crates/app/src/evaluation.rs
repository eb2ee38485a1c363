//! Evaluation service: one scheduled budget evaluation run.
//!
//! A run loads the effective settings, fetches today's campaigns, lets the
//! [`RuleEngine`] decide, pushes budgets in `auto` mode and finally appends
//! one automation log entry per evaluated campaign.
//!
//! Budget writes happen one campaign at a time, each bounded by a timeout.
//! A failed write only affects its own campaign; a failed log append is
//! reported in the [`RunReport`] after the writes have already been issued.

use std::time::Duration;

use adpilot_domain::error::{AdPilotError, BudgetUpdateError};
use adpilot_domain::id::CampaignId;
use adpilot_domain::log_entry::AutomationLogEntry;
use adpilot_domain::rules::RuleEngine;
use adpilot_domain::run::{RunReport, RunSummary, SKIPPED_MODE_OFF};
use adpilot_domain::settings::AutomationMode;
use adpilot_domain::time::now;

use crate::ports::{AutomationLogRepository, BudgetWriter, CampaignSource, SettingsStore};
use crate::services::settings_service::SettingsService;

/// Upper bound for a single budget write unless configured otherwise.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Push one budget, giving up after `timeout`.
pub(crate) async fn write_budget<B: BudgetWriter>(
    writer: &B,
    campaign_id: &CampaignId,
    new_budget: f64,
    timeout: Duration,
) -> Result<(), BudgetUpdateError> {
    match tokio::time::timeout(timeout, writer.update_budget(campaign_id, new_budget)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(err)) => Err(BudgetUpdateError::caused_by(campaign_id.as_str(), err)),
        Err(elapsed) => Err(BudgetUpdateError::caused_by(campaign_id.as_str(), elapsed)),
    }
}

/// Orchestrates an evaluation run across the ports.
pub struct EvaluationService<C, B, S, L> {
    campaigns: C,
    writer: B,
    settings: SettingsService<S>,
    log: L,
    write_timeout: Duration,
}

impl<C, B, S, L> EvaluationService<C, B, S, L>
where
    C: CampaignSource,
    B: BudgetWriter,
    S: SettingsStore,
    L: AutomationLogRepository,
{
    /// Create a new service.
    pub fn new(campaigns: C, writer: B, settings: S, log: L) -> Self {
        Self {
            campaigns,
            writer,
            settings: SettingsService::new(settings),
            log,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    /// Override the per-write timeout.
    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Run one evaluation.
    ///
    /// With automation `off` nothing is fetched, written or logged.
    ///
    /// # Errors
    ///
    /// Returns the campaign source's error if campaigns cannot be listed.
    /// Budget write and log failures are reported in the returned
    /// [`RunReport`] instead.
    #[tracing::instrument(skip(self))]
    pub async fn run_evaluation(&self) -> Result<RunReport, AdPilotError> {
        let settings = self.settings.load().await;
        if settings.automation_mode == AutomationMode::Off {
            tracing::info!("automation is off, skipping run");
            return Ok(RunReport::skipped(settings, SKIPPED_MODE_OFF));
        }

        let campaigns = self.campaigns.list_campaigns().await?;
        let campaign_count = campaigns.iter().filter(|c| c.is_enabled()).count();

        let run_at = now();
        let engine = RuleEngine::new(settings);
        let mut summary = RunSummary::default();
        let mut log_entries = Vec::with_capacity(campaign_count);

        for mut decision in engine.evaluate(&campaigns, run_at) {
            if decision.requires_write {
                if let Err(err) = write_budget(
                    &self.writer,
                    &decision.campaign_id,
                    decision.new_budget,
                    self.write_timeout,
                )
                .await
                {
                    tracing::warn!(
                        campaign_id = %decision.campaign_id,
                        new_budget = decision.new_budget,
                        error = ?err,
                        "budget update failed"
                    );
                    decision.record_write_failure();
                    summary.record_update_error();
                }
            }
            summary.record(&decision);
            log_entries.push(AutomationLogEntry::record(
                decision,
                engine.settings(),
                run_at,
            ));
        }

        let (log_inserted, log_error) = if log_entries.is_empty() {
            (0, None)
        } else {
            match self.log.append(log_entries.clone()).await {
                Ok(inserted) => (inserted, None),
                Err(err) => {
                    tracing::warn!(error = %err, "unable to store automation log");
                    (0, Some(err.to_string()))
                }
            }
        };

        tracing::info!(
            campaigns = campaign_count,
            increased = summary.increased,
            decreased = summary.decreased,
            pending = summary.pending_increase + summary.pending_decrease,
            update_errors = summary.update_errors,
            "evaluation run complete"
        );

        let settings = engine.settings().clone();
        Ok(RunReport {
            ran: true,
            mode: settings.automation_mode,
            skip_reason: None,
            campaign_count,
            settings,
            summary,
            log_entries,
            log_inserted,
            log_error,
        })
    }
}
