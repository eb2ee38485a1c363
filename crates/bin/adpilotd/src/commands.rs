//! Command handlers: wire the adapters into services and run one command.

use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use adpilot_adapter_demo::DemoAdsAccount;
use adpilot_adapter_storage_sqlite_sqlx::{
    Config as DatabaseConfig, SqliteAutomationLogRepository, SqliteSettingsStore,
};
use adpilot_app::evaluation::EvaluationService;
use adpilot_app::services::approval_service::ApprovalService;
use adpilot_app::services::optimizer_service::OptimizerService;
use adpilot_app::services::settings_service::SettingsService;

use crate::cli::{Command, SettingsAction};
use crate::config::Config;

type Evaluation = EvaluationService<
    DemoAdsAccount,
    DemoAdsAccount,
    SqliteSettingsStore,
    SqliteAutomationLogRepository,
>;

/// Every application service, wired to the concrete adapters.
pub struct Services {
    pub evaluation: Evaluation,
    pub approvals: ApprovalService<SqliteAutomationLogRepository, DemoAdsAccount>,
    pub settings: SettingsService<SqliteSettingsStore>,
    pub optimizer: OptimizerService<DemoAdsAccount, DemoAdsAccount, SqliteSettingsStore>,
}

impl Services {
    /// Open the database, seed the demo account and build the services.
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be opened or migrated.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let db = DatabaseConfig {
            database_url: config.database_url().to_string(),
        }
        .build()
        .await
        .with_context(|| format!("unable to open database {}", config.database_url()))?;
        let pool = db.pool().clone();

        let account = DemoAdsAccount::seeded()?;
        let settings_store = SqliteSettingsStore::new(pool.clone());
        let log = SqliteAutomationLogRepository::new(pool);

        Ok(Self {
            evaluation: EvaluationService::new(
                account.clone(),
                account.clone(),
                settings_store.clone(),
                log.clone(),
            )
            .with_write_timeout(config.write_timeout()),
            approvals: ApprovalService::new(log, account.clone())
                .with_write_timeout(config.write_timeout()),
            optimizer: OptimizerService::new(account.clone(), account, settings_store.clone()),
            settings: SettingsService::new(settings_store),
        })
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run a single command to completion.
///
/// # Errors
///
/// Propagates service failures; approval rejections carry their message.
pub async fn execute(
    services: &Services,
    command: Command,
    config: &Config,
) -> anyhow::Result<()> {
    match command {
        Command::Run => print_json(&services.evaluation.run_evaluation().await?),
        Command::Schedule { interval_secs } => {
            let interval = interval_secs.map_or_else(|| config.interval(), Duration::from_secs);
            anyhow::ensure!(!interval.is_zero(), "interval must be non-zero");
            schedule(&services.evaluation, interval).await;
            Ok(())
        }
        Command::Approve { id } => {
            print_json(&services.approvals.resolve_approval(id, true).await?)
        }
        Command::Reject { id } => {
            print_json(&services.approvals.resolve_approval(id, false).await?)
        }
        Command::Pending => print_json(&services.approvals.list_pending().await?),
        Command::Log { limit } => print_json(&services.approvals.list_recent(limit).await?),
        Command::Campaigns => print_json(&services.optimizer.campaign_performance().await?),
        Command::Keywords { campaign } => {
            print_json(&services.optimizer.keywords(&campaign).await?)
        }
        Command::Optimize {
            campaign,
            target_acos,
        } => print_json(
            &services
                .optimizer
                .recommend_bids(&campaign, target_acos)
                .await?,
        ),
        Command::Settings { action } => match action {
            SettingsAction::Show => print_json(&services.settings.load().await),
            SettingsAction::Set(args) => {
                let current = services.settings.load().await;
                let saved = services.settings.save(args.apply(current)).await?;
                print_json(&saved)
            }
        },
    }
}

/// Evaluate every `interval` until Ctrl-C. Ticks missed while a run is in
/// progress are skipped, never queued.
pub async fn schedule(evaluation: &Evaluation, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tracing::info!(interval_secs = interval.as_secs(), "scheduler started");
    loop {
        tokio::select! {
            _ = ticker.tick() => match evaluation.run_evaluation().await {
                Ok(report) if report.ran => tracing::info!(
                    campaigns = report.campaign_count,
                    update_errors = report.summary.update_errors,
                    log_error = report.log_error.as_deref(),
                    "scheduled run finished"
                ),
                Ok(report) => tracing::info!(
                    reason = report.skip_reason.as_deref(),
                    "scheduled run skipped"
                ),
                Err(err) => tracing::error!(error = %err, "scheduled run failed"),
            },
            _ = &mut shutdown => {
                tracing::info!("shutdown signal received");
                break;
            }
        }
    }
}
