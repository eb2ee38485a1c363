//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use adpilot_domain::id::{CampaignId, LogEntryId};
use adpilot_domain::settings::{AutomationMode, AutomationSettings, FloorPolicy};

#[derive(Debug, Parser)]
#[command(
    name = "adpilotd",
    about = "adpilot: rule-based daily budget automation for advertising campaigns",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "adpilot.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one evaluation now and print the run report
    Run,
    /// Run evaluations on a fixed interval until interrupted
    Schedule {
        /// Seconds between runs (overrides the configuration)
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// Approve a pending budget change and apply it
    Approve {
        /// Automation log entry id
        id: LogEntryId,
    },
    /// Reject a pending budget change
    Reject {
        /// Automation log entry id
        id: LogEntryId,
    },
    /// List budget changes waiting for approval
    Pending,
    /// Show the most recent automation log entries
    Log {
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
    /// Show today's performance of every campaign
    Campaigns,
    /// List a campaign's keywords with their ratios
    Keywords {
        /// Campaign id (internal or Amazon)
        campaign: CampaignId,
    },
    /// Recommend keyword bids that move ACoS towards a target
    Optimize {
        /// Campaign id (internal or Amazon)
        campaign: CampaignId,
        /// Target ACoS in percent; defaults to the stored settings
        #[arg(long)]
        target_acos: Option<f64>,
    },
    /// Inspect or change automation settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the effective settings
    Show,
    /// Store new settings; unspecified fields keep their current value
    Set(SettingsArgs),
}

#[derive(Debug, Default, Args)]
pub struct SettingsArgs {
    /// off, approval or auto
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<AutomationMode>,
    #[arg(long)]
    pub target_acos: Option<f64>,
    #[arg(long)]
    pub acos_threshold: Option<f64>,
    #[arg(long)]
    pub scale_up_pct: Option<f64>,
    #[arg(long)]
    pub scale_down_pct: Option<f64>,
    #[arg(long)]
    pub budget_floor: Option<f64>,
    #[arg(long)]
    pub daily_budget_cap: Option<f64>,
    /// pending or skip: what approval mode does when a decrease hits the floor
    #[arg(long, value_parser = parse_floor_policy)]
    pub floor_policy: Option<FloorPolicy>,
}

impl SettingsArgs {
    /// Overlay the given flags on `current`.
    #[must_use]
    pub fn apply(self, current: AutomationSettings) -> AutomationSettings {
        AutomationSettings {
            id: None,
            target_acos: self.target_acos.unwrap_or(current.target_acos),
            acos_threshold: self.acos_threshold.unwrap_or(current.acos_threshold),
            scale_up_pct: self.scale_up_pct.unwrap_or(current.scale_up_pct),
            scale_down_pct: self.scale_down_pct.unwrap_or(current.scale_down_pct),
            budget_floor: self.budget_floor.unwrap_or(current.budget_floor),
            automation_mode: self.mode.unwrap_or(current.automation_mode),
            daily_budget_cap: self.daily_budget_cap.unwrap_or(current.daily_budget_cap),
            floor_policy: self.floor_policy.unwrap_or(current.floor_policy),
        }
    }
}

fn parse_mode(value: &str) -> Result<AutomationMode, String> {
    AutomationMode::parse(value)
        .ok_or_else(|| format!("expected one of off, approval, auto; got {value:?}"))
}

fn parse_floor_policy(value: &str) -> Result<FloorPolicy, String> {
    FloorPolicy::parse(value).ok_or_else(|| format!("expected pending or skip; got {value:?}"))
}
