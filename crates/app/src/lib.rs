//! # adpilot-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `CampaignSource`: read today's campaign snapshots
//!   - `BudgetWriter`: apply a new daily budget
//!   - `KeywordSource`: read a campaign's keywords
//!   - `SettingsStore`: load & save automation settings
//!   - `AutomationLogRepository`: append, claim & query the decision log
//! - Define **driving/inbound ports** as use-case structs:
//!   - `EvaluationService`: one scheduled evaluation run
//!   - `ApprovalService`: approve / reject pending decisions
//!   - `SettingsService`: resolve effective settings
//!   - `OptimizerService`: campaign performance and keyword bid recommendations
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `adpilot-domain` only (plus `tokio::time` for write timeouts).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod evaluation;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
