//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod automation_log_repo;
pub mod budget_writer;
pub mod campaign_source;
pub mod keyword_source;
pub mod settings_store;

pub use automation_log_repo::{AutomationLogRepository, Claim};
pub use budget_writer::BudgetWriter;
pub use campaign_source::CampaignSource;
pub use keyword_source::KeywordSource;
pub use settings_store::SettingsStore;
