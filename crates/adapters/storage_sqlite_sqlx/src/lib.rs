//! # adpilot-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `SettingsStore` and `AutomationLogRepository` ports
//!   defined in `adpilot-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `adpilot-app` (for port traits) and `adpilot-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod automation_log_repo;
mod error;
mod pool;
mod settings_store;
mod time;

pub use automation_log_repo::SqliteAutomationLogRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use settings_store::SqliteSettingsStore;
