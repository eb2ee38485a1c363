//! Settings store port: persisted automation settings.

use std::future::Future;

use adpilot_domain::error::AdPilotError;
use adpilot_domain::settings::{AutomationSettings, RawSettings};

/// Storage for settings snapshots; the most recent one is authoritative.
pub trait SettingsStore {
    /// Load the most recent stored settings, unnormalized.
    fn load_latest(&self)
    -> impl Future<Output = Result<Option<RawSettings>, AdPilotError>> + Send;

    /// Store a new settings snapshot, returning it with its assigned id.
    fn save(
        &self,
        settings: AutomationSettings,
    ) -> impl Future<Output = Result<AutomationSettings, AdPilotError>> + Send;
}
