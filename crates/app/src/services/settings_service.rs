//! Settings service: resolves the effective automation settings.

use adpilot_domain::error::AdPilotError;
use adpilot_domain::settings::{AutomationSettings, normalize};

use crate::ports::SettingsStore;

/// Loads and stores automation settings.
pub struct SettingsService<S> {
    store: S,
}

impl<S: SettingsStore> SettingsService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Effective settings for the next run.
    ///
    /// Never fails: a missing row or an unreadable store yields the defaults.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> AutomationSettings {
        match self.store.load_latest().await {
            Ok(Some(raw)) => normalize(Some(&raw)),
            Ok(None) => {
                tracing::debug!("no stored settings, using defaults");
                AutomationSettings::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "unable to load settings, using defaults");
                AutomationSettings::default()
            }
        }
    }

    /// Persist a new settings snapshot; it becomes the effective one.
    ///
    /// # Errors
    ///
    /// Returns [`AdPilotError::Validation`] for non-finite or negative
    /// values, or a storage error propagated from the store.
    #[tracing::instrument(skip(self, settings), fields(mode = %settings.automation_mode))]
    pub async fn save(
        &self,
        settings: AutomationSettings,
    ) -> Result<AutomationSettings, AdPilotError> {
        settings.validate()?;
        let saved = self.store.save(settings).await?;
        tracing::info!("settings saved");
        Ok(saved)
    }
}
