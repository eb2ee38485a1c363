//! `SQLite` implementation of [`SettingsStore`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use adpilot_app::ports::SettingsStore;
use adpilot_domain::error::AdPilotError;
use adpilot_domain::id::SettingsId;
use adpilot_domain::settings::{AutomationSettings, RawSettings};
use adpilot_domain::time::now;
use serde_json::Value;

use crate::error::StorageError;
use crate::time;

struct Wrapper(RawSettings);

/// Read a numeric column that may hold a number, numeric text, or junk.
///
/// Text is handed to the settings normalizer as-is so that it decides
/// what is usable.
fn loose_number(row: &SqliteRow, column: &str) -> Result<Option<Value>, sqlx::Error> {
    if let Ok(value) = row.try_get::<Option<f64>, _>(column) {
        return Ok(value.map(Value::from));
    }
    let text: Option<String> = row.try_get(column)?;
    Ok(text.map(Value::String))
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;

        Ok(Self(RawSettings {
            id: Some(SettingsId::from_uuid(id)),
            target_acos: loose_number(row, "target_acos")?,
            acos_threshold: loose_number(row, "acos_threshold")?,
            scale_up_pct: loose_number(row, "scale_up_pct")?,
            scale_down_pct: loose_number(row, "scale_down_pct")?,
            budget_floor: loose_number(row, "budget_floor")?,
            automation_mode: row.try_get("automation_mode")?,
            automation_enabled: row.try_get("automation_enabled")?,
            daily_budget_cap: loose_number(row, "daily_budget_cap")?,
            floor_policy: row.try_get("floor_policy")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO ad_settings (
        id, target_acos, acos_threshold, scale_up_pct, scale_down_pct,
        budget_floor, automation_mode, automation_enabled, daily_budget_cap,
        floor_policy, updated_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_LATEST: &str =
    "SELECT * FROM ad_settings ORDER BY updated_at DESC, rowid DESC LIMIT 1";

/// `SQLite`-backed settings store.
#[derive(Clone)]
pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    /// Create a new store backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl SettingsStore for SqliteSettingsStore {
    async fn load_latest(&self) -> Result<Option<RawSettings>, AdPilotError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_LATEST)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(row.map(|w| w.0))
    }

    async fn save(&self, settings: AutomationSettings) -> Result<AutomationSettings, AdPilotError> {
        let id = SettingsId::new();

        sqlx::query(INSERT)
            .bind(id.as_uuid())
            .bind(settings.target_acos)
            .bind(settings.acos_threshold)
            .bind(settings.scale_up_pct)
            .bind(settings.scale_down_pct)
            .bind(settings.budget_floor)
            .bind(settings.automation_mode.as_str())
            .bind(Option::<bool>::None)
            .bind(settings.daily_budget_cap)
            .bind(settings.floor_policy.as_str())
            .bind(time::encode(now()))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(AutomationSettings {
            id: Some(id),
            ..settings
        })
    }
}
