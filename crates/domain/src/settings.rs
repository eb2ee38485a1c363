//! Automation settings and their normalization.
//!
//! Stored settings may be partial, legacy-shaped or hold junk. [`normalize`]
//! turns whatever was stored into a fully-populated [`AutomationSettings`],
//! falling back to the documented default field by field. It never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::id::SettingsId;

pub const DEFAULT_TARGET_ACOS: f64 = 30.0;
pub const DEFAULT_ACOS_THRESHOLD: f64 = 40.0;
pub const DEFAULT_SCALE_UP_PCT: f64 = 20.0;
pub const DEFAULT_SCALE_DOWN_PCT: f64 = 15.0;
pub const DEFAULT_BUDGET_FLOOR: f64 = 5.0;
pub const DEFAULT_DAILY_BUDGET_CAP: f64 = 100.0;

/// How budget automation is allowed to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationMode {
    /// No evaluation at all.
    #[default]
    Off,
    /// Budget changes wait for a human decision.
    Approval,
    /// Budget changes are applied immediately.
    Auto,
}

impl AutomationMode {
    /// Parse the stored literal (`off`, `approval`, `auto`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "off" => Some(Self::Off),
            "approval" => Some(Self::Approval),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Approval => "approval",
            Self::Auto => "auto",
        }
    }
}

impl std::fmt::Display for AutomationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What approval mode does with a scale-down that lands on the budget floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorPolicy {
    /// Queue a `pending_decrease` like any other scale-down.
    #[default]
    Pending,
    /// Record `skipped_floor` straight away; nothing is queued for approval.
    Skip,
}

impl FloorPolicy {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Skip => "skip",
        }
    }
}

/// Fully-resolved automation configuration, treated as an immutable
/// snapshot for the duration of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SettingsId>,
    /// ACoS (percent) below which scaling up is allowed.
    pub target_acos: f64,
    /// ACoS (percent) above which scaling down is triggered.
    pub acos_threshold: f64,
    pub scale_up_pct: f64,
    pub scale_down_pct: f64,
    /// Lowest daily budget automation may set.
    pub budget_floor: f64,
    pub automation_mode: AutomationMode,
    /// Advisory ceiling, left to the budget writer to enforce.
    pub daily_budget_cap: f64,
    pub floor_policy: FloorPolicy,
}

impl AutomationSettings {
    /// Check that every numeric field is a finite, non-negative number.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("target_acos", self.target_acos),
            ("acos_threshold", self.acos_threshold),
            ("scale_up_pct", self.scale_up_pct),
            ("scale_down_pct", self.scale_down_pct),
            ("budget_floor", self.budget_floor),
            ("daily_budget_cap", self.daily_budget_cap),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(ValidationError::Negative { field });
            }
        }
        Ok(())
    }
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            id: None,
            target_acos: DEFAULT_TARGET_ACOS,
            acos_threshold: DEFAULT_ACOS_THRESHOLD,
            scale_up_pct: DEFAULT_SCALE_UP_PCT,
            scale_down_pct: DEFAULT_SCALE_DOWN_PCT,
            budget_floor: DEFAULT_BUDGET_FLOOR,
            automation_mode: AutomationMode::Off,
            daily_budget_cap: DEFAULT_DAILY_BUDGET_CAP,
            floor_policy: FloorPolicy::Pending,
        }
    }
}

/// Settings as stored: every field optional and loosely typed.
///
/// Numeric fields are kept as JSON values so that numbers and numeric
/// strings both survive until [`normalize`] coerces them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    pub id: Option<SettingsId>,
    pub target_acos: Option<Value>,
    pub acos_threshold: Option<Value>,
    pub scale_up_pct: Option<Value>,
    pub scale_down_pct: Option<Value>,
    pub budget_floor: Option<Value>,
    pub automation_mode: Option<String>,
    /// Older settings shape: a plain on/off switch meaning `auto`/`off`.
    pub automation_enabled: Option<bool>,
    pub daily_budget_cap: Option<Value>,
    pub floor_policy: Option<String>,
}

impl From<&AutomationSettings> for RawSettings {
    fn from(settings: &AutomationSettings) -> Self {
        Self {
            id: settings.id,
            target_acos: Some(Value::from(settings.target_acos)),
            acos_threshold: Some(Value::from(settings.acos_threshold)),
            scale_up_pct: Some(Value::from(settings.scale_up_pct)),
            scale_down_pct: Some(Value::from(settings.scale_down_pct)),
            budget_floor: Some(Value::from(settings.budget_floor)),
            automation_mode: Some(settings.automation_mode.as_str().to_string()),
            automation_enabled: None,
            daily_budget_cap: Some(Value::from(settings.daily_budget_cap)),
            floor_policy: Some(settings.floor_policy.as_str().to_string()),
        }
    }
}

/// Resolve possibly-partial stored settings into a complete configuration.
///
/// `None` (nothing stored) yields [`AutomationSettings::default`].
#[must_use]
pub fn normalize(raw: Option<&RawSettings>) -> AutomationSettings {
    let Some(raw) = raw else {
        return AutomationSettings::default();
    };

    let automation_mode = raw
        .automation_mode
        .as_deref()
        .and_then(AutomationMode::parse)
        .unwrap_or(if raw.automation_enabled.unwrap_or(false) {
            AutomationMode::Auto
        } else {
            AutomationMode::Off
        });

    AutomationSettings {
        id: raw.id,
        target_acos: coerce(raw.target_acos.as_ref(), DEFAULT_TARGET_ACOS),
        acos_threshold: coerce(raw.acos_threshold.as_ref(), DEFAULT_ACOS_THRESHOLD),
        scale_up_pct: coerce(raw.scale_up_pct.as_ref(), DEFAULT_SCALE_UP_PCT),
        scale_down_pct: coerce(raw.scale_down_pct.as_ref(), DEFAULT_SCALE_DOWN_PCT),
        budget_floor: coerce(raw.budget_floor.as_ref(), DEFAULT_BUDGET_FLOOR),
        automation_mode,
        daily_budget_cap: coerce(raw.daily_budget_cap.as_ref(), DEFAULT_DAILY_BUDGET_CAP),
        floor_policy: raw
            .floor_policy
            .as_deref()
            .and_then(FloorPolicy::parse)
            .unwrap_or_default(),
    }
}

fn coerce(value: Option<&Value>, fallback: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(fallback)
}
