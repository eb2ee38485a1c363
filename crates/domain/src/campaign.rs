//! Campaign: a point-in-time view of an advertising campaign's budget and
//! today's performance.

use serde::{Deserialize, Serialize};

use crate::error::{AdPilotError, ValidationError};
use crate::id::CampaignId;
use crate::metrics;

/// Delivery status reported by the ads platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    #[default]
    Enabled,
    Paused,
    Archived,
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enabled => f.write_str("ENABLED"),
            Self::Paused => f.write_str("PAUSED"),
            Self::Archived => f.write_str("ARCHIVED"),
        }
    }
}

/// Input to one budget evaluation.
///
/// `budget_utilization` and `today_acos` may be supplied precomputed by the
/// campaign source. When present they are used as-is, including `0.0`;
/// otherwise they are derived from `spend`, `budget` and `sales`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    pub id: CampaignId,
    pub name: String,
    pub status: CampaignStatus,
    /// Current daily budget.
    pub budget: f64,
    /// Spend so far today.
    pub spend: f64,
    /// Attributed sales so far today.
    pub sales: f64,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_utilization: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_acos: Option<f64>,
}

impl CampaignSnapshot {
    /// Create a builder for constructing a [`CampaignSnapshot`].
    #[must_use]
    pub fn builder() -> CampaignSnapshotBuilder {
        CampaignSnapshotBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AdPilotError::Validation`] when `name` is empty or when
    /// one of the money fields is not finite.
    pub fn validate(&self) -> Result<(), AdPilotError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        for (field, value) in [
            ("budget", self.budget),
            ("spend", self.spend),
            ("sales", self.sales),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { field }.into());
            }
        }
        Ok(())
    }

    /// Only enabled campaigns take part in budget automation.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.status == CampaignStatus::Enabled
    }

    /// Budget utilization in percent, preferring the precomputed value.
    #[must_use]
    pub fn utilization(&self) -> f64 {
        self.budget_utilization
            .unwrap_or_else(|| metrics::budget_utilization(self.spend, self.budget))
    }

    /// Today's ACoS in percent, preferring the precomputed value.
    #[must_use]
    pub fn acos(&self) -> f64 {
        self.today_acos
            .unwrap_or_else(|| metrics::acos(self.spend, self.sales))
    }

    #[must_use]
    pub fn roas(&self) -> f64 {
        metrics::roas(self.spend, self.sales)
    }

    #[must_use]
    pub fn ctr(&self) -> f64 {
        metrics::ctr(self.clicks, self.impressions)
    }

    #[must_use]
    pub fn cpc(&self) -> f64 {
        metrics::cpc(self.spend, self.clicks)
    }

    /// Return a copy carrying `new_budget`, with utilization recomputed
    /// against it. A precomputed ACoS is kept since spend and sales are
    /// unchanged.
    #[must_use]
    pub fn with_budget(&self, new_budget: f64) -> Self {
        Self {
            budget: new_budget,
            budget_utilization: Some(metrics::budget_utilization(self.spend, new_budget)),
            today_acos: Some(self.acos()),
            ..self.clone()
        }
    }
}

/// Today's performance of one campaign, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignPerformance {
    pub id: CampaignId,
    pub name: String,
    pub status: CampaignStatus,
    pub budget: f64,
    pub spend: f64,
    pub sales: f64,
    pub budget_utilization: f64,
    pub acos: f64,
    pub roas: f64,
    pub ctr: f64,
    pub cpc: f64,
}

impl From<&CampaignSnapshot> for CampaignPerformance {
    fn from(campaign: &CampaignSnapshot) -> Self {
        Self {
            id: campaign.id.clone(),
            name: campaign.name.clone(),
            status: campaign.status,
            budget: campaign.budget,
            spend: campaign.spend,
            sales: campaign.sales,
            budget_utilization: metrics::round2(campaign.utilization()),
            acos: metrics::round2(campaign.acos()),
            roas: metrics::round2(campaign.roas()),
            ctr: metrics::round2(campaign.ctr()),
            cpc: metrics::round2(campaign.cpc()),
        }
    }
}

/// Step-by-step builder for [`CampaignSnapshot`].
#[derive(Debug, Default)]
pub struct CampaignSnapshotBuilder {
    id: Option<CampaignId>,
    name: Option<String>,
    status: Option<CampaignStatus>,
    budget: f64,
    spend: f64,
    sales: f64,
    impressions: u64,
    clicks: u64,
    budget_utilization: Option<f64>,
    today_acos: Option<f64>,
}

impl CampaignSnapshotBuilder {
    #[must_use]
    pub fn id(mut self, id: CampaignId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: CampaignStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn budget(mut self, budget: f64) -> Self {
        self.budget = budget;
        self
    }

    #[must_use]
    pub fn spend(mut self, spend: f64) -> Self {
        self.spend = spend;
        self
    }

    #[must_use]
    pub fn sales(mut self, sales: f64) -> Self {
        self.sales = sales;
        self
    }

    #[must_use]
    pub fn impressions(mut self, impressions: u64) -> Self {
        self.impressions = impressions;
        self
    }

    #[must_use]
    pub fn clicks(mut self, clicks: u64) -> Self {
        self.clicks = clicks;
        self
    }

    #[must_use]
    pub fn budget_utilization(mut self, value: f64) -> Self {
        self.budget_utilization = Some(value);
        self
    }

    #[must_use]
    pub fn today_acos(mut self, value: f64) -> Self {
        self.today_acos = Some(value);
        self
    }

    /// Consume the builder, validate, and return a [`CampaignSnapshot`].
    ///
    /// # Errors
    ///
    /// Returns [`AdPilotError::Validation`] if the id or name is missing, or
    /// if a money field is not finite.
    pub fn build(self) -> Result<CampaignSnapshot, AdPilotError> {
        let id = self.id.ok_or(ValidationError::EmptyCampaignId)?;
        let campaign = CampaignSnapshot {
            id,
            name: self.name.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            budget: self.budget,
            spend: self.spend,
            sales: self.sales,
            impressions: self.impressions,
            clicks: self.clicks,
            budget_utilization: self.budget_utilization,
            today_acos: self.today_acos,
        };
        campaign.validate()?;
        Ok(campaign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(budget: f64, spend: f64, sales: f64) -> CampaignSnapshot {
        CampaignSnapshot::builder()
            .id(CampaignId::new("cmp-1").unwrap())
            .name("Office Humor - Broad Match")
            .budget(budget)
            .spend(spend)
            .sales(sales)
            .build()
            .unwrap()
    }

    #[test]
    fn should_default_to_enabled_status() {
        assert!(campaign(45.0, 41.8, 176.42).is_enabled());
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = CampaignSnapshot::builder()
            .id(CampaignId::new("cmp-1").unwrap())
            .build();
        assert!(matches!(
            result,
            Err(AdPilotError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_return_validation_error_when_id_is_missing() {
        let result = CampaignSnapshot::builder().name("No id").build();
        assert!(matches!(
            result,
            Err(AdPilotError::Validation(ValidationError::EmptyCampaignId))
        ));
    }

    #[test]
    fn should_reject_non_finite_budget() {
        let result = CampaignSnapshot::builder()
            .id(CampaignId::new("cmp-1").unwrap())
            .name("Broken")
            .budget(f64::NAN)
            .build();
        assert!(matches!(
            result,
            Err(AdPilotError::Validation(ValidationError::NonFinite {
                field: "budget"
            }))
        ));
    }

    #[test]
    fn should_compute_metrics_when_not_precomputed() {
        let c = campaign(22.0, 21.1, 30.58);
        assert!((c.utilization() - 95.909_090).abs() < 1e-3);
        assert!((c.acos() - 68.999_345).abs() < 1e-3);
    }

    #[test]
    fn should_keep_precomputed_zero_acos() {
        let c = CampaignSnapshot::builder()
            .id(CampaignId::new("cmp-1").unwrap())
            .name("Precomputed")
            .budget(10.0)
            .spend(9.0)
            .sales(3.0)
            .today_acos(0.0)
            .build()
            .unwrap();
        assert_eq!(c.acos(), 0.0);
    }

    #[test]
    fn should_recompute_utilization_when_budget_changes() {
        let c = campaign(20.0, 10.0, 40.0).with_budget(40.0);
        assert_eq!(c.budget, 40.0);
        assert_eq!(c.budget_utilization, Some(25.0));
        assert_eq!(c.today_acos, Some(25.0));
    }

    #[test]
    fn should_report_rounded_performance_ratios() {
        let c = CampaignSnapshot::builder()
            .id(CampaignId::new("cmp-2").unwrap())
            .name("Work Gifts - Exact")
            .budget(35.0)
            .spend(31.6)
            .sales(132.91)
            .impressions(39_870)
            .clicks(1_652)
            .build()
            .unwrap();

        let performance = CampaignPerformance::from(&c);

        assert_eq!(performance.budget_utilization, 90.29);
        assert_eq!(performance.acos, 23.78);
        assert_eq!(performance.roas, 4.21);
        assert_eq!(performance.ctr, 4.14);
        assert_eq!(performance.cpc, 0.02);
    }

    #[test]
    fn should_serialize_status_in_platform_casing() {
        let json = serde_json::to_string(&CampaignStatus::Archived).unwrap();
        assert_eq!(json, "\"ARCHIVED\"");
        assert_eq!(CampaignStatus::Paused.to_string(), "PAUSED");
    }
}
