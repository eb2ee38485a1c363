//! # adpilot-adapter-demo
//!
//! Demo ad account that stands in for the Amazon Ads API.
//!
//! The account is seeded with 25 campaigns (`cmp-1`..`cmp-25`) and 185
//! keywords, and keeps them in memory for the lifetime of the process.
//! Budget writes patch the stored campaign and recompute its utilization, so
//! consecutive runs see the effect of earlier decisions. Keywords are
//! read-only.
//!
//! ## Dependency rule
//!
//! Depends on `adpilot-app` (port traits) and `adpilot-domain` only.

mod seed;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use adpilot_app::ports::{BudgetWriter, CampaignSource, KeywordSource};
use adpilot_domain::campaign::CampaignSnapshot;
use adpilot_domain::error::{AdPilotError, NotFoundError, ValidationError};
use adpilot_domain::id::CampaignId;
use adpilot_domain::keyword::Keyword;

/// A campaign as the demo account stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoCampaign {
    /// Identifier on the Amazon side; budget writes accept it too.
    pub amazon_campaign_id: String,
    pub snapshot: CampaignSnapshot,
}

impl DemoCampaign {
    fn matches(&self, campaign_id: &CampaignId) -> bool {
        self.snapshot.id == *campaign_id || self.amazon_campaign_id == campaign_id.as_str()
    }
}

/// In-memory ad account. Cloning shares the same campaigns.
#[derive(Debug, Clone, Default)]
pub struct DemoAdsAccount {
    campaigns: Arc<RwLock<Vec<DemoCampaign>>>,
    keywords: Arc<Vec<Keyword>>,
}

impl DemoAdsAccount {
    /// Account holding exactly `campaigns`.
    #[must_use]
    pub fn new(campaigns: Vec<DemoCampaign>) -> Self {
        Self {
            campaigns: Arc::new(RwLock::new(campaigns)),
            keywords: Arc::default(),
        }
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: Vec<Keyword>) -> Self {
        self.keywords = Arc::new(keywords);
        self
    }

    /// Account holding the 25 demo campaigns and their keywords.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the seed data is inconsistent.
    pub fn seeded() -> Result<Self, AdPilotError> {
        let campaigns = seed::campaigns()?;
        let keywords = seed::keywords(&campaigns);
        Ok(Self::new(campaigns).with_keywords(keywords))
    }

    /// Look up a campaign by internal or Amazon id.
    pub async fn campaign(&self, campaign_id: &CampaignId) -> Option<DemoCampaign> {
        self.campaigns
            .read()
            .await
            .iter()
            .find(|c| c.matches(campaign_id))
            .cloned()
    }
}

impl CampaignSource for DemoAdsAccount {
    fn list_campaigns(
        &self,
    ) -> impl Future<Output = Result<Vec<CampaignSnapshot>, AdPilotError>> + Send {
        async move {
            let campaigns = self.campaigns.read().await;
            Ok(campaigns.iter().map(|c| c.snapshot.clone()).collect())
        }
    }
}

impl KeywordSource for DemoAdsAccount {
    fn list_keywords(
        &self,
        campaign_id: &CampaignId,
    ) -> impl Future<Output = Result<Vec<Keyword>, AdPilotError>> + Send {
        async move {
            let campaign = self.campaign(campaign_id).await.ok_or_else(|| NotFoundError {
                entity: "Campaign",
                id: campaign_id.to_string(),
            })?;
            Ok(self
                .keywords
                .iter()
                .filter(|k| k.campaign_id == campaign.snapshot.id)
                .cloned()
                .collect())
        }
    }
}

impl BudgetWriter for DemoAdsAccount {
    fn update_budget(
        &self,
        campaign_id: &CampaignId,
        new_budget: f64,
    ) -> impl Future<Output = Result<CampaignSnapshot, AdPilotError>> + Send {
        async move {
            if !new_budget.is_finite() {
                return Err(ValidationError::NonFinite { field: "budget" }.into());
            }
            if new_budget < 0.0 {
                return Err(ValidationError::Negative { field: "budget" }.into());
            }

            let mut campaigns = self.campaigns.write().await;
            let campaign = campaigns
                .iter_mut()
                .find(|c| c.matches(campaign_id))
                .ok_or_else(|| NotFoundError {
                    entity: "Campaign",
                    id: campaign_id.to_string(),
                })?;

            let old_budget = campaign.snapshot.budget;
            campaign.snapshot = campaign.snapshot.with_budget(new_budget);
            tracing::debug!(
                campaign_id = %campaign.snapshot.id,
                old_budget,
                new_budget,
                "demo budget updated"
            );
            Ok(campaign.snapshot.clone())
        }
    }
}
