//! Optimizer service: campaign performance and keyword bid recommendations.

use adpilot_domain::campaign::CampaignPerformance;
use adpilot_domain::error::AdPilotError;
use adpilot_domain::id::CampaignId;
use adpilot_domain::keyword::{BidRecommendation, KeywordPerformance, validate_target_acos};

use crate::ports::{CampaignSource, KeywordSource, SettingsStore};
use crate::services::settings_service::SettingsService;

/// Read-only reporting over the ad account.
///
/// Recommendations are advisory: nothing here writes bids back.
pub struct OptimizerService<C, K, S> {
    campaigns: C,
    keywords: K,
    settings: SettingsService<S>,
}

impl<C, K, S> OptimizerService<C, K, S>
where
    C: CampaignSource,
    K: KeywordSource,
    S: SettingsStore,
{
    pub fn new(campaigns: C, keywords: K, settings_store: S) -> Self {
        Self {
            campaigns,
            keywords,
            settings: SettingsService::new(settings_store),
        }
    }

    /// Today's performance of every campaign, whatever its status.
    ///
    /// # Errors
    ///
    /// Propagates campaign source failures.
    pub async fn campaign_performance(&self) -> Result<Vec<CampaignPerformance>, AdPilotError> {
        let campaigns = self.campaigns.list_campaigns().await?;
        Ok(campaigns.iter().map(CampaignPerformance::from).collect())
    }

    /// Keywords of `campaign_id` with their ratios.
    ///
    /// # Errors
    ///
    /// Returns [`AdPilotError::NotFound`] for an unknown campaign.
    pub async fn keywords(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<KeywordPerformance>, AdPilotError> {
        let keywords = self.keywords.list_keywords(campaign_id).await?;
        Ok(keywords.into_iter().map(KeywordPerformance::from).collect())
    }

    /// Recommend a bid for every keyword of `campaign_id`.
    ///
    /// `target_acos` defaults to the effective settings' target.
    ///
    /// # Errors
    ///
    /// - [`AdPilotError::Validation`] when the target is not a positive number.
    /// - [`AdPilotError::NotFound`] for an unknown campaign.
    #[tracing::instrument(skip(self))]
    pub async fn recommend_bids(
        &self,
        campaign_id: &CampaignId,
        target_acos: Option<f64>,
    ) -> Result<Vec<BidRecommendation>, AdPilotError> {
        let target_acos = match target_acos {
            Some(value) => value,
            None => self.settings.load().await.target_acos,
        };
        validate_target_acos(target_acos)?;

        let keywords = self.keywords.list_keywords(campaign_id).await?;
        let recommendations: Vec<_> = keywords
            .iter()
            .map(|keyword| keyword.recommend_bid(target_acos))
            .collect();

        tracing::debug!(
            keywords = recommendations.len(),
            target_acos,
            "bid recommendations computed"
        );
        Ok(recommendations)
    }
}
