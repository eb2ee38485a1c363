//! Keyword source port: the keywords bidded inside a campaign.

use std::future::Future;

use adpilot_domain::error::AdPilotError;
use adpilot_domain::id::CampaignId;
use adpilot_domain::keyword::Keyword;

pub trait KeywordSource {
    /// Keywords of one campaign.
    ///
    /// Fails with [`AdPilotError::NotFound`] when the campaign is unknown;
    /// a known campaign without keywords yields an empty list.
    fn list_keywords(
        &self,
        campaign_id: &CampaignId,
    ) -> impl Future<Output = Result<Vec<Keyword>, AdPilotError>> + Send;
}
