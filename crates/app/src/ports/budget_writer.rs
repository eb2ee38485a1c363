//! Budget writer port: the only outbound mutation of the ad account.

use std::future::Future;

use adpilot_domain::campaign::CampaignSnapshot;
use adpilot_domain::error::AdPilotError;
use adpilot_domain::id::CampaignId;

/// Applies a new daily budget to a campaign.
///
/// Implementations make a single attempt; retries are the caller's business.
pub trait BudgetWriter {
    /// Set the daily budget of `campaign_id` and return the updated snapshot.
    fn update_budget(
        &self,
        campaign_id: &CampaignId,
        new_budget: f64,
    ) -> impl Future<Output = Result<CampaignSnapshot, AdPilotError>> + Send;
}
