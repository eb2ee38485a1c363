//! Campaign source port: read access to the advertising account.

use std::future::Future;

use adpilot_domain::campaign::CampaignSnapshot;
use adpilot_domain::error::AdPilotError;

/// Supplies today's campaign snapshots.
pub trait CampaignSource {
    /// List every campaign in the account, whatever its status.
    fn list_campaigns(
        &self,
    ) -> impl Future<Output = Result<Vec<CampaignSnapshot>, AdPilotError>> + Send;
}
