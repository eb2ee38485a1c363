//! Keyword: a bidded search term inside a campaign, and the bid optimizer
//! that scales each bid towards the target ACoS.

use serde::{Deserialize, Serialize};

use crate::error::{AdPilotError, ValidationError};
use crate::id::CampaignId;
use crate::metrics;

/// Lowest bid the ads platform accepts.
pub const MIN_BID: f64 = 0.02;

/// How a keyword is matched against shopper queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    Broad,
    Phrase,
    Exact,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Broad => f.write_str("BROAD"),
            Self::Phrase => f.write_str("PHRASE"),
            Self::Exact => f.write_str("EXACT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: String,
    pub amazon_keyword_id: String,
    pub campaign_id: CampaignId,
    pub keyword: String,
    pub match_type: MatchType,
    /// Current cost-per-click bid.
    pub bid: f64,
    pub spend: f64,
    pub sales: f64,
    pub impressions: u64,
    pub clicks: u64,
}

impl Keyword {
    #[must_use]
    pub fn acos(&self) -> f64 {
        metrics::acos(self.spend, self.sales)
    }

    /// Bid that would bring this keyword's ACoS to `target_acos`, assuming
    /// sales scale linearly with the bid.
    ///
    /// A keyword without ACoS (no spend or no sales) keeps its bid. The
    /// result is rounded to cents and never drops below [`MIN_BID`].
    #[must_use]
    pub fn recommend_bid(&self, target_acos: f64) -> BidRecommendation {
        let current_acos = self.acos();
        let safe_acos = if current_acos <= 0.0 {
            target_acos
        } else {
            current_acos
        };
        let recommended_bid = clamp_bid(self.bid * (target_acos / safe_acos));
        let change_percent = if self.bid > 0.0 {
            metrics::round2((recommended_bid - self.bid) / self.bid * 100.0)
        } else {
            0.0
        };

        BidRecommendation {
            keyword_id: self.id.clone(),
            keyword: self.keyword.clone(),
            match_type: self.match_type,
            current_bid: self.bid,
            current_acos: metrics::round2(current_acos),
            recommended_bid,
            change_percent,
        }
    }
}

fn clamp_bid(value: f64) -> f64 {
    metrics::round2(value).max(MIN_BID)
}

/// Check that `target_acos` can drive the optimizer.
///
/// # Errors
///
/// Returns [`AdPilotError::Validation`] unless the value is finite and
/// strictly positive.
pub fn validate_target_acos(target_acos: f64) -> Result<(), AdPilotError> {
    if !target_acos.is_finite() {
        return Err(ValidationError::NonFinite {
            field: "target_acos",
        }
        .into());
    }
    if target_acos <= 0.0 {
        return Err(ValidationError::NotPositive {
            field: "target_acos",
        }
        .into());
    }
    Ok(())
}

/// Optimizer output for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidRecommendation {
    pub keyword_id: String,
    pub keyword: String,
    pub match_type: MatchType,
    pub current_bid: f64,
    pub current_acos: f64,
    pub recommended_bid: f64,
    pub change_percent: f64,
}

/// A keyword with its derived ratios, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordPerformance {
    #[serde(flatten)]
    pub keyword: Keyword,
    pub acos: f64,
    pub ctr: f64,
    pub cpc: f64,
}

impl From<Keyword> for KeywordPerformance {
    fn from(keyword: Keyword) -> Self {
        Self {
            acos: metrics::round2(keyword.acos()),
            ctr: metrics::round2(metrics::ctr(keyword.clicks, keyword.impressions)),
            cpc: metrics::round2(metrics::cpc(keyword.spend, keyword.clicks)),
            keyword,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(bid: f64, spend: f64, sales: f64) -> Keyword {
        Keyword {
            id: "kw-1".to_string(),
            amazon_keyword_id: "900001".to_string(),
            campaign_id: CampaignId::new("cmp-1").unwrap(),
            keyword: "office humor book".to_string(),
            match_type: MatchType::Broad,
            bid,
            spend,
            sales,
            impressions: 300,
            clicks: 6,
        }
    }

    #[test]
    fn should_lower_bid_when_acos_is_above_target() {
        let rec = keyword(1.0, 60.0, 100.0).recommend_bid(30.0);

        assert_eq!(rec.current_acos, 60.0);
        assert_eq!(rec.recommended_bid, 0.5);
        assert_eq!(rec.change_percent, -50.0);
    }

    #[test]
    fn should_raise_bid_when_acos_is_below_target() {
        let rec = keyword(0.4, 10.0, 100.0).recommend_bid(30.0);

        assert_eq!(rec.current_acos, 10.0);
        assert_eq!(rec.recommended_bid, 1.2);
        assert_eq!(rec.change_percent, 200.0);
    }

    #[test]
    fn should_keep_bid_when_keyword_has_no_sales() {
        let rec = keyword(0.75, 12.0, 0.0).recommend_bid(30.0);

        assert_eq!(rec.current_acos, 0.0);
        assert_eq!(rec.recommended_bid, 0.75);
        assert_eq!(rec.change_percent, 0.0);
    }

    #[test]
    fn should_keep_bid_when_keyword_has_no_spend() {
        let rec = keyword(0.5, 0.0, 20.0).recommend_bid(25.0);
        assert_eq!(rec.recommended_bid, 0.5);
    }

    #[test]
    fn should_clamp_recommended_bid_to_minimum() {
        let rec = keyword(0.05, 30.0, 10.0).recommend_bid(10.0);

        assert_eq!(rec.recommended_bid, MIN_BID);
        assert_eq!(rec.change_percent, -60.0);
    }

    #[test]
    fn should_round_recommended_bid_to_cents() {
        let rec = keyword(0.33, 10.0, 40.0).recommend_bid(30.0);
        // 0.33 * 30 / 25 = 0.396
        assert_eq!(rec.recommended_bid, 0.4);
    }

    #[test]
    fn should_not_divide_by_zero_bid() {
        let rec = keyword(0.0, 10.0, 40.0).recommend_bid(30.0);
        assert_eq!(rec.recommended_bid, MIN_BID);
        assert_eq!(rec.change_percent, 0.0);
    }

    #[test]
    fn should_reject_unusable_target_acos() {
        assert!(validate_target_acos(30.0).is_ok());
        assert!(matches!(
            validate_target_acos(0.0),
            Err(AdPilotError::Validation(ValidationError::NotPositive { .. }))
        ));
        assert!(matches!(
            validate_target_acos(f64::INFINITY),
            Err(AdPilotError::Validation(ValidationError::NonFinite { .. }))
        ));
    }

    #[test]
    fn should_flatten_keyword_into_performance_row() {
        let row = KeywordPerformance::from(keyword(0.28, 1.55, 8.5));
        assert_eq!(row.ctr, 2.0);
        assert_eq!(row.cpc, 0.26);

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["match_type"], "BROAD");
        assert_eq!(json["keyword"], "office humor book");
        assert_eq!(json["acos"], 18.24);
    }
}
