//! Advertising performance ratios.
//!
//! Every ratio returns `0.0` when its denominator is zero or negative, so a
//! campaign without budget or sales never produces a division by zero.

/// Round to two decimal places (cents / hundredths of a percent).
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Share of the daily budget already spent, in percent.
#[must_use]
pub fn budget_utilization(spend: f64, budget: f64) -> f64 {
    if budget <= 0.0 {
        return 0.0;
    }
    spend / budget * 100.0
}

/// Advertising cost of sale (`spend / sales`), in percent.
#[must_use]
pub fn acos(spend: f64, sales: f64) -> f64 {
    if sales <= 0.0 {
        return 0.0;
    }
    spend / sales * 100.0
}

/// Return on ad spend (`sales / spend`), as a plain ratio.
#[must_use]
pub fn roas(spend: f64, sales: f64) -> f64 {
    if spend <= 0.0 {
        return 0.0;
    }
    sales / spend
}

/// Click-through rate, in percent.
#[must_use]
pub fn ctr(clicks: u64, impressions: u64) -> f64 {
    if impressions == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = clicks as f64 / impressions as f64;
    ratio * 100.0
}

/// Average cost per click.
#[must_use]
pub fn cpc(spend: f64, clicks: u64) -> f64 {
    if clicks == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let clicks = clicks as f64;
    spend / clicks
}
