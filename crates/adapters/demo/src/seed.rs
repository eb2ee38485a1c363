//! Seed data for the demo account.

use adpilot_domain::campaign::CampaignStatus::{Archived, Enabled, Paused};
use adpilot_domain::campaign::{CampaignSnapshot, CampaignStatus};
use adpilot_domain::error::AdPilotError;
use adpilot_domain::id::CampaignId;
use adpilot_domain::keyword::{Keyword, MatchType};
use adpilot_domain::metrics::{acos, budget_utilization, round2};

use crate::DemoCampaign;

/// First Amazon campaign id handed out to seeded campaigns.
const AMAZON_ID_BASE: u32 = 100_000;

/// Amazon keyword ids are this base plus the keyword's 1-based number.
const AMAZON_KEYWORD_ID_BASE: usize = 900_000;

struct Seed {
    name: &'static str,
    status: CampaignStatus,
    budget: f64,
    spend: f64,
    sales: f64,
    impressions: u64,
    clicks: u64,
}

const fn seed(
    name: &'static str,
    status: CampaignStatus,
    budget: f64,
    spend: f64,
    sales: f64,
    impressions: u64,
    clicks: u64,
) -> Seed {
    Seed {
        name,
        status,
        budget,
        spend,
        sales,
        impressions,
        clicks,
    }
}

#[rustfmt::skip]
const SEEDS: [Seed; 25] = [
    seed("Office Humor - Broad Match", Enabled, 45.0, 41.8, 176.42, 48_320, 1_988),
    seed("Work Gifts - Exact", Enabled, 35.0, 31.6, 132.91, 39_870, 1_652),
    seed("Corporate Jokes - Broad", Paused, 28.0, 14.2, 31.55, 27_210, 973),
    seed("Manager Memes - Exact", Enabled, 40.0, 39.3, 86.46, 33_654, 1_261),
    seed("Team Building - Phrase", Paused, 30.0, 22.4, 98.14, 22_418, 756),
    seed("Office Humor - Exact Match", Enabled, 50.0, 46.9, 188.66, 50_771, 2_190),
    seed("Work Gifts - Phrase", Archived, 18.0, 5.2, 10.03, 12_833, 366),
    seed("HR Humor - Auto", Enabled, 22.0, 21.1, 30.58, 16_432, 592),
    seed("Startup Satire - Broad", Enabled, 42.0, 36.5, 128.72, 31_891, 1_245),
    seed("Burnout Journal - Exact", Enabled, 26.0, 24.6, 73.42, 24_018, 904),
    seed("Promotion Gifts - Phrase", Paused, 32.0, 17.1, 48.12, 20_114, 670),
    seed("Team Lead Notebook - Broad", Enabled, 38.0, 34.7, 102.34, 27_541, 1_092),
    seed("Remote Work Snark - Exact", Enabled, 29.0, 25.2, 83.9, 22_692, 812),
    seed("Office Party Gags - Phrase", Paused, 24.0, 12.8, 29.6, 17_122, 521),
    seed("Boss Quotes - Broad", Enabled, 31.0, 27.8, 75.42, 23_285, 887),
    seed("Interview Humor - Exact", Enabled, 27.0, 23.4, 68.37, 19_654, 706),
    seed("Coworker Farewell - Phrase", Enabled, 34.0, 18.4, 62.19, 18_742, 618),
    seed("Productivity Roast - Broad", Enabled, 44.0, 39.8, 121.58, 31_206, 1_185),
    seed("Meeting Notes Sarcasm - Exact", Paused, 23.0, 11.1, 18.84, 14_988, 447),
    seed("Finance Team Humor - Phrase", Enabled, 33.0, 29.9, 105.3, 26_841, 1_029),
    seed("Engineer Memes - Broad", Enabled, 41.0, 35.4, 96.2, 30_981, 1_158),
    seed("Sales Team Jokes - Exact", Paused, 30.0, 14.3, 36.25, 20_121, 643),
    seed("Marketing Banter - Phrase", Enabled, 36.0, 31.1, 87.95, 25_376, 947),
    seed("HR Onboarding Humor - Broad", Enabled, 28.0, 23.7, 56.62, 19_435, 721),
    seed("Office Trivia Notebook - Exact", Enabled, 39.0, 33.8, 111.4, 28_413, 1_068),
];

/// Build the seeded campaigns: ids `cmp-1`..`cmp-25`, Amazon ids from 100000,
/// with today's utilization and ACoS precomputed.
pub(crate) fn campaigns() -> Result<Vec<DemoCampaign>, AdPilotError> {
    SEEDS
        .iter()
        .zip(1_u32..)
        .map(|(seed, n)| {
            let snapshot = CampaignSnapshot::builder()
                .id(CampaignId::new(format!("cmp-{n}"))?)
                .name(seed.name)
                .status(seed.status)
                .budget(seed.budget)
                .spend(seed.spend)
                .sales(seed.sales)
                .impressions(seed.impressions)
                .clicks(seed.clicks)
                .budget_utilization(round2(budget_utilization(seed.spend, seed.budget)))
                .today_acos(round2(acos(seed.spend, seed.sales)))
                .build()?;
            Ok(DemoCampaign {
                amazon_campaign_id: (AMAZON_ID_BASE + n - 1).to_string(),
                snapshot,
            })
        })
        .collect()
}

const KEYWORD_TERMS: [&str; 30] = [
    "office humor book",
    "funny office notebook",
    "coworker gift ideas",
    "office gag gift",
    "workplace satire",
    "boss joke book",
    "funny meeting notes",
    "corporate humor",
    "team gift notebook",
    "work anniversary gag",
    "manager meme book",
    "funny productivity planner",
    "office prank journal",
    "funny employee gift",
    "coffee break jokes",
    "office white elephant",
    "burnout humor",
    "remote work jokes",
    "funny office quotes",
    "sarcastic notebook",
    "funny stationery gift",
    "meeting survival guide",
    "office christmas gift",
    "team morale gift",
    "conference joke book",
    "office farewell gift",
    "office notebook exact",
    "work gift phrase",
    "kdp office humor",
    "amazon office gift",
];

const MATCH_CYCLE: [MatchType; 3] = [MatchType::Broad, MatchType::Phrase, MatchType::Exact];

/// Derive 5 to 10 keywords per campaign from a fixed pattern, numbered
/// `kw-1`.. across the whole account.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub(crate) fn keywords(campaigns: &[DemoCampaign]) -> Vec<Keyword> {
    let mut keywords = Vec::new();

    for (c, campaign) in campaigns.iter().enumerate() {
        let prefix = campaign
            .snapshot
            .name
            .split(" - ")
            .next()
            .unwrap_or_default()
            .to_lowercase();

        for i in 0..5 + c % 6 {
            let k = c + i;
            let impressions = 300 + ((c * 97 + i * 61) % 4_800) as u64;
            let ctr = 0.02 + (k % 8) as f64 * 0.006;
            let clicks = ((impressions as f64 * ctr).round() as u64).max(6);
            let bid = round2(0.28 + (k % 12) as f64 * 0.05);
            let spend = round2(clicks as f64 * bid * (0.92 + (k % 4) as f64 * 0.07));
            let sales_multiplier = if k % 9 == 0 {
                5.5
            } else if k % 7 == 0 {
                0.85
            } else {
                1.6 + (k % 6) as f64 * 0.4
            };

            let n = keywords.len() + 1;
            let term = KEYWORD_TERMS[(c * 3 + i) % KEYWORD_TERMS.len()];
            keywords.push(Keyword {
                id: format!("kw-{n}"),
                amazon_keyword_id: (AMAZON_KEYWORD_ID_BASE + n).to_string(),
                campaign_id: campaign.snapshot.id.clone(),
                keyword: format!("{prefix} {term}"),
                match_type: MATCH_CYCLE[k % MATCH_CYCLE.len()],
                bid,
                spend,
                sales: round2(spend * sales_multiplier),
                impressions,
                clicks,
            });
        }
    }

    keywords
}
