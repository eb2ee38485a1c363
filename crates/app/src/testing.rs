//! In-memory port fakes shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use adpilot_domain::campaign::CampaignSnapshot;
use adpilot_domain::error::{AdPilotError, NotFoundError};
use adpilot_domain::id::{CampaignId, LogEntryId, SettingsId};
use adpilot_domain::keyword::{Keyword, MatchType};
use adpilot_domain::log_entry::AutomationLogEntry;
use adpilot_domain::settings::{AutomationSettings, RawSettings};
use adpilot_domain::time::{Timestamp, earlier_by, now};

use crate::ports::automation_log_repo::unavailable;
use crate::ports::{
    AutomationLogRepository, BudgetWriter, CampaignSource, Claim, KeywordSource, SettingsStore,
};

fn storage_error(message: &str) -> AdPilotError {
    AdPilotError::Storage(Box::new(std::io::Error::other(message.to_string())))
}

// ── Ad account ─────────────────────────────────────────────────────

/// Cloning shares the underlying account.
#[derive(Clone, Default)]
pub struct FakeAccount {
    campaigns: Arc<Mutex<Vec<CampaignSnapshot>>>,
    keywords: Vec<Keyword>,
    failing: HashSet<String>,
    write_delay: Option<Duration>,
    writes: Arc<Mutex<Vec<(CampaignId, f64)>>>,
}

impl FakeAccount {
    pub fn with(campaigns: Vec<CampaignSnapshot>) -> Self {
        Self {
            campaigns: Arc::new(Mutex::new(campaigns)),
            ..Self::default()
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<Keyword>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn failing_on(mut self, campaign_id: &str) -> Self {
        self.failing.insert(campaign_id.to_string());
        self
    }

    pub fn slow_writes(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    pub fn writes(&self) -> Vec<(CampaignId, f64)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn budget_of(&self, campaign_id: &str) -> Option<f64> {
        self.campaigns
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id.as_str() == campaign_id)
            .map(|c| c.budget)
    }
}

impl CampaignSource for FakeAccount {
    fn list_campaigns(
        &self,
    ) -> impl Future<Output = Result<Vec<CampaignSnapshot>, AdPilotError>> + Send {
        let result = self.campaigns.lock().unwrap().clone();
        async { Ok(result) }
    }
}

impl BudgetWriter for FakeAccount {
    fn update_budget(
        &self,
        campaign_id: &CampaignId,
        new_budget: f64,
    ) -> impl Future<Output = Result<CampaignSnapshot, AdPilotError>> + Send {
        self.writes
            .lock()
            .unwrap()
            .push((campaign_id.clone(), new_budget));

        let result = if self.failing.contains(campaign_id.as_str()) {
            Err(storage_error("account rejected the budget"))
        } else {
            let mut campaigns = self.campaigns.lock().unwrap();
            match campaigns.iter_mut().find(|c| &c.id == campaign_id) {
                Some(campaign) => {
                    *campaign = campaign.with_budget(new_budget);
                    Ok(campaign.clone())
                }
                None => Err(NotFoundError {
                    entity: "Campaign",
                    id: campaign_id.to_string(),
                }
                .into()),
            }
        };
        let delay = self.write_delay;
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }
}

impl KeywordSource for FakeAccount {
    fn list_keywords(
        &self,
        campaign_id: &CampaignId,
    ) -> impl Future<Output = Result<Vec<Keyword>, AdPilotError>> + Send {
        let known = self
            .campaigns
            .lock()
            .unwrap()
            .iter()
            .any(|c| &c.id == campaign_id);
        let result = if known {
            Ok(self
                .keywords
                .iter()
                .filter(|k| &k.campaign_id == campaign_id)
                .cloned()
                .collect())
        } else {
            Err(NotFoundError {
                entity: "Campaign",
                id: campaign_id.to_string(),
            }
            .into())
        };
        async { result }
    }
}

// ── Settings store ─────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemorySettingsStore {
    rows: Arc<Mutex<Vec<RawSettings>>>,
    broken: bool,
}

impl InMemorySettingsStore {
    pub fn with(raw: RawSettings) -> Self {
        Self {
            rows: Arc::new(Mutex::new(vec![raw])),
            broken: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            rows: Arc::default(),
            broken: true,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load_latest(
        &self,
    ) -> impl Future<Output = Result<Option<RawSettings>, AdPilotError>> + Send {
        let result = if self.broken {
            Err(storage_error("settings table unavailable"))
        } else {
            Ok(self.rows.lock().unwrap().last().cloned())
        };
        async { result }
    }

    fn save(
        &self,
        mut settings: AutomationSettings,
    ) -> impl Future<Output = Result<AutomationSettings, AdPilotError>> + Send {
        let result = if self.broken {
            Err(storage_error("settings table unavailable"))
        } else {
            settings.id = Some(SettingsId::new());
            self.rows
                .lock()
                .unwrap()
                .push(RawSettings::from(&settings));
            Ok(settings)
        };
        async { result }
    }
}

// ── Automation log ─────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryLogRepo {
    store: Arc<Mutex<HashMap<LogEntryId, AutomationLogEntry>>>,
    order: Arc<Mutex<Vec<LogEntryId>>>,
    claims: Arc<Mutex<HashMap<LogEntryId, Timestamp>>>,
    reject_appends: bool,
    reject_resolutions: bool,
}

impl InMemoryLogRepo {
    pub fn rejecting_appends() -> Self {
        Self {
            reject_appends: true,
            ..Self::default()
        }
    }

    pub fn rejecting_resolutions(mut self) -> Self {
        self.reject_resolutions = true;
        self
    }

    pub fn seed(&self, entry: AutomationLogEntry) {
        self.order.lock().unwrap().push(entry.id);
        self.store.lock().unwrap().insert(entry.id, entry);
    }

    pub fn get(&self, id: LogEntryId) -> Option<AutomationLogEntry> {
        self.store.lock().unwrap().get(&id).cloned()
    }

    pub fn is_claimed(&self, id: LogEntryId) -> bool {
        self.claims.lock().unwrap().contains_key(&id)
    }

    pub fn entry_count(&self) -> usize {
        self.store.lock().unwrap().len()
    }
}

impl AutomationLogRepository for InMemoryLogRepo {
    fn append(
        &self,
        entries: Vec<AutomationLogEntry>,
    ) -> impl Future<Output = Result<usize, AdPilotError>> + Send {
        let result = if self.reject_appends {
            Err(storage_error("automation_log is read-only"))
        } else {
            let count = entries.len();
            for entry in entries {
                self.seed(entry);
            }
            Ok(count)
        };
        async { result }
    }

    fn get_by_id(
        &self,
        id: LogEntryId,
    ) -> impl Future<Output = Result<Option<AutomationLogEntry>, AdPilotError>> + Send {
        let result = self.get(id);
        async { Ok(result) }
    }

    fn claim(
        &self,
        id: LogEntryId,
        ttl: Duration,
    ) -> impl Future<Output = Result<Claim, AdPilotError>> + Send {
        let store = self.store.lock().unwrap();
        let mut claims = self.claims.lock().unwrap();
        let at = now();
        let live = claims
            .get(&id)
            .is_some_and(|claimed_at| *claimed_at >= earlier_by(at, ttl));

        let result = match store.get(&id) {
            Some(entry) if entry.is_pending() && !live => {
                claims.insert(id, at);
                Ok(Claim {
                    entry: entry.clone(),
                    claimed_at: at,
                })
            }
            current => Err(unavailable(id, current)),
        };
        async { result }
    }

    fn resolve(
        &self,
        entry: AutomationLogEntry,
        claimed_at: Timestamp,
    ) -> impl Future<Output = Result<AutomationLogEntry, AdPilotError>> + Send {
        let mut store = self.store.lock().unwrap();
        let mut claims = self.claims.lock().unwrap();
        let holds_claim = claims.get(&entry.id) == Some(&claimed_at);

        let pending = store.get(&entry.id).is_some_and(AutomationLogEntry::is_pending);

        let result = if self.reject_resolutions {
            Err(storage_error("automation_log is read-only"))
        } else if pending && holds_claim {
            claims.remove(&entry.id);
            store.insert(entry.id, entry.clone());
            Ok(entry)
        } else {
            Err(unavailable(entry.id, store.get(&entry.id)))
        };
        async { result }
    }

    fn release(
        &self,
        id: LogEntryId,
        claimed_at: Timestamp,
    ) -> impl Future<Output = Result<(), AdPilotError>> + Send {
        let mut claims = self.claims.lock().unwrap();
        if claims.get(&id) == Some(&claimed_at) {
            claims.remove(&id);
        }
        async { Ok(()) }
    }

    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<AutomationLogEntry>, AdPilotError>> + Send {
        let store = self.store.lock().unwrap();
        let result: Vec<_> = self
            .order
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take(limit)
            .filter_map(|id| store.get(id).cloned())
            .collect();
        async { Ok(result) }
    }

    fn find_pending(
        &self,
    ) -> impl Future<Output = Result<Vec<AutomationLogEntry>, AdPilotError>> + Send {
        let store = self.store.lock().unwrap();
        let result: Vec<_> = self
            .order
            .lock()
            .unwrap()
            .iter()
            .filter_map(|id| store.get(id))
            .filter(|e| e.is_pending())
            .cloned()
            .collect();
        async { Ok(result) }
    }
}

// ── Fixtures ───────────────────────────────────────────────────────

pub fn campaign(id: &str, name: &str, budget: f64, spend: f64, sales: f64) -> CampaignSnapshot {
    CampaignSnapshot::builder()
        .id(CampaignId::new(id).unwrap())
        .name(name)
        .budget(budget)
        .spend(spend)
        .sales(sales)
        .build()
        .unwrap()
}

pub fn keyword(id: &str, campaign_id: &str, bid: f64, spend: f64, sales: f64) -> Keyword {
    Keyword {
        id: id.to_string(),
        amazon_keyword_id: id.replace("kw-", "90000"),
        campaign_id: CampaignId::new(campaign_id).unwrap(),
        keyword: format!("{id} search term"),
        match_type: MatchType::Exact,
        bid,
        spend,
        sales,
        impressions: 1_000,
        clicks: 40,
    }
}

pub fn settings_in(mode: &str) -> RawSettings {
    RawSettings {
        automation_mode: Some(mode.to_string()),
        ..RawSettings::default()
    }
}
