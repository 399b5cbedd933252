//! In-memory request layer for unit tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::api::{AnalyticsApi, Endpoint, PageQuery, RangeQuery, RequestError};
use crate::models::*;

/// Canned responses keyed by window start, with per-endpoint call counters
#[derive(Default)]
pub struct FakeApi {
    pub sites: Vec<Site>,
    footfall: HashMap<i64, u64>,
    footfall_default: u64,
    dwell: HashMap<i64, f64>,
    dwell_default: f64,
    pub occupancy: OccupancyResponse,
    pub demographics: DemographicsResponse,
    pub page: EntryExitPage,
    failing: HashSet<Endpoint>,
    expired: bool,
    calls: Mutex<HashMap<Endpoint, usize>>,
    last_page: Mutex<Option<PageQuery>>,
}

impl FakeApi {
    pub fn with_sites(mut self, sites: Vec<Site>) -> Self {
        self.sites = sites;
        self
    }

    pub fn with_footfall(mut self, value: u64) -> Self {
        self.footfall_default = value;
        self
    }

    pub fn with_footfall_at(mut self, from_ms: i64, value: u64) -> Self {
        self.footfall.insert(from_ms, value);
        self
    }

    pub fn with_dwell(mut self, value: f64) -> Self {
        self.dwell_default = value;
        self
    }

    pub fn with_dwell_at(mut self, from_ms: i64, value: f64) -> Self {
        self.dwell.insert(from_ms, value);
        self
    }

    pub fn with_page(mut self, page: EntryExitPage) -> Self {
        self.page = page;
        self
    }

    pub fn failing(mut self, endpoint: Endpoint) -> Self {
        self.failing.insert(endpoint);
        self
    }

    /// Every call answers as if the token was rejected
    pub fn expired(mut self) -> Self {
        self.expired = true;
        self
    }

    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.calls.lock().unwrap().get(&endpoint).copied().unwrap_or(0)
    }

    pub fn last_page_query(&self) -> Option<PageQuery> {
        self.last_page.lock().unwrap().clone()
    }

    fn hit(&self, endpoint: Endpoint) -> Result<(), RequestError> {
        *self.calls.lock().unwrap().entry(endpoint).or_default() += 1;
        if self.expired {
            return Err(RequestError::SessionExpired);
        }
        if self.failing.contains(&endpoint) {
            return Err(RequestError::Status { endpoint, status: 500 });
        }
        Ok(())
    }
}

pub fn site(id: &str) -> Site {
    Site {
        id: id.to_string(),
        name: format!("Site {}", id),
        city: String::new(),
        country: String::new(),
        timezone: "UTC".to_string(),
        zones: Vec::new(),
    }
}

#[async_trait]
impl AnalyticsApi for FakeApi {
    async fn sites(&self) -> Result<Vec<Site>, RequestError> {
        self.hit(Endpoint::Sites)?;
        Ok(self.sites.clone())
    }

    async fn demographics(&self, _query: &RangeQuery) -> Result<DemographicsResponse, RequestError> {
        self.hit(Endpoint::Demographics)?;
        Ok(self.demographics.clone())
    }

    async fn occupancy(&self, _query: &RangeQuery) -> Result<OccupancyResponse, RequestError> {
        self.hit(Endpoint::Occupancy)?;
        Ok(self.occupancy.clone())
    }

    async fn dwell(&self, query: &RangeQuery) -> Result<DwellResponse, RequestError> {
        self.hit(Endpoint::Dwell)?;
        let avg_dwell_minutes = self
            .dwell
            .get(&query.window.from_ms)
            .copied()
            .unwrap_or(self.dwell_default);
        Ok(DwellResponse { avg_dwell_minutes })
    }

    async fn footfall(&self, query: &RangeQuery) -> Result<FootfallResponse, RequestError> {
        self.hit(Endpoint::Footfall)?;
        let footfall = self
            .footfall
            .get(&query.window.from_ms)
            .copied()
            .unwrap_or(self.footfall_default);
        Ok(FootfallResponse { footfall })
    }

    async fn entry_exit(&self, query: &PageQuery) -> Result<EntryExitPage, RequestError> {
        self.hit(Endpoint::EntryExit)?;
        *self.last_page.lock().unwrap() = Some(query.clone());
        Ok(self.page.clone())
    }
}
