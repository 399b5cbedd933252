//! Shared response cache
//!
//! Sibling panels often ask for the same (site, metric, window). Wrapping the
//! request layer in [`CachedApi`] answers repeats from memory until the
//! selection changes and the owner calls [`CachedApi::invalidate`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{AnalyticsApi, Endpoint, PageQuery, RangeQuery, RequestError};
use crate::models::{
    DemographicsResponse, DwellResponse, EntryExitPage, FootfallResponse, OccupancyResponse, Site,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    endpoint: Endpoint,
    site_id: String,
    from_ms: i64,
    to_ms: i64,
    page: Option<(u32, u32)>,
}

impl CacheKey {
    fn range(endpoint: Endpoint, query: &RangeQuery) -> Self {
        Self {
            endpoint,
            site_id: query.site_id.clone(),
            from_ms: query.window.from_ms,
            to_ms: query.window.to_ms,
            page: None,
        }
    }

    fn sites() -> Self {
        Self {
            endpoint: Endpoint::Sites,
            site_id: String::new(),
            from_ms: 0,
            to_ms: 0,
            page: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Cached {
    Sites(Vec<Site>),
    Demographics(DemographicsResponse),
    Occupancy(OccupancyResponse),
    Dwell(DwellResponse),
    Footfall(FootfallResponse),
    EntryExit(EntryExitPage),
}

/// Request layer decorator keyed by (site, metric, window)
pub struct CachedApi<A> {
    inner: A,
    entries: Mutex<HashMap<CacheKey, Cached>>,
}

impl<A> CachedApi<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Drop every cached response. Call on site or date change.
    pub fn invalidate(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if !entries.is_empty() {
            tracing::debug!(entries = entries.len(), "Response cache invalidated");
        }
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &CacheKey) -> Option<Cached> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn put(&self, key: CacheKey, value: Cached) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, value);
    }
}

/// Look up `$key`; on a miss call `$fetch` and store the result under `$variant`
macro_rules! cached {
    ($self:ident, $key:expr, $variant:ident, $fetch:expr) => {{
        let key = $key;
        if let Some(Cached::$variant(hit)) = $self.get(&key) {
            tracing::trace!(endpoint = %key.endpoint, "Cache hit");
            return Ok(hit);
        }
        let value = $fetch.await?;
        $self.put(key, Cached::$variant(value.clone()));
        Ok(value)
    }};
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<A> AnalyticsApi for CachedApi<A>
where
    A: AnalyticsApi + Send + Sync,
{
    async fn sites(&self) -> Result<Vec<Site>, RequestError> {
        cached!(self, CacheKey::sites(), Sites, self.inner.sites())
    }

    async fn demographics(&self, query: &RangeQuery) -> Result<DemographicsResponse, RequestError> {
        cached!(
            self,
            CacheKey::range(Endpoint::Demographics, query),
            Demographics,
            self.inner.demographics(query)
        )
    }

    async fn occupancy(&self, query: &RangeQuery) -> Result<OccupancyResponse, RequestError> {
        cached!(
            self,
            CacheKey::range(Endpoint::Occupancy, query),
            Occupancy,
            self.inner.occupancy(query)
        )
    }

    async fn dwell(&self, query: &RangeQuery) -> Result<DwellResponse, RequestError> {
        cached!(self, CacheKey::range(Endpoint::Dwell, query), Dwell, self.inner.dwell(query))
    }

    async fn footfall(&self, query: &RangeQuery) -> Result<FootfallResponse, RequestError> {
        cached!(
            self,
            CacheKey::range(Endpoint::Footfall, query),
            Footfall,
            self.inner.footfall(query)
        )
    }

    async fn entry_exit(&self, query: &PageQuery) -> Result<EntryExitPage, RequestError> {
        let key = CacheKey {
            page: Some((query.page_number, query.page_size)),
            ..CacheKey::range(Endpoint::EntryExit, &query.range)
        };
        cached!(self, key, EntryExit, self.inner.entry_exit(query))
    }
}
