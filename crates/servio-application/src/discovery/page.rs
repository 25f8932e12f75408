use servio_core::error::Result;
use servio_core::serviceman::{
    CandidatePool, DiscoveryQuery, DiscoveryView, ServicemanBackend, ServicemanFilters, SortKey,
    build_view,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

use super::status::PageStatus;

/// What a page fetched last, kept so it can be re-issued.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    /// Servicemen of one category.
    Category(u64),
    /// The filtered listing.
    Listing(ServicemanFilters),
}

#[derive(Debug, Default)]
struct PageState {
    status: PageStatus,
    /// Last accepted pool.
    pool: CandidatePool,
    query: DiscoveryQuery,
    last_request: Option<FetchRequest>,
}

/// State holder for one discovery page instance.
///
/// Every fetch takes a generation number; a result is applied only if its
/// generation is still the latest and the page has not been torn down.
/// The state lock is never held across the backend call.
pub struct DiscoveryPage {
    backend: Arc<dyn ServicemanBackend>,
    state: RwLock<PageState>,
    generation: AtomicU64,
    live: AtomicBool,
}

impl DiscoveryPage {
    /// Creates an idle page sorted by rating.
    pub fn new(backend: Arc<dyn ServicemanBackend>) -> Self {
        Self::with_sort(backend, SortKey::default())
    }

    /// Creates an idle page with an initial sort key.
    pub fn with_sort(backend: Arc<dyn ServicemanBackend>, sort: SortKey) -> Self {
        Self {
            backend,
            state: RwLock::new(PageState {
                query: DiscoveryQuery::new("", sort),
                ..Default::default()
            }),
            generation: AtomicU64::new(0),
            live: AtomicBool::new(true),
        }
    }

    /// Fetches the servicemen of `category_id`.
    pub async fn load_category(&self, category_id: u64) -> PageStatus {
        self.fetch(FetchRequest::Category(category_id)).await
    }

    /// Fetches the listing with server-side `filters`.
    pub async fn load_listing(&self, filters: ServicemanFilters) -> PageStatus {
        self.fetch(FetchRequest::Listing(filters)).await
    }

    /// Re-issues the last fetch. Does nothing on a page that never fetched.
    pub async fn reload(&self) -> PageStatus {
        let last = self.state.read().await.last_request.clone();
        match last {
            Some(request) => self.fetch(request).await,
            None => self.status().await,
        }
    }

    /// Runs `request` and applies its outcome if it is still wanted.
    ///
    /// Returns the page status after the attempt, which for a superseded
    /// fetch is whatever the newer fetch left behind.
    pub async fn fetch(&self, request: FetchRequest) -> PageStatus {
        if !self.is_live() {
            tracing::debug!("Ignoring {:?} on a torn-down page", request);
            return self.status().await;
        }

        let generation = {
            let mut state = self.state.write().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.status = PageStatus::Loading;
            state.last_request = Some(request.clone());
            generation
        };
        tracing::debug!("Fetch #{} started: {:?}", generation, request);

        let result = self.run(&request).await;

        let mut state = self.state.write().await;
        if !self.is_live() {
            tracing::debug!("Fetch #{} resolved after teardown, discarded", generation);
            return state.status.clone();
        }
        let latest = self.generation.load(Ordering::SeqCst);
        if generation != latest {
            tracing::debug!(
                "Fetch #{} superseded by #{}, discarded",
                generation,
                latest
            );
            return state.status.clone();
        }

        match result {
            Ok(pool) => {
                tracing::info!(
                    "Fetch #{} loaded {} servicemen",
                    generation,
                    pool.candidates.len()
                );
                state.pool = pool;
                state.status = PageStatus::Ready;
            }
            Err(e) => {
                tracing::warn!("Fetch #{} failed: {}", generation, e);
                state.status = PageStatus::Errored {
                    message: e.user_message(),
                };
            }
        }
        state.status.clone()
    }

    async fn run(&self, request: &FetchRequest) -> Result<CandidatePool> {
        match request {
            FetchRequest::Category(id) => self.backend.servicemen_by_category(*id).await,
            FetchRequest::Listing(filters) => self.backend.list_servicemen(filters).await,
        }
    }

    pub async fn set_query(&self, text: impl Into<String>) {
        self.state.write().await.query.text = text.into();
    }

    pub async fn set_sort(&self, sort: SortKey) {
        self.state.write().await.query.sort = sort;
    }

    pub async fn query(&self) -> DiscoveryQuery {
        self.state.read().await.query.clone()
    }

    /// Derives the rendered view from the last accepted pool and the current
    /// query.
    pub async fn view(&self) -> DiscoveryView {
        let state = self.state.read().await;
        build_view(&state.pool, &state.query)
    }

    pub async fn status(&self) -> PageStatus {
        self.state.read().await.status.clone()
    }

    /// True exactly while the latest fetch is outstanding.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.status.is_loading()
    }

    pub async fn last_request(&self) -> Option<FetchRequest> {
        self.state.read().await.last_request.clone()
    }

    /// Marks the page dead. Results arriving afterwards are discarded.
    pub fn teardown(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            tracing::debug!("Discovery page torn down");
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}
