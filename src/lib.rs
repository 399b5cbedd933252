//! # crowdwatch
//!
//! Client for a crowd-monitoring analytics backend: occupancy,
//! demographics, dwell time and footfall per site, a paginated visitor log,
//! and live alerts over a push channel.
//!
//! All aggregation happens on the server. This crate owns the session, the
//! request layer, the time windows each panel asks for, and the view state
//! that ties them together.
//!
//! ## Modules
//!
//! - [`session`]: authentication state and token persistence
//! - [`api`]: endpoint table, request bodies and the [`AnalyticsApi`] contract
//! - [`analytics`]: time windows, day-over-day comparison, formatting, cache
//! - [`live`]: push channel codec, events and per-view feeds
//! - [`view`]: routes, date selector, pagination and selection state
//! - [`panels`]: per-panel loaders producing render-ready view-models
//!
//! The `native` feature (default) adds the reqwest client, the
//! tokio-tungstenite push channel, TOML configuration, the file token store
//! and the `crowdwatch` binary. The browser dashboard builds this crate with
//! `default-features = false`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crowdwatch::{ApiClient, ClientConfig, FileTokenStore, SessionController, ViewState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Arc::new(SessionController::new(FileTokenStore::new(
//!         FileTokenStore::default_path(),
//!     )));
//!     session.initialize();
//!
//!     let api = ApiClient::new(ClientConfig::default(), Arc::clone(&session))?;
//!     session.login(&api, "ops@example.com", "secret1").await?;
//!
//!     let mut view = ViewState::new(chrono::Local::now());
//!     view.set_sites(crowdwatch::AnalyticsApi::sites(&api).await?);
//!
//!     let footfall = crowdwatch::panels::load_footfall(&api, view.selection().as_ref()).await;
//!     if let Some(tile) = footfall.ready() {
//!         println!("{} visitors, {}", tile.footfall, tile.change);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
#[cfg(feature = "native")]
pub mod config;
pub mod live;
pub mod models;
pub mod panels;
pub mod session;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use models::{
    DemographicsBucket, DemographicsResponse, DwellResponse, EntryExitPage, FootfallResponse,
    Gender, OccupancyBucket, OccupancyResponse, SecurityLevel, Severity, Site, VisitorRecord, Zone,
};

pub use session::{
    AuthFailure, Authenticator, LoginError, MemoryTokenStore, Session, SessionController,
    StoreError, TokenStore,
};

pub use api::{AnalyticsApi, Endpoint, PageQuery, RangeQuery, RequestError};

pub use analytics::{CachedApi, Change, TimeWindow};

pub use live::{AlertEvent, AlertFeed, LiveError, LiveEvent, OccupancySlot, OccupancyUpdate};

pub use view::{DashboardTab, PageButton, Pager, Route, Selection, ViewState};

pub use panels::PanelState;

#[cfg(feature = "native")]
pub use session::FileTokenStore;

#[cfg(feature = "native")]
pub use api::{ApiClient, ClientConfig};

#[cfg(feature = "native")]
pub use live::{LiveChannel, LiveConfig};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError, LoggingConfig};
