//! Panel View-Models
//!
//! Each dashboard panel is a function of the current [`Selection`] plus
//! server data. Loaders are generic over [`AnalyticsApi`] so the terminal
//! client, the browser dashboard and the tests share them. A loader never
//! fails: without a site, or when its request errors, it settles on
//! [`PanelState::Fallback`] and logs why.
//!
//! [`Selection`]: crate::view::Selection
//! [`AnalyticsApi`]: crate::api::AnalyticsApi

pub mod charts;
pub mod entries;
pub mod tiles;

pub use charts::{
    load_demographics, load_demographics_split, load_occupancy, DemographicsPoint,
    DemographicsSplit, OccupancyPoint,
};
pub use entries::{load_entries, EntriesTable, EntryRow};
pub use tiles::{load_dwell, load_footfall, DwellTile, FootfallTile};

use crate::api::RequestError;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PanelState<T> {
    /// Fetch in flight; render a skeleton
    #[default]
    Loading,
    Ready(T),
    /// No site, or the fetch failed; render dashes and zeros
    Fallback,
}

impl<T> PanelState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PanelState<U> {
        match self {
            Self::Loading => PanelState::Loading,
            Self::Ready(value) => PanelState::Ready(f(value)),
            Self::Fallback => PanelState::Fallback,
        }
    }
}

impl<T: Default> PanelState<T> {
    /// Value to render once settled; fallback renders the zero value
    pub fn settled_or_default(self) -> T {
        match self {
            Self::Ready(value) => value,
            _ => T::default(),
        }
    }
}

/// Turn a request outcome into a panel state, logging failures
fn settle<T>(panel: &'static str, result: Result<T, RequestError>) -> PanelState<T> {
    match result {
        Ok(value) => PanelState::Ready(value),
        Err(e) if e.is_expiry() => {
            tracing::warn!(panel, error = %e, "Session ended while loading panel");
            PanelState::Fallback
        }
        Err(e) => {
            tracing::error!(panel, error = %e, "Failed to load panel");
            PanelState::Fallback
        }
    }
}
