//! Dashboard View State
//!
//! Reactive wrapper around the core [`ViewState`]: selected site and date,
//! active tab, panel flags, plus the live alert feed and occupancy slot.

use chrono::Local;
use leptos::*;

use crowdwatch::{AlertFeed, OccupancySlot, Selection, ViewState};

#[derive(Clone, Copy)]
pub struct DashboardState {
    pub view: RwSignal<ViewState<Local>>,
    /// Site and date every panel fetches for
    pub selection: Memo<Option<Selection<Local>>>,
    pub alerts: RwSignal<AlertFeed>,
    pub occupancy: RwSignal<OccupancySlot>,
    /// Push connection is authenticated and open
    pub live_connected: RwSignal<bool>,
}

impl DashboardState {
    pub fn site_id(&self) -> Option<String> {
        self.selection.with(|s| s.as_ref().map(|s| s.site_id.clone()))
    }
}

/// Fresh view state (date defaults to now) provided to the component tree
pub fn provide_dashboard_state() -> DashboardState {
    let view = create_rw_signal(ViewState::new(Local::now()));
    let selection = create_memo(move |_| view.with(|v| v.selection()));
    let alerts = create_rw_signal(AlertFeed::default());
    let occupancy = create_rw_signal(OccupancySlot::default());

    // Feeds follow the selected site
    let site = create_memo(move |_| selection.with(|s| s.as_ref().map(|s| s.site_id.clone())));
    create_effect(move |_| {
        let site_id = site.get();
        alerts.update(|feed| feed.select_site(site_id.clone()));
        occupancy.update(|slot| slot.select_site(site_id));
    });

    let state = DashboardState {
        view,
        selection,
        alerts,
        occupancy,
        live_connected: create_rw_signal(false),
    };
    provide_context(state);
    state
}

pub fn use_dashboard() -> DashboardState {
    expect_context::<DashboardState>()
}
