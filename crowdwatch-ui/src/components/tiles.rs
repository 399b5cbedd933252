//! Stat Tiles
//!
//! Today's footfall (with the live occupancy reading) and average dwell
//! time, each compared with yesterday.

use chrono::Local;
use leptos::*;

use crowdwatch::analytics::format::{short_time, DASH};
use crowdwatch::panels::{self, DwellTile, FootfallTile};
use crowdwatch::{Change, PanelState};

use super::loading::TileSkeleton;
use crate::state::dashboard::use_dashboard;
use crate::state::session::use_auth;

#[component]
pub fn FootfallCard() -> impl IntoView {
    let auth = use_auth();
    let dashboard = use_dashboard();

    let api = auth.api.clone();
    let tile = create_local_resource(
        move || dashboard.selection.get(),
        move |selection| {
            let api = api.clone();
            async move { panels::load_footfall(&api, selection.as_ref()).await }
        },
    );

    let live = move || {
        dashboard.occupancy.with(|slot| {
            slot.latest().map(|update| {
                let at = update
                    .ts
                    .to_utc()
                    .map(|utc| short_time(utc.timestamp_millis(), &Local))
                    .unwrap_or_else(|| DASH.to_string());
                (update.site_occupancy, at)
            })
        })
    };

    view! {
        {move || match tile.get().unwrap_or_default() {
            PanelState::Loading => view! { <TileSkeleton /> }.into_view(),
            state => {
                let FootfallTile { footfall, change } = state.settled_or_default();
                view! {
                    <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
                        <span class="text-gray-400 text-sm">"Today's Footfall"</span>
                        <div class="text-3xl font-bold mt-2">{footfall}</div>
                        <ChangeLine change=change />
                        <div class="mt-3 text-sm text-gray-300">
                            {move || match live() {
                                Some((occupancy, at)) => view! {
                                    <span>"Live occupancy: "<span class="font-semibold">{occupancy}</span></span>
                                    <span class="text-gray-500 ml-2">{at}</span>
                                }.into_view(),
                                None => view! {
                                    <span class="text-gray-500">"Live occupancy: " {DASH}</span>
                                }.into_view(),
                            }}
                        </div>
                    </div>
                }.into_view()
            }
        }}
    }
}

#[component]
pub fn DwellCard() -> impl IntoView {
    let auth = use_auth();
    let dashboard = use_dashboard();

    let api = auth.api.clone();
    let tile = create_local_resource(
        move || dashboard.selection.get(),
        move |selection| {
            let api = api.clone();
            async move { panels::load_dwell(&api, selection.as_ref()).await }
        },
    );

    view! {
        {move || match tile.get().unwrap_or_default() {
            PanelState::Loading => view! { <TileSkeleton /> }.into_view(),
            state => {
                let tile: DwellTile = state.settled_or_default();
                view! {
                    <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
                        <span class="text-gray-400 text-sm">"Avg Dwell Time"</span>
                        <div class="text-3xl font-bold mt-2">{tile.duration()}</div>
                        <ChangeLine change=tile.change />
                    </div>
                }.into_view()
            }
        }}
    }
}

/// "12.50% More than yesterday", coloured by direction
#[component]
fn ChangeLine(change: Change) -> impl IntoView {
    let (arrow, color) = if change.is_fall() {
        ("↓", "text-red-400")
    } else {
        ("↑", "text-green-400")
    };

    view! {
        <div class=format!("mt-2 text-sm {}", color)>
            {arrow} " " {change.to_string()}
        </div>
    }
}
