//! Dashboard Page
//!
//! Protected shell for the overview and visitor-log tabs: header with site
//! and date selectors, sidebar, alerts panel.

use leptos::*;
use leptos_router::*;

use crowdwatch::view::route::LOGIN_PATH;
use crowdwatch::DashboardTab;

use crate::components::{
    DateSelect, DemographicsChart, DemographicsPie, DwellCard, EntriesLog, FootfallCard, Navbar,
    NotificationsPanel, OccupancyChart, Sidebar, SiteSelect,
};
use crate::state::dashboard::use_dashboard;
use crate::state::session::use_auth;

#[component]
pub fn Dashboard() -> impl IntoView {
    let auth = use_auth();

    view! {
        <Show
            when=move || auth.is_authenticated()
            fallback=|| view! { <Redirect path=LOGIN_PATH /> }
        >
            <DashboardShell />
        </Show>
    }
}

#[component]
fn DashboardShell() -> impl IntoView {
    let dashboard = use_dashboard();
    let view_state = dashboard.view;
    let location = use_location();

    // Back/forward navigation: resync the tab from the address bar
    create_effect(move |_| {
        let path = location.pathname.get();
        view_state.update(|v| v.sync_from_path(&path));
    });
    let tab = create_memo(move |_| view_state.with(|v| v.tab()));

    view! {
        <div class="min-h-screen flex flex-col">
            <Navbar />

            <div class="flex flex-1">
                <Sidebar />

                <main class="flex-1 px-4 py-8 space-y-8 container mx-auto">
                    <div class="flex flex-wrap items-center justify-between gap-4">
                        <h1 class="text-3xl font-bold">{move || tab.get().title()}</h1>
                        <div class="flex items-center space-x-2">
                            <SiteSelect />
                            <DateSelect />
                        </div>
                    </div>

                    {move || match tab.get() {
                        DashboardTab::Overview => view! { <Overview /> }.into_view(),
                        DashboardTab::Entries => view! { <EntriesLog /> }.into_view(),
                    }}
                </main>
            </div>

            <NotificationsPanel />
        </div>
    }
}

#[component]
fn Overview() -> impl IntoView {
    view! {
        <div class="space-y-8">
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <FootfallCard />
                <DwellCard />
            </div>

            <OccupancyChart />

            <div class="grid md:grid-cols-3 gap-8">
                <div class="md:col-span-2">
                    <DemographicsChart />
                </div>
                <DemographicsPie />
            </div>
        </div>
    }
}
