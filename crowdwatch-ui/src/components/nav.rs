//! Navigation
//!
//! Top bar (menu toggle, tab title, live status, alerts bell, logout) and
//! the tab sidebar.

use leptos::*;
use leptos_router::*;

use crowdwatch::view::route::LOGIN_PATH;
use crowdwatch::DashboardTab;

use crate::state::dashboard::use_dashboard;
use crate::state::session::use_auth;

/// Dashboard header bar
#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let dashboard = use_dashboard();
    let view_state = dashboard.view;
    let navigate = use_navigate();

    let title = move || view_state.with(|v| v.tab().title());
    let alert_count = move || dashboard.alerts.with(|feed| feed.len());

    let on_logout = move |_| {
        auth.logout();
        navigate(LOGIN_PATH, Default::default());
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="px-4 flex items-center justify-between h-16">
                <div class="flex items-center space-x-3">
                    <button
                        on:click=move |_| view_state.update(|v| v.toggle_sidebar())
                        class="p-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
                        aria-label="Toggle menu"
                    >
                        "☰"
                    </button>
                    <span class="text-xl font-bold text-white">{title}</span>
                </div>

                <div class="flex items-center space-x-2">
                    <LiveStatus />

                    <button
                        on:click=move |_| view_state.update(|v| v.toggle_notifications())
                        class="relative p-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
                        aria-label="Alerts"
                    >
                        "🔔"
                        {move || {
                            let count = alert_count();
                            (count > 0).then(|| view! {
                                <span class="absolute -top-1 -right-1 bg-red-600 text-white text-xs rounded-full px-1.5">
                                    {count}
                                </span>
                            })
                        }}
                    </button>

                    <button
                        on:click=on_logout
                        class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
                    >
                        "Logout"
                    </button>
                </div>
            </div>
        </nav>
    }
}

/// Push connection indicator
#[component]
fn LiveStatus() -> impl IntoView {
    let dashboard = use_dashboard();

    view! {
        {move || {
            if dashboard.live_connected.get() {
                view! {
                    <span class="flex items-center space-x-1 text-sm text-green-400 mr-2">
                        <span class="w-2 h-2 bg-green-400 rounded-full pulse" />
                        <span>"Live"</span>
                    </span>
                }.into_view()
            } else {
                view! {
                    <span class="flex items-center space-x-1 text-sm text-gray-500 mr-2">
                        <span class="w-2 h-2 bg-gray-500 rounded-full" />
                        <span>"Offline"</span>
                    </span>
                }.into_view()
            }
        }}
    }
}

/// Tab list; hidden until toggled on narrow screens
#[component]
pub fn Sidebar() -> impl IntoView {
    let dashboard = use_dashboard();
    let view_state = dashboard.view;

    view! {
        <aside class=move || {
            let base = "bg-gray-800 border-r border-gray-700 w-56 p-4 space-y-1 md:block";
            if view_state.with(|v| v.sidebar_open()) {
                format!("{} block fixed inset-y-0 left-0 z-40", base)
            } else {
                format!("{} hidden", base)
            }
        }>
            <TabLink tab=DashboardTab::Overview />
            <TabLink tab=DashboardTab::Entries />
        </aside>
    }
}

#[component]
fn TabLink(tab: DashboardTab) -> impl IntoView {
    let dashboard = use_dashboard();
    let view_state = dashboard.view;
    let navigate = use_navigate();

    let is_active = move || view_state.with(|v| v.tab() == tab);
    let on_click = move |_| {
        let path = view_state
            .try_update(|v| v.navigate(tab))
            .unwrap_or(tab.path());
        navigate(path, Default::default());
    };

    view! {
        <button
            on:click=on_click
            class=move || {
                let base = "w-full text-left px-4 py-2 rounded-lg transition-colors";
                if is_active() {
                    format!("{} bg-gray-700 text-white", base)
                } else {
                    format!("{} text-gray-300 hover:text-white hover:bg-gray-700", base)
                }
            }
        >
            {tab.title()}
        </button>
    }
}
