//! Alerts Panel
//!
//! Slide-over list of the most recent alerts for the selected site.

use chrono::Local;
use leptos::*;

use crowdwatch::analytics::format::{date_time, DASH};
use crowdwatch::{AlertEvent, Severity};

use crate::state::dashboard::use_dashboard;

#[component]
pub fn NotificationsPanel() -> impl IntoView {
    let dashboard = use_dashboard();
    let view_state = dashboard.view;
    let alerts = dashboard.alerts;

    view! {
        {move || view_state.with(|v| v.notifications_open()).then(|| view! {
            <div class="fixed top-16 right-0 bottom-0 w-80 z-50 bg-gray-800 border-l border-gray-700 shadow-lg flex flex-col">
                <div class="flex items-center justify-between p-4 border-b border-gray-700">
                    <h2 class="text-lg font-semibold">"Alerts"</h2>
                    <button
                        on:click=move |_| view_state.update(|v| v.close_notifications())
                        class="px-2 py-1 rounded text-gray-400 hover:text-white hover:bg-gray-700"
                        aria-label="Close"
                    >
                        "✕"
                    </button>
                </div>

                <div class="flex-1 overflow-y-auto p-4 space-y-3">
                    {move || alerts.with(|feed| {
                        if feed.is_empty() {
                            view! {
                                <p class="text-gray-400 text-sm">"No alerts yet"</p>
                            }.into_view()
                        } else {
                            feed.iter().map(|alert| view! { <AlertCard alert=alert.clone() /> }).collect_view()
                        }
                    })}
                </div>
            </div>
        })}
    }
}

#[component]
fn AlertCard(alert: AlertEvent) -> impl IntoView {
    let when = alert
        .ts
        .to_utc()
        .map(|utc| date_time(&utc, &Local))
        .unwrap_or_else(|| DASH.to_string());

    view! {
        <div class="bg-gray-700 rounded-lg p-3">
            <div class="flex items-center justify-between">
                <span class="font-semibold">{alert.person_name}</span>
                <span class=format!("text-xs px-2 py-0.5 rounded-full {}", severity_class(alert.severity))>
                    {alert.severity.label()}
                </span>
            </div>
            <p class="text-sm text-gray-300 mt-1">"Entered " {alert.zone_name}</p>
            <p class="text-xs text-gray-400 mt-1">{when}</p>
        </div>
    }
}

fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "bg-red-600 text-white",
        Severity::Medium => "bg-yellow-600 text-white",
        Severity::Low => "bg-green-600 text-white",
    }
}
