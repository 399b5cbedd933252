//! Site selector: loads the site list once per mount and auto-selects the
//! first site.

use leptos::*;

use crowdwatch::AnalyticsApi;

use crate::state::dashboard::use_dashboard;
use crate::state::session::use_auth;

#[component]
pub fn SiteSelect() -> impl IntoView {
    let auth = use_auth();
    let dashboard = use_dashboard();
    let view_state = dashboard.view;

    let api = auth.api.clone();
    spawn_local(async move {
        match api.sites().await {
            Ok(sites) => view_state.update(|v| {
                v.set_sites(sites);
            }),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to fetch sites: {}", e).into());
            }
        }
    });

    let on_change = move |ev| {
        let site_id = event_target_value(&ev);
        view_state.update(|v| {
            v.select_site(&site_id);
        });
    };

    view! {
        <select
            on:change=on_change
            class="bg-gray-700 rounded-lg px-4 py-2 border border-gray-600 focus:border-primary-500 focus:outline-none"
        >
            {move || {
                let selected = dashboard.site_id();
                view_state.with(|v| {
                    if v.sites().is_empty() {
                        return view! { <option value="">"No sites"</option> }.into_view();
                    }
                    v.sites()
                        .iter()
                        .map(|site| {
                            let is_selected = selected.as_deref() == Some(site.id.as_str());
                            view! {
                                <option value=site.id.clone() selected=is_selected>
                                    {site.name.clone()}
                                </option>
                            }
                        })
                        .collect_view()
                })
            }}
        </select>
    }
}
