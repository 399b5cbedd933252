//! Visitor Log Table
//!
//! One page of the selected day's entry/exit records with numbered
//! pagination. The page resets to 1 when the site or date changes.

use leptos::*;

use crowdwatch::panels::{self, EntriesTable, EntryRow};
use crowdwatch::{PageButton, PanelState, Pager, Severity};

use super::loading::RowsSkeleton;
use crate::state::dashboard::use_dashboard;
use crate::state::session::use_auth;

#[component]
pub fn EntriesLog(
    #[prop(default = panels::entries::DEFAULT_PAGE_SIZE)]
    page_size: u32,
) -> impl IntoView {
    let auth = use_auth();
    let dashboard = use_dashboard();
    let pager = create_rw_signal(Pager::default());

    create_effect(move |previous: Option<()>| {
        dashboard.selection.with(|_| ());
        if previous.is_some() {
            pager.update(Pager::reset);
        }
    });

    let api = auth.api.clone();
    let table = create_local_resource(
        move || (dashboard.selection.get(), pager.with(Pager::current)),
        move |(selection, _)| {
            let api = api.clone();
            let current = pager.get_untracked();
            async move { panels::load_entries(&api, selection.as_ref(), current, page_size).await }
        },
    );

    // Adopt the page count reported by the server
    create_effect(move |_| {
        if let Some(PanelState::Ready(loaded)) = table.get() {
            let total = loaded.pager.total();
            if pager.with_untracked(|p| p.total() != total) {
                pager.update(|p| p.set_total(total));
            }
        }
    });

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Visitor Log"</h2>
            {move || match table.get().unwrap_or_default() {
                PanelState::Loading => view! { <RowsSkeleton /> }.into_view(),
                state => {
                    let EntriesTable { rows, total_records, .. } = state.settled_or_default();
                    view! {
                        <Rows rows=rows />
                        <div class="flex items-center justify-between mt-4">
                            <span class="text-sm text-gray-400">{format!("{} records", total_records)}</span>
                            <Pagination pager=pager />
                        </div>
                    }.into_view()
                }
            }}
        </section>
    }
}

#[component]
fn Rows(rows: Vec<EntryRow>) -> impl IntoView {
    if rows.is_empty() {
        return view! {
            <p class="text-gray-400 text-sm py-6 text-center">"No entries for this day"</p>
        }
        .into_view();
    }

    view! {
        <div class="overflow-x-auto">
            <table class="w-full text-sm">
                <thead>
                    <tr class="text-left text-gray-400 border-b border-gray-700">
                        <th class="py-2 pr-4">"Visitor"</th>
                        <th class="py-2 pr-4">"Gender"</th>
                        <th class="py-2 pr-4">"Zone"</th>
                        <th class="py-2 pr-4">"Risk"</th>
                        <th class="py-2 pr-4">"Entry"</th>
                        <th class="py-2 pr-4">"Exit"</th>
                        <th class="py-2">"Dwell Time"</th>
                    </tr>
                </thead>
                <tbody>
                    {rows.into_iter().map(|row| view! {
                        <tr class="border-b border-gray-700 last:border-0">
                            <td class="py-2 pr-4">
                                <div class="flex items-center space-x-3">
                                    <span class="w-8 h-8 rounded-full bg-gray-600 flex items-center justify-center text-xs font-semibold">
                                        {row.initials}
                                    </span>
                                    <span>{row.person_name}</span>
                                </div>
                            </td>
                            <td class="py-2 pr-4">{row.gender.to_string()}</td>
                            <td class="py-2 pr-4">{row.zone_name}</td>
                            <td class="py-2 pr-4">
                                <span class=format!("text-xs px-2 py-0.5 rounded-full {}", risk_class(row.severity))>
                                    {row.severity.label()}
                                </span>
                            </td>
                            <td class="py-2 pr-4">{row.entry}</td>
                            <td class="py-2 pr-4">{row.exit}</td>
                            <td class="py-2">{row.dwell}</td>
                        </tr>
                    }).collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_view()
}

fn risk_class(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "bg-red-600/30 text-red-300",
        Severity::Medium => "bg-yellow-600/30 text-yellow-300",
        Severity::Low => "bg-green-600/30 text-green-300",
    }
}

#[component]
fn Pagination(pager: RwSignal<Pager>) -> impl IntoView {
    let button = "px-3 py-1 rounded-lg text-sm transition-colors disabled:opacity-40";

    view! {
        <div class="flex items-center space-x-1">
            <button
                on:click=move |_| pager.update(|p| { p.previous(); })
                disabled=move || !pager.with(Pager::has_previous)
                class=format!("{} bg-gray-700 hover:bg-gray-600", button)
            >
                "Previous"
            </button>

            {move || pager.with(Pager::buttons).into_iter().map(|b| match b {
                PageButton::Ellipsis => view! { <span class="px-2 text-gray-500">{b.to_string()}</span> }.into_view(),
                PageButton::Page(n) => view! {
                    <button
                        on:click=move |_| pager.update(|p| { p.go_to_page(n); })
                        class=move || {
                            if pager.with(Pager::current) == n {
                                format!("{} bg-primary-600 text-white", button)
                            } else {
                                format!("{} bg-gray-700 hover:bg-gray-600", button)
                            }
                        }
                    >
                        {n}
                    </button>
                }.into_view(),
            }).collect_view()}

            <button
                on:click=move |_| pager.update(|p| { p.next(); })
                disabled=move || !pager.with(Pager::has_next)
                class=format!("{} bg-gray-700 hover:bg-gray-600", button)
            >
                "Next"
            </button>
        </div>
    }
}
