//! Date Selector
//!
//! A button showing the selected day that opens a one-month calendar.
//! Future days are disabled; picking a day keeps the current time of day.

use chrono::{Datelike, Local, NaiveDate};
use leptos::*;

use crowdwatch::view::calendar::{button_label, is_future, WEEKDAYS};
use crowdwatch::view::MonthPivot;

use crate::state::dashboard::use_dashboard;

#[component]
pub fn DateSelect() -> impl IntoView {
    let dashboard = use_dashboard();
    let view_state = dashboard.view;

    let (open, set_open) = create_signal(false);
    let selected_day = create_memo(move |_| view_state.with(|v| v.date().date_naive()));
    let pivot = create_rw_signal(MonthPivot::containing(selected_day.get_untracked()));

    let today = move || Local::now().date_naive();

    let on_toggle = move |_| {
        if !open.get_untracked() {
            pivot.set(MonthPivot::containing(selected_day.get_untracked()));
        }
        set_open.update(|o| *o = !*o);
    };

    let pick = move |day: NaiveDate| {
        let picked = view_state
            .try_update(|v| v.pick_day(day, today()))
            .unwrap_or(false);
        if picked {
            set_open.set(false);
        }
    };

    view! {
        <div class="relative">
            <button
                on:click=on_toggle
                class="bg-gray-700 rounded-lg px-4 py-2 border border-gray-600 hover:bg-gray-600 transition-colors"
            >
                "📅 "
                {move || button_label(selected_day.get(), today())}
            </button>

            {move || open.get().then(|| view! {
                <div class="absolute right-0 mt-2 z-50 bg-gray-800 border border-gray-700 rounded-lg shadow-lg p-4 w-72">
                    <div class="flex items-center justify-between mb-3">
                        <button
                            on:click=move |_| pivot.update(|p| *p = p.previous())
                            class="px-2 py-1 rounded hover:bg-gray-700"
                        >
                            "‹"
                        </button>
                        <span class="font-semibold">{move || pivot.get().title()}</span>
                        <button
                            on:click=move |_| pivot.update(|p| *p = p.next())
                            class="px-2 py-1 rounded hover:bg-gray-700"
                        >
                            "›"
                        </button>
                    </div>

                    <div class="grid grid-cols-7 gap-1 text-center text-xs text-gray-400 mb-1">
                        {WEEKDAYS.iter().map(|d| view! { <span>{*d}</span> }).collect_view()}
                    </div>

                    <div class="grid grid-cols-7 gap-1 text-center">
                        {move || pivot.get().grid().into_iter().map(|cell| match cell {
                            None => view! { <span /> }.into_view(),
                            Some(day) => {
                                let disabled = is_future(day, today());
                                view! {
                                    <button
                                        on:click=move |_| pick(day)
                                        disabled=disabled
                                        class=move || {
                                            let base = "py-1 rounded text-sm";
                                            if selected_day.get() == day {
                                                format!("{} bg-primary-600 text-white", base)
                                            } else if disabled {
                                                format!("{} text-gray-600 cursor-not-allowed", base)
                                            } else {
                                                format!("{} hover:bg-gray-700", base)
                                            }
                                        }
                                    >
                                        {day.day()}
                                    </button>
                                }.into_view()
                            }
                        }).collect_view()}
                    </div>
                </div>
            })}
        </div>
    }
}
