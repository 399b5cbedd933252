//! Loading Placeholders
//!
//! Skeletons shown while a panel's fetch is in flight.

use leptos::*;

/// Skeleton loader for stat tiles
#[component]
pub fn TileSkeleton() -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-4 animate-pulse">
            <div class="h-4 bg-gray-700 rounded w-1/3 mb-4" />
            <div class="h-8 bg-gray-700 rounded w-1/2 mb-2" />
            <div class="h-4 bg-gray-700 rounded w-2/3" />
        </div>
    }
}

/// Skeleton loader for charts
#[component]
pub fn ChartSkeleton() -> impl IntoView {
    view! {
        <div class="h-64 bg-gray-700 rounded animate-pulse" />
    }
}

/// Skeleton loader for table rows
#[component]
pub fn RowsSkeleton(
    #[prop(default = 5)]
    count: usize,
) -> impl IntoView {
    view! {
        <div class="space-y-3 animate-pulse">
            {(0..count).map(|_| view! {
                <div class="bg-gray-700 rounded h-12" />
            }).collect_view()}
        </div>
    }
}
