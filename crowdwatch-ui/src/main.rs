//! Crowdwatch Dashboard
//!
//! Crowd monitoring dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Footfall and dwell-time tiles with day-over-day comparison
//! - Occupancy and demographics charts
//! - Paginated visitor entry/exit log
//! - Live occupancy and alert notifications over Socket.IO
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Session handling, request bodies, the push codec and every
//! panel view-model come from the `crowdwatch` core; this crate supplies the
//! browser transports and the components.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
