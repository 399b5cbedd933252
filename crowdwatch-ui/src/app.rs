//! App Root Component
//!
//! Routing, the session and dashboard contexts, and the live connection.

use leptos::*;
use leptos_router::*;

use crowdwatch::view::route::LOGIN_PATH;
use crowdwatch::view::{resolve, Route as AppRoute};

use crate::pages::{Dashboard, Login};
use crate::state::session::use_auth;
use crate::state::{init_live_channel, provide_auth_state, provide_dashboard_state};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let auth = provide_auth_state();
    let dashboard = provide_dashboard_state();
    init_live_channel(auth, dashboard);

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white">
                <Routes>
                    <Route path=LOGIN_PATH view=Login />
                    <Route path="/" view=RootRedirect />
                    <Route path="/dashboard" view=RootRedirect />
                    <Route path="/dashboard/:tab" view=Dashboard />
                    <Route path="/*any" view=NotFound />
                </Routes>
            </div>
        </Router>
    }
}

/// `/` lands on the overview when logged in, else on the login page
#[component]
fn RootRedirect() -> impl IntoView {
    let auth = use_auth();

    view! {
        {move || {
            let target = resolve(AppRoute::Root, auth.is_authenticated());
            view! { <Redirect path=target.path() /> }
        }}
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Go to Dashboard"
            </A>
        </div>
    }
}
