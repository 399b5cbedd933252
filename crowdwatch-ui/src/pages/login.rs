//! Login Page
//!
//! Email/password form. Validation failures are caught locally by the
//! session controller and shown under the fields; server rejections and
//! network failures show in a banner above the form.

use leptos::*;
use leptos_router::*;

use crowdwatch::session::LoginError;
use crowdwatch::view::route::OVERVIEW_PATH;

use crate::state::session::use_auth;

#[component]
pub fn Login() -> impl IntoView {
    let auth = use_auth();

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<LoginError>);
    let (submitting, set_submitting) = create_signal(false);

    let auth_for_submit = auth.clone();
    let navigate = use_navigate();
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        set_error.set(None);
        set_submitting.set(true);

        let auth = auth_for_submit.clone();
        let navigate = navigate.clone();
        let (email, password) = (email.get_untracked(), password.get_untracked());
        spawn_local(async move {
            match auth.login(email.trim(), &password).await {
                Ok(()) => navigate(OVERVIEW_PATH, Default::default()),
                Err(e) => set_error.set(Some(e)),
            }
            set_submitting.set(false);
        });
    };

    view! {
        {move || auth.is_authenticated().then(|| view! { <Redirect path=OVERVIEW_PATH /> })}

        <div class="min-h-screen flex items-center justify-center px-4">
            <form
                on:submit=on_submit
                class="w-full max-w-sm bg-gray-800 rounded-xl p-8 space-y-5 border border-gray-700"
            >
                <div class="text-center">
                    <div class="text-4xl mb-2">"👥"</div>
                    <h1 class="text-2xl font-bold">"Crowdwatch"</h1>
                    <p class="text-gray-400 text-sm mt-1">"Sign in to your dashboard"</p>
                </div>

                {move || error.get().filter(|e| !e.is_validation()).map(|e| view! {
                    <div class="rounded-lg bg-red-900/40 border border-red-700 px-4 py-3 text-sm text-red-300">
                        {e.to_string()}
                    </div>
                })}

                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Email"</label>
                    <input
                        type="email"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600 focus:border-primary-500 focus:outline-none"
                    />
                </div>

                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Password"</label>
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        class="w-full bg-gray-700 rounded-lg px-4 py-3 border border-gray-600 focus:border-primary-500 focus:outline-none"
                    />
                </div>

                {move || error.get().filter(LoginError::is_validation).map(|e| view! {
                    <p class="text-sm text-red-400">{e.to_string()}</p>
                })}

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full px-6 py-3 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-700 rounded-lg font-medium transition-colors"
                >
                    {move || if submitting.get() { "Signing in..." } else { "Sign In" }}
                </button>
            </form>
        </div>
    }
}
