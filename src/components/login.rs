use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::login;
use crate::config::DashboardConfig;
use crate::session::{login_failure_message, SessionHandle};

#[function_component(LoginForm)]
pub fn login_form() -> Html {
    let session = use_context::<SessionHandle>();
    let config = use_context::<DashboardConfig>().unwrap_or_default();
    let user_id = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<&'static str>);
    let submitting = use_state(|| false);

    let on_user_id_input = {
        let user_id = user_id.clone();
        Callback::from(move |event: InputEvent| {
            let target = event.target_unchecked_into::<HtmlInputElement>();
            user_id.set(target.value());
        })
    };

    let on_password_input = {
        let password = password.clone();
        Callback::from(move |event: InputEvent| {
            let target = event.target_unchecked_into::<HtmlInputElement>();
            password.set(target.value());
        })
    };

    let on_submit = {
        let user_id = user_id.clone();
        let password = password.clone();
        let error = error.clone();
        let submitting = submitting.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(session) = session.clone() else {
                log::error!("login form rendered outside a session provider");
                return;
            };
            let config = config.clone();
            let id = (*user_id).clone();
            let secret = (*password).clone();
            let error = error.clone();
            let submitting = submitting.clone();

            error.set(None);
            submitting.set(true);
            spawn_local(async move {
                match login(&config, &id, &secret).await {
                    Ok(()) => session.sign_in(id),
                    Err(err) => {
                        log::warn!("login for {} failed: {}", id, err);
                        error.set(Some(login_failure_message(&err)));
                    }
                }
                submitting.set(false);
            });
        })
    };

    html! {
        <div style="display:flex; align-items:center; justify-content:center; min-height:100vh; background:#f8f9fa; font-family:Arial,sans-serif;">
            <form onsubmit={on_submit} style="min-width:320px; padding:2em; background:white; border:1px solid #ddd; border-radius:8px; display:flex; flex-direction:column; gap:1em; box-shadow:0 4px 12px rgba(0,0,0,0.08);">
                <h2 style="margin:0; color:#333;">{ "Login" }</h2>
                <label style="display:flex; flex-direction:column; gap:0.4em; color:#555; font-weight:bold;">
                    { "User ID" }
                    <input
                        type="text"
                        required=true
                        value={(*user_id).clone()}
                        oninput={on_user_id_input}
                        style="padding:0.5em; border:1px solid #ccc; border-radius:4px;"
                    />
                </label>
                <label style="display:flex; flex-direction:column; gap:0.4em; color:#555; font-weight:bold;">
                    { "Password" }
                    <input
                        type="password"
                        required=true
                        value={(*password).clone()}
                        oninput={on_password_input}
                        style="padding:0.5em; border:1px solid #ccc; border-radius:4px;"
                    />
                </label>
                { if let Some(message) = *error {
                    html! { <div style="color:#721c24;">{ message }</div> }
                } else {
                    html! {}
                }}
                <button
                    type="submit"
                    disabled={*submitting}
                    style="padding:0.7em 0; font-size:1em; background:#007bff; color:white; border:none; border-radius:4px; cursor:pointer;"
                >
                    { if *submitting { "Signing in..." } else { "Login" } }
                </button>
            </form>
        </div>
    }
}
