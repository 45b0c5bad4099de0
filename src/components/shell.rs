use yew::prelude::*;

use crate::components::{ChatPanel, LoginForm, LogsPanel, MetricsPanel};
use crate::session::SessionHandle;

/// Top bar and panel layout, shown only to a signed-in user.
#[function_component(Shell)]
pub fn shell() -> Html {
    let Some(session) = use_context::<SessionHandle>() else {
        log::error!("shell rendered outside a session provider");
        return html! {};
    };

    let Some(user) = session.user().map(str::to_string) else {
        return html! { <LoginForm /> };
    };

    let on_logout = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| session.sign_out())
    };

    html! {
        <div style="display:flex; flex-direction:column; min-height:100vh; font-family:Arial,sans-serif; background:#f8f9fa;">
            <div style="display:flex; align-items:center; gap:1em; padding:0.75em 1.5em; background:#4a5568; color:white;">
                <h1 style="flex:1; margin:0; font-size:1.2em;">{ "Observability Platform" }</h1>
                <span>{ user }</span>
                <button onclick={on_logout} style="background:none; border:1px solid white; color:white; padding:0.4em 1em; border-radius:4px; cursor:pointer;">
                    { "Logout" }
                </button>
            </div>
            <div style="display:grid; grid-template-columns:1fr 2fr; gap:1em; padding:1em;">
                <ChatPanel />
                <div style="display:flex; flex-direction:column; gap:1em;">
                    <MetricsPanel />
                    <LogsPanel />
                </div>
            </div>
        </div>
    }
}
