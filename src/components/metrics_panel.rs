use yew::prelude::*;

use crate::config::DashboardConfig;

/// Embeds the externally hosted metrics dashboard, if one is configured.
#[function_component(MetricsPanel)]
pub fn metrics_panel() -> Html {
    let config = use_context::<DashboardConfig>().unwrap_or_default();

    match config.metrics_url {
        Some(url) => html! {
            <div style="border:1px solid #ddd; border-radius:8px; overflow:hidden; background:white; height:45vh;">
                <iframe
                    src={url}
                    title="Metrics"
                    style="width:100%; height:100%; border:none;"
                />
            </div>
        },
        None => html! {},
    }
}
