pub mod api;
pub mod app;
pub mod chat;
pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod logs;
pub mod session;
pub mod time;
pub mod types;

use wasm_bindgen::prelude::*;

use crate::app::{App, AppProps};
use crate::config::DashboardConfig;

#[wasm_bindgen(start)]
pub fn run_app() {
    let config = DashboardConfig::from_build_env();
    logging::init(config.log_level);

    let Some(root) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("root"))
    else {
        log::error!("no #root element to mount the dashboard on");
        return;
    };
    log::info!(
        "starting dashboard (server {}, log service {})",
        config.server_url,
        config.log_service_url
    );
    yew::Renderer::<App>::with_root_and_props(root, AppProps { config }).render();
}
