use yew::prelude::*;

use crate::components::Shell;
use crate::config::DashboardConfig;
use crate::session::SessionProvider;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: DashboardConfig,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    html! {
        <ContextProvider<DashboardConfig> context={props.config.clone()}>
            <SessionProvider>
                <Shell />
            </SessionProvider>
        </ContextProvider<DashboardConfig>>
    }
}
