/// Endpoints the dashboard talks to, fixed when the bundle is built.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    pub server_url: String,
    pub log_service_url: String,
    pub metrics_url: Option<String>,
    pub log_level: log::LevelFilter,
}

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_LOG_SERVICE_URL: &str = "http://localhost:8002";

impl DashboardConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("DASHBOARD_SERVER_URL"),
            option_env!("DASHBOARD_LOG_SERVICE_URL"),
            option_env!("DASHBOARD_METRICS_URL"),
            option_env!("DASHBOARD_LOG_LEVEL"),
        )
    }

    fn from_values(
        server_url: Option<&str>,
        log_service_url: Option<&str>,
        metrics_url: Option<&str>,
        log_level: Option<&str>,
    ) -> Self {
        Self {
            server_url: base_url(server_url, DEFAULT_SERVER_URL),
            log_service_url: base_url(log_service_url, DEFAULT_LOG_SERVICE_URL),
            metrics_url: metrics_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            log_level: log_level
                .and_then(|level| level.parse().ok())
                .unwrap_or(log::LevelFilter::Info),
        }
    }

    pub fn server_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    pub fn log_service_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.log_service_url, path)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::from_values(None, None, None, None)
    }
}

// Trailing slashes are dropped so paths can always start with '/'.
fn base_url(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}
