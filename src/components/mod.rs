mod chat_panel;
mod login;
mod logs_panel;
mod metrics_panel;
mod shell;

pub use chat_panel::ChatPanel;
pub use login::LoginForm;
pub use logs_panel::LogsPanel;
pub use metrics_panel::MetricsPanel;
pub use shell::Shell;
