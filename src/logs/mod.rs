pub mod display;
pub mod filter;
pub mod query;
pub mod scheduler;
pub mod state;

pub use filter::{filter_logs, FilterOptions};
pub use query::{FetchOutcome, LogQuery, RESULT_LIMIT};
pub use scheduler::{BrowserIntervals, FetchRequest, PollScheduler, PollState, POLL_INTERVAL};
pub use state::{DisplayedLog, LogAction, LogViewState, HIGHLIGHT_DURATION};
