use std::rc::Rc;
use std::time::Duration;

use yew::Reducible;

use crate::error::ApiError;
use crate::logs::query::FetchOutcome;
use crate::types::LogEntry;

/// How long freshly arrived entries stay highlighted.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(1500);

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayedLog {
    pub entry: LogEntry,
    pub is_new: bool,
}

impl AsRef<LogEntry> for DisplayedLog {
    fn as_ref(&self) -> &LogEntry {
        &self.entry
    }
}

/// Everything the log panel shows apart from the filter inputs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogViewState {
    pub logs: Vec<DisplayedLog>,
    pub last_failure: Option<ApiError>,
    /// Bumped whenever a fetch brings highlighted entries.
    pub highlight_generation: u64,
    applied_seq: u64,
    /// Entries of the last successful fetch since mount or clear. A failed fetch
    /// leaves it alone so the next success is compared against real data.
    last_loaded: Option<Vec<LogEntry>>,
}

pub enum LogAction {
    Fetched { seq: u64, outcome: FetchOutcome },
    Cleared { fence: u64 },
    HighlightElapsed,
}

impl LogViewState {
    pub fn has_highlights(&self) -> bool {
        self.logs.iter().any(|log| log.is_new)
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.logs.iter().map(|log| &log.entry)
    }

    /// Returns the next state, or `None` when the action changes nothing.
    fn next(&self, action: LogAction) -> Option<Self> {
        match action {
            LogAction::Fetched { seq, .. } if seq <= self.applied_seq => {
                log::debug!(
                    "dropping stale log response {} (already showing {})",
                    seq,
                    self.applied_seq
                );
                None
            }
            LogAction::Fetched { seq, outcome } => Some(match outcome {
                FetchOutcome::Loaded(entries) => {
                    let logs: Vec<DisplayedLog> = entries
                        .iter()
                        .map(|entry| DisplayedLog {
                            is_new: self
                                .last_loaded
                                .as_deref()
                                .is_some_and(|previous| !seen_in(previous, entry)),
                            entry: entry.clone(),
                        })
                        .collect();
                    let fresh = logs.iter().any(|log| log.is_new);
                    Self {
                        logs,
                        last_failure: None,
                        highlight_generation: self.highlight_generation + u64::from(fresh),
                        applied_seq: seq,
                        last_loaded: Some(entries),
                    }
                }
                FetchOutcome::Failed(err) => {
                    log::error!("failed to fetch action logs: {}", err);
                    Self {
                        logs: Vec::new(),
                        last_failure: Some(err),
                        applied_seq: seq,
                        ..self.clone()
                    }
                }
            }),
            LogAction::Cleared { fence } => Some(Self {
                logs: Vec::new(),
                last_failure: None,
                highlight_generation: self.highlight_generation,
                applied_seq: self.applied_seq.max(fence),
                last_loaded: None,
            }),
            LogAction::HighlightElapsed if !self.has_highlights() => None,
            LogAction::HighlightElapsed => Some(Self {
                logs: self
                    .logs
                    .iter()
                    .map(|log| DisplayedLog {
                        entry: log.entry.clone(),
                        is_new: false,
                    })
                    .collect(),
                ..self.clone()
            }),
        }
    }

}

fn seen_in(previous: &[LogEntry], entry: &LogEntry) -> bool {
    previous.iter().any(|seen| match (&seen.id, &entry.id) {
        (Some(a), Some(b)) => a == b,
        _ => seen == entry,
    })
}

impl Reducible for LogViewState {
    type Action = LogAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match self.next(action) {
            Some(next) => Rc::new(next),
            None => self,
        }
    }
}
