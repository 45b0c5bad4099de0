use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};

use crate::time::parse_instant;
use crate::types::{FilterCriteria, LogEntry};

/// Values offered by the actor and endpoint dropdowns, taken from the logs currently held.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterOptions {
    pub actors: Vec<String>,
    pub endpoints: Vec<String>,
}

impl FilterOptions {
    pub fn from_logs<'a>(logs: impl IntoIterator<Item = &'a LogEntry>) -> Self {
        let mut actors = BTreeSet::new();
        let mut endpoints = BTreeSet::new();
        for entry in logs {
            if let Some(actor) = &entry.actor {
                actors.insert(actor.clone());
            }
            if let Some(endpoint) = &entry.endpoint {
                endpoints.insert(endpoint.clone());
            }
        }
        Self {
            actors: actors.into_iter().collect(),
            endpoints: endpoints.into_iter().collect(),
        }
    }
}

/// Criteria with the time bounds parsed once, ready to test entries against.
/// Timestamps without an offset, bounds and entries alike, are read in `zone`.
#[derive(Debug)]
pub struct LogPredicate<'a, Tz: TimeZone> {
    actor: Option<&'a str>,
    endpoint: Option<&'a str>,
    start: Bound,
    end: Bound,
    zone: &'a Tz,
}

#[derive(Debug)]
enum Bound {
    Unset,
    At(DateTime<Utc>),
    // An unparseable bound matches nothing.
    Invalid,
}

impl Bound {
    fn parse<Tz: TimeZone>(raw: Option<&str>, zone: &Tz) -> Self {
        match raw {
            None => Bound::Unset,
            Some(raw) => parse_instant(raw, zone).map_or(Bound::Invalid, Bound::At),
        }
    }

    fn is_set(&self) -> bool {
        !matches!(self, Bound::Unset)
    }
}

impl<'a, Tz: TimeZone> LogPredicate<'a, Tz> {
    pub fn new(criteria: &'a FilterCriteria, zone: &'a Tz) -> Self {
        Self {
            actor: criteria.actor(),
            endpoint: criteria.endpoint(),
            start: Bound::parse(criteria.start_time(), zone),
            end: Bound::parse(criteria.end_time(), zone),
            zone,
        }
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(actor) = self.actor {
            if entry.actor.as_deref() != Some(actor) {
                return false;
            }
        }
        if let Some(endpoint) = self.endpoint {
            if entry.endpoint.as_deref() != Some(endpoint) {
                return false;
            }
        }
        if !self.start.is_set() && !self.end.is_set() {
            return true;
        }
        let Some(at) = parse_instant(&entry.timestamp, self.zone) else {
            return false;
        };
        let after_start = match self.start {
            Bound::Unset => true,
            Bound::At(start) => at >= start,
            Bound::Invalid => false,
        };
        let before_end = match self.end {
            Bound::Unset => true,
            Bound::At(end) => at <= end,
            Bound::Invalid => false,
        };
        after_start && before_end
    }
}

/// Entries satisfying every set criterion, in their original order.
pub fn filter_logs<'a, T, Tz>(logs: &'a [T], criteria: &FilterCriteria, zone: &Tz) -> Vec<&'a T>
where
    T: AsRef<LogEntry>,
    Tz: TimeZone,
{
    let predicate = LogPredicate::new(criteria, zone);
    logs.iter()
        .filter(|item| predicate.matches(item.as_ref()))
        .collect()
}
