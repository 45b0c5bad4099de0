use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Interval;

use crate::types::FilterCriteria;

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Source of repeating timers. Dropping a handle must cancel its timer.
pub trait IntervalSpawner {
    type Handle;

    fn spawn(&self, period: Duration, tick: Box<dyn FnMut()>) -> Self::Handle;
}

/// `setInterval`-backed timers for the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserIntervals;

impl IntervalSpawner for BrowserIntervals {
    type Handle = Interval;

    fn spawn(&self, period: Duration, tick: Box<dyn FnMut()>) -> Interval {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        Interval::new(millis, tick)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollState {
    Active,
    Paused,
}

/// One fetch to perform. `seq` grows with every request issued by a scheduler.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchRequest {
    pub seq: u64,
    pub criteria: FilterCriteria,
}

/// Drives periodic log fetches for one log panel.
///
/// The scheduler owns at most one live interval. It is replaced whenever the criteria
/// change, dropped when polling is paused, and dropped with the scheduler itself.
pub struct PollScheduler<S: IntervalSpawner> {
    spawner: S,
    period: Duration,
    state: PollState,
    criteria: FilterCriteria,
    issued: Rc<Cell<u64>>,
    on_fetch: Rc<dyn Fn(FetchRequest)>,
    interval: Option<S::Handle>,
}

impl<S: IntervalSpawner> PollScheduler<S> {
    pub fn new(spawner: S, period: Duration, on_fetch: impl Fn(FetchRequest) + 'static) -> Self {
        Self {
            spawner,
            period,
            state: PollState::Active,
            criteria: FilterCriteria::default(),
            issued: Rc::new(Cell::new(0)),
            on_fetch: Rc::new(on_fetch),
            interval: None,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Sequence number of the most recent request handed out.
    pub fn last_issued(&self) -> u64 {
        self.issued.get()
    }

    /// Records new criteria for future fetches. Does not fetch by itself.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.rearm();
    }

    pub fn run_query(&mut self) {
        self.state = PollState::Active;
        if self.interval.is_none() {
            self.interval = Some(self.arm());
        }
        self.issue();
    }

    /// Pauses polling. Returns the last issued sequence number so responses to
    /// requests already in flight can be ignored.
    pub fn clear_query(&mut self) -> u64 {
        self.state = PollState::Paused;
        self.interval = None;
        self.last_issued()
    }

    /// Fetches once without touching the interval. Ignored while paused.
    pub fn refresh(&mut self) -> bool {
        if self.state != PollState::Active {
            return false;
        }
        self.issue();
        true
    }

    pub fn teardown(&mut self) {
        self.interval = None;
    }

    fn rearm(&mut self) {
        // The old timer goes first so two never overlap.
        self.interval = None;
        if self.state == PollState::Active {
            self.interval = Some(self.arm());
        }
    }

    fn arm(&self) -> S::Handle {
        let on_fetch = Rc::clone(&self.on_fetch);
        let issued = Rc::clone(&self.issued);
        let criteria = self.criteria.clone();
        self.spawner.spawn(
            self.period,
            Box::new(move || on_fetch(next_request(&issued, &criteria))),
        )
    }

    fn issue(&self) {
        (self.on_fetch)(next_request(&self.issued, &self.criteria));
    }
}

fn next_request(issued: &Cell<u64>, criteria: &FilterCriteria) -> FetchRequest {
    let seq = issued.get() + 1;
    issued.set(seq);
    FetchRequest {
        seq,
        criteria: criteria.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Slot {
        tick: Box<dyn FnMut()>,
        live: Rc<Cell<bool>>,
    }

    #[derive(Clone, Default)]
    struct ManualIntervals {
        slots: Rc<RefCell<Vec<Slot>>>,
    }

    struct ManualHandle {
        live: Rc<Cell<bool>>,
    }

    impl Drop for ManualHandle {
        fn drop(&mut self) {
            self.live.set(false);
        }
    }

    impl IntervalSpawner for ManualIntervals {
        type Handle = ManualHandle;

        fn spawn(&self, _period: Duration, tick: Box<dyn FnMut()>) -> ManualHandle {
            let live = Rc::new(Cell::new(true));
            self.slots.borrow_mut().push(Slot {
                tick,
                live: Rc::clone(&live),
            });
            ManualHandle { live }
        }
    }

    impl ManualIntervals {
        /// Fires every interval that has not been cancelled.
        fn elapse(&self) {
            for slot in self.slots.borrow_mut().iter_mut() {
                if slot.live.get() {
                    (slot.tick)();
                }
            }
        }

        fn live(&self) -> usize {
            self.slots.borrow().iter().filter(|s| s.live.get()).count()
        }

        fn spawned(&self) -> usize {
            self.slots.borrow().len()
        }
    }

    fn scheduler() -> (
        PollScheduler<ManualIntervals>,
        ManualIntervals,
        Rc<RefCell<Vec<FetchRequest>>>,
    ) {
        let timers = ManualIntervals::default();
        let fetches = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fetches);
        let scheduler = PollScheduler::new(timers.clone(), POLL_INTERVAL, move |req| {
            sink.borrow_mut().push(req)
        });
        (scheduler, timers, fetches)
    }

    fn actor(name: &str) -> FilterCriteria {
        FilterCriteria {
            actor: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn three_ticks_three_fetches_then_silence_after_teardown() {
        let (mut scheduler, timers, fetches) = scheduler();
        scheduler.set_criteria(FilterCriteria::default());
        assert!(fetches.borrow().is_empty());

        timers.elapse();
        timers.elapse();
        timers.elapse();
        assert_eq!(fetches.borrow().len(), 3);

        scheduler.teardown();
        assert_eq!(timers.live(), 0);
        timers.elapse();
        assert_eq!(fetches.borrow().len(), 3);
    }

    #[test]
    fn dropping_the_scheduler_cancels_its_timer() {
        let (mut scheduler, timers, fetches) = scheduler();
        scheduler.set_criteria(FilterCriteria::default());
        drop(scheduler);
        timers.elapse();
        assert_eq!(timers.live(), 0);
        assert!(fetches.borrow().is_empty());
    }

    #[test]
    fn criteria_change_replaces_the_timer_without_fetching() {
        let (mut scheduler, timers, fetches) = scheduler();
        scheduler.set_criteria(FilterCriteria::default());
        scheduler.set_criteria(actor("svc-A"));
        assert!(fetches.borrow().is_empty());
        assert_eq!(timers.live(), 1);
        assert_eq!(timers.spawned(), 2);

        timers.elapse();
        let fetches = fetches.borrow();
        assert_eq!(fetches.len(), 1);
        assert_eq!(fetches[0].criteria, actor("svc-A"));
    }

    #[test]
    fn clear_query_pauses_and_refresh_is_ignored() {
        let (mut scheduler, timers, fetches) = scheduler();
        scheduler.set_criteria(FilterCriteria::default());
        timers.elapse();

        let fence = scheduler.clear_query();
        assert_eq!(fence, 1);
        assert_eq!(scheduler.state(), PollState::Paused);
        assert_eq!(timers.live(), 0);
        assert!(!scheduler.refresh());

        scheduler.set_criteria(actor("user"));
        timers.elapse();
        assert_eq!(timers.live(), 0);
        assert_eq!(fetches.borrow().len(), 1);
    }

    #[test]
    fn run_query_resumes_with_an_immediate_fetch() {
        let (mut scheduler, timers, fetches) = scheduler();
        scheduler.set_criteria(actor("agent"));
        scheduler.clear_query();

        scheduler.run_query();
        assert_eq!(scheduler.state(), PollState::Active);
        assert_eq!(timers.live(), 1);
        assert_eq!(fetches.borrow().len(), 1);
        assert_eq!(fetches.borrow()[0].criteria, actor("agent"));

        timers.elapse();
        assert_eq!(fetches.borrow().len(), 2);
    }

    #[test]
    fn manual_actions_keep_the_running_timer() {
        let (mut scheduler, timers, fetches) = scheduler();
        scheduler.set_criteria(FilterCriteria::default());
        scheduler.run_query();
        assert!(scheduler.refresh());
        assert_eq!(timers.spawned(), 1);
        assert_eq!(fetches.borrow().len(), 2);
    }

    #[test]
    fn sequence_numbers_increase_across_ticks_and_actions() {
        let (mut scheduler, timers, fetches) = scheduler();
        scheduler.set_criteria(FilterCriteria::default());
        timers.elapse();
        scheduler.refresh();
        timers.elapse();
        scheduler.run_query();
        let seqs: Vec<u64> = fetches.borrow().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4]);
        assert_eq!(scheduler.last_issued(), 4);
    }
}
