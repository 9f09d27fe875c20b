use serde::Serialize;
use std::cell::RefCell;

///
/// EventState
/// ephemeral, in-memory counters for engine operations
///

#[derive(Clone, Debug, Default)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Pipeline runs
    pub pipelines_started: u64,
    pub pipelines_ok: u64,
    pub pipelines_failed: u64,

    // Requests
    pub requests_planned: u64,
    pub requests_ok: u64,
    pub requests_failed: u64,
    pub rows_scanned: u64,
    pub groups_emitted: u64,

    // Table filters
    pub filters: u64,
    pub filter_rows_in: u64,
    pub filter_rows_out: u64,
}

///
/// EventReport
/// point-in-time snapshot of the calling thread's counters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub counters: EventOps,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

#[must_use]
pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        counters: m.ops.clone(),
    })
}
