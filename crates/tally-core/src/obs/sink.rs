//! Metrics sink boundary.
//!
//! Engine logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::obs::metrics;
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    PipelineStart { requests: u64 },
    RequestFinish { rows_scanned: u64, groups: u64 },
    RequestError,
    PipelineFinish { ok: bool },
    TableFiltered { rows_in: u64, rows_out: u64 },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| {
            let ops = &mut m.ops;
            match event {
                MetricsEvent::PipelineStart { requests } => {
                    ops.pipelines_started = ops.pipelines_started.saturating_add(1);
                    ops.requests_planned = ops.requests_planned.saturating_add(requests);
                }
                MetricsEvent::RequestFinish {
                    rows_scanned,
                    groups,
                } => {
                    ops.requests_ok = ops.requests_ok.saturating_add(1);
                    ops.rows_scanned = ops.rows_scanned.saturating_add(rows_scanned);
                    ops.groups_emitted = ops.groups_emitted.saturating_add(groups);
                }
                MetricsEvent::RequestError => {
                    ops.requests_failed = ops.requests_failed.saturating_add(1);
                }
                MetricsEvent::PipelineFinish { ok: true } => {
                    ops.pipelines_ok = ops.pipelines_ok.saturating_add(1);
                }
                MetricsEvent::PipelineFinish { ok: false } => {
                    ops.pipelines_failed = ops.pipelines_failed.saturating_add(1);
                }
                MetricsEvent::TableFiltered { rows_in, rows_out } => {
                    ops.filters = ops.filters.saturating_add(1);
                    ops.filter_rows_in = ops.filter_rows_in.saturating_add(rows_in);
                    ops.filter_rows_out = ops.filter_rows_out.saturating_add(rows_out);
                }
            }
        });
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // Preconditions:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`.
        // - `with_metrics_sink` always restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        //
        // Aliasing:
        // - Only a shared reference is materialized, matching the shared borrow
        //   used to install the override.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the calling thread's metrics counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset the calling thread's metrics counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink_ptr));
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
