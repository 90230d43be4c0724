//! Event sink boundary.
//!
//! Pipeline logic MUST NOT depend on `obs::metrics` directly. All
//! instrumentation flows through [`EngineEvent`] and [`EventSink`]; this
//! module is the only bridge between pipelines and counter state.

use crate::{
    obs::metrics,
    serializer::{CreateMode, SerializeMode},
};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn EventSink>>> = const { RefCell::new(None) };
}

///
/// EngineEvent
///

#[derive(Clone, Copy, Debug)]
pub enum EngineEvent<'a> {
    SerializeStart {
        model: &'a str,
        mode: SerializeMode,
    },
    SerializeFinish {
        model: &'a str,
        mode: SerializeMode,
        rows: u64,
    },
    CreateStart {
        model: &'a str,
        mode: CreateMode,
    },
    CreateFinish {
        model: &'a str,
        mode: CreateMode,
        rows_persisted: u64,
    },
    RowPersisted {
        model: &'a str,
    },
    ValidationRejected {
        model: &'a str,
    },
}

///
/// EventSink
///

pub trait EventSink {
    fn record(&self, event: EngineEvent<'_>);
}

///
/// GlobalSink
/// Default thread-local sink that writes into global counter state. Acts
/// as the concrete sink when no scoped override is installed.
///

pub(crate) struct GlobalSink;

impl EventSink for GlobalSink {
    fn record(&self, event: EngineEvent<'_>) {
        metrics::apply(event);
    }
}

/// Record one event through the active sink.
pub fn record(event: EngineEvent<'_>) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(event),
        None => GlobalSink.record(event),
    }
}

/// Run `f` with a scoped sink override, restoring the previous sink on the
/// way out (including on panic).
pub fn with_sink<R>(sink: Rc<dyn EventSink>, f: impl FnOnce() -> R) -> R {
    struct Restore(Option<Rc<dyn EventSink>>);

    impl Drop for Restore {
        fn drop(&mut self) {
            let previous = self.0.take();
            SINK_OVERRIDE.with(|cell| *cell.borrow_mut() = previous);
        }
    }

    let previous = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _restore = Restore(previous);

    f()
}

/// Snapshot the global counter state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset the global counter state.
pub fn metrics_reset() {
    metrics::reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingSink {
        seen: Cell<u64>,
    }

    impl EventSink for CountingSink {
        fn record(&self, _event: EngineEvent<'_>) {
            self.seen.set(self.seen.get() + 1);
        }
    }

    #[test]
    fn override_intercepts_events_and_restores() {
        let sink = Rc::new(CountingSink { seen: Cell::new(0) });

        let before = metrics_report().serialize_calls;

        with_sink(sink.clone(), || {
            record(EngineEvent::SerializeStart {
                model: "Widget",
                mode: SerializeMode::Normal,
            });
        });

        assert_eq!(sink.seen.get(), 1, "override must receive the event");
        assert_eq!(
            metrics_report().serialize_calls,
            before,
            "global counters must not move while overridden"
        );
    }
}
