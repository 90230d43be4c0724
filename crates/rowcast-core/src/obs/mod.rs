//! Observability: runtime counters for engine operations.
//!
//! Pipeline code does not touch counter state directly; every event flows
//! through the sink boundary in [`sink`].

pub(crate) mod metrics;
pub(crate) mod sink;

pub use metrics::{EventReport, ModelCounters};
pub use sink::{EngineEvent, EventSink, metrics_report, metrics_reset, record, with_sink};
