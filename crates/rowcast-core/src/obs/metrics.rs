use crate::obs::sink::EngineEvent;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static STATE: RefCell<EventReport> = RefCell::new(EventReport::default());
}

///
/// EventReport
/// Ephemeral, in-memory counters for engine operations.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub serialize_calls: u64,
    pub create_calls: u64,
    pub rows_serialized: u64,
    pub rows_persisted: u64,
    pub validation_rejections: u64,
    pub models: BTreeMap<String, ModelCounters>,
}

///
/// ModelCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ModelCounters {
    pub serialize_calls: u64,
    pub create_calls: u64,
    pub rows_serialized: u64,
    pub rows_persisted: u64,
    pub validation_rejections: u64,
}

pub(crate) fn apply(event: EngineEvent<'_>) {
    STATE.with(|state| {
        let mut state = state.borrow_mut();

        match event {
            EngineEvent::SerializeStart { model, .. } => {
                state.serialize_calls += 1;
                state.model_mut(model).serialize_calls += 1;
            }
            EngineEvent::SerializeFinish { model, rows, .. } => {
                state.rows_serialized += rows;
                state.model_mut(model).rows_serialized += rows;
            }
            EngineEvent::CreateStart { model, .. } => {
                state.create_calls += 1;
                state.model_mut(model).create_calls += 1;
            }
            EngineEvent::CreateFinish { .. } => {}
            EngineEvent::RowPersisted { model } => {
                state.rows_persisted += 1;
                state.model_mut(model).rows_persisted += 1;
            }
            EngineEvent::ValidationRejected { model } => {
                state.validation_rejections += 1;
                state.model_mut(model).validation_rejections += 1;
            }
        }
    });
}

impl EventReport {
    fn model_mut(&mut self, model: &str) -> &mut ModelCounters {
        self.models.entry(model.to_string()).or_default()
    }
}

pub(crate) fn report() -> EventReport {
    STATE.with(|state| state.borrow().clone())
}

pub(crate) fn reset() {
    STATE.with(|state| *state.borrow_mut() = EventReport::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::SerializeMode;

    #[test]
    fn counters_aggregate_per_model() {
        reset();

        apply(EngineEvent::SerializeStart {
            model: "Widget",
            mode: SerializeMode::Normal,
        });
        apply(EngineEvent::SerializeFinish {
            model: "Widget",
            mode: SerializeMode::Normal,
            rows: 3,
        });
        apply(EngineEvent::RowPersisted { model: "Widget" });

        let report = report();
        assert_eq!(report.serialize_calls, 1);
        assert_eq!(report.rows_serialized, 3);
        assert_eq!(report.rows_persisted, 1);

        let widget = report.models.get("Widget").unwrap();
        assert_eq!(widget.serialize_calls, 1);
        assert_eq!(widget.rows_serialized, 3);

        reset();
        assert_eq!(super::report().serialize_calls, 0);
    }
}
