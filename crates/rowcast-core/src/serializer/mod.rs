mod create;
mod output;

pub use create::{CreateMode, Payload, SplitPayload, ValidationError};
pub use output::{Output, SerializeMode, SplitOutput};

use crate::{
    dataset::Dataset,
    error::Error,
    model::{Instance, Model, ModelInstance},
    schema::Schema,
    types::IdSet,
    value::Value,
};
use std::{fmt, sync::Arc};
use thiserror::Error as ThisError;

///
/// DispatchError
///
/// Invalid mode name passed to serialize or create. Caller-correctable and
/// surfaced before any work happens; no side effects have occurred.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum DispatchError {
    #[error("invalid creation mode: '{mode}'")]
    Creation { mode: String },

    #[error("invalid serialization mode: '{mode}'")]
    Serialization { mode: String },
}

///
/// Serializer
///
/// A compiled schema bound to a working dataset. Created per call site and
/// discarded after use; holds no long-lived resources beyond the shared
/// schema.
///

pub struct Serializer {
    schema: Arc<Schema>,
    dataset: Dataset,
}

impl Serializer {
    // ======================================================================
    // Construction
    // ======================================================================

    /// Bind the schema to the deferred "all instances" dataset.
    ///
    /// The collaborator is not touched here; the store is first observed
    /// when a pipeline iterates the dataset.
    #[must_use]
    pub const fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            dataset: Dataset::all(),
        }
    }

    /// Bind the schema to a single instance.
    #[must_use]
    pub const fn for_instance(schema: Arc<Schema>, instance: Instance) -> Self {
        Self {
            schema,
            dataset: Dataset::one(instance),
        }
    }

    /// Bind the schema to an explicit collection, as given.
    #[must_use]
    pub const fn for_collection(schema: Arc<Schema>, instances: Vec<Instance>) -> Self {
        Self {
            schema,
            dataset: Dataset::collection(instances),
        }
    }

    // ======================================================================
    // Accessors
    // ======================================================================

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn model(&self) -> &dyn Model {
        self.schema.model()
    }

    #[must_use]
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Narrow the dataset by identity. The only mutation a serializer
    /// instance supports.
    pub fn exclude(&mut self, ids: &IdSet) {
        self.dataset.exclude(ids);
    }

    // ======================================================================
    // Dispatch
    // ======================================================================

    /// Serialize the dataset in the named mode.
    ///
    /// An unrecognized mode fails with [`DispatchError`] before the dataset
    /// is touched.
    pub fn serialize(&self, mode: &str) -> Result<Output, Error> {
        let mode = SerializeMode::parse(mode)?;

        Ok(self.serialize_as(mode))
    }

    /// Create instances from `payload` in the named mode.
    ///
    /// An unrecognized mode fails with [`DispatchError`] before anything is
    /// persisted.
    pub fn create(&self, payload: Payload, mode: &str) -> Result<Vec<Instance>, Error> {
        let mode = CreateMode::parse(mode)?;

        self.create_as(payload, mode)
    }

    // ======================================================================
    // Shared extraction primitive
    // ======================================================================

    ///
    /// extract_fields
    ///
    /// Raw field values for one instance, in schema order, with each
    /// field's representation hook applied when bound. Evaluated once per
    /// instance regardless of output mode; the result is positionally
    /// aligned with the schema's field names.
    ///
    #[must_use]
    pub fn extract_fields(&self, instance: &dyn ModelInstance) -> Vec<Value> {
        self.schema
            .descriptors()
            .iter()
            .map(|descriptor| {
                let raw = descriptor.field().value_from(instance);

                match descriptor.representation() {
                    Some(hook) => hook(self, raw),
                    None => raw,
                }
            })
            .collect()
    }

    /// Walk the dataset, honoring exclusions.
    pub(crate) fn instances(&self) -> Box<dyn Iterator<Item = Instance> + '_> {
        self.dataset.iter(self.schema.model())
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("schema", &self.schema)
            .field("dataset", &self.dataset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record, test_support::TestModel};

    fn widget_schema() -> Arc<Schema> {
        let model = TestModel::new("Widget", &["id", "name", "size"]);
        Schema::builder(model).field("name").field("size").resolve().unwrap()
    }

    #[test]
    fn extract_fields_aligns_with_schema_order() {
        let schema = widget_schema();
        let model = schema.model_ref();
        let serializer = Serializer::new(schema.clone());

        let instance = model
            .create_instance(record! { "size" => 3_i64, "name" => "a" })
            .unwrap();

        let values = serializer.extract_fields(instance.as_ref());

        assert_eq!(values.len(), schema.len());
        assert_eq!(values, vec![Value::Text("a".to_string()), Value::Int(3)]);
    }

    #[test]
    fn hook_receives_the_owning_serializer() {
        let model = TestModel::new("Widget", &["id", "name"]);
        let schema = Schema::builder(model.clone())
            .field("name")
            .representation("name", |serializer, value| {
                let model = serializer.model().model_name().to_string();
                Value::Text(format!("{model}:{value}"))
            })
            .resolve()
            .unwrap();

        let instance = model.seed(record! { "name" => "a" });
        let serializer = Serializer::for_instance(schema, instance);

        let values = serializer.extract_fields(serializer.instances().next().unwrap().as_ref());

        assert_eq!(values, vec![Value::Text("Widget:a".to_string())]);
    }

    #[test]
    fn invalid_modes_fail_dispatch() {
        let serializer = Serializer::new(widget_schema());

        let err = serializer.serialize("bogus").unwrap_err();
        assert!(matches!(err, Error::Dispatch(DispatchError::Serialization { ref mode }) if mode == "bogus"));

        let err = serializer
            .create(Payload::Record(record! { "name" => "x" }), "bogus")
            .unwrap_err();
        assert!(matches!(err, Error::Dispatch(DispatchError::Creation { ref mode }) if mode == "bogus"));
    }
}
