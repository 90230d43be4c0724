use crate::{record::Record, types::InstanceId, value::Value};
use std::{any::Any, fmt::Debug, sync::Arc};
use thiserror::Error as ThisError;

///
/// ModelError
///
/// Failures reported by the model collaborator. The engine never retries;
/// retry policy, if any, belongs to the collaborator or the caller.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ModelError {
    #[error("create rejected by model '{model}': {message}")]
    CreateRejected { model: String, message: String },

    #[error("'{field}' is not a field of model '{model}'")]
    UnknownField { field: String, model: String },
}

///
/// Model
///
/// The persistent-storage capability the engine reads from and writes to
/// but does not implement. One implementation per backing model.
///

pub trait Model: Send + Sync {
    /// Stable model name used in diagnostics and schema errors.
    fn model_name(&self) -> &str;

    /// Ordered field catalog: concrete and internal fields.
    ///
    /// Must be total and side-effect-free; schema compilation resolves
    /// declared field names against this catalog exactly once.
    fn fields(&self) -> Vec<FieldRef>;

    /// Lazy sequence over every instance of the model.
    ///
    /// The backing store is observed when the iterator is taken, not when
    /// a serializer is constructed.
    fn all_instances(&self) -> Box<dyn Iterator<Item = Instance> + '_>;

    /// Persist one new instance. Single atomic insert per call.
    fn create_instance(&self, values: Record) -> Result<Instance, ModelError>;
}

///
/// ModelField
///
/// One resolved entry of a model's field catalog.
///

pub trait ModelField: Send + Sync {
    /// Field name as declared in schemas.
    fn name(&self) -> &str;

    /// Extract this field's raw value from an instance.
    ///
    /// Total: an instance of another model is a collaborator contract
    /// violation and yields whatever the collaborator defines (the
    /// reference implementation yields `Null`).
    fn value_from(&self, instance: &dyn ModelInstance) -> Value;
}

///
/// ModelInstance
///
/// One live instance owned by the collaborator. Opaque to the engine apart
/// from its identity; field access goes through [`ModelField`].
///

pub trait ModelInstance: Debug + Send + Sync {
    fn id(&self) -> InstanceId;

    fn as_any(&self) -> &dyn Any;
}

pub type ModelRef = Arc<dyn Model>;
pub type FieldRef = Arc<dyn ModelField>;
pub type Instance = Arc<dyn ModelInstance>;
