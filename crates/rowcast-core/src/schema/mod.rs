mod build;

pub use build::SchemaBuilder;

use crate::{
    model::{FieldRef, Model, ModelField, ModelRef},
    serializer::Serializer,
    value::Value,
};
use std::{fmt, sync::Arc};
use thiserror::Error as ThisError;

///
/// SchemaError
///
/// Permanent configuration defects surfaced at schema-declaration time,
/// never at request time. Not retryable.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum SchemaError {
    #[error("field '{field}' is declared more than once on the schema for model '{model}'")]
    DuplicateField { field: String, model: String },

    #[error("{binding} binding names '{field}', which is not a declared field of the schema for model '{model}'")]
    UnboundBinding {
        binding: &'static str,
        field: String,
        model: String,
    },

    #[error("'{field}' does not reference a field of model '{model}'")]
    UnknownField { field: String, model: String },
}

///
/// Representation
///
/// Pure transform applied to a raw extracted value during serialization
/// only. Receives the owning serializer so a hook can reach cross-field
/// context. Creation never runs hooks.
///

pub type Representation = Arc<dyn Fn(&Serializer, Value) -> Value + Send + Sync>;

///
/// FieldDescriptor
///
/// Per-field compiled metadata: the resolved catalog handle, an optional
/// representation hook, and an optional nested-relation schema.
///

pub struct FieldDescriptor {
    name: String,
    field: FieldRef,
    representation: Option<Representation>,
    related: Option<Arc<Schema>>,
}

impl FieldDescriptor {
    pub(crate) const fn new(
        name: String,
        field: FieldRef,
        representation: Option<Representation>,
        related: Option<Arc<Schema>>,
    ) -> Self {
        Self {
            name,
            field,
            representation,
            related,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn field(&self) -> &dyn ModelField {
        self.field.as_ref()
    }

    #[must_use]
    pub const fn representation(&self) -> Option<&Representation> {
        self.representation.as_ref()
    }

    #[must_use]
    pub const fn related(&self) -> Option<&Arc<Schema>> {
        self.related.as_ref()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("representation", &self.representation.is_some())
            .field(
                "related",
                &self.related.as_deref().map(Schema::model_name),
            )
            .finish_non_exhaustive()
    }
}

///
/// Schema
///
/// Compiled, immutable field-descriptor table bound to one model.
///
/// Descriptor order equals declaration order and determines column order in
/// positional encodings. The field-name list is derived from the table, so
/// the two can never diverge. Compiled once per declared mapping and shared
/// read-only by every serializer built from it.
///

pub struct Schema {
    model: ModelRef,
    descriptors: Vec<FieldDescriptor>,
}

impl Schema {
    pub(crate) const fn new(model: ModelRef, descriptors: Vec<FieldDescriptor>) -> Self {
        Self { model, descriptors }
    }

    /// Start declaring a schema against a model.
    #[must_use]
    pub fn builder(model: ModelRef) -> SchemaBuilder {
        SchemaBuilder::new(model)
    }

    #[must_use]
    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    #[must_use]
    pub fn model_ref(&self) -> ModelRef {
        Arc::clone(&self.model)
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    #[must_use]
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    // descriptor
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Declared field names in declaration order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.descriptors.iter().map(FieldDescriptor::name).collect()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("model", &self.model_name())
            .field("fields", &self.field_names())
            .finish_non_exhaustive()
    }
}
