//! Core runtime for Rowcast: the dynamic value vocabulary, the model
//! collaborator boundary, schema compilation, and the serialize/create
//! pipelines, plus the ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

pub mod dataset;
pub mod error;
pub mod model;
pub mod obs;
pub mod record;
pub mod schema;
pub mod serializer;
pub mod types;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary. No sinks, reports, or helpers
/// are re-exported here.
///

pub mod prelude {
    pub use crate::{
        dataset::Dataset,
        error::{Error, ErrorClass},
        model::{FieldRef, Instance, Model, ModelError, ModelField, ModelInstance, ModelRef},
        record::Record,
        schema::{FieldDescriptor, Schema, SchemaBuilder, SchemaError},
        serializer::{
            CreateMode, DispatchError, Output, Payload, SerializeMode, Serializer, SplitOutput,
            SplitPayload, ValidationError,
        },
        types::{IdSet, InstanceId},
        value::Value,
    };
}
