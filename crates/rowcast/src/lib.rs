//! Rowcast — a schema-compiled object-to-record mapping engine.
//!
//! ## Crate layout
//! - `core`: values, records, schema compilation, serializer, pipelines.
//! - `memory`: reference in-memory model collaborator.
//!
//! The `prelude` module mirrors the surface used at mapping call sites.

pub use rowcast_core as core;
pub use rowcast_memory as memory;

// the record! macro lives at the core crate root
pub use rowcast_core::record;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use rowcast_core::error::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
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
    pub use crate::memory::{MemoryInstance, MemoryModel};
}
