//! Core-internal model collaborator for unit tests.
//!
//! Deliberately minimal: a fixed field catalog, counter-based identities,
//! and a call counter so laziness can be asserted. The full reference
//! collaborator lives in the `rowcast-memory` crate.

use crate::{
    model::{FieldRef, Instance, Model, ModelError, ModelField, ModelInstance},
    record::Record,
    types::InstanceId,
    value::Value,
};
use std::{
    any::Any,
    sync::{Arc, Mutex},
};

///
/// TestModel
///

pub(crate) struct TestModel {
    name: &'static str,
    catalog: Vec<&'static str>,
    rows: Mutex<Vec<Instance>>,
    next_id: Mutex<u128>,
    all_calls: Mutex<u64>,
}

impl TestModel {
    pub fn new(name: &'static str, catalog: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            name,
            catalog: catalog.to_vec(),
            rows: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
            all_calls: Mutex::new(0),
        })
    }

    /// Insert a row directly, bypassing pipeline validation.
    pub fn seed(&self, values: Record) -> Instance {
        self.create_instance(values).expect("seed row")
    }

    /// Snapshot of the stored rows in insertion order.
    pub fn rows(&self) -> Vec<Instance> {
        self.rows.lock().expect("row store mutex poisoned").clone()
    }

    /// How many times `all_instances` has been taken.
    pub fn all_calls(&self) -> u64 {
        *self.all_calls.lock().expect("call counter mutex poisoned")
    }
}

impl Model for TestModel {
    fn model_name(&self) -> &str {
        self.name
    }

    fn fields(&self) -> Vec<FieldRef> {
        self.catalog
            .iter()
            .map(|name| Arc::new(TestField { name }) as FieldRef)
            .collect()
    }

    fn all_instances(&self) -> Box<dyn Iterator<Item = Instance> + '_> {
        *self.all_calls.lock().expect("call counter mutex poisoned") += 1;

        let snapshot = self.rows.lock().expect("row store mutex poisoned").clone();
        Box::new(snapshot.into_iter())
    }

    fn create_instance(&self, values: Record) -> Result<Instance, ModelError> {
        for (name, _) in values.iter() {
            if !self.catalog.iter().any(|entry| *entry == name) {
                return Err(ModelError::UnknownField {
                    field: name.to_string(),
                    model: self.name.to_string(),
                });
            }
        }

        let mut next_id = self.next_id.lock().expect("id counter mutex poisoned");
        *next_id += 1;
        let id = InstanceId::from_u128(*next_id);
        drop(next_id);

        let instance: Instance = Arc::new(TestInstance { id, values });
        self.rows
            .lock()
            .expect("row store mutex poisoned")
            .push(instance.clone());

        Ok(instance)
    }
}

///
/// TestField
///

struct TestField {
    name: &'static str,
}

impl ModelField for TestField {
    fn name(&self) -> &str {
        self.name
    }

    fn value_from(&self, instance: &dyn ModelInstance) -> Value {
        let Some(instance) = instance.as_any().downcast_ref::<TestInstance>() else {
            return Value::Null;
        };

        if self.name == "id" {
            return Value::Ref(instance.id);
        }

        instance.values.get(self.name).cloned().unwrap_or(Value::Null)
    }
}

///
/// TestInstance
///

#[derive(Debug)]
pub(crate) struct TestInstance {
    id: InstanceId,
    values: Record,
}

impl TestInstance {
    pub fn values(&self) -> &Record {
        &self.values
    }
}

impl ModelInstance for TestInstance {
    fn id(&self) -> InstanceId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
