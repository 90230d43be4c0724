use crate::generator::Generator;
use rowcast_core::{
    model::{FieldRef, Instance, Model, ModelError, ModelField, ModelInstance},
    record::Record,
    types::InstanceId,
    value::Value,
};
use std::{
    any::Any,
    sync::{Arc, Mutex},
};

/// Implicit primary-key field carried by every memory model.
const ID_FIELD: &str = "id";

///
/// MemoryModel
///
/// In-memory model: a declared field catalog (plus the implicit `id`
/// field), a mutex-guarded row store, and a monotonic identity generator.
/// Each `create_instance` call is one atomic insert; there is no
/// transaction discipline across calls.
///

pub struct MemoryModel {
    name: String,
    catalog: Vec<FieldRef>,
    rows: Mutex<Vec<Instance>>,
    generator: Mutex<Generator>,
}

impl MemoryModel {
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, field_names: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog: Vec<FieldRef> = vec![Arc::new(MemoryField {
            name: ID_FIELD.to_string(),
        })];
        catalog.extend(
            field_names
                .into_iter()
                .map(|name| Arc::new(MemoryField { name: name.into() }) as FieldRef),
        );

        Arc::new(Self {
            name: name.into(),
            catalog,
            rows: Mutex::new(Vec::new()),
            generator: Mutex::new(Generator::new()),
        })
    }

    /// Snapshot of the stored instances in insertion order.
    #[must_use]
    pub fn instances(&self) -> Vec<Instance> {
        self.rows.lock().expect("row store mutex poisoned").clone()
    }

    /// Look up one stored instance by identity.
    #[must_use]
    pub fn instance(&self, id: InstanceId) -> Option<Instance> {
        self.rows
            .lock()
            .expect("row store mutex poisoned")
            .iter()
            .find(|instance| instance.id() == id)
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.lock().expect("row store mutex poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Model for MemoryModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Vec<FieldRef> {
        self.catalog.clone()
    }

    fn all_instances(&self) -> Box<dyn Iterator<Item = Instance> + '_> {
        // Snapshot when the iterator is taken; the walk itself holds no lock.
        let snapshot = self.rows.lock().expect("row store mutex poisoned").clone();

        Box::new(snapshot.into_iter())
    }

    fn create_instance(&self, values: Record) -> Result<Instance, ModelError> {
        for (name, _) in values.iter() {
            if !self.catalog.iter().any(|field| field.name() == name) {
                return Err(ModelError::UnknownField {
                    field: name.to_string(),
                    model: self.name.clone(),
                });
            }
        }

        let id = self
            .generator
            .lock()
            .expect("id generator mutex poisoned")
            .generate()
            .map_err(|err| ModelError::CreateRejected {
                model: self.name.clone(),
                message: err.to_string(),
            })?;

        let instance: Instance = Arc::new(MemoryInstance { id, values });
        self.rows
            .lock()
            .expect("row store mutex poisoned")
            .push(instance.clone());

        Ok(instance)
    }
}

///
/// MemoryField
///

struct MemoryField {
    name: String,
}

impl ModelField for MemoryField {
    fn name(&self) -> &str {
        &self.name
    }

    fn value_from(&self, instance: &dyn ModelInstance) -> Value {
        // An instance of another model is a collaborator contract
        // violation; extraction stays total and yields Null.
        let Some(instance) = instance.as_any().downcast_ref::<MemoryInstance>() else {
            return Value::Null;
        };

        if self.name == ID_FIELD {
            return Value::Ref(instance.id);
        }

        instance
            .values
            .get(&self.name)
            .cloned()
            .unwrap_or(Value::Null)
    }
}

///
/// MemoryInstance
///

#[derive(Debug)]
pub struct MemoryInstance {
    id: InstanceId,
    values: Record,
}

impl MemoryInstance {
    /// Stored field values, excluding the implicit `id`.
    #[must_use]
    pub const fn values(&self) -> &Record {
        &self.values
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

impl ModelInstance for MemoryInstance {
    fn id(&self) -> InstanceId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcast_core::record;

    #[test]
    fn catalog_carries_the_implicit_id_field() {
        let model = MemoryModel::new("Basic", ["name"]);

        let names: Vec<_> = model.fields().iter().map(|f| f.name().to_string()).collect();
        assert_eq!(names, vec!["id", "name"]);
    }

    #[test]
    fn create_assigns_monotonic_identities() {
        let model = MemoryModel::new("Basic", ["name"]);

        let a = model.create_instance(record! { "name" => "a" }).unwrap();
        let b = model.create_instance(record! { "name" => "b" }).unwrap();

        assert!(a.id() < b.id(), "identities must follow insertion order");
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn create_rejects_fields_outside_the_catalog() {
        let model = MemoryModel::new("Basic", ["name"]);

        let err = model
            .create_instance(record! { "bogus" => "x" })
            .unwrap_err();

        assert!(matches!(err, ModelError::UnknownField { ref field, .. } if field == "bogus"));
        assert!(model.is_empty());
    }

    #[test]
    fn id_field_extracts_the_identity() {
        let model = MemoryModel::new("Basic", ["name"]);
        let instance = model.create_instance(record! { "name" => "a" }).unwrap();

        let id_field = model
            .fields()
            .into_iter()
            .find(|f| f.name() == "id")
            .unwrap();
        let name_field = model
            .fields()
            .into_iter()
            .find(|f| f.name() == "name")
            .unwrap();

        assert_eq!(id_field.value_from(instance.as_ref()), Value::Ref(instance.id()));
        assert_eq!(
            name_field.value_from(instance.as_ref()),
            Value::Text("a".to_string())
        );
    }

    #[test]
    fn missing_declared_field_extracts_null() {
        let model = MemoryModel::new("Basic", ["name", "size"]);
        let instance = model.create_instance(record! { "name" => "a" }).unwrap();

        let size_field = model
            .fields()
            .into_iter()
            .find(|f| f.name() == "size")
            .unwrap();

        assert_eq!(size_field.value_from(instance.as_ref()), Value::Null);
    }
}
