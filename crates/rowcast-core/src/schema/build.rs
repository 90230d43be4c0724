use crate::{
    model::ModelRef,
    schema::{FieldDescriptor, Representation, Schema, SchemaError},
    serializer::Serializer,
    value::Value,
};
use std::sync::Arc;

///
/// SchemaBuilder
///
/// Explicit, declaration-time schema configuration: an ordered field list
/// plus optional representation-hook and relation bindings keyed by field
/// name. `resolve` compiles the configuration against the model's field
/// catalog exactly once; the resulting [`Schema`] is immutable.
///

pub struct SchemaBuilder {
    model: ModelRef,
    fields: Vec<String>,
    representations: Vec<(String, Representation)>,
    relations: Vec<(String, Arc<Schema>)>,
}

impl SchemaBuilder {
    #[must_use]
    pub const fn new(model: ModelRef) -> Self {
        Self {
            model,
            fields: Vec::new(),
            representations: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Declare a field. Declaration order defines column order.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Declare several fields at once, preserving order.
    #[must_use]
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Bind a representation hook to a declared field.
    #[must_use]
    pub fn representation<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&Serializer, Value) -> Value + Send + Sync + 'static,
    {
        self.representations.push((name.into(), Arc::new(hook)));
        self
    }

    /// Bind a related schema to a declared field.
    #[must_use]
    pub fn relation(mut self, name: impl Into<String>, related: Arc<Schema>) -> Self {
        self.relations.push((name.into(), related));
        self
    }

    ///
    /// resolve
    ///
    /// Compile the declared configuration into an immutable [`Schema`].
    ///
    /// Pure: identical inputs produce a structurally identical schema, and
    /// the model catalog is read, never mutated. Every failure is a
    /// permanent configuration defect.
    ///
    pub fn resolve(self) -> Result<Arc<Schema>, SchemaError> {
        let model_name = self.model.model_name().to_string();

        // duplicate declarations
        for (index, name) in self.fields.iter().enumerate() {
            if self.fields[..index].contains(name) {
                return Err(SchemaError::DuplicateField {
                    field: name.clone(),
                    model: model_name,
                });
            }
        }

        // bindings must name declared fields
        for (name, _) in &self.representations {
            if !self.fields.contains(name) {
                return Err(SchemaError::UnboundBinding {
                    binding: "representation",
                    field: name.clone(),
                    model: model_name,
                });
            }
        }
        for (name, _) in &self.relations {
            if !self.fields.contains(name) {
                return Err(SchemaError::UnboundBinding {
                    binding: "relation",
                    field: name.clone(),
                    model: model_name,
                });
            }
        }

        let catalog = self.model.fields();
        let mut representations = self.representations;
        let mut relations = self.relations;
        let mut descriptors = Vec::with_capacity(self.fields.len());

        for name in self.fields {
            let field = catalog
                .iter()
                .find(|f| f.name() == name)
                .cloned()
                .ok_or_else(|| SchemaError::UnknownField {
                    field: name.clone(),
                    model: model_name.clone(),
                })?;

            let representation = take_binding(&mut representations, &name);
            let related = take_binding(&mut relations, &name);

            descriptors.push(FieldDescriptor::new(name, field, representation, related));
        }

        Ok(Arc::new(Schema::new(self.model, descriptors)))
    }
}

/// Remove and return the binding for `name`, if one was declared.
fn take_binding<T>(bindings: &mut Vec<(String, T)>, name: &str) -> Option<T> {
    let index = bindings.iter().position(|(bound, _)| bound == name)?;

    Some(bindings.swap_remove(index).1)
}
