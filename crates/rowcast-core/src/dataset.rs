use crate::{
    model::{Instance, Model},
    types::IdSet,
};
use std::fmt;

///
/// Source
///
/// Where a dataset's elements come from.
///

pub enum Source {
    /// Exactly one instance.
    One(Instance),
    /// An explicit collection, as given. No copying, no element validation.
    Collection(Vec<Instance>),
    /// Every instance of the model, fetched from the collaborator at
    /// iteration time.
    All,
}

///
/// Dataset
///
/// Lazy, restartable sequence of model instances. The `All` source defers
/// to the collaborator on every iteration, so two walks may observe
/// different backing data if the store changed in between; that is the
/// lazy-sequence contract, not a defect.
///
/// The only mutation is exclusion, which narrows the sequence by identity.
///

pub struct Dataset {
    source: Source,
    excluded: IdSet,
}

impl Dataset {
    #[must_use]
    pub const fn one(instance: Instance) -> Self {
        Self {
            source: Source::One(instance),
            excluded: IdSet::new(),
        }
    }

    #[must_use]
    pub const fn collection(instances: Vec<Instance>) -> Self {
        Self {
            source: Source::Collection(instances),
            excluded: IdSet::new(),
        }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            source: Source::All,
            excluded: IdSet::new(),
        }
    }

    #[must_use]
    pub const fn source(&self) -> &Source {
        &self.source
    }

    #[must_use]
    pub const fn excluded(&self) -> &IdSet {
        &self.excluded
    }

    /// Narrow the dataset by identity. Exclusions accumulate.
    pub fn exclude(&mut self, ids: &IdSet) {
        self.excluded.union_with(ids);
    }

    ///
    /// iter
    ///
    /// Walk the dataset in source order, skipping excluded identities.
    /// `model` is only consulted for the `All` source.
    ///
    pub fn iter<'a>(&'a self, model: &'a dyn Model) -> Box<dyn Iterator<Item = Instance> + 'a> {
        let base: Box<dyn Iterator<Item = Instance> + 'a> = match &self.source {
            Source::One(instance) => Box::new(std::iter::once(instance.clone())),
            Source::Collection(instances) => Box::new(instances.iter().cloned()),
            Source::All => model.all_instances(),
        };

        if self.excluded.is_empty() {
            base
        } else {
            let excluded = &self.excluded;
            Box::new(base.filter(move |instance| !excluded.contains(&instance.id())))
        }
    }
}

impl From<Instance> for Dataset {
    fn from(instance: Instance) -> Self {
        Self::one(instance)
    }
}

impl From<Vec<Instance>> for Dataset {
    fn from(instances: Vec<Instance>) -> Self {
        Self::collection(instances)
    }
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            Source::One(_) => "one".to_string(),
            Source::Collection(instances) => format!("collection[{}]", instances.len()),
            Source::All => "all".to_string(),
        };

        f.debug_struct("Dataset")
            .field("source", &source)
            .field("excluded", &self.excluded.len())
            .finish()
    }
}
