use crate::types::InstanceId;
use serde::{Deserialize, Deserializer, Serialize};

///
/// IdSet
///
/// Canonical set of instance identities.
///
/// - Ordering is canonical (ascending by identity) and does NOT reflect
///   insertion history.
/// - This type represents *identity only*; membership does not imply the
///   instance still exists in the collaborator.
///

#[repr(transparent)]
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct IdSet(Vec<InstanceId>);

impl<'de> Deserialize<'de> for IdSet {
    /// Normalize on the way in: deserialized input is deduplicated and
    /// re-sorted into canonical order.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ids = Vec::<InstanceId>::deserialize(deserializer)?;

        Ok(Self::from_ids(ids))
    }
}

impl IdSet {
    /// Create an empty identity set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build an identity set, discarding duplicate identities.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = InstanceId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Return the number of identities in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return an iterator over the identities in ascending order.
    pub fn iter(&self) -> std::slice::Iter<'_, InstanceId> {
        self.0.iter()
    }

    /// Insert an identity, returning `true` if it was newly inserted.
    pub fn insert(&mut self, id: InstanceId) -> bool {
        match self.0.binary_search(&id) {
            Ok(_) => false,
            Err(index) => {
                self.0.insert(index, id);
                true
            }
        }
    }

    /// Remove an identity, returning `true` if it was present.
    pub fn remove(&mut self, id: &InstanceId) -> bool {
        match self.0.binary_search(id) {
            Ok(index) => {
                self.0.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Membership test by binary search.
    #[must_use]
    pub fn contains(&self, id: &InstanceId) -> bool {
        self.0.binary_search(id).is_ok()
    }

    /// Union the other set into this one.
    pub fn union_with(&mut self, other: &Self) {
        for id in other.iter() {
            self.insert(*id);
        }
    }
}

impl FromIterator<InstanceId> for IdSet {
    fn from_iter<I: IntoIterator<Item = InstanceId>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}

impl IntoIterator for IdSet {
    type Item = InstanceId;
    type IntoIter = std::vec::IntoIter<InstanceId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a IdSet {
    type Item = &'a InstanceId;
    type IntoIter = std::slice::Iter<'a, InstanceId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
