use crate::value::Value;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use std::fmt;

///
/// Record
///
/// Insertion-ordered mapping from field name to [`Value`].
///
/// Backed by a plain vector with linear lookup; schemas stay small enough
/// that a hash map buys nothing and would lose declaration order. Inserting
/// an existing name replaces the value in place, so names are unique and
/// position reflects first insertion.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record(Vec<(String, Value)>);

impl Record {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert a value, replacing in place if the name is already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();

        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    // get
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.iter().any(|(existing, _)| existing == name)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of field names to values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut record = Record::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    record.insert(name, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

///
/// record
///
/// Build a [`Record`] from `name => value` pairs in declaration order.
///
#[macro_export]
macro_rules! record {
    () => { $crate::record::Record::new() };
    ( $( $name:expr => $value:expr ),+ $(,)? ) => {{
        let mut record = $crate::record::Record::new();
        $( record.insert($name, $value); )+
        record
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_preserved() {
        let record = record! { "b" => 1_i64, "a" => 2_i64 };

        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["b", "a"], "record must keep insertion order");
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut record = record! { "a" => 1_i64, "b" => 2_i64 };
        record.insert("a", 9_i64);

        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["a", "b"], "replacing must not move the entry");
        assert_eq!(record.get("a"), Some(&Value::Int(9)));
    }

    #[test]
    fn serializes_as_ordered_map() {
        let record = record! { "z" => "last", "a" => "first" };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"z":"last","a":"first"}"#);
    }

    #[test]
    fn deserializes_preserving_source_order() {
        let record: Record = serde_json::from_str(r#"{"z":1,"a":2}"#).unwrap();

        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
