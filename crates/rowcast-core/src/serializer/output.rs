use crate::{
    obs::{self, EngineEvent},
    record::Record,
    serializer::{DispatchError, Serializer},
    value::Value,
};
use serde::Serialize;
use std::{fmt, str::FromStr};

///
/// SerializeMode
///
/// Closed set of output modes. Mode strings arriving from callers are
/// parsed here; dispatch below is an exhaustive match, never name probing.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SerializeMode {
    Normal,
    Split,
}

impl SerializeMode {
    /// Parse a caller-supplied mode name.
    pub fn parse(mode: &str) -> Result<Self, DispatchError> {
        match mode {
            "normal" => Ok(Self::Normal),
            "split" => Ok(Self::Split),
            other => Err(DispatchError::Serialization {
                mode: other.to_string(),
            }),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Split => "split",
        }
    }
}

impl fmt::Display for SerializeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SerializeMode {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

///
/// SplitOutput
///
/// Columnar-metadata-once encoding: the ordered field-name list appears
/// exactly once, rows carry positional values only.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SplitOutput {
    pub model: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

///
/// Output
///
/// Aggregate result of one serialize call. Serde shapes are part of the
/// compatibility contract: `Normal` is a sequence of field-name maps,
/// `Split` is `{"model": [...], "data": [[...], ...]}`.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Normal(Vec<Record>),
    Split(SplitOutput),
}

impl Output {
    /// Number of dataset elements represented.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Normal(rows) => rows.len(),
            Self::Split(split) => split.data.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn as_normal(&self) -> Option<&Vec<Record>> {
        match self {
            Self::Normal(rows) => Some(rows),
            Self::Split(_) => None,
        }
    }

    #[must_use]
    pub const fn as_split(&self) -> Option<&SplitOutput> {
        match self {
            Self::Split(split) => Some(split),
            Self::Normal(_) => None,
        }
    }
}

impl Serializer {
    ///
    /// serialize_as
    ///
    /// Typed entry point for the serialization pipeline. Both modes share
    /// the per-instance extraction primitive and are pure with respect to
    /// the dataset: repeated calls over an unchanged dataset produce
    /// identical output.
    ///
    #[must_use]
    pub fn serialize_as(&self, mode: SerializeMode) -> Output {
        let model = self.schema().model_name().to_string();
        obs::record(EngineEvent::SerializeStart { model: &model, mode });

        let output = match mode {
            SerializeMode::Normal => Output::Normal(self.normal_rows()),
            SerializeMode::Split => Output::Split(self.split_rows()),
        };

        obs::record(EngineEvent::SerializeFinish {
            model: &model,
            mode,
            rows: output.len() as u64,
        });

        output
    }

    /// One record per dataset element, fields in schema order.
    fn normal_rows(&self) -> Vec<Record> {
        self.instances()
            .map(|instance| {
                let mut record = Record::with_capacity(self.schema().len());

                for (descriptor, value) in self
                    .schema()
                    .descriptors()
                    .iter()
                    .zip(self.extract_fields(instance.as_ref()))
                {
                    record.insert(descriptor.name(), value);
                }

                record
            })
            .collect()
    }

    /// Field names once, positional rows in schema order.
    fn split_rows(&self) -> SplitOutput {
        let model = self
            .schema()
            .field_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let data = self
            .instances()
            .map(|instance| self.extract_fields(instance.as_ref()))
            .collect();

        SplitOutput { model, data }
    }
}
