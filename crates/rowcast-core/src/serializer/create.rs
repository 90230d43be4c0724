use crate::{
    error::Error,
    model::Instance,
    obs::{self, EngineEvent},
    record::Record,
    schema::Schema,
    serializer::{DispatchError, Serializer},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

/// Section name carrying the field-name list in split payloads.
pub const MODEL: &str = "model";
/// Section name carrying the positional rows in split payloads.
pub const DATA: &str = "data";

///
/// CreateMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CreateMode {
    Normal,
    Split,
}

impl CreateMode {
    /// Parse a caller-supplied mode name.
    pub fn parse(mode: &str) -> Result<Self, DispatchError> {
        match mode {
            "normal" => Ok(Self::Normal),
            "split" => Ok(Self::Split),
            other => Err(DispatchError::Creation {
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

impl fmt::Display for CreateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreateMode {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

///
/// ValidationError
///
/// Malformed creation payload. Always raised before the offending unit of
/// work persists anything; rows persisted by earlier units of a batch
/// remain (creation is not transactional).
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ValidationError {
    #[error("'{DATA}' must be an iterable of rows")]
    DataNotRows,

    #[error("'{MODEL}' field list must equal schema fields: expected {expected:?}, found {found:?}")]
    FieldListMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("keys must match schema fields: expected {expected:?}, found {found:?}")]
    KeysMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("'{section}' section must be present")]
    MissingSection { section: &'static str },

    #[error("value for relation field '{field}' must be a record")]
    RelationPayload { field: String },

    #[error("row {row} has {found} values, schema expects {expected}")]
    RowArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("'{section}' section must be a list of field names")]
    SectionShape { section: &'static str },

    #[error("payload shape does not match '{mode}' creation mode")]
    ShapeMismatch { mode: CreateMode },
}

///
/// SplitPayload
///
/// Columnar creation input: the ordered field-name list plus positional
/// rows, mirroring [`super::SplitOutput`] so a split serialization feeds
/// straight back into a split creation.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SplitPayload {
    pub model: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl SplitPayload {
    ///
    /// from_record
    ///
    /// Decode a loose record-shaped payload (`{"model": [...], "data":
    /// [[...], ...]}`) into a typed split payload, rejecting missing or
    /// malformed sections before anything is persisted.
    ///
    pub fn from_record(record: &Record) -> Result<Self, ValidationError> {
        let model = record
            .get(MODEL)
            .ok_or(ValidationError::MissingSection { section: MODEL })?;
        let Value::List(names) = model else {
            return Err(ValidationError::SectionShape { section: MODEL });
        };
        let model = names
            .iter()
            .map(|name| {
                name.as_text()
                    .map(str::to_string)
                    .ok_or(ValidationError::SectionShape { section: MODEL })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let data = record
            .get(DATA)
            .ok_or(ValidationError::MissingSection { section: DATA })?;
        let Value::List(rows) = data else {
            return Err(ValidationError::DataNotRows);
        };
        let data = rows
            .iter()
            .map(|row| match row {
                Value::List(values) => Ok(values.clone()),
                _ => Err(ValidationError::DataNotRows),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { model, data })
    }
}

///
/// Payload
///
/// Closed set of creation input shapes. Which shapes a mode accepts is
/// decided by the pipeline; a shape the mode cannot use fails validation
/// instead of being silently ignored.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// One field-name → value mapping.
    Record(Record),
    /// A sequence of mappings, persisted fail-fast in order.
    Batch(Vec<Record>),
    /// Columnar field-name list plus positional rows.
    Split(SplitPayload),
}

impl From<Record> for Payload {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl From<Vec<Record>> for Payload {
    fn from(records: Vec<Record>) -> Self {
        Self::Batch(records)
    }
}

impl From<SplitPayload> for Payload {
    fn from(payload: SplitPayload) -> Self {
        Self::Split(payload)
    }
}

impl Serializer {
    ///
    /// create_as
    ///
    /// Typed entry point for the creation pipeline. Returns the persisted
    /// outer instances in creation order.
    ///
    /// Multi-row input is fail-fast and non-atomic: rows persisted before
    /// a failure remain persisted. Callers needing atomicity wrap the call
    /// in their own transaction boundary.
    ///
    pub fn create_as(&self, payload: Payload, mode: CreateMode) -> Result<Vec<Instance>, Error> {
        let model = self.schema().model_name().to_string();
        obs::record(EngineEvent::CreateStart {
            model: &model,
            mode,
        });

        let result = self.dispatch_create(payload, mode);

        match &result {
            Ok(created) => obs::record(EngineEvent::CreateFinish {
                model: &model,
                mode,
                rows_persisted: created.len() as u64,
            }),
            Err(Error::Validation(_)) => {
                obs::record(EngineEvent::ValidationRejected { model: &model });
            }
            Err(_) => {}
        }

        result
    }

    fn dispatch_create(&self, payload: Payload, mode: CreateMode) -> Result<Vec<Instance>, Error> {
        match (mode, payload) {
            (CreateMode::Normal, Payload::Record(record)) => {
                Ok(vec![self.create_single(&record)?])
            }
            (CreateMode::Normal, Payload::Batch(records)) => {
                let mut created = Vec::with_capacity(records.len());

                // Batch semantics: fail-fast and non-atomic; partial
                // successes remain.
                for record in &records {
                    created.push(self.create_single(record)?);
                }

                Ok(created)
            }
            (CreateMode::Split, Payload::Split(payload)) => self.create_split(&payload),
            (CreateMode::Split, Payload::Record(record)) => {
                let payload = SplitPayload::from_record(&record)?;

                self.create_split(&payload)
            }
            (mode, _) => Err(ValidationError::ShapeMismatch { mode }.into()),
        }
    }

    ///
    /// create_single
    ///
    /// Validate one mapping against the schema and persist it, delegating
    /// relation fields to their related schema first. Payload values pass
    /// through verbatim apart from relation substitution; representation
    /// hooks never run here.
    ///
    fn create_single(&self, record: &Record) -> Result<Instance, Error> {
        validate_keys(self.schema(), record)?;

        let mut values = Record::with_capacity(record.len());

        for descriptor in self.schema().descriptors() {
            let value = record
                .get(descriptor.name())
                .cloned()
                .unwrap_or(Value::Null);

            let value = match descriptor.related() {
                Some(related) => self.create_related(descriptor.name(), related, value)?,
                None => value,
            };

            values.insert(descriptor.name(), value);
        }

        let instance = self.schema().model().create_instance(values)?;
        obs::record(EngineEvent::RowPersisted {
            model: self.schema().model_name(),
        });

        Ok(instance)
    }

    ///
    /// create_related
    ///
    /// Construct the related instance for one relation field and
    /// substitute its reference. Exactly one level of delegation: the
    /// related record's values pass to the related model verbatim.
    ///
    fn create_related(
        &self,
        field: &str,
        related: &Schema,
        value: Value,
    ) -> Result<Value, Error> {
        let Value::Record(record) = value else {
            return Err(ValidationError::RelationPayload {
                field: field.to_string(),
            }
            .into());
        };

        validate_keys(related, &record)?;

        let instance = related.model().create_instance(record)?;
        obs::record(EngineEvent::RowPersisted {
            model: related.model_name(),
        });

        Ok(Value::Ref(instance.id()))
    }

    ///
    /// create_split
    ///
    /// Positional creation: the payload's field-name list must equal the
    /// schema's, order-sensitive, and every row must carry exactly one
    /// value per field. Rows persist in order, fail-fast.
    ///
    fn create_split(&self, payload: &SplitPayload) -> Result<Vec<Instance>, Error> {
        let expected = self.schema().field_names();

        if payload.model.len() != expected.len()
            || payload
                .model
                .iter()
                .zip(&expected)
                .any(|(found, want)| found != want)
        {
            return Err(ValidationError::FieldListMismatch {
                expected: expected.iter().map(ToString::to_string).collect(),
                found: payload.model.clone(),
            }
            .into());
        }

        let width = expected.len();
        let mut created = Vec::with_capacity(payload.data.len());

        for (index, row) in payload.data.iter().enumerate() {
            if row.len() != width {
                return Err(ValidationError::RowArity {
                    row: index,
                    expected: width,
                    found: row.len(),
                }
                .into());
            }

            let mut values = Record::with_capacity(width);
            for (name, value) in expected.iter().zip(row) {
                values.insert(*name, value.clone());
            }

            let instance = self.schema().model().create_instance(values)?;
            obs::record(EngineEvent::RowPersisted {
                model: self.schema().model_name(),
            });
            created.push(instance);
        }

        Ok(created)
    }
}

/// Key-set equality against the schema, order-insensitive: record keys are
/// unique by construction, so equal lengths plus full coverage is set
/// equality.
fn validate_keys(schema: &Schema, record: &Record) -> Result<(), ValidationError> {
    let expected = schema.field_names();

    let matches = record.len() == expected.len()
        && expected.iter().all(|name| record.contains_key(name));

    if matches {
        Ok(())
    } else {
        Err(ValidationError::KeysMismatch {
            expected: expected.iter().map(ToString::to_string).collect(),
            found: record.keys().map(str::to_string).collect(),
        })
    }
}
