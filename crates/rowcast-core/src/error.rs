use crate::{
    model::ModelError,
    schema::SchemaError,
    serializer::{DispatchError, ValidationError},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Top-level engine error. Every failure is raised synchronously to the
/// immediate caller; the engine performs no internal retries.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Stable classification for logging and caller policy.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Schema(_) => ErrorClass::Config,
            Self::Dispatch(_) => ErrorClass::Caller,
            Self::Validation(_) => ErrorClass::Validation,
            Self::Model(_) => ErrorClass::Collaborator,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
///
/// - `Config` is permanent (a programming defect at declaration time).
/// - `Caller` and `Validation` are caller-correctable.
/// - `Collaborator` failures originate in the model layer.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Caller,
    Collaborator,
    Config,
    Validation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Caller => "caller",
            Self::Collaborator => "collaborator",
            Self::Config => "config",
            Self::Validation => "validation",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_track_the_taxonomy() {
        let err = Error::from(DispatchError::Serialization {
            mode: "bogus".to_string(),
        });

        assert_eq!(err.class(), ErrorClass::Caller);
        assert_eq!(
            err.display_with_class(),
            "caller: invalid serialization mode: 'bogus'"
        );
    }
}
