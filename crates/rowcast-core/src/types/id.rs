use derive_more::{Deref, DerefMut, Display, FromStr};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error as ThisError;
use ulid::Ulid;

///
/// InstanceIdError
///

#[derive(Debug, ThisError)]
pub enum InstanceIdError {
    #[error("invalid instance id string")]
    InvalidString,

    #[error("monotonic error - overflow")]
    GeneratorOverflow,
}

///
/// InstanceId
///
/// Identity of one persisted model instance, assigned by the model
/// collaborator. ULID-backed so identities are totally ordered and
/// printable as canonical 26-character strings.
///

#[derive(
    Clone, Copy, Debug, Deref, DerefMut, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd,
)]
#[repr(transparent)]
pub struct InstanceId(Ulid);

impl InstanceId {
    pub const MIN: Self = Self::from_bytes([0x00; 16]);
    pub const MAX: Self = Self::from_bytes([0xFF; 16]);

    #[must_use]
    pub const fn nil() -> Self {
        Self(Ulid::nil())
    }

    #[must_use]
    pub const fn from_parts(timestamp_ms: u64, random: u128) -> Self {
        Self(Ulid::from_parts(timestamp_ms, random))
    }

    /// from_bytes
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Ulid::from_bytes(bytes))
    }

    /// from_u128
    #[must_use]
    pub const fn from_u128(n: u128) -> Self {
        Self(Ulid::from_bytes(n.to_be_bytes()))
    }

    #[must_use]
    /// Monotonic increment; returns `None` on overflow.
    pub fn increment(&self) -> Option<Self> {
        self.0.increment().map(Self)
    }

    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.0.0 == 0
    }

    /// try_from_str
    /// Parse a canonical ULID string, normalizing the error type.
    pub fn try_from_str(encoded: &str) -> Result<Self, InstanceIdError> {
        let inner = Ulid::from_string(encoded).map_err(|_| InstanceIdError::InvalidString)?;

        Ok(Self(inner))
    }
}

impl Serialize for InstanceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for InstanceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;

        Self::try_from_str(&encoded).map_err(serde::de::Error::custom)
    }
}
