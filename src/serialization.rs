//! Value Serialization
//!
//! Payload values travel through the core as opaque [`Data`] blobs. The core only
//! looks inside a blob when an operation needs a typed parameter (an expiry
//! policy, a permit count in a response); [`Serializer`] does that conversion.

use crate::error::GridError;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// An opaque, already-serialized value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Data(pub Vec<u8>);

impl Data {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Data {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for Data {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

/// `toData` / `toObject` for typed payload fields, backed by bincode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer;

impl Serializer {
    pub fn to_data<T: Serialize>(&self, value: &T) -> Result<Data, GridError> {
        bincode::serialize(value)
            .map(Data)
            .map_err(|e| GridError::decode("value", e))
    }

    pub fn to_object<T: DeserializeOwned>(
        &self,
        field: &'static str,
        data: &Data,
    ) -> Result<T, GridError> {
        bincode::deserialize(data.as_bytes()).map_err(|e| GridError::decode(field, e))
    }
}
