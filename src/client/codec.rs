//! Client wire codec: bincode frames carrying one request or one response.

use crate::error::{ErrorInfo, GridError};
use crate::operation::types::Verb;
use crate::serialization::Data;

use serde::{Deserialize, Serialize};

/// A client call. Opaque parameters (such as expiry policies) stay serialized
/// until the request is prepared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRequest {
    pub correlation_id: u64,
    pub object_name: String,
    pub verb: Verb<Data>,
}

/// Exactly one of `value` and `error` is set. `value` is the serialized
/// `OperationResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientResponse {
    pub correlation_id: u64,
    pub value: Option<Data>,
    pub error: Option<ErrorInfo>,
}

pub fn encode_request(request: &ClientRequest) -> Result<Vec<u8>, GridError> {
    bincode::serialize(request).map_err(|e| GridError::decode("request", e))
}

pub fn decode_request(bytes: &[u8]) -> Result<ClientRequest, GridError> {
    bincode::deserialize(bytes).map_err(|e| GridError::decode("request", e))
}

pub fn encode_response(response: &ClientResponse) -> Result<Vec<u8>, GridError> {
    bincode::serialize(response).map_err(|e| GridError::decode("response", e))
}

pub fn decode_response(bytes: &[u8]) -> Result<ClientResponse, GridError> {
    bincode::deserialize(bytes).map_err(|e| GridError::decode("response", e))
}

/// The correlation id of a frame that may not decode as a whole. The id is the
/// first field, a fixed-width little-endian u64. Returns 0 for short frames.
pub fn peek_correlation_id(bytes: &[u8]) -> u64 {
    bytes
        .get(..8)
        .and_then(|prefix| <[u8; 8]>::try_from(prefix).ok())
        .map(u64::from_le_bytes)
        .unwrap_or(0)
}
