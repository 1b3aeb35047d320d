//! Network Protocol Definitions
//!
//! DTOs and endpoint paths for the node's HTTP surface: the internal endpoint
//! peers use to forward operations, and the client endpoint that accepts
//! encoded client messages.

use crate::error::ErrorInfo;
use crate::operation::types::{Operation, OperationResult};
use serde::{Deserialize, Serialize};

pub const ENDPOINT_OPERATION: &str = "/internal/operation";
pub const ENDPOINT_CLIENT: &str = "/client";
pub const ENDPOINT_HEALTH: &str = "/health";

#[derive(Debug, Serialize, Deserialize)]
pub struct ForwardOperationRequest {
    pub operation: Operation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ForwardOperationResponse {
    pub outcome: Result<OperationResult, ErrorInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub address: String,
    pub members: usize,
    pub owned_partitions: usize,
}
