//! Node-to-node transport for forwarded operations.

use super::invoker::Invoker;
use super::protocol::*;
use crate::cluster::address::Address;
use crate::error::GridError;
use crate::operation::types::{Operation, OperationResult};

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, Weak};

/// Delivers an operation to the node at `target` and returns its outcome.
///
/// Implementations make exactly one attempt. Deadlines are applied by the caller.
#[async_trait]
pub trait OperationTransport: Send + Sync {
    async fn send(&self, target: &Address, op: Operation) -> Result<OperationResult, GridError>;
}

/// JSON over HTTP to the peer's internal operation endpoint.
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperationTransport for HttpTransport {
    async fn send(&self, target: &Address, op: Operation) -> Result<OperationResult, GridError> {
        let url = format!("http://{}{}", target, ENDPOINT_OPERATION);
        let transport_error = |e: reqwest::Error| GridError::Transport {
            target: *target,
            message: e.to_string(),
        };

        let response = self
            .http_client
            .post(url)
            .json(&ForwardOperationRequest { operation: op })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(GridError::Transport {
                target: *target,
                message: format!("HTTP {}", response.status()),
            });
        }

        let body: ForwardOperationResponse = response.json().await.map_err(transport_error)?;
        body.outcome.map_err(GridError::from)
    }
}

/// Routes calls straight to in-process invokers. Lets several nodes share one
/// runtime without sockets.
#[derive(Default)]
pub struct InProcessNetwork {
    nodes: DashMap<Address, Weak<Invoker>>,
}

impl InProcessNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn register(&self, address: Address, invoker: &Arc<Invoker>) {
        self.nodes.insert(address, Arc::downgrade(invoker));
    }

    pub fn unregister(&self, address: &Address) {
        self.nodes.remove(address);
    }
}

#[async_trait]
impl OperationTransport for InProcessNetwork {
    async fn send(&self, target: &Address, op: Operation) -> Result<OperationResult, GridError> {
        let invoker = self
            .nodes
            .get(target)
            .and_then(|node| node.upgrade())
            .ok_or_else(|| GridError::Transport {
                target: *target,
                message: "node unreachable".to_string(),
            })?;

        // an error from the remote side comes back the way it would over HTTP
        invoker
            .execute_forwarded(op)
            .await
            .map_err(|e| GridError::from(e.to_info()))
    }
}
