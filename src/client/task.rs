use super::codec::{self, ClientRequest, ClientResponse};
use crate::error::GridError;
use crate::node::invoker::Invoker;
use crate::operation::catalog::OperationCatalog;
use crate::operation::types::{Operation, OperationResult, Verb};
use crate::serialization::Serializer;

use std::sync::Arc;

/// One client request on its way through the core: decoded parameters, then an
/// operation, then an encoded response. Consumed by [`RequestTask::prepare`], so
/// it serves exactly one request.
#[derive(Debug)]
pub struct RequestTask {
    request: ClientRequest,
}

impl RequestTask {
    pub fn decode(bytes: &[u8]) -> Result<Self, GridError> {
        Ok(Self {
            request: codec::decode_request(bytes)?,
        })
    }

    pub fn correlation_id(&self) -> u64 {
        self.request.correlation_id
    }

    /// The object the request acts on. Handle verbs act on the scheduler named
    /// in the handle.
    pub fn distributed_object_name(&self) -> &str {
        match self.handle_scheduler() {
            Some(scheduler) => scheduler,
            None => &self.request.object_name,
        }
    }

    fn handle_scheduler(&self) -> Option<&str> {
        match &self.request.verb {
            Verb::ScheduledExecutor(verb) => verb.handle().map(|handle| handle.scheduler_name()),
            _ => None,
        }
    }

    /// Resolves opaque parameters and builds the routed operation. A handle
    /// verb must name the same scheduler as its handle.
    pub fn prepare(
        self,
        catalog: &OperationCatalog,
        serializer: &Serializer,
    ) -> Result<Operation, GridError> {
        if let Some(scheduler) = self.handle_scheduler() {
            if scheduler != self.request.object_name {
                return Err(GridError::invalid_argument(
                    "object_name",
                    format!(
                        "request names '{}' but the handle belongs to scheduler '{}'",
                        self.request.object_name, scheduler
                    ),
                ));
            }
        }

        let ClientRequest {
            object_name, verb, ..
        } = self.request;
        let verb = verb.resolve(serializer)?;
        catalog.build(&object_name, verb)
    }

    /// Encodes a result or an error as a response frame.
    pub fn encode(
        correlation_id: u64,
        outcome: Result<OperationResult, GridError>,
        serializer: &Serializer,
    ) -> Vec<u8> {
        let response = match outcome.and_then(|result| serializer.to_data(&result)) {
            Ok(value) => ClientResponse {
                correlation_id,
                value: Some(value),
                error: None,
            },
            Err(e) => ClientResponse {
                correlation_id,
                value: None,
                error: Some(e.to_info()),
            },
        };

        codec::encode_response(&response).unwrap_or_else(|e| {
            tracing::error!("Failed to encode response {}: {}", correlation_id, e);
            Vec::new()
        })
    }
}

/// Serves encoded client requests on one node.
pub struct ClientEndpoint {
    catalog: Arc<OperationCatalog>,
    invoker: Arc<Invoker>,
    serializer: Serializer,
}

impl ClientEndpoint {
    pub fn new(catalog: Arc<OperationCatalog>, invoker: Arc<Invoker>) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            invoker,
            serializer: Serializer,
        })
    }

    /// Answers one frame. Every failure is reported inside the response.
    pub async fn handle(&self, bytes: &[u8]) -> Vec<u8> {
        let (correlation_id, outcome) = match RequestTask::decode(bytes) {
            Ok(task) => (task.correlation_id(), self.dispatch(task).await),
            Err(e) => {
                tracing::warn!("Rejected undecodable client frame ({} bytes): {}", bytes.len(), e);
                (codec::peek_correlation_id(bytes), Err(e))
            }
        };

        RequestTask::encode(correlation_id, outcome, &self.serializer)
    }

    async fn dispatch(&self, task: RequestTask) -> Result<OperationResult, GridError> {
        tracing::debug!(
            "Client request {} for '{}'",
            task.correlation_id(),
            task.distributed_object_name()
        );

        let op = task.prepare(&self.catalog, &self.serializer)?;
        self.invoker.invoke(op).await
    }
}
