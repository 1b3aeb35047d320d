//! Operation Invoker
//!
//! Decides where an operation runs and gets its result back.
//!
//! ## Responsibilities
//! - **Routing**: a partition target goes to the partition's current owner, a
//!   member target to that member. Local targets run on this node's lanes.
//! - **Forwarding**: remote targets are sent through the transport, once, under
//!   the configured call timeout.
//! - **Ownership checks**: a target that is migrating, unknown, or (for forwarded
//!   calls) not owned here fails with a wrong-target error. Nothing is retried;
//!   re-resolving and resubmitting is up to the caller.

use super::lanes::OperationLanes;
use super::transport::OperationTransport;
use crate::cluster::address::Address;
use crate::cluster::partitioner::PartitionTable;
use crate::error::GridError;
use crate::operation::types::*;

use std::sync::Arc;
use std::time::Duration;

enum Route {
    Local,
    Remote(Address),
}

pub struct Invoker {
    partitions: Arc<PartitionTable>,
    lanes: OperationLanes,
    transport: Arc<dyn OperationTransport>,
    call_timeout: Duration,
}

impl Invoker {
    pub fn new(
        partitions: Arc<PartitionTable>,
        lanes: OperationLanes,
        transport: Arc<dyn OperationTransport>,
        call_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            partitions,
            lanes,
            transport,
            call_timeout,
        })
    }

    pub fn partitions(&self) -> &Arc<PartitionTable> {
        &self.partitions
    }

    /// Runs `op` wherever its target lives.
    pub async fn invoke(&self, op: Operation) -> Result<OperationResult, GridError> {
        match self.route(&op.target)? {
            Route::Local => self.lanes.submit(op).await,
            Route::Remote(owner) => {
                tracing::debug!(
                    "Forwarding {} on {} to {}",
                    op.verb.name(),
                    op.target,
                    owner
                );
                self.forward(owner, op).await
            }
        }
    }

    /// Runs an operation a peer forwarded to us. It is never forwarded again: if
    /// this node does not own the target any more, the caller gets a wrong-target
    /// error.
    pub async fn execute_forwarded(&self, op: Operation) -> Result<OperationResult, GridError> {
        match self.route(&op.target)? {
            Route::Local => self.lanes.submit(op).await,
            Route::Remote(owner) => {
                tracing::warn!(
                    "Rejecting forwarded {} on {}: owned by {}",
                    op.verb.name(),
                    op.target,
                    owner
                );
                Err(GridError::wrong_target(
                    op.target,
                    format!("owned by {}", owner),
                ))
            }
        }
    }

    fn route(&self, target: &Target) -> Result<Route, GridError> {
        match *target {
            Target::Partition(partition) => {
                if partition >= self.partitions.num_partitions {
                    return Err(GridError::wrong_target(target, "unknown partition"));
                }
                if self.partitions.is_migrating(partition) {
                    return Err(GridError::wrong_target(target, "partition is migrating"));
                }
                let owner = self
                    .partitions
                    .owner_of(partition)
                    .ok_or_else(|| GridError::wrong_target(target, "partition has no owner"))?;

                if self.partitions.is_local_address(&owner) {
                    Ok(Route::Local)
                } else {
                    Ok(Route::Remote(owner))
                }
            }
            Target::Member(address) => {
                if self.partitions.is_local_address(&address) {
                    Ok(Route::Local)
                } else if self.partitions.is_member(&address) {
                    Ok(Route::Remote(address))
                } else {
                    Err(GridError::wrong_target(target, "not a cluster member"))
                }
            }
        }
    }

    async fn forward(&self, owner: Address, op: Operation) -> Result<OperationResult, GridError> {
        match tokio::time::timeout(self.call_timeout, self.transport.send(&owner, op)).await {
            Ok(result) => result,
            Err(_) => Err(GridError::Timeout {
                target: owner,
                timeout_ms: self.call_timeout.as_millis() as u64,
            }),
        }
    }
}
