//! Node Runtime Module
//!
//! Everything one grid node runs: the containers holding its state, the lanes
//! applying operations to them, the invoker routing operations across the
//! cluster, and the HTTP surface.
//!
//! ## Submodules
//! - **`containers`**: per-partition caches and semaphores, scheduler stores.
//! - **`lanes`**: the worker pool; one lane per partition group.
//! - **`invoker`**: local-or-forward routing with ownership checks.
//! - **`transport`**: how forwarded operations reach a peer (HTTP or in-process).
//! - **`protocol`** / **`handlers`**: HTTP endpoints and their DTOs.

pub mod containers;
pub mod handlers;
pub mod invoker;
pub mod lanes;
pub mod protocol;
pub mod transport;


use crate::cache::record_store::{Clock, system_clock};
use crate::client::task::ClientEndpoint;
use crate::cluster::partitioner::PartitionTable;
use crate::config::NodeConfig;
use crate::events::CompletionSink;
use crate::operation::catalog::OperationCatalog;

use containers::ContainerRegistry;
use invoker::Invoker;
use lanes::OperationLanes;
use transport::OperationTransport;

use axum::Router;
use std::sync::Arc;

/// A fully wired node. Must be started inside a tokio runtime.
pub struct Node {
    pub partitions: Arc<PartitionTable>,
    pub containers: Arc<ContainerRegistry>,
    pub catalog: Arc<OperationCatalog>,
    pub invoker: Arc<Invoker>,
    pub client: Arc<ClientEndpoint>,
}

impl Node {
    pub fn start(
        config: &NodeConfig,
        transport: Arc<dyn OperationTransport>,
        sink: Arc<dyn CompletionSink>,
    ) -> Self {
        Self::start_with_clock(config, transport, sink, system_clock())
    }

    pub fn start_with_clock(
        config: &NodeConfig,
        transport: Arc<dyn OperationTransport>,
        sink: Arc<dyn CompletionSink>,
        clock: Clock,
    ) -> Self {
        let partitions = PartitionTable::new(config.bind, config.members.clone(), config.partitions);
        let containers = ContainerRegistry::new(sink, clock);
        let lanes = OperationLanes::start(containers.clone(), config.lanes);
        let invoker = Invoker::new(partitions.clone(), lanes, transport, config.call_timeout());
        let catalog = Arc::new(OperationCatalog::standard(partitions.clone()));
        let client = ClientEndpoint::new(catalog.clone(), invoker.clone());

        tracing::info!(
            "Node {} ready: owns {} of {} partitions",
            config.bind,
            partitions.my_partitions().len(),
            partitions.num_partitions
        );

        Self {
            partitions,
            containers,
            catalog,
            invoker,
            client,
        }
    }

    pub fn router(&self) -> Router {
        handlers::router(self.invoker.clone(), self.client.clone())
    }
}
