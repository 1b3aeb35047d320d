//! Operation Lanes
//!
//! A fixed pool of worker tasks that apply operations to the local containers.
//!
//! ## Responsibilities
//! - **Ordering**: every operation for a given partition lands on the same lane
//!   (`partition % lanes`), and a lane runs one operation at a time. Two operations
//!   on one partition therefore never interleave, which is what makes compound
//!   verbs such as get-and-replace atomic.
//! - **Member-pinned work**: operations targeting this member go to the lane
//!   picked by hashing the object name.
//! - **Replies**: each submission carries a oneshot channel for its result.

use super::containers::ContainerRegistry;
use crate::error::GridError;
use crate::operation::types::*;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

type Reply = oneshot::Sender<Result<OperationResult, GridError>>;

struct Job {
    op: Operation,
    reply: Reply,
}

const LANE_QUEUE_DEPTH: usize = 1024;

pub struct OperationLanes {
    senders: Vec<mpsc::Sender<Job>>,
}

impl OperationLanes {
    /// Spawns `lane_count` workers (at least one) onto the current tokio runtime.
    pub fn start(containers: Arc<ContainerRegistry>, lane_count: usize) -> Self {
        let lane_count = lane_count.max(1);
        let mut senders = Vec::with_capacity(lane_count);

        for lane_id in 0..lane_count {
            let (tx, rx) = mpsc::channel(LANE_QUEUE_DEPTH);
            let containers = containers.clone();
            tokio::spawn(async move {
                lane_loop(lane_id, containers, rx).await;
            });
            senders.push(tx);
        }

        tracing::info!("Started {} operation lanes", lane_count);
        Self { senders }
    }

    pub fn lane_count(&self) -> usize {
        self.senders.len()
    }

    pub fn lane_for(&self, op: &Operation) -> usize {
        let lanes = self.senders.len();
        match op.target {
            Target::Partition(partition) => partition as usize % lanes,
            Target::Member(_) => {
                let mut hasher = DefaultHasher::new();
                op.object_name.hash(&mut hasher);
                (hasher.finish() % lanes as u64) as usize
            }
        }
    }

    /// Queues `op` on its lane and waits for the result.
    pub async fn submit(&self, op: Operation) -> Result<OperationResult, GridError> {
        let lane = self.lane_for(&op);
        let (reply, result) = oneshot::channel();

        self.senders[lane]
            .send(Job { op, reply })
            .await
            .map_err(|_| GridError::Shutdown { lane })?;

        result.await.map_err(|_| GridError::Shutdown { lane })?
    }
}

async fn lane_loop(lane_id: usize, containers: Arc<ContainerRegistry>, mut rx: mpsc::Receiver<Job>) {
    tracing::debug!("Lane {} started", lane_id);

    while let Some(Job { op, reply }) = rx.recv().await {
        let verb = op.verb.name();
        let target = op.target;

        let result = containers.execute(op);
        match &result {
            Ok(_) => tracing::trace!("Lane {} ran {} on {}", lane_id, verb, target),
            Err(e) => tracing::debug!("Lane {} failed {} on {}: {}", lane_id, verb, target, e),
        }

        if reply.send(result).is_err() {
            tracing::trace!("Lane {}: caller went away before {} finished", lane_id, verb);
        }
    }

    tracing::debug!("Lane {} stopped", lane_id);
}
