//! Container Registry
//!
//! Holds every piece of partitioned (and member-pinned) state on this node and
//! applies operations to it.
//!
//! ## Responsibilities
//! - **Lookup**: find or lazily create the container an operation targets.
//! - **Execution**: run one verb against one container as a single step.
//!
//! Serialization of operations on the same partition is the caller's job (see
//! `lanes`); the registry itself never awaits.

use crate::cache::record_store::{CacheRecordStore, Clock};
use crate::error::GridError;
use crate::events::CompletionSink;
use crate::operation::types::*;
use crate::scheduled::handle::ScheduledTaskHandle;
use crate::scheduled::store::ScheduledTaskStore;
use crate::semaphore::container::SemaphoreContainer;

use dashmap::DashMap;
use std::sync::Arc;

type PartitionKey = (u32, String);

pub struct ContainerRegistry {
    caches: DashMap<PartitionKey, CacheRecordStore>,
    semaphores: DashMap<PartitionKey, SemaphoreContainer>,
    /// Keyed by the task's target, so partition and member scoped tasks of the
    /// same scheduler never collide.
    schedulers: DashMap<(Target, String), ScheduledTaskStore>,
    sink: Arc<dyn CompletionSink>,
    clock: Clock,
}

impl ContainerRegistry {
    pub fn new(sink: Arc<dyn CompletionSink>, clock: Clock) -> Arc<Self> {
        Arc::new(Self {
            caches: DashMap::new(),
            semaphores: DashMap::new(),
            schedulers: DashMap::new(),
            sink,
            clock,
        })
    }

    /// Applies `op` locally. The caller has already decided this node owns the target.
    pub fn execute(&self, op: Operation) -> Result<OperationResult, GridError> {
        let Operation {
            object_name,
            target,
            verb,
        } = op;

        match verb {
            Verb::Cache {
                verb,
                completion_id,
            } => {
                let partition = partition_of(target)?;
                self.execute_cache(partition, object_name, verb, completion_id)
            }
            Verb::Semaphore(verb) => {
                let partition = partition_of(target)?;
                self.execute_semaphore(partition, object_name, verb)
            }
            Verb::ScheduledExecutor(verb) => self.execute_scheduled(target, object_name, verb),
        }
    }

    fn execute_cache(
        &self,
        partition: u32,
        name: String,
        verb: CacheVerb,
        completion_id: Option<i32>,
    ) -> Result<OperationResult, GridError> {
        let mut store = self
            .caches
            .entry((partition, name.clone()))
            .or_insert_with(|| {
                tracing::debug!("Creating cache '{}' on partition {}", name, partition);
                CacheRecordStore::new(name, partition, self.sink.clone(), self.clock.clone())
            });

        let result = match verb {
            CacheVerb::Get { key, expiry } => OperationResult::Value(store.get(&key, expiry)),
            CacheVerb::ContainsKey { key } => OperationResult::Bool(store.contains_key(&key)),
            CacheVerb::Put {
                key,
                value,
                expiry,
                get_previous,
            } => OperationResult::Value(store.put(key, value, expiry, get_previous, completion_id)),
            CacheVerb::PutIfAbsent { key, value, expiry } => {
                OperationResult::Bool(store.put_if_absent(key, value, expiry, completion_id))
            }
            CacheVerb::GetAndReplace { key, value, expiry } => {
                OperationResult::Value(store.get_and_replace(key, value, expiry, completion_id))
            }
            CacheVerb::Replace {
                key,
                expected,
                value,
                expiry,
            } => OperationResult::Bool(store.replace(
                key,
                expected.as_ref(),
                value,
                expiry,
                completion_id,
            )),
            CacheVerb::Remove { key, expected } => {
                OperationResult::Bool(store.remove(&key, expected.as_ref(), completion_id))
            }
            CacheVerb::GetAndRemove { key } => {
                OperationResult::Value(store.get_and_remove(&key, completion_id))
            }
        };
        Ok(result)
    }

    fn execute_semaphore(
        &self,
        partition: u32,
        name: String,
        verb: SemaphoreVerb,
    ) -> Result<OperationResult, GridError> {
        // reads never create the semaphore
        if let SemaphoreVerb::AvailablePermits = verb {
            let available = self
                .semaphores
                .get(&(partition, name))
                .map(|semaphore| semaphore.available())
                .unwrap_or(0);
            return Ok(OperationResult::Count(available));
        }

        let mut semaphore = self
            .semaphores
            .entry((partition, name.clone()))
            .or_insert_with(|| SemaphoreContainer::new(name));

        Ok(match verb {
            SemaphoreVerb::Init { permits } => OperationResult::Bool(semaphore.init(permits)?),
            SemaphoreVerb::AvailablePermits => OperationResult::Count(semaphore.available()),
            SemaphoreVerb::TryAcquire { permits } => {
                OperationResult::Bool(semaphore.try_acquire(permits)?)
            }
            SemaphoreVerb::Release { permits } => {
                semaphore.release(permits)?;
                OperationResult::Void
            }
            SemaphoreVerb::Drain => OperationResult::Count(semaphore.drain()),
            SemaphoreVerb::Reduce { permits } => {
                semaphore.reduce(permits)?;
                OperationResult::Void
            }
            SemaphoreVerb::Increase { permits } => {
                semaphore.increase(permits)?;
                OperationResult::Void
            }
        })
    }

    fn execute_scheduled(
        &self,
        target: Target,
        scheduler_name: String,
        verb: ScheduledVerb,
    ) -> Result<OperationResult, GridError> {
        match verb {
            ScheduledVerb::SubmitToPartition {
                task_name,
                definition,
                initial_delay_ms,
            }
            | ScheduledVerb::SubmitToMember {
                task_name,
                definition,
                initial_delay_ms,
                ..
            } => {
                let task_name = task_name
                    .ok_or_else(|| GridError::invalid_argument("task_name", "missing"))?;

                // the handle validates both names before anything is stored
                let handle = match target {
                    Target::Partition(partition) => {
                        ScheduledTaskHandle::of_partition(partition, &scheduler_name, &task_name)?
                    }
                    Target::Member(address) => {
                        ScheduledTaskHandle::of_member(address, &scheduler_name, &task_name)?
                    }
                };

                let now = (self.clock)();
                self.schedulers
                    .entry((target, scheduler_name.clone()))
                    .or_insert_with(|| ScheduledTaskStore::new(scheduler_name))
                    .schedule(&task_name, definition, initial_delay_ms, now)?;

                Ok(OperationResult::Handle(handle))
            }
            ScheduledVerb::GetState { handle } => {
                let store = self.scheduler(target, &scheduler_name, &handle)?;
                Ok(OperationResult::State(store.state(handle.task_name())?))
            }
            ScheduledVerb::Cancel { handle } => {
                let mut store = self.scheduler_mut(target, &scheduler_name, &handle)?;
                Ok(OperationResult::Bool(store.cancel(handle.task_name())?))
            }
            ScheduledVerb::Dispose { handle } => {
                let mut store = self.scheduler_mut(target, &scheduler_name, &handle)?;
                store.dispose(handle.task_name())?;
                Ok(OperationResult::Void)
            }
        }
    }

    fn scheduler(
        &self,
        target: Target,
        scheduler_name: &str,
        handle: &ScheduledTaskHandle,
    ) -> Result<dashmap::mapref::one::Ref<'_, (Target, String), ScheduledTaskStore>, GridError>
    {
        self.schedulers
            .get(&(target, scheduler_name.to_string()))
            .ok_or_else(|| task_not_found(handle))
    }

    fn scheduler_mut(
        &self,
        target: Target,
        scheduler_name: &str,
        handle: &ScheduledTaskHandle,
    ) -> Result<dashmap::mapref::one::RefMut<'_, (Target, String), ScheduledTaskStore>, GridError>
    {
        self.schedulers
            .get_mut(&(target, scheduler_name.to_string()))
            .ok_or_else(|| task_not_found(handle))
    }

    /// Number of live entries of `name` held on `partition`.
    pub fn cache_size(&self, partition: u32, name: &str) -> usize {
        self.caches
            .get(&(partition, name.to_string()))
            .map(|store| store.live_count())
            .unwrap_or(0)
    }

    /// Names of the tasks stored for `scheduler_name` at `target`.
    pub fn scheduled_tasks(&self, target: Target, scheduler_name: &str) -> Vec<String> {
        self.schedulers
            .get(&(target, scheduler_name.to_string()))
            .map(|store| store.task_names())
            .unwrap_or_default()
    }
}

fn partition_of(target: Target) -> Result<u32, GridError> {
    match target {
        Target::Partition(partition) => Ok(partition),
        Target::Member(_) => Err(GridError::wrong_target(
            target,
            "object is partitioned, not member-pinned",
        )),
    }
}

fn task_not_found(handle: &ScheduledTaskHandle) -> GridError {
    GridError::NotFound {
        what: "scheduled task",
        name: format!("{}/{}", handle.scheduler_name(), handle.task_name()),
    }
}
