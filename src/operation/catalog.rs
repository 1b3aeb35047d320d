//! Operation Catalog
//!
//! Maps each [`ObjectType`] to the [`OperationProvider`] that turns requests for
//! that type into routed [`Operation`]s. The catalog is assembled once at startup
//! through [`CatalogBuilder`] and never changes afterwards, so lookups need no
//! locking.

use super::types::*;
use crate::cache::expiry::ExpiryPolicy;
use crate::cluster::partitioner::PartitionTable;
use crate::error::GridError;
use crate::serialization::Data;

use std::collections::HashMap;
use std::sync::Arc;

/// Builds operations for one object type.
///
/// A provider never fails: it picks the target and packs the parameters. All
/// validation happens when the operation executes on its target.
pub trait OperationProvider: Send + Sync {
    fn object_type(&self) -> ObjectType;

    /// # Panics
    /// If `verb` belongs to another object type. The catalog only hands out a
    /// provider for the verb's own type, so this is a programming error.
    fn build(&self, object_name: &str, verb: Verb) -> Operation;
}

fn unsupported(provider: ObjectType, verb: &Verb) -> ! {
    panic!(
        "{} operation provider cannot build '{}' operations",
        provider,
        verb.name()
    )
}

/// Routes every cache verb to the partition owning its key.
pub struct CacheOperationProvider {
    partitions: Arc<PartitionTable>,
}

impl CacheOperationProvider {
    pub fn new(partitions: Arc<PartitionTable>) -> Self {
        Self { partitions }
    }

    /// The get-and-replace operation, with the expiry policy already resolved.
    pub fn create_get_and_replace_operation(
        &self,
        object_name: &str,
        key: Data,
        value: Data,
        expiry: Option<ExpiryPolicy>,
        completion_id: Option<i32>,
    ) -> Operation {
        self.build(
            object_name,
            Verb::Cache {
                verb: CacheVerb::GetAndReplace { key, value, expiry },
                completion_id,
            },
        )
    }
}

impl OperationProvider for CacheOperationProvider {
    fn object_type(&self) -> ObjectType {
        ObjectType::Cache
    }

    fn build(&self, object_name: &str, verb: Verb) -> Operation {
        let partition = match &verb {
            Verb::Cache { verb, .. } => self.partitions.partition_for(verb.key().as_bytes()),
            other => unsupported(self.object_type(), other),
        };

        Operation {
            object_name: object_name.to_string(),
            target: Target::Partition(partition),
            verb,
        }
    }
}

/// Routes semaphore verbs to the partition owning the semaphore's name.
pub struct SemaphoreOperationProvider {
    partitions: Arc<PartitionTable>,
}

impl SemaphoreOperationProvider {
    pub fn new(partitions: Arc<PartitionTable>) -> Self {
        Self { partitions }
    }
}

impl OperationProvider for SemaphoreOperationProvider {
    fn object_type(&self) -> ObjectType {
        ObjectType::Semaphore
    }

    fn build(&self, object_name: &str, verb: Verb) -> Operation {
        if !matches!(verb, Verb::Semaphore(_)) {
            unsupported(self.object_type(), &verb);
        }

        Operation {
            object_name: object_name.to_string(),
            target: Target::Partition(self.partitions.partition_for_name(object_name)),
            verb,
        }
    }
}

/// Routes scheduler verbs.
///
/// Submissions go to the partition of the task name or to the chosen member.
/// Handle-based verbs go wherever the handle says the task lives, and the
/// scheduler name is taken from the handle.
pub struct ScheduledExecutorOperationProvider {
    partitions: Arc<PartitionTable>,
}

impl ScheduledExecutorOperationProvider {
    pub fn new(partitions: Arc<PartitionTable>) -> Self {
        Self { partitions }
    }
}

impl OperationProvider for ScheduledExecutorOperationProvider {
    fn object_type(&self) -> ObjectType {
        ObjectType::ScheduledExecutor
    }

    fn build(&self, object_name: &str, verb: Verb) -> Operation {
        let verb = match verb {
            Verb::ScheduledExecutor(verb) => verb,
            other => unsupported(self.object_type(), &other),
        };

        let verb = verb.with_generated_task_name();
        let (object_name, target) = match &verb {
            ScheduledVerb::SubmitToPartition { task_name, .. } => {
                let task_name = task_name.as_deref().unwrap_or_default();
                (
                    object_name.to_string(),
                    Target::Partition(self.partitions.partition_for_name(task_name)),
                )
            }
            ScheduledVerb::SubmitToMember { address, .. } => {
                (object_name.to_string(), Target::Member(*address))
            }
            ScheduledVerb::GetState { handle }
            | ScheduledVerb::Cancel { handle }
            | ScheduledVerb::Dispose { handle } => (
                handle.scheduler_name().to_string(),
                Target::from(handle.location()),
            ),
        };

        Operation {
            object_name,
            target,
            verb: Verb::ScheduledExecutor(verb),
        }
    }
}

/// Immutable lookup from object type to provider.
pub struct OperationCatalog {
    providers: HashMap<ObjectType, Arc<dyn OperationProvider>>,
}

impl OperationCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Catalog with the cache, semaphore and scheduled executor providers.
    pub fn standard(partitions: Arc<PartitionTable>) -> Self {
        Self::builder()
            .register(Arc::new(CacheOperationProvider::new(partitions.clone())))
            .register(Arc::new(SemaphoreOperationProvider::new(partitions.clone())))
            .register(Arc::new(ScheduledExecutorOperationProvider::new(partitions)))
            .build()
    }

    pub fn provider_for(
        &self,
        object_type: ObjectType,
    ) -> Result<&Arc<dyn OperationProvider>, GridError> {
        self.providers
            .get(&object_type)
            .ok_or_else(|| GridError::NotFound {
                what: "operation provider",
                name: object_type.to_string(),
            })
    }

    /// Looks up the provider for the verb's type and builds the operation.
    pub fn build(&self, object_name: &str, verb: Verb) -> Result<Operation, GridError> {
        let provider = self.provider_for(verb.object_type())?;
        Ok(provider.build(object_name, verb))
    }

    pub fn object_types(&self) -> Vec<ObjectType> {
        let mut types: Vec<ObjectType> = self.providers.keys().copied().collect();
        types.sort_by_key(|object_type| object_type.to_string());
        types
    }
}

#[derive(Default)]
pub struct CatalogBuilder {
    providers: HashMap<ObjectType, Arc<dyn OperationProvider>>,
}

impl CatalogBuilder {
    /// Adds a provider, replacing any earlier one for the same type.
    pub fn register(mut self, provider: Arc<dyn OperationProvider>) -> Self {
        let object_type = provider.object_type();
        if self.providers.insert(object_type, provider).is_some() {
            tracing::warn!("Replaced operation provider for {}", object_type);
        } else {
            tracing::info!("Registered operation provider: {}", object_type);
        }
        self
    }

    pub fn build(self) -> OperationCatalog {
        OperationCatalog {
            providers: self.providers,
        }
    }
}
