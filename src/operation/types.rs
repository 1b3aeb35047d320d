use crate::cache::expiry::ExpiryPolicy;
use crate::cluster::address::Address;
use crate::error::GridError;
use crate::scheduled::handle::{ScheduledTaskHandle, TaskLocation};
use crate::scheduled::store::TaskState;
use crate::serialization::{Data, Serializer};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of distributed object the grid knows how to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Cache,
    Semaphore,
    ScheduledExecutor,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectType::Cache => "cache",
            ObjectType::Semaphore => "semaphore",
            ObjectType::ScheduledExecutor => "scheduled-executor",
        };
        f.write_str(name)
    }
}

/// Cache verbs. `E` is the expiry policy representation: opaque [`Data`] as it
/// arrives on the wire, [`ExpiryPolicy`] once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheVerb<E = ExpiryPolicy> {
    Get {
        key: Data,
        expiry: Option<E>,
    },
    ContainsKey {
        key: Data,
    },
    Put {
        key: Data,
        value: Data,
        expiry: Option<E>,
        get_previous: bool,
    },
    PutIfAbsent {
        key: Data,
        value: Data,
        expiry: Option<E>,
    },
    GetAndReplace {
        key: Data,
        value: Data,
        expiry: Option<E>,
    },
    Replace {
        key: Data,
        expected: Option<Data>,
        value: Data,
        expiry: Option<E>,
    },
    Remove {
        key: Data,
        expected: Option<Data>,
    },
    GetAndRemove {
        key: Data,
    },
}

impl<E> CacheVerb<E> {
    pub fn key(&self) -> &Data {
        match self {
            CacheVerb::Get { key, .. }
            | CacheVerb::ContainsKey { key }
            | CacheVerb::Put { key, .. }
            | CacheVerb::PutIfAbsent { key, .. }
            | CacheVerb::GetAndReplace { key, .. }
            | CacheVerb::Replace { key, .. }
            | CacheVerb::Remove { key, .. }
            | CacheVerb::GetAndRemove { key } => key,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CacheVerb::Get { .. } => "cache.get",
            CacheVerb::ContainsKey { .. } => "cache.containsKey",
            CacheVerb::Put { .. } => "cache.put",
            CacheVerb::PutIfAbsent { .. } => "cache.putIfAbsent",
            CacheVerb::GetAndReplace { .. } => "cache.getAndReplace",
            CacheVerb::Replace { .. } => "cache.replace",
            CacheVerb::Remove { .. } => "cache.remove",
            CacheVerb::GetAndRemove { .. } => "cache.getAndRemove",
        }
    }

    pub fn mutates(&self) -> bool {
        !matches!(self, CacheVerb::Get { .. } | CacheVerb::ContainsKey { .. })
    }

    /// Converts the expiry representation, failing on the first bad policy.
    pub fn try_map_expiry<F, T>(self, mut f: F) -> Result<CacheVerb<T>, GridError>
    where
        F: FnMut(E) -> Result<T, GridError>,
    {
        let mut map = |expiry: Option<E>| expiry.map(&mut f).transpose();

        Ok(match self {
            CacheVerb::Get { key, expiry } => CacheVerb::Get {
                key,
                expiry: map(expiry)?,
            },
            CacheVerb::ContainsKey { key } => CacheVerb::ContainsKey { key },
            CacheVerb::Put {
                key,
                value,
                expiry,
                get_previous,
            } => CacheVerb::Put {
                key,
                value,
                expiry: map(expiry)?,
                get_previous,
            },
            CacheVerb::PutIfAbsent { key, value, expiry } => CacheVerb::PutIfAbsent {
                key,
                value,
                expiry: map(expiry)?,
            },
            CacheVerb::GetAndReplace { key, value, expiry } => CacheVerb::GetAndReplace {
                key,
                value,
                expiry: map(expiry)?,
            },
            CacheVerb::Replace {
                key,
                expected,
                value,
                expiry,
            } => CacheVerb::Replace {
                key,
                expected,
                value,
                expiry: map(expiry)?,
            },
            CacheVerb::Remove { key, expected } => CacheVerb::Remove { key, expected },
            CacheVerb::GetAndRemove { key } => CacheVerb::GetAndRemove { key },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemaphoreVerb {
    Init { permits: i32 },
    AvailablePermits,
    TryAcquire { permits: i32 },
    Release { permits: i32 },
    Drain,
    Reduce { permits: i32 },
    Increase { permits: i32 },
}

impl SemaphoreVerb {
    pub fn name(&self) -> &'static str {
        match self {
            SemaphoreVerb::Init { .. } => "semaphore.init",
            SemaphoreVerb::AvailablePermits => "semaphore.availablePermits",
            SemaphoreVerb::TryAcquire { .. } => "semaphore.tryAcquire",
            SemaphoreVerb::Release { .. } => "semaphore.release",
            SemaphoreVerb::Drain => "semaphore.drain",
            SemaphoreVerb::Reduce { .. } => "semaphore.reduce",
            SemaphoreVerb::Increase { .. } => "semaphore.increase",
        }
    }

    pub fn mutates(&self) -> bool {
        !matches!(self, SemaphoreVerb::AvailablePermits)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledVerb {
    /// Stores the task on the partition its name hashes to. An unnamed task gets
    /// a generated name.
    SubmitToPartition {
        task_name: Option<String>,
        definition: Data,
        initial_delay_ms: u64,
    },
    SubmitToMember {
        address: Address,
        task_name: Option<String>,
        definition: Data,
        initial_delay_ms: u64,
    },
    GetState {
        handle: ScheduledTaskHandle,
    },
    Cancel {
        handle: ScheduledTaskHandle,
    },
    Dispose {
        handle: ScheduledTaskHandle,
    },
}

impl ScheduledVerb {
    pub fn name(&self) -> &'static str {
        match self {
            ScheduledVerb::SubmitToPartition { .. } => "scheduler.submitToPartition",
            ScheduledVerb::SubmitToMember { .. } => "scheduler.submitToMember",
            ScheduledVerb::GetState { .. } => "scheduler.getState",
            ScheduledVerb::Cancel { .. } => "scheduler.cancel",
            ScheduledVerb::Dispose { .. } => "scheduler.dispose",
        }
    }

    pub fn mutates(&self) -> bool {
        !matches!(self, ScheduledVerb::GetState { .. })
    }

    /// The handle a verb addresses; `None` for submissions.
    pub fn handle(&self) -> Option<&ScheduledTaskHandle> {
        match self {
            ScheduledVerb::GetState { handle }
            | ScheduledVerb::Cancel { handle }
            | ScheduledVerb::Dispose { handle } => Some(handle),
            ScheduledVerb::SubmitToPartition { .. } | ScheduledVerb::SubmitToMember { .. } => None,
        }
    }

    /// Gives an unnamed submission a random UUID name.
    pub fn with_generated_task_name(self) -> Self {
        match self {
            ScheduledVerb::SubmitToPartition {
                task_name,
                definition,
                initial_delay_ms,
            } => ScheduledVerb::SubmitToPartition {
                task_name: Some(task_name.unwrap_or_else(generated_task_name)),
                definition,
                initial_delay_ms,
            },
            ScheduledVerb::SubmitToMember {
                address,
                task_name,
                definition,
                initial_delay_ms,
            } => ScheduledVerb::SubmitToMember {
                address,
                task_name: Some(task_name.unwrap_or_else(generated_task_name)),
                definition,
                initial_delay_ms,
            },
            other => other,
        }
    }
}

fn generated_task_name() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A request's verb and its parameters, for any object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verb<E = ExpiryPolicy> {
    Cache {
        verb: CacheVerb<E>,
        completion_id: Option<i32>,
    },
    Semaphore(SemaphoreVerb),
    ScheduledExecutor(ScheduledVerb),
}

impl<E> Verb<E> {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Verb::Cache { .. } => ObjectType::Cache,
            Verb::Semaphore(_) => ObjectType::Semaphore,
            Verb::ScheduledExecutor(_) => ObjectType::ScheduledExecutor,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Verb::Cache { verb, .. } => verb.name(),
            Verb::Semaphore(verb) => verb.name(),
            Verb::ScheduledExecutor(verb) => verb.name(),
        }
    }

    pub fn mutates(&self) -> bool {
        match self {
            Verb::Cache { verb, .. } => verb.mutates(),
            Verb::Semaphore(verb) => verb.mutates(),
            Verb::ScheduledExecutor(verb) => verb.mutates(),
        }
    }
}

impl Verb<Data> {
    /// Turns wire-level opaque fields into typed values (`toObject`).
    pub fn resolve(self, serializer: &Serializer) -> Result<Verb, GridError> {
        Ok(match self {
            Verb::Cache {
                verb,
                completion_id,
            } => Verb::Cache {
                verb: verb.try_map_expiry(|data| serializer.to_object("expiry_policy", &data))?,
                completion_id,
            },
            Verb::Semaphore(verb) => Verb::Semaphore(verb),
            Verb::ScheduledExecutor(verb) => Verb::ScheduledExecutor(verb),
        })
    }
}

/// Where an operation must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Partition(u32),
    Member(Address),
}

impl From<TaskLocation> for Target {
    fn from(location: TaskLocation) -> Self {
        match location {
            TaskLocation::Partition(partition) => Target::Partition(partition),
            TaskLocation::Member(address) => Target::Member(address),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Partition(partition) => write!(f, "partition {}", partition),
            Target::Member(address) => write!(f, "member {}", address),
        }
    }
}

/// A single unit of work against one container. Built by an operation provider,
/// consumed once by the invoker (locally or after forwarding).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub object_name: String,
    pub target: Target,
    pub verb: Verb,
}

impl Operation {
    pub fn object_type(&self) -> ObjectType {
        self.verb.object_type()
    }

    pub fn mutates(&self) -> bool {
        self.verb.mutates()
    }

    pub fn completion_id(&self) -> Option<i32> {
        match &self.verb {
            Verb::Cache { completion_id, .. } => *completion_id,
            _ => None,
        }
    }
}

/// What an operation produced, before it is serialized for the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationResult {
    Void,
    Value(Option<Data>),
    Bool(bool),
    Count(i32),
    Handle(ScheduledTaskHandle),
    State(TaskState),
}
