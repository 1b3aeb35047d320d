use super::expiry::ExpiryPolicy;
use crate::events::{CompletionEvent, CompletionOutcome, CompletionSink};
use crate::serialization::Data;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" in milliseconds. Injected so expiry can be tested.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(now_ms)
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[derive(Debug, Clone)]
pub struct CacheRecord {
    pub value: Data,
    pub created_at: u64,
    /// `None` never expires.
    pub expires_at: Option<u64>,
    pub last_access: u64,
    pub hits: u64,
}

impl CacheRecord {
    fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// The entries of one cache within one partition.
///
/// Every method is one indivisible step: callers run them from the partition's
/// lane, so no other operation observes a half-applied change. Expired entries
/// are evicted lazily, the first time an operation touches them.
pub struct CacheRecordStore {
    name: String,
    partition: u32,
    records: HashMap<Data, CacheRecord>,
    default_expiry: ExpiryPolicy,
    sink: Arc<dyn CompletionSink>,
    clock: Clock,
}

impl CacheRecordStore {
    pub fn new(
        name: impl Into<String>,
        partition: u32,
        sink: Arc<dyn CompletionSink>,
        clock: Clock,
    ) -> Self {
        Self {
            name: name.into(),
            partition,
            records: HashMap::new(),
            default_expiry: ExpiryPolicy::eternal(),
            sink,
            clock,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn partition(&self) -> u32 {
        self.partition
    }

    pub fn get(&mut self, key: &Data, expiry: Option<ExpiryPolicy>) -> Option<Data> {
        let now = (self.clock)();
        let policy = expiry.unwrap_or(self.default_expiry);
        self.evict_if_expired(key, now);

        let record = self.records.get_mut(key)?;
        record.last_access = now;
        record.hits += 1;
        record.expires_at = policy.expiry_for_access(now, record.expires_at);
        Some(record.value.clone())
    }

    pub fn contains_key(&mut self, key: &Data) -> bool {
        let now = (self.clock)();
        self.evict_if_expired(key, now);
        self.records.contains_key(key)
    }

    pub fn put(
        &mut self,
        key: Data,
        value: Data,
        expiry: Option<ExpiryPolicy>,
        get_previous: bool,
        completion_id: Option<i32>,
    ) -> Option<Data> {
        let now = (self.clock)();
        let policy = expiry.unwrap_or(self.default_expiry);
        self.evict_if_expired(&key, now);

        let (previous, outcome) = match self.records.get_mut(&key) {
            Some(record) => {
                let previous = std::mem::replace(&mut record.value, value);
                record.expires_at = policy.expiry_for_update(now, record.expires_at);
                (Some(previous), CompletionOutcome::Updated)
            }
            None => {
                self.insert_new(key.clone(), value, &policy, now);
                (None, CompletionOutcome::Created)
            }
        };

        self.publish(completion_id, &key, outcome);
        if get_previous { previous } else { None }
    }

    pub fn put_if_absent(
        &mut self,
        key: Data,
        value: Data,
        expiry: Option<ExpiryPolicy>,
        completion_id: Option<i32>,
    ) -> bool {
        let now = (self.clock)();
        let policy = expiry.unwrap_or(self.default_expiry);
        self.evict_if_expired(&key, now);

        if self.records.contains_key(&key) {
            self.publish(completion_id, &key, CompletionOutcome::Unchanged);
            return false;
        }

        self.insert_new(key.clone(), value, &policy, now);
        self.publish(completion_id, &key, CompletionOutcome::Created);
        true
    }

    /// Replaces the value of an existing entry and returns the old one.
    /// A missing (or expired) key is left missing and yields `None`.
    pub fn get_and_replace(
        &mut self,
        key: Data,
        value: Data,
        expiry: Option<ExpiryPolicy>,
        completion_id: Option<i32>,
    ) -> Option<Data> {
        let now = (self.clock)();
        let policy = expiry.unwrap_or(self.default_expiry);
        self.evict_if_expired(&key, now);

        let previous = self.records.get_mut(&key).map(|record| {
            record.expires_at = policy.expiry_for_update(now, record.expires_at);
            std::mem::replace(&mut record.value, value)
        });

        let outcome = if previous.is_some() {
            CompletionOutcome::Updated
        } else {
            CompletionOutcome::Unchanged
        };
        self.publish(completion_id, &key, outcome);
        previous
    }

    /// Replaces an existing entry, only if its current value equals `expected`
    /// when one is given.
    pub fn replace(
        &mut self,
        key: Data,
        expected: Option<&Data>,
        value: Data,
        expiry: Option<ExpiryPolicy>,
        completion_id: Option<i32>,
    ) -> bool {
        let now = (self.clock)();
        let policy = expiry.unwrap_or(self.default_expiry);
        self.evict_if_expired(&key, now);

        let replaced = match self.records.get_mut(&key) {
            Some(record) if expected.is_none_or(|old| *old == record.value) => {
                record.value = value;
                record.expires_at = policy.expiry_for_update(now, record.expires_at);
                true
            }
            Some(record) => {
                // a failed compare still counts as an access
                record.last_access = now;
                record.expires_at = policy.expiry_for_access(now, record.expires_at);
                false
            }
            None => false,
        };

        let outcome = if replaced {
            CompletionOutcome::Updated
        } else {
            CompletionOutcome::Unchanged
        };
        self.publish(completion_id, &key, outcome);
        replaced
    }

    pub fn remove(
        &mut self,
        key: &Data,
        expected: Option<&Data>,
        completion_id: Option<i32>,
    ) -> bool {
        let now = (self.clock)();
        self.evict_if_expired(key, now);

        let matches = self
            .records
            .get(key)
            .is_some_and(|record| expected.is_none_or(|old| *old == record.value));

        if matches {
            self.records.remove(key);
        }

        let outcome = if matches {
            CompletionOutcome::Removed
        } else {
            CompletionOutcome::Unchanged
        };
        self.publish(completion_id, key, outcome);
        matches
    }

    pub fn get_and_remove(&mut self, key: &Data, completion_id: Option<i32>) -> Option<Data> {
        let now = (self.clock)();
        self.evict_if_expired(key, now);

        let previous = self.records.remove(key).map(|record| record.value);
        let outcome = if previous.is_some() {
            CompletionOutcome::Removed
        } else {
            CompletionOutcome::Unchanged
        };
        self.publish(completion_id, key, outcome);
        previous
    }

    /// Number of live entries; expired ones are purged on the way.
    pub fn size(&mut self) -> usize {
        let now = (self.clock)();
        self.records.retain(|_, record| !record.is_expired_at(now));
        self.records.len()
    }

    /// Counts unexpired entries without evicting anything.
    pub fn live_count(&self) -> usize {
        let now = (self.clock)();
        self.records
            .values()
            .filter(|record| !record.is_expired_at(now))
            .count()
    }

    pub fn record(&self, key: &Data) -> Option<&CacheRecord> {
        self.records.get(key)
    }

    fn insert_new(&mut self, key: Data, value: Data, policy: &ExpiryPolicy, now: u64) {
        self.records.insert(
            key,
            CacheRecord {
                value,
                created_at: now,
                expires_at: policy.expiry_for_creation(now),
                last_access: now,
                hits: 0,
            },
        );
    }

    fn evict_if_expired(&mut self, key: &Data, now: u64) {
        if self
            .records
            .get(key)
            .is_some_and(|record| record.is_expired_at(now))
        {
            self.records.remove(key);
            tracing::trace!(
                "Evicted expired entry from cache '{}' partition {}",
                self.name,
                self.partition
            );
        }
    }

    fn publish(&self, completion_id: Option<i32>, key: &Data, outcome: CompletionOutcome) {
        if let Some(completion_id) = completion_id {
            self.sink.publish(CompletionEvent {
                completion_id,
                cache_name: self.name.clone(),
                key: key.clone(),
                outcome,
            });
        }
    }
}
