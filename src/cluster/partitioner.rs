use super::address::Address;

use dashmap::{DashMap, DashSet};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub const DEFAULT_PARTITION_COUNT: u32 = 271;

/// Partition ownership as seen by one node.
///
/// Keys are hashed into a fixed number of partitions; each partition has exactly
/// one owning member. The initial assignment spreads partitions round-robin over
/// the sorted member list, so every node built from the same member list agrees
/// on the owners. Ownership only changes through [`PartitionTable::complete_migration`].
pub struct PartitionTable {
    pub num_partitions: u32,
    local: Address,
    members: Vec<Address>,
    owners: DashMap<u32, Address>,
    migrating: DashSet<u32>,
}

impl PartitionTable {
    pub fn new(local: Address, members: Vec<Address>, num_partitions: u32) -> Arc<Self> {
        let mut members = members;
        if !members.contains(&local) {
            members.push(local);
        }
        members.sort();
        members.dedup();

        let num_partitions = num_partitions.max(1);
        let owners = DashMap::new();
        for partition in 0..num_partitions {
            let owner = members[(partition as usize) % members.len()];
            owners.insert(partition, owner);
        }

        tracing::info!(
            "Partition table: {} partitions over {} members (local {})",
            num_partitions,
            members.len(),
            local
        );

        Arc::new(Self {
            num_partitions,
            local,
            members,
            owners,
            migrating: DashSet::new(),
        })
    }

    /// Single-member table, every partition is local.
    pub fn standalone(local: Address, num_partitions: u32) -> Arc<Self> {
        Self::new(local, vec![local], num_partitions)
    }

    pub fn partition_for(&self, key: &[u8]) -> u32 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let hash = hasher.finish() as u32;
        hash % self.num_partitions
    }

    pub fn partition_for_name(&self, name: &str) -> u32 {
        self.partition_for(name.as_bytes())
    }

    pub fn owner_of(&self, partition: u32) -> Option<Address> {
        self.owners.get(&partition).map(|owner| *owner)
    }

    pub fn local_address(&self) -> Address {
        self.local
    }

    pub fn members(&self) -> &[Address] {
        &self.members
    }

    pub fn is_member(&self, address: &Address) -> bool {
        self.members.contains(address)
    }

    pub fn is_local_address(&self, address: &Address) -> bool {
        &self.local == address
    }

    pub fn is_local_partition(&self, partition: u32) -> bool {
        self.owner_of(partition)
            .map(|owner| owner == self.local)
            .unwrap_or(false)
    }

    pub fn is_migrating(&self, partition: u32) -> bool {
        self.migrating.contains(&partition)
    }

    /// Marks a partition as moving. Operations routed to it fail with a wrong
    /// target error until the migration completes.
    pub fn begin_migration(&self, partition: u32) {
        tracing::info!("Partition {} migration started", partition);
        self.migrating.insert(partition);
    }

    pub fn complete_migration(&self, partition: u32, new_owner: Address) {
        self.owners.insert(partition, new_owner);
        self.migrating.remove(&partition);
        tracing::info!("Partition {} now owned by {}", partition, new_owner);
    }

    pub fn my_partitions(&self) -> Vec<u32> {
        (0..self.num_partitions)
            .filter(|&partition| self.is_local_partition(partition))
            .collect()
    }
}
