//! Cluster Module Tests
//!
//! - **Address**: parsing and canonical display.
//! - **PartitionTable**: deterministic hashing, agreement between nodes, migration.

#[cfg(test)]
mod tests {
    use crate::cluster::address::Address;
    use crate::cluster::partitioner::PartitionTable;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    // ============================================================
    // ADDRESS TESTS
    // ============================================================

    #[test]
    fn test_address_parse_and_display() {
        let a = addr("127.0.0.1:5701");
        assert_eq!(a.port(), 5701);
        assert_eq!(a.host().to_string(), "127.0.0.1");
        assert_eq!(a.to_string(), "127.0.0.1:5701");

        let v6 = addr("[::1]:5702");
        assert_eq!(v6.to_string(), "[::1]:5702");
    }

    #[test]
    fn test_address_rejects_hostnames() {
        assert!("foobar:0".parse::<Address>().is_err());
        assert!("127.0.0.1".parse::<Address>().is_err());
        assert!("127.0.0.1:99999".parse::<Address>().is_err());
    }

    #[test]
    fn test_address_serializes_as_string() {
        let json = serde_json::to_string(&addr("10.0.0.1:80")).unwrap();
        assert_eq!(json, "\"10.0.0.1:80\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr("10.0.0.1:80"));
    }

    // ============================================================
    // PARTITION TABLE TESTS
    // ============================================================

    #[test]
    fn test_partition_is_deterministic_and_in_range() {
        let table = PartitionTable::standalone(addr("127.0.0.1:5701"), 271);

        let p1 = table.partition_for(b"book_100");
        let p2 = table.partition_for(b"book_100");
        assert_eq!(p1, p2);

        for i in 0..1000 {
            let key = format!("key_{}", i);
            assert!(table.partition_for(key.as_bytes()) < table.num_partitions);
        }
    }

    #[test]
    fn test_standalone_owns_everything() {
        let table = PartitionTable::standalone(addr("127.0.0.1:5701"), 16);
        assert_eq!(table.my_partitions().len(), 16);
        assert!(table.is_local_partition(0));
        assert!(table.is_local_address(&addr("127.0.0.1:5701")));
    }

    #[test]
    fn test_nodes_agree_on_owners() {
        let a = addr("127.0.0.1:5701");
        let b = addr("127.0.0.1:5702");

        let on_a = PartitionTable::new(a, vec![b], 64);
        let on_b = PartitionTable::new(b, vec![a, b], 64);

        for partition in 0..64 {
            assert_eq!(on_a.owner_of(partition), on_b.owner_of(partition));
            assert_ne!(
                on_a.is_local_partition(partition),
                on_b.is_local_partition(partition)
            );
        }
        assert_eq!(on_a.my_partitions().len() + on_b.my_partitions().len(), 64);
    }

    #[test]
    fn test_unknown_partition_has_no_owner() {
        let table = PartitionTable::standalone(addr("127.0.0.1:5701"), 8);
        assert_eq!(table.owner_of(8), None);
        assert!(!table.is_local_partition(8));
    }

    #[test]
    fn test_migration_moves_ownership() {
        let a = addr("127.0.0.1:5701");
        let b = addr("127.0.0.1:5702");
        let table = PartitionTable::new(a, vec![a, b], 4);

        let partition = table.my_partitions()[0];
        table.begin_migration(partition);
        assert!(table.is_migrating(partition));

        table.complete_migration(partition, b);
        assert!(!table.is_migrating(partition));
        assert_eq!(table.owner_of(partition), Some(b));
        assert!(!table.is_local_partition(partition));
    }
}
