//! Cluster Addressing Module
//!
//! The node's view of where state lives. Membership itself is maintained
//! elsewhere; this module only answers the two routing questions the dispatch
//! core asks:
//!
//! - **`partitionFor(key)`**: which partition a key or object name hashes into.
//! - **`isLocal(partition | address)`**: whether this node owns the target.

pub mod address;
pub mod partitioner;

#[cfg(test)]
mod tests;
