//! Semaphore Module
//!
//! Cluster-wide counting semaphores. A semaphore's permit pool lives on the
//! partition its name hashes to.

pub mod container;

#[cfg(test)]
mod tests;
