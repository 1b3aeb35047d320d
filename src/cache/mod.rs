//! Cache Module
//!
//! Partitioned key-value caches with per-entry expiry. Each cache is split into
//! one [`record_store::CacheRecordStore`] per partition; a key's partition is the
//! hash of its serialized bytes.
//!
//! ## Submodules
//! - **`expiry`**: JCache-style expiry policy (creation / access / update TTLs).
//! - **`record_store`**: the per-partition container and its atomic mutations.

pub mod expiry;
pub mod record_store;

#[cfg(test)]
mod tests;
