//! Distributed Data Grid Dispatch Library
//!
//! The addressing and dispatch core of an in-memory data grid: how a client
//! request for a named distributed object becomes an operation, where that
//! operation runs, and how its result gets back.
//!
//! ## Architecture Modules
//!
//! - **`cluster`**: member addresses and the partition table (key → partition → owner).
//! - **`scheduled`**: the scheduled task handle (a URN) and per-scheduler task stores.
//! - **`cache`**: per-partition record stores with expiry policies.
//! - **`semaphore`**: permit pools.
//! - **`operation`**: verbs, operations, and the catalog of operation providers.
//! - **`node`**: containers, execution lanes, the invoker and the HTTP surface.
//! - **`client`**: the client wire codec and `RequestTask`.
//! - **`events`**, **`serialization`**, **`error`**, **`config`**: shared plumbing.

pub mod cache;
pub mod client;
pub mod cluster;
pub mod config;
pub mod error;
pub mod events;
pub mod node;
pub mod operation;
pub mod scheduled;
pub mod semaphore;
pub mod serialization;
