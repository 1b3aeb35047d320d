//! Scheduled Executor Module
//!
//! Addressing for scheduled work. When a task is scheduled it is stored either on
//! the partition its name hashes to, or on an explicitly chosen member, and the
//! caller gets back a [`handle::ScheduledTaskHandle`]. Later queries (state,
//! cancel, dispose) are routed from the handle alone.
//!
//! Deciding *when* a task fires is not part of this module.

pub mod handle;
pub mod store;
