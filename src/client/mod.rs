//! Client Request Module
//!
//! The entry point for client traffic. A frame is decoded into a
//! [`task::RequestTask`], prepared into an operation through the catalog, run by
//! the invoker, and answered with an encoded response.
//!
//! ## Submodules
//! - **`codec`**: `ClientRequest` / `ClientResponse` frames (bincode).
//! - **`task`**: `RequestTask` and the per-node `ClientEndpoint` that drives it.

pub mod codec;
pub mod task;

#[cfg(test)]
mod tests;
