//! Operation Module
//!
//! The vocabulary of the dispatch core: what a request asks for ([`types::Verb`]),
//! where it must run ([`types::Target`]) and what it produced
//! ([`types::OperationResult`]).
//!
//! ## Submodules
//! - **`types`**: verbs per object type, [`types::Operation`], results.
//! - **`catalog`**: [`catalog::OperationProvider`]s and the immutable
//!   [`catalog::OperationCatalog`] that selects one per object type.

pub mod catalog;
pub mod types;
