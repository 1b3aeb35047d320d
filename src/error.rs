//! Error Taxonomy
//!
//! Every failure the dispatch core can report. Errors carry a stable [`ErrorKind`]
//! (what callers branch on: fix input, re-resolve routing, give up) and, where it
//! makes sense, the offending field.
//!
//! Errors cross the wire as [`ErrorInfo`]; a remote failure is rebuilt as
//! [`GridError::Remote`] and keeps its original kind.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cluster::address::Address;

/// Reasons a scheduled task handle URN could not be parsed or built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleParseError {
    #[error("handle text is empty")]
    NullInput,

    #[error("handle text does not start with the expected scheme: {text:?}")]
    InvalidScheme { text: String },

    #[error("malformed handle body ({field}): {body:?}")]
    MalformedBody { field: &'static str, body: String },

    #[error("invalid handle location {location:?}: {reason}")]
    InvalidLocation {
        location: String,
        reason: &'static str,
    },

    #[error("invalid member address {address:?}")]
    InvalidAddress { address: String },
}

impl HandleParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandleParseError::NullInput => ErrorKind::NullInput,
            HandleParseError::InvalidScheme { .. } => ErrorKind::InvalidScheme,
            HandleParseError::MalformedBody { .. } => ErrorKind::MalformedBody,
            HandleParseError::InvalidLocation { .. } => ErrorKind::InvalidLocation,
            HandleParseError::InvalidAddress { .. } => ErrorKind::InvalidAddress,
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            HandleParseError::NullInput => Some("urn"),
            HandleParseError::InvalidScheme { .. } => Some("scheme"),
            HandleParseError::MalformedBody { field, .. } => Some(*field),
            HandleParseError::InvalidLocation { .. } => Some("location"),
            HandleParseError::InvalidAddress { .. } => Some("address"),
        }
    }
}

/// Stable, wire-visible classification of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NullInput,
    InvalidScheme,
    MalformedBody,
    InvalidLocation,
    InvalidAddress,
    WrongTarget,
    NotFound,
    Decode,
    InvalidArgument,
    DuplicateTask,
    Timeout,
    Transport,
    Shutdown,
}

impl ErrorKind {
    /// True for errors that a caller should answer by re-resolving the owner
    /// and resubmitting, rather than by fixing its input.
    pub fn is_routing(self) -> bool {
        matches!(self, ErrorKind::WrongTarget)
    }
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid scheduled task handle: {0}")]
    Handle(#[from] HandleParseError),

    #[error("wrong target {target}: {reason}")]
    WrongTarget { target: String, reason: String },

    #[error("{what} not found: {name}")]
    NotFound { what: &'static str, name: String },

    #[error("failed to decode {field}: {message}")]
    Decode { field: &'static str, message: String },

    #[error("invalid argument {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("task {task_name} already exists in scheduler {scheduler_name}")]
    DuplicateTask {
        scheduler_name: String,
        task_name: String,
    },

    #[error("call to {target} timed out after {timeout_ms}ms")]
    Timeout { target: Address, timeout_ms: u64 },

    #[error("transport failure talking to {target}: {message}")]
    Transport { target: Address, message: String },

    #[error("operation lane {lane} is shut down")]
    Shutdown { lane: usize },

    #[error("remote {kind:?}: {message}")]
    Remote {
        kind: ErrorKind,
        field: Option<String>,
        message: String,
    },
}

impl GridError {
    pub fn wrong_target(target: impl ToString, reason: impl Into<String>) -> Self {
        GridError::WrongTarget {
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    pub fn decode(field: &'static str, err: impl std::fmt::Display) -> Self {
        GridError::Decode {
            field,
            message: err.to_string(),
        }
    }

    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        GridError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GridError::Handle(e) => e.kind(),
            GridError::WrongTarget { .. } => ErrorKind::WrongTarget,
            GridError::NotFound { .. } => ErrorKind::NotFound,
            GridError::Decode { .. } => ErrorKind::Decode,
            GridError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            GridError::DuplicateTask { .. } => ErrorKind::DuplicateTask,
            GridError::Timeout { .. } => ErrorKind::Timeout,
            GridError::Transport { .. } => ErrorKind::Transport,
            GridError::Shutdown { .. } => ErrorKind::Shutdown,
            GridError::Remote { kind, .. } => *kind,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            GridError::Handle(e) => e.field(),
            GridError::WrongTarget { .. } => Some("target"),
            GridError::NotFound { what, .. } => Some(*what),
            GridError::Decode { field, .. } => Some(*field),
            GridError::InvalidArgument { field, .. } => Some(*field),
            GridError::DuplicateTask { .. } => Some("task_name"),
            GridError::Timeout { .. } | GridError::Transport { .. } => Some("target"),
            GridError::Shutdown { .. } => None,
            GridError::Remote { field, .. } => field.as_deref(),
        }
    }

    pub fn to_info(&self) -> ErrorInfo {
        ErrorInfo {
            kind: self.kind(),
            field: self.field().map(str::to_string),
            message: self.to_string(),
        }
    }
}

/// Serializable form of a [`GridError`], used in client responses and in
/// node-to-node forwarding replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub field: Option<String>,
    pub message: String,
}

impl From<ErrorInfo> for GridError {
    fn from(info: ErrorInfo) -> Self {
        GridError::Remote {
            kind: info.kind,
            field: info.field,
            message: info.message,
        }
    }
}
