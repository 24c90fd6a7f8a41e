//! Error types.
//!
//! Interaction code (drag, selection, link mode) is pure computation and has
//! no error type. Errors only exist at the model boundary ([`GraphError`]),
//! the remote store boundary ([`RemoteError`]) and when loading settings
//! ([`ConfigError`]).

use crate::graph::NodeId;
use thiserror::Error;

/// Failure reported by a [`RemoteStore`](crate::RemoteStore) call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Transport-level failure, no server response.
    #[error("network error: {0}")]
    Network(String),
    /// The server rejected the payload.
    #[error("validation error: {0}")]
    Validation(String),
    /// The response does not say whether the call took effect.
    ///
    /// Only deletes are known to produce this; the bridge keeps the
    /// optimistic deletion when it sees it.
    #[error("ambiguous response: {0}")]
    Ambiguous(String),
}

/// Discriminant of [`RemoteError`], handy for policy tables and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
    Network,
    Validation,
    Ambiguous,
}

impl RemoteError {
    pub fn kind(&self) -> RemoteErrorKind {
        match self {
            Self::Network(_) => RemoteErrorKind::Network,
            Self::Validation(_) => RemoteErrorKind::Validation,
            Self::Ambiguous(_) => RemoteErrorKind::Ambiguous,
        }
    }

    /// Whether a delete that failed with this error should be rolled back.
    pub fn restores_deleted_node(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Rejections from the local graph model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("node {0} already exists")]
    DuplicateNode(NodeId),
    #[error("cannot link node {0} to itself")]
    SelfLink(NodeId),
}

/// Problems loading a [`CanvasConfig`](crate::CanvasConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid canvas config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("zoom bounds [{min}, {max}] must contain 1.0")]
    ZoomBounds { min: f32, max: f32 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
}
