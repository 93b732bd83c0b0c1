//! Error types for scene construction and slot access.

use thiserror::Error;

use crate::{BehaviorId, NodeId};

/// Result type alias for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Failure to read a single slot. Never aborts extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotAccessError {
    /// The behavior does not declare a slot with this name.
    #[error("unknown slot `{slot}`")]
    UnknownSlot { slot: String },

    /// The slot exists but its value could not be produced.
    #[error("slot `{slot}` is unreadable: {reason}")]
    Unreadable { slot: String, reason: String },

    /// The stored value does not match the declared shape.
    #[error("slot `{slot}` holds a value that does not match its declared shape")]
    ShapeMismatch { slot: String },
}

/// Errors raised while building a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A node referenced by ID was not found in the scene.
    #[error("node not found: {node_id:?}")]
    NodeNotFound { node_id: NodeId },

    /// A behavior ID was never reserved by the builder.
    #[error("behavior not found: {behavior_id:?}")]
    BehaviorNotFound { behavior_id: BehaviorId },

    /// A scene document refers to a node name that does not exist.
    #[error("unknown node name `{name}`")]
    UnknownName { name: String },

    /// Scene documents address nodes by name, so names must be unique.
    #[error("duplicate node name `{name}`")]
    DuplicateName { name: String },

    /// A behavior index in a scene document is out of range.
    #[error("node `{node}` has no behavior at index {index}")]
    BehaviorIndex { node: String, index: usize },

    /// Slot targets do not fit the declared shape.
    #[error("slot `{slot}` expects {expected} target(s) but {found} were given")]
    TargetCount {
        slot: String,
        expected: usize,
        found: usize,
    },

    /// Scene document (de)serialization error.
    #[error("scene document error: {0}")]
    Document(#[from] serde_json::Error),
}
