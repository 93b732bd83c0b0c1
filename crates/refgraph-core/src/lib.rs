//! Core domain types and reference extraction for refgraph.
//!
//! A scene is a tree of nodes. Every node carries an implicit spatial
//! [`Transform`] plus any number of user [`Behavior`]s. Behaviors describe
//! their handle-bearing slots through [`SlotDescriptor`]s, which lets the
//! [`ReferenceExtractor`] discover object-to-object references without
//! knowing anything about the concrete behavior types.
//!
//! ## Slot shapes
//!
//! ```text
//! Single     -> one handle (or null)
//! Sequence   -> growable list of handles
//! Array      -> fixed-length list of handles
//! Computed   -> derived handle, read only when safe to evaluate
//! ```
//!
//! Handles are normalized to their owning node before they become edges, so a
//! slot pointing at a behavior counts as a reference to the node it is
//! attached to.

mod behavior;
mod error;
mod extract;
mod host;
mod scene;
mod selection;
mod slot;

pub use behavior::{Behavior, Record, Transform, TRANSFORM_KIND};
pub use error::{SceneError, SceneResult, SlotAccessError};
pub use extract::{
    ComputedSlotPolicy, ExtractorConfig, ReferenceDirection, ReferenceExtractor, ReferenceSets,
};
pub use host::{EditingContext, SceneHost};
pub use scene::{
    BehaviorDocument, NodeDocument, Scene, SceneBuilder, SceneDocument, SlotDocument,
    TargetDocument,
};
pub use selection::SelectionContext;
pub use slot::{SlotDescriptor, SlotShape, SlotValue};

use serde::{Deserialize, Serialize};

/// Identifier for nodes in a scene. Stable for the lifetime of the scene.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub u64);

/// Identifier for a behavior attached to a node.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BehaviorId(pub u64);

/// A raw handle value held by a behavior slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectHandle {
    /// Direct handle to a node.
    Node(NodeId),
    /// Handle to a behavior; resolves to the node it is attached to.
    Behavior(BehaviorId),
}

impl From<NodeId> for ObjectHandle {
    fn from(id: NodeId) -> Self {
        ObjectHandle::Node(id)
    }
}

impl From<BehaviorId> for ObjectHandle {
    fn from(id: BehaviorId) -> Self {
        ObjectHandle::Behavior(id)
    }
}
