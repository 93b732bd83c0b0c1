//! Host collaborator seam: everything the extractor needs from an editor.

use serde::{Deserialize, Serialize};

use crate::behavior::Behavior;
use crate::{BehaviorId, NodeId, ObjectHandle};

/// The editing context the host is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditingContext {
    /// A single object is opened in isolation; candidates are all of its
    /// descendants, the root included.
    Isolated { root: NodeId },
    /// Regular scene editing; candidates are the scene's top-level roots.
    Scene,
}

impl EditingContext {
    pub fn is_isolated(&self) -> bool {
        matches!(self, EditingContext::Isolated { .. })
    }
}

/// Introspection primitives provided by the host.
pub trait SceneHost {
    /// Whether the node is alive in the scene.
    fn contains(&self, node: NodeId) -> bool;

    /// Behaviors attached to `node`, transform included.
    fn behaviors(&self, node: NodeId) -> Vec<&dyn Behavior>;

    /// Node a behavior is attached to.
    fn owner_of(&self, behavior: BehaviorId) -> Option<NodeId>;

    /// Nodes to inspect for incoming references in `context`.
    fn candidate_nodes(&self, context: &EditingContext) -> Vec<NodeId>;

    /// Normalize a raw handle to its owning node. Handles to nodes or
    /// behaviors that no longer exist resolve to `None`.
    fn resolve(&self, handle: ObjectHandle) -> Option<NodeId> {
        match handle {
            ObjectHandle::Node(node) => self.contains(node).then_some(node),
            ObjectHandle::Behavior(behavior) => self.owner_of(behavior),
        }
    }
}
