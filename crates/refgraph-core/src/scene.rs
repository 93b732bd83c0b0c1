//! In-memory scene: a node hierarchy with attached behaviors.
//!
//! [`Scene`] is the reference [`SceneHost`] implementation. Scenes are put
//! together with [`SceneBuilder`] or loaded from a JSON [`SceneDocument`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, Record, Transform};
use crate::error::{SceneError, SceneResult};
use crate::host::{EditingContext, SceneHost};
use crate::slot::{SlotDescriptor, SlotShape, SlotValue};
use crate::{BehaviorId, NodeId, ObjectHandle};

#[derive(Debug)]
struct AttachedBehavior {
    id: BehaviorId,
    behavior: Box<dyn Behavior>,
}

#[derive(Debug)]
struct SceneNode {
    name: String,
    transform_id: BehaviorId,
    transform: Transform,
    behaviors: Vec<AttachedBehavior>,
}

/// A single scene: the forest of nodes the hierarchy panel shows.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
    owners: HashMap<BehaviorId, NodeId>,
    by_name: HashMap<String, NodeId>,
}

impl Scene {
    /// Parse a JSON scene document and build it.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        SceneDocument::from_json(json)?.build()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Top-level nodes in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.name.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.transform.parent())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|n| n.transform.children())
            .unwrap_or(&[])
    }

    /// Number of ancestors above `node`.
    pub fn depth(&self, node: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(node);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// `node` followed by all of its descendants, in pre-order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(&node) {
            return out;
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// First node registered under `name`.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Identity of the implicit transform attached to `node`.
    pub fn transform_of(&self, node: NodeId) -> Option<BehaviorId> {
        self.nodes.get(&node).map(|n| n.transform_id)
    }

    /// Identities of the user behaviors attached to `node`, in attach order.
    pub fn behavior_ids(&self, node: NodeId) -> Vec<BehaviorId> {
        self.nodes
            .get(&node)
            .map(|n| n.behaviors.iter().map(|b| b.id).collect())
            .unwrap_or_default()
    }
}

impl SceneHost for Scene {
    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn behaviors(&self, node: NodeId) -> Vec<&dyn Behavior> {
        let Some(entry) = self.nodes.get(&node) else {
            return Vec::new();
        };
        let mut out: Vec<&dyn Behavior> = Vec::with_capacity(entry.behaviors.len() + 1);
        out.push(&entry.transform);
        out.extend(entry.behaviors.iter().map(|b| b.behavior.as_ref()));
        out
    }

    fn owner_of(&self, behavior: BehaviorId) -> Option<NodeId> {
        self.owners.get(&behavior).copied()
    }

    fn candidate_nodes(&self, context: &EditingContext) -> Vec<NodeId> {
        match context {
            EditingContext::Isolated { root } => self.descendants(*root),
            EditingContext::Scene => self.roots.clone(),
        }
    }
}

/// Incrementally assembles a [`Scene`].
///
/// Node and behavior identities come from one counter, so they never collide.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    scene: Scene,
    next_handle: u64,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level node.
    pub fn add_root(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.insert_node(name.into(), None);
        self.scene.roots.push(id);
        id
    }

    /// Add a node under `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> SceneResult<NodeId> {
        if !self.scene.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound { node_id: parent });
        }
        let id = self.insert_node(name.into(), Some(parent));
        if let Some(entry) = self.scene.nodes.get_mut(&parent) {
            entry.transform.push_child(id);
        }
        Ok(id)
    }

    /// Attach a behavior to `node`.
    pub fn attach(
        &mut self,
        node: NodeId,
        behavior: impl Behavior + 'static,
    ) -> SceneResult<BehaviorId> {
        let id = self.reserve_behavior(node)?;
        self.install(id, Box::new(behavior))?;
        Ok(id)
    }

    /// Allocate a behavior identity on `node` ahead of time, so behaviors can
    /// hold handles to each other regardless of attach order.
    pub fn reserve_behavior(&mut self, node: NodeId) -> SceneResult<BehaviorId> {
        if !self.scene.nodes.contains_key(&node) {
            return Err(SceneError::NodeNotFound { node_id: node });
        }
        let id = BehaviorId(self.next_handle());
        self.scene.owners.insert(id, node);
        Ok(id)
    }

    /// Install a behavior under a reserved identity.
    pub fn install(&mut self, id: BehaviorId, behavior: Box<dyn Behavior>) -> SceneResult<()> {
        let entry = self
            .scene
            .owners
            .get(&id)
            .and_then(|node| self.scene.nodes.get_mut(node))
            .ok_or(SceneError::BehaviorNotFound { behavior_id: id })?;
        entry.behaviors.push(AttachedBehavior { id, behavior });
        Ok(())
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.scene.find_by_name(name)
    }

    pub fn transform_of(&self, node: NodeId) -> Option<BehaviorId> {
        self.scene.transform_of(node)
    }

    pub fn build(self) -> Scene {
        self.scene
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn insert_node(&mut self, name: String, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_handle());
        let transform_id = BehaviorId(self.next_handle());
        self.scene.owners.insert(transform_id, id);
        self.scene.by_name.entry(name.clone()).or_insert(id);
        self.scene.nodes.insert(
            id,
            SceneNode {
                name,
                transform_id,
                transform: Transform::new(parent),
                behaviors: Vec::new(),
            },
        );
        id
    }
}

// =============================================================================
// Scene Documents
// =============================================================================

/// JSON description of a scene. Nodes are addressed by (unique) name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Node to open in isolation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolated_root: Option<String>,
    #[serde(default)]
    pub roots: Vec<NodeDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeDocument {
    pub name: String,
    #[serde(default)]
    pub behaviors: Vec<BehaviorDocument>,
    #[serde(default)]
    pub children: Vec<NodeDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehaviorDocument {
    pub kind: String,
    #[serde(default)]
    pub slots: Vec<SlotDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDocument {
    pub name: String,
    pub shape: SlotShape,
    #[serde(default = "default_true")]
    pub safe_to_evaluate: bool,
    /// Targets; `null` entries are null handles.
    #[serde(default)]
    pub targets: Vec<Option<TargetDocument>>,
    /// When set, every read of the slot fails with this reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fails: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Target of a slot: a node by name, or one of its behaviors by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetDocument {
    Node(String),
    Behavior { node: String, behavior: usize },
}

impl SceneDocument {
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the scene this document describes.
    pub fn build(&self) -> SceneResult<Scene> {
        let mut builder = SceneBuilder::new();
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for root in &self.roots {
            create_nodes(&mut builder, None, root, &mut seen, &mut order)?;
        }

        // Reserve every behavior identity first so slots can target any of them.
        let mut reserved: HashMap<&str, Vec<BehaviorId>> = HashMap::new();
        for (node, doc) in &order {
            let ids = doc
                .behaviors
                .iter()
                .map(|_| builder.reserve_behavior(*node))
                .collect::<SceneResult<Vec<_>>>()?;
            reserved.insert(doc.name.as_str(), ids);
        }

        let resolver = TargetResolver {
            builder: &builder,
            reserved: &reserved,
        };
        let mut records = Vec::new();
        for (_, doc) in &order {
            let ids = reserved.get(doc.name.as_str()).cloned().unwrap_or_default();
            for (id, behavior) in ids.into_iter().zip(&doc.behaviors) {
                records.push((id, resolver.record(behavior)?));
            }
        }
        for (id, record) in records {
            builder.install(id, Box::new(record))?;
        }

        Ok(builder.build())
    }
}

fn create_nodes<'a>(
    builder: &mut SceneBuilder,
    parent: Option<NodeId>,
    doc: &'a NodeDocument,
    seen: &mut HashSet<&'a str>,
    order: &mut Vec<(NodeId, &'a NodeDocument)>,
) -> SceneResult<()> {
    if !seen.insert(doc.name.as_str()) {
        return Err(SceneError::DuplicateName {
            name: doc.name.clone(),
        });
    }
    let id = match parent {
        Some(parent) => builder.add_child(parent, doc.name.clone())?,
        None => builder.add_root(doc.name.clone()),
    };
    order.push((id, doc));
    for child in &doc.children {
        create_nodes(builder, Some(id), child, seen, order)?;
    }
    Ok(())
}

struct TargetResolver<'a> {
    builder: &'a SceneBuilder,
    reserved: &'a HashMap<&'a str, Vec<BehaviorId>>,
}

impl TargetResolver<'_> {
    fn record(&self, doc: &BehaviorDocument) -> SceneResult<Record> {
        let mut record = Record::new(doc.kind.clone());
        for slot in &doc.slots {
            let mut descriptor = SlotDescriptor::named(slot.name.clone(), slot.shape);
            if !slot.safe_to_evaluate {
                descriptor = descriptor.unsafe_to_evaluate();
            }
            if let Some(reason) = &slot.fails {
                record = record.with_failing(descriptor, reason.clone());
                continue;
            }
            let handles = slot
                .targets
                .iter()
                .map(|target| target.as_ref().map(|t| self.handle(t)).transpose())
                .collect::<SceneResult<Vec<_>>>()?;
            let value = slot_value(slot, handles)?;
            record = record.with_slot(descriptor, value);
        }
        Ok(record)
    }

    fn handle(&self, target: &TargetDocument) -> SceneResult<ObjectHandle> {
        match target {
            TargetDocument::Node(name) => self
                .builder
                .find_by_name(name)
                .map(ObjectHandle::Node)
                .ok_or_else(|| SceneError::UnknownName { name: name.clone() }),
            TargetDocument::Behavior { node, behavior } => {
                let ids = self
                    .reserved
                    .get(node.as_str())
                    .ok_or_else(|| SceneError::UnknownName { name: node.clone() })?;
                ids.get(*behavior)
                    .copied()
                    .map(ObjectHandle::Behavior)
                    .ok_or_else(|| SceneError::BehaviorIndex {
                        node: node.clone(),
                        index: *behavior,
                    })
            }
        }
    }
}

fn slot_value(slot: &SlotDocument, handles: Vec<Option<ObjectHandle>>) -> SceneResult<SlotValue> {
    let count_error = |expected: usize| SceneError::TargetCount {
        slot: slot.name.clone(),
        expected,
        found: handles.len(),
    };
    match slot.shape {
        SlotShape::Single | SlotShape::Computed => {
            if handles.len() > 1 {
                return Err(count_error(1));
            }
            Ok(SlotValue::Single(handles.first().copied().flatten()))
        }
        SlotShape::Array { len } if handles.len() != len => Err(count_error(len)),
        SlotShape::Array { .. } | SlotShape::Sequence => Ok(SlotValue::Many(handles)),
    }
}
