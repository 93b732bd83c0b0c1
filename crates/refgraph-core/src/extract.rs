//! Reference extraction: which nodes a selected node points at, and which
//! nodes point back at it.

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::behavior::Behavior;
use crate::host::SceneHost;
use crate::{NodeId, ObjectHandle};

/// Direction of a reference edge relative to the selected node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceDirection {
    /// The selected node references the other node.
    Outgoing,
    /// The other node references the selected node.
    Incoming,
}

/// Which directions read computed slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputedSlotPolicy {
    /// Computed slots are read for outgoing and incoming edges.
    #[default]
    Both,
    /// Computed slots are read for outgoing edges only.
    OutgoingOnly,
}

impl ComputedSlotPolicy {
    fn reads(self, direction: ReferenceDirection) -> bool {
        match self {
            ComputedSlotPolicy::Both => true,
            ComputedSlotPolicy::OutgoingOnly => direction == ReferenceDirection::Outgoing,
        }
    }
}

/// Extraction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub computed_slots: ComputedSlotPolicy,
    /// Only track selections made while a single object is open in
    /// isolation.
    pub require_isolated_context: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            computed_slots: ComputedSlotPolicy::Both,
            require_isolated_context: true,
        }
    }
}

/// Nodes related to a selection. Never contains the selected node itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSets {
    /// Nodes referenced by the selected node.
    pub referenced: BTreeSet<NodeId>,
    /// Nodes referencing the selected node.
    pub referencing: BTreeSet<NodeId>,
}

impl ReferenceSets {
    pub fn is_empty(&self) -> bool {
        self.referenced.is_empty() && self.referencing.is_empty()
    }

    pub fn len(&self) -> usize {
        self.referenced.len() + self.referencing.len()
    }

    pub fn clear(&mut self) {
        self.referenced.clear();
        self.referencing.clear();
    }

    /// Every related node tagged with its direction, outgoing first.
    pub fn iter(&self) -> impl Iterator<Item = (ReferenceDirection, NodeId)> + '_ {
        let outgoing = self
            .referenced
            .iter()
            .map(|&node| (ReferenceDirection::Outgoing, node));
        let incoming = self
            .referencing
            .iter()
            .map(|&node| (ReferenceDirection::Incoming, node));
        outgoing.chain(incoming)
    }
}

/// Walks behavior slots to discover reference edges.
#[derive(Debug, Clone, Default)]
pub struct ReferenceExtractor {
    config: ExtractorConfig,
}

impl ReferenceExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Compute both reference sets for `selected` against `pool`.
    ///
    /// A `None` selection yields empty sets. `selected` is excluded from the
    /// pool if present.
    pub fn compute_references<H>(
        &self,
        host: &H,
        selected: Option<NodeId>,
        pool: &[NodeId],
    ) -> ReferenceSets
    where
        H: SceneHost + ?Sized,
    {
        let Some(selected) = selected else {
            return ReferenceSets::default();
        };

        let sets = ReferenceSets {
            referenced: self.referenced_by(host, selected),
            referencing: self.referencing(host, selected, pool),
        };

        debug!(
            selected = selected.0,
            candidates = pool.len(),
            referenced = sets.referenced.len(),
            referencing = sets.referencing.len(),
            "references computed"
        );
        sets
    }

    /// Nodes that `selected` holds handles to.
    pub fn referenced_by<H>(&self, host: &H, selected: NodeId) -> BTreeSet<NodeId>
    where
        H: SceneHost + ?Sized,
    {
        let mut referenced = BTreeSet::new();
        for behavior in host.behaviors(selected) {
            let flow = self.visit_handles(behavior, ReferenceDirection::Outgoing, |handle| {
                if let Some(node) = host.resolve(handle) {
                    if node != selected {
                        referenced.insert(node);
                    }
                }
                ControlFlow::Continue(())
            });
            // Outgoing collection visits every handle.
            debug_assert!(flow.is_continue());
        }
        referenced
    }

    /// Nodes in `pool` holding a handle to `selected` or to one of its
    /// behaviors.
    pub fn referencing<H>(&self, host: &H, selected: NodeId, pool: &[NodeId]) -> BTreeSet<NodeId>
    where
        H: SceneHost + ?Sized,
    {
        pool.iter()
            .copied()
            .filter(|&candidate| candidate != selected)
            .filter(|&candidate| self.references_node(host, candidate, selected))
            .collect()
    }

    /// Whether any behavior slot of `candidate` resolves to `target`. Stops
    /// at the first match.
    pub fn references_node<H>(&self, host: &H, candidate: NodeId, target: NodeId) -> bool
    where
        H: SceneHost + ?Sized,
    {
        host.behaviors(candidate).into_iter().any(|behavior| {
            self.visit_handles(behavior, ReferenceDirection::Incoming, |handle| {
                if host.resolve(handle) == Some(target) {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .is_break()
        })
    }

    /// Feed every raw handle held by `behavior` to `visit`.
    ///
    /// The spatial transform is skipped entirely. Computed slots are read
    /// only when they are safe to evaluate and the policy allows them for
    /// `direction`. A failed read counts as an empty slot.
    fn visit_handles<F>(
        &self,
        behavior: &dyn Behavior,
        direction: ReferenceDirection,
        mut visit: F,
    ) -> ControlFlow<()>
    where
        F: FnMut(ObjectHandle) -> ControlFlow<()>,
    {
        if behavior.is_spatial_transform() {
            return ControlFlow::Continue(());
        }

        for slot in behavior.slots() {
            if !slot.is_readable() {
                continue;
            }
            if slot.shape.is_computed() && !self.config.computed_slots.reads(direction) {
                continue;
            }

            let value = match behavior.try_read_slot(slot) {
                Ok(value) => value,
                Err(err) => {
                    trace!(
                        kind = behavior.kind(),
                        slot = %slot.name,
                        error = %err,
                        "slot read failed, treating as empty"
                    );
                    continue;
                }
            };

            for handle in value.handles() {
                visit(handle)?;
            }
        }

        ControlFlow::Continue(())
    }
}
