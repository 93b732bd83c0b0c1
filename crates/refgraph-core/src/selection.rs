//! Per-session selection state.

use tracing::debug;

use crate::extract::{ReferenceExtractor, ReferenceSets};
use crate::host::{EditingContext, SceneHost};
use crate::NodeId;

/// The selected node and its references for one editing session.
///
/// Every call to [`SelectionContext::select`] rebuilds the reference sets from
/// scratch, so nothing from a previous selection survives.
#[derive(Debug, Clone, Default)]
pub struct SelectionContext {
    selected: Option<NodeId>,
    references: ReferenceSets,
}

impl SelectionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn references(&self) -> &ReferenceSets {
        &self.references
    }

    pub fn is_selected(&self, node: NodeId) -> bool {
        self.selected == Some(node)
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.references.clear();
    }

    /// Handle a selection change.
    ///
    /// Clears state, then recomputes references unless the selection is
    /// empty, the node is not in the scene, or the extractor requires an
    /// isolated context and `context` is not one. Returns whether a node is
    /// now selected.
    pub fn select<H>(
        &mut self,
        host: &H,
        extractor: &ReferenceExtractor,
        selection: Option<NodeId>,
        context: &EditingContext,
    ) -> bool
    where
        H: SceneHost + ?Sized,
    {
        self.clear();

        if extractor.config().require_isolated_context && !context.is_isolated() {
            debug!(?context, "selection ignored outside isolated editing");
            return false;
        }
        let Some(node) = selection else {
            return false;
        };
        if !host.contains(node) {
            debug!(node = node.0, "selected node is not in the scene");
            return false;
        }

        let pool = host.candidate_nodes(context);
        self.references = extractor.compute_references(host, Some(node), &pool);
        self.selected = Some(node);
        true
    }

    /// Recompute references for the current selection, e.g. after the scene
    /// was edited.
    pub fn refresh<H>(&mut self, host: &H, extractor: &ReferenceExtractor, context: &EditingContext)
    where
        H: SceneHost + ?Sized,
    {
        let selected = self.selected;
        self.select(host, extractor, selected, context);
    }
}
