//! Screen rectangles of the rows rendered by the host panel.

use std::collections::HashMap;

use egui::Rect;
use refgraph_core::NodeId;

#[derive(Debug, Clone, Copy)]
struct RowEntry {
    rect: Rect,
    frame: u64,
}

/// Latest rectangle reported for each row.
///
/// Reports overwrite earlier ones. A row keeps the rectangle from the
/// previous frame until it is reported again, so a pass that runs before the
/// row's turn still finds it. Rows that go a whole frame without a report are
/// dropped by [`RowGeometryTable::begin_frame`]; a node without an entry is
/// off-screen.
#[derive(Debug, Clone, Default)]
pub struct RowGeometryTable {
    rows: HashMap<NodeId, RowEntry>,
    frame: u64,
}

impl RowGeometryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a redraw pass. Keeps rows reported during the frame that just
    /// ended and forgets everything older.
    pub fn begin_frame(&mut self) {
        let finished = self.frame;
        self.rows.retain(|_, entry| entry.frame == finished);
        self.frame += 1;
    }

    /// Record `rect` for `node`, replacing any earlier report.
    pub fn record(&mut self, node: NodeId, rect: Rect) {
        let frame = self.frame;
        self.rows.insert(node, RowEntry { rect, frame });
    }

    pub fn get(&self, node: NodeId) -> Option<Rect> {
        self.rows.get(&node).map(|entry| entry.rect)
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.rows.contains_key(&node)
    }

    /// Whether `node` has been reported during the current frame.
    pub fn is_current(&self, node: NodeId) -> bool {
        self.rows
            .get(&node)
            .is_some_and(|entry| entry.frame == self.frame)
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
