//! Row-report state machine and the curve pass.

use egui::Rect;
use refgraph_core::{NodeId, ReferenceDirection, SelectionContext};
use tracing::trace;

use crate::curve::{anchor_rect, Curve};
use crate::panel::{resolve_panel_bounds, PanelLocator};
use crate::rows::RowGeometryTable;
use crate::sink::CurveSink;
use crate::style::OverlayStyle;

/// Which part of the host's redraw a row report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPhase {
    /// Geometry only.
    Layout,
    /// Geometry, then a curve pass.
    Paint,
}

/// Everything a curve pass reads besides the renderer's own state.
pub struct FrameContext<'a> {
    pub selection: &'a SelectionContext,
    pub panels: &'a dyn PanelLocator,
    /// Full display bounds, used when the panel cannot be located.
    pub display: Rect,
}

/// Maps rows to screen space and paints reference curves.
#[derive(Debug, Default)]
pub struct OverlayRenderer {
    style: OverlayStyle,
    rows: RowGeometryTable,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: OverlayStyle) {
        self.style = style;
    }

    pub fn rows(&self) -> &RowGeometryTable {
        &self.rows
    }

    /// Latest rectangle of the selected row.
    pub fn selected_row(&self, selection: &SelectionContext) -> Option<Rect> {
        self.rows.get(selection.selected()?)
    }

    /// Start a redraw pass. Rows not reported during the previous pass are
    /// treated as off-screen from now on.
    pub fn begin_frame(&mut self) {
        self.rows.begin_frame();
    }

    /// Handle one row report. The geometry is recorded before any curve pass
    /// this report triggers, so a later report in the same frame refreshes
    /// the rectangle a pass uses. Returns the number of curves drawn.
    pub fn on_row(
        &mut self,
        node: NodeId,
        rect: Rect,
        phase: RowPhase,
        frame: &FrameContext<'_>,
        sink: &mut dyn CurveSink,
    ) -> usize {
        self.rows.record(node, rect);

        match phase {
            RowPhase::Layout => 0,
            RowPhase::Paint => self.curve_pass(frame, sink),
        }
    }

    /// Draw one curve per related node. Does nothing until the selected row
    /// has been reported.
    pub fn curve_pass(&self, frame: &FrameContext<'_>, sink: &mut dyn CurveSink) -> usize {
        let Some(selected_row) = self.selected_row(frame.selection) else {
            return 0;
        };

        let mut panel = None;
        let mut drawn = 0;
        for (direction, node) in frame.selection.references().iter() {
            let other = match self.rows.get(node) {
                Some(rect) => rect,
                None => {
                    let panel = *panel.get_or_insert_with(|| {
                        resolve_panel_bounds(frame.panels, &self.style.panel_title, frame.display)
                    });
                    anchor_rect(direction, selected_row, panel)
                }
            };

            let (from, to) = match direction {
                ReferenceDirection::Outgoing => (selected_row, other),
                ReferenceDirection::Incoming => (other, selected_row),
            };
            sink.draw_curve(&Curve::between(from, to, &self.style, direction));
            drawn += 1;
        }

        trace!(drawn, "curve pass");
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::PanelRegistry;
    use egui::{pos2, vec2};
    use refgraph_core::{EditingContext, Record, ReferenceExtractor, SceneBuilder};

    fn row(index: usize) -> Rect {
        Rect::from_min_size(pos2(0.0, 40.0 + index as f32 * 16.0), vec2(240.0, 16.0))
    }

    fn display() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(1280.0, 800.0))
    }

    #[test]
    fn no_curves_before_selected_row_is_reported() {
        let mut builder = SceneBuilder::new();
        let root = builder.add_root("Root");
        let a = builder.add_child(root, "A").unwrap();
        let b = builder.add_child(root, "B").unwrap();
        builder
            .attach(a, Record::new("Link").with_single("to", Some(b.into())))
            .unwrap();
        let scene = builder.build();

        let mut selection = SelectionContext::new();
        selection.select(
            &scene,
            &ReferenceExtractor::default(),
            Some(a),
            &EditingContext::Isolated { root },
        );
        let panels = PanelRegistry::new();
        let frame = FrameContext {
            selection: &selection,
            panels: &panels,
            display: display(),
        };

        let mut renderer = OverlayRenderer::default();
        let mut curves: Vec<Curve> = Vec::new();
        renderer.begin_frame();
        assert_eq!(renderer.on_row(b, row(2), RowPhase::Paint, &frame, &mut curves), 0);
        assert_eq!(renderer.on_row(a, row(1), RowPhase::Paint, &frame, &mut curves), 1);
        assert_eq!(curves[0].end, pos2(0.0, row(2).center().y));
    }

    #[test]
    fn selected_row_is_dropped_after_a_frame_without_reports() {
        let mut builder = SceneBuilder::new();
        let root = builder.add_root("Root");
        let scene = builder.build();
        let mut selection = SelectionContext::new();
        selection.select(
            &scene,
            &ReferenceExtractor::default(),
            Some(root),
            &EditingContext::Isolated { root },
        );
        let panels = PanelRegistry::new();
        let frame = FrameContext {
            selection: &selection,
            panels: &panels,
            display: display(),
        };

        let mut renderer = OverlayRenderer::default();
        renderer.on_row(root, row(0), RowPhase::Layout, &frame, &mut Vec::<Curve>::new());
        assert_eq!(renderer.selected_row(&selection), Some(row(0)));

        // Still known while the next frame has not reached it.
        renderer.begin_frame();
        assert_eq!(renderer.selected_row(&selection), Some(row(0)));

        // Scrolled away: a whole frame passed without a report.
        renderer.begin_frame();
        assert_eq!(renderer.selected_row(&selection), None);
        assert!(renderer.rows().is_empty());
    }
}
