//! Curve geometry between two row rectangles.

use egui::{pos2, vec2, Color32, Pos2, Rect};
use refgraph_core::ReferenceDirection;

use crate::style::OverlayStyle;

/// A cubic curve from one row to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    pub start: Pos2,
    pub start_tangent: Pos2,
    pub end_tangent: Pos2,
    pub end: Pos2,
    pub color: Color32,
    pub width: f32,
    pub direction: ReferenceDirection,
}

impl Curve {
    /// Curve from the right edge of `from` (moved inward by the style's start
    /// inset) to the left edge of `to`, both at vertical centre. Tangents
    /// point right of the start and left of the end, which yields an S shape
    /// whatever the vertical order of the two rows.
    pub fn between(
        from: Rect,
        to: Rect,
        style: &OverlayStyle,
        direction: ReferenceDirection,
    ) -> Self {
        let start = pos2(from.max.x - style.start_inset, from.center().y);
        let end = pos2(to.min.x, to.center().y);
        let handle = vec2(style.tangent_length, 0.0);
        Self {
            start,
            start_tangent: start + handle,
            end_tangent: end - handle,
            end,
            color: style.color(direction),
            width: style.stroke_width,
            direction,
        }
    }

    /// Control points in drawing order.
    pub fn points(&self) -> [Pos2; 4] {
        [self.start, self.start_tangent, self.end_tangent, self.end]
    }

    /// Point on the curve at `t` in `[0, 1]`.
    pub fn sample(&self, t: f32) -> Pos2 {
        let t = t.clamp(0.0, 1.0);
        let mt = 1.0 - t;
        let [p0, p1, p2, p3] = self.points().map(|p| p.to_vec2());
        let v = p0 * (mt * mt * mt)
            + p1 * (3.0 * mt * mt * t)
            + p2 * (3.0 * mt * t * t)
            + p3 * (t * t * t);
        v.to_pos2()
    }
}

/// Stand-in rectangle for a row that is not on screen.
///
/// Same horizontal span and height as the selected row, placed flush with the
/// panel's top edge for incoming references or its bottom edge for outgoing
/// ones.
pub fn anchor_rect(direction: ReferenceDirection, selected_row: Rect, panel: Rect) -> Rect {
    let min_y = match direction {
        ReferenceDirection::Incoming => panel.min.y,
        ReferenceDirection::Outgoing => panel.max.y - selected_row.height(),
    };
    Rect::from_min_size(pos2(selected_row.min.x, min_y), selected_row.size())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(y: f32) -> Rect {
        Rect::from_min_size(pos2(20.0, y), vec2(200.0, 16.0))
    }

    #[test]
    fn curve_runs_from_inset_right_edge_to_left_edge() {
        let style = OverlayStyle::default();
        let curve = Curve::between(row(100.0), row(40.0), &style, ReferenceDirection::Outgoing);

        assert_eq!(curve.start, pos2(205.0, 108.0));
        assert_eq!(curve.end, pos2(20.0, 48.0));
        assert_eq!(curve.start_tangent, pos2(255.0, 108.0));
        assert_eq!(curve.end_tangent, pos2(-30.0, 48.0));
        assert_eq!(curve.color, Color32::BLUE);
    }

    #[test]
    fn sample_hits_endpoints() {
        let style = OverlayStyle::default();
        let curve = Curve::between(row(0.0), row(64.0), &style, ReferenceDirection::Incoming);
        assert_eq!(curve.sample(0.0), curve.start);
        assert_eq!(curve.sample(1.0), curve.end);
        let mid = curve.sample(0.5);
        assert!(mid.y > curve.start.y && mid.y < curve.end.y);
    }

    #[test]
    fn anchors_sit_on_panel_edges() {
        let panel = Rect::from_min_max(pos2(0.0, 30.0), pos2(240.0, 500.0));
        let selected = row(200.0);

        let top = anchor_rect(ReferenceDirection::Incoming, selected, panel);
        assert_eq!(top.min.y, panel.min.y);
        assert_eq!(top.x_range(), selected.x_range());

        let bottom = anchor_rect(ReferenceDirection::Outgoing, selected, panel);
        assert_eq!(bottom.max.y, panel.max.y);
        assert_eq!(bottom.height(), selected.height());
        assert_eq!(bottom.x_range(), selected.x_range());
    }
}
