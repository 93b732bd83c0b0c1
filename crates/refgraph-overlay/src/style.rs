//! Visual parameters for reference curves.

use egui::Color32;
use refgraph_core::ReferenceDirection;
use serde::{Deserialize, Serialize};

/// Curve colors, stroke, and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// RGBA color of curves to referenced nodes.
    pub outgoing_color: [u8; 4],
    /// RGBA color of curves from referencing nodes.
    pub incoming_color: [u8; 4],
    pub stroke_width: f32,
    /// Distance the curve start is moved inward from the source row's right edge.
    pub start_inset: f32,
    /// Horizontal length of the tangent handles at both ends.
    pub tangent_length: f32,
    /// Title of the panel that hosts the rows.
    pub panel_title: String,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            outgoing_color: [0, 0, 255, 255],
            incoming_color: [255, 0, 0, 255],
            stroke_width: 1.0,
            start_inset: 15.0,
            tangent_length: 50.0,
            panel_title: "Hierarchy".to_string(),
        }
    }
}

impl OverlayStyle {
    /// Accent color for curves in `direction`.
    pub fn color(&self, direction: ReferenceDirection) -> Color32 {
        let [r, g, b, a] = match direction {
            ReferenceDirection::Outgoing => self.outgoing_color,
            ReferenceDirection::Incoming => self.incoming_color,
        };
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}
