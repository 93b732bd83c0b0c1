//! Destinations for rendered curves.

use egui::epaint::CubicBezierShape;
use egui::{Color32, Painter, Stroke};

use crate::curve::Curve;

/// Receives the curves produced by a curve pass.
pub trait CurveSink {
    fn draw_curve(&mut self, curve: &Curve);
}

/// Collects curves, e.g. for inspection in tests.
impl CurveSink for Vec<Curve> {
    fn draw_curve(&mut self, curve: &Curve) {
        self.push(*curve);
    }
}

/// Rasterizes curves as cubic beziers on an egui painter.
pub struct EguiCurveSink<'a> {
    painter: &'a Painter,
}

impl<'a> EguiCurveSink<'a> {
    pub fn new(painter: &'a Painter) -> Self {
        Self { painter }
    }
}

impl CurveSink for EguiCurveSink<'_> {
    fn draw_curve(&mut self, curve: &Curve) {
        let shape = CubicBezierShape::from_points_stroke(
            curve.points(),
            false,
            Color32::TRANSPARENT,
            Stroke::new(curve.width, curve.color),
        );
        self.painter.add(shape);
    }
}
