//! Curve overlay for a hierarchy panel.
//!
//! The host reports every rendered row through [`OverlayRenderer::on_row`].
//! Rows are stored in a [`RowGeometryTable`]; a paint-phase report triggers a
//! curve pass that links the selected row to each related row:
//!
//! ```text
//! selected ──▶ referenced     (outgoing, accent 1)
//! referencing ──▶ selected    (incoming, accent 2)
//! ```
//!
//! Rows that are scrolled out of view are replaced by an anchor on the
//! panel's top edge (incoming) or bottom edge (outgoing).

mod curve;
mod panel;
mod renderer;
mod rows;
mod sink;
mod style;

pub use curve::{anchor_rect, Curve};
pub use panel::{resolve_panel_bounds, PanelLocator, PanelRegistry};
pub use renderer::{FrameContext, OverlayRenderer, RowPhase};
pub use rows::RowGeometryTable;
pub use sink::{CurveSink, EguiCurveSink};
pub use style::OverlayStyle;
