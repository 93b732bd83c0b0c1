//! Main application state and rendering logic.

use std::collections::HashSet;

use eframe::{App, CreationContext};
use egui::{
    vec2, Align2, CollapsingHeader, Context, Id, LayerId, Order, Rect, ScrollArea, Sense,
    TextStyle,
};
use refgraph_core::{
    EditingContext, NodeId, ReferenceDirection, ReferenceExtractor, Scene, SelectionContext,
};
use refgraph_overlay::{
    Curve, EguiCurveSink, FrameContext, OverlayRenderer, PanelRegistry, RowPhase,
};
use tracing::{debug, info, trace, warn};

use crate::config::ViewerConfig;
use crate::sample::sample_scene;

/// Horizontal offset per hierarchy level.
const INDENT: f32 = 14.0;

/// The hierarchy viewer application.
pub struct RefGraphApp {
    /// Scene shown in the hierarchy panel
    scene: Scene,
    extractor: ReferenceExtractor,
    selection: SelectionContext,
    overlay: OverlayRenderer,
    /// Panel rectangles reported during the current frame
    panels: PanelRegistry,
    /// Node opened in isolation while `isolate` is on
    isolation_root: Option<NodeId>,
    isolate: bool,
    /// Nodes whose children are hidden
    collapsed: HashSet<NodeId>,
    /// Whether reference curves are painted
    show_overlay: bool,
}

impl RefGraphApp {
    /// Create the app from the on-disk configuration, falling back to the
    /// sample scene.
    pub fn new(_cc: &CreationContext<'_>) -> Self {
        let config = ViewerConfig::load().unwrap_or_else(|err| {
            warn!(%err, "failed to load config, using defaults");
            ViewerConfig::default()
        });
        let (scene, isolation_root) = Self::load_or_sample(&config);
        Self::from_scene(scene, isolation_root, config)
    }

    /// Create the app for `scene`. Without an explicit isolation root the
    /// first top-level node is used.
    pub fn from_scene(scene: Scene, isolation_root: Option<NodeId>, config: ViewerConfig) -> Self {
        let isolation_root = isolation_root.or_else(|| scene.roots().first().copied());
        Self {
            scene,
            extractor: ReferenceExtractor::new(config.extractor),
            selection: SelectionContext::new(),
            overlay: OverlayRenderer::new(config.overlay),
            panels: PanelRegistry::new(),
            isolation_root,
            isolate: isolation_root.is_some(),
            collapsed: HashSet::new(),
            show_overlay: true,
        }
    }

    fn load_or_sample(config: &ViewerConfig) -> (Scene, Option<NodeId>) {
        match config.load_scene() {
            Ok(Some(document)) => match document.build() {
                Ok(scene) => {
                    let root = document
                        .isolated_root
                        .as_deref()
                        .and_then(|name| scene.find_by_name(name));
                    info!(nodes = scene.node_count(), "loaded scene document");
                    return (scene, root);
                }
                Err(err) => warn!(%err, "invalid scene document, using sample"),
            },
            Ok(None) => {}
            Err(err) => warn!(%err, "failed to read scene, using sample"),
        }

        let scene = sample_scene().unwrap_or_else(|err| {
            warn!(%err, "failed to build sample scene");
            Scene::default()
        });
        (scene, None)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &SelectionContext {
        &self.selection
    }

    pub fn editing_context(&self) -> EditingContext {
        match (self.isolate, self.isolation_root) {
            (true, Some(root)) => EditingContext::Isolated { root },
            _ => EditingContext::Scene,
        }
    }

    /// Change the selection and rebuild its references.
    pub fn select(&mut self, node: Option<NodeId>) -> bool {
        let context = self.editing_context();
        let selected = self
            .selection
            .select(&self.scene, &self.extractor, node, &context);
        if selected {
            let refs = self.selection.references();
            debug!(
                node = ?node,
                referenced = refs.referenced.len(),
                referencing = refs.referencing.len(),
                "selection changed"
            );
        }
        selected
    }

    /// Enter or leave isolation and recompute the current selection.
    pub fn set_isolated(&mut self, isolate: bool) {
        if self.isolate == isolate {
            return;
        }
        self.isolate = isolate;
        let context = self.editing_context();
        self.selection
            .refresh(&self.scene, &self.extractor, &context);
    }

    pub fn toggle_collapsed(&mut self, node: NodeId) {
        if !self.collapsed.remove(&node) {
            self.collapsed.insert(node);
        }
    }

    /// Expanded rows in display order, with their indentation level. While
    /// isolated only the isolation root's subtree is listed.
    pub fn visible_rows(&self) -> Vec<(NodeId, usize)> {
        let tops = match self.editing_context() {
            EditingContext::Isolated { root } => vec![root],
            EditingContext::Scene => self.scene.roots().to_vec(),
        };

        let mut rows = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = tops.into_iter().rev().map(|n| (n, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            rows.push((node, depth));
            if !self.collapsed.contains(&node) {
                stack.extend(
                    self.scene
                        .children(node)
                        .iter()
                        .rev()
                        .map(|&child| (child, depth + 1)),
                );
            }
        }
        rows
    }

    fn node_label(&self, node: NodeId) -> &str {
        self.scene.name(node).unwrap_or("<missing>")
    }

    // =========================================================================
    // UI Sections
    // =========================================================================

    fn ui_controls(&mut self, ui: &mut egui::Ui) {
        let mut isolate = self.isolate;
        ui.add_enabled_ui(self.isolation_root.is_some(), |ui| {
            let label = match self.isolation_root {
                Some(root) => format!("Isolate \"{}\"", self.node_label(root)),
                None => "Isolate".to_string(),
            };
            ui.checkbox(&mut isolate, label);
        });
        self.set_isolated(isolate);
        ui.checkbox(&mut self.show_overlay, "Show reference curves");
    }

    fn ui_hierarchy(&mut self, ui: &mut egui::Ui, display: Rect) {
        let rows = self.visible_rows();
        let row_height = ui.spacing().interact_size.y;
        let font = TextStyle::Body.resolve(ui.style());

        let mut clicked = None;
        let mut toggled = None;
        // Layout reports never draw.
        let mut unused: Vec<Curve> = Vec::new();
        let frame = FrameContext {
            selection: &self.selection,
            panels: &self.panels,
            display,
        };

        self.overlay.begin_frame();
        let output = ScrollArea::vertical()
            .auto_shrink([false, false])
            .show_rows(ui, row_height, rows.len(), |ui, range| {
                for &(node, depth) in &rows[range] {
                    let (rect, response) = ui.allocate_exact_size(
                        vec2(ui.available_width(), row_height),
                        Sense::click(),
                    );

                    let selected = frame.selection.is_selected(node);
                    let visuals = ui.visuals();
                    if selected {
                        ui.painter()
                            .rect_filled(rect, 2.0, visuals.selection.bg_fill);
                    } else if response.hovered() {
                        ui.painter()
                            .rect_filled(rect, 2.0, visuals.widgets.hovered.weak_bg_fill);
                    }

                    let marker = match (
                        self.scene.children(node).is_empty(),
                        self.collapsed.contains(&node),
                    ) {
                        (true, _) => "  ",
                        (false, true) => "▸ ",
                        (false, false) => "▾ ",
                    };
                    let name = self.scene.name(node).unwrap_or("<missing>");
                    let color = if selected {
                        visuals.selection.stroke.color
                    } else {
                        visuals.text_color()
                    };
                    ui.painter().text(
                        rect.left_center() + vec2(4.0 + depth as f32 * INDENT, 0.0),
                        Align2::LEFT_CENTER,
                        format!("{marker}{name}"),
                        font.clone(),
                        color,
                    );

                    if response.double_clicked() {
                        toggled = Some(node);
                    } else if response.clicked() {
                        clicked = Some(node);
                    }

                    self.overlay
                        .on_row(node, rect, RowPhase::Layout, &frame, &mut unused);
                }
            });

        let panel_rect = output.inner_rect;
        self.panels
            .register(self.overlay.style().panel_title.clone(), panel_rect);

        if self.show_overlay {
            let painter = ui
                .ctx()
                .layer_painter(LayerId::new(Order::Foreground, Id::new("reference_overlay")))
                .with_clip_rect(Rect::from_x_y_ranges(display.x_range(), panel_rect.y_range()));
            let frame = FrameContext {
                selection: &self.selection,
                panels: &self.panels,
                display,
            };
            let drawn = self
                .overlay
                .curve_pass(&frame, &mut EguiCurveSink::new(&painter));
            trace!(drawn, rows = rows.len(), "hierarchy painted");
        }

        if let Some(node) = toggled {
            self.toggle_collapsed(node);
        }
        if let Some(node) = clicked {
            self.select(Some(node));
        }
    }

    fn ui_references(&mut self, ui: &mut egui::Ui) {
        let Some(selected) = self.selection.selected() else {
            ui.label("Select a node in the hierarchy.");
            if self.extractor.config().require_isolated_context && !self.isolate {
                ui.weak("References are only tracked while a node is isolated.");
            }
            return;
        };

        ui.heading(self.node_label(selected));
        ui.separator();

        let refs = self.selection.references();
        let style = self.overlay.style();
        let mut jump = None;
        for (title, direction, nodes) in [
            ("References", ReferenceDirection::Outgoing, &refs.referenced),
            ("Referenced by", ReferenceDirection::Incoming, &refs.referencing),
        ] {
            CollapsingHeader::new(format!("{title} ({})", nodes.len()))
                .default_open(true)
                .show(ui, |ui| {
                    for &node in nodes {
                        let label = egui::RichText::new(self.node_label(node))
                            .color(style.color(direction));
                        if ui.link(label).clicked() {
                            jump = Some(node);
                        }
                    }
                });
        }

        if let Some(node) = jump {
            self.select(Some(node));
        }
    }
}

// =============================================================================
// eframe App Implementation
// =============================================================================

impl App for RefGraphApp {
    fn update(&mut self, ctx: &Context, _: &mut eframe::Frame) {
        let display = ctx.available_rect();

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.select(None);
        }

        egui::SidePanel::left("hierarchy_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading(self.overlay.style().panel_title.as_str());
                self.ui_controls(ui);
                ui.separator();
                self.ui_hierarchy(ui, display);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| self.ui_references(ui));
        });
    }
}
