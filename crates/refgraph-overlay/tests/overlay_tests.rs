//! End-to-end tests: scene -> selection -> row reports -> curves.

use egui::{pos2, vec2, Color32, Rect};
use refgraph_core::{
    EditingContext, NodeId, ObjectHandle, Record, ReferenceDirection, ReferenceExtractor, Scene,
    SceneBuilder, SelectionContext,
};
use refgraph_overlay::{
    Curve, FrameContext, OverlayRenderer, OverlayStyle, PanelRegistry, RowPhase,
};

const ROW_HEIGHT: f32 = 16.0;

fn display() -> Rect {
    Rect::from_min_max(pos2(0.0, 0.0), pos2(1280.0, 800.0))
}

fn panel() -> Rect {
    Rect::from_min_max(pos2(0.0, 24.0), pos2(260.0, 424.0))
}

fn row(index: usize) -> Rect {
    Rect::from_min_size(
        pos2(0.0, panel().min.y + index as f32 * ROW_HEIGHT),
        vec2(260.0, ROW_HEIGHT),
    )
}

struct Fixture {
    scene: Scene,
    root: NodeId,
    a: NodeId,
    b: NodeId,
    c: NodeId,
    d: NodeId,
    e: NodeId,
}

/// A -> B (single), A -> [C, D] (sequence), E -> A.
fn fixture() -> Fixture {
    let mut builder = SceneBuilder::new();
    let root = builder.add_root("Level");
    let a = builder.add_child(root, "A").unwrap();
    let b = builder.add_child(root, "B").unwrap();
    let c = builder.add_child(root, "C").unwrap();
    let d = builder.add_child(root, "D").unwrap();
    let e = builder.add_child(root, "E").unwrap();
    let node = |id: NodeId| Some(ObjectHandle::Node(id));
    builder
        .attach(
            a,
            Record::new("Spawner")
                .with_single("target", node(b))
                .with_sequence("spawn_points", vec![node(c), node(d)]),
        )
        .unwrap();
    builder
        .attach(e, Record::new("Watcher").with_single("watched", node(a)))
        .unwrap();
    Fixture {
        scene: builder.build(),
        root,
        a,
        b,
        c,
        d,
        e,
    }
}

fn select(fx: &Fixture, node: NodeId) -> SelectionContext {
    let mut selection = SelectionContext::new();
    selection.select(
        &fx.scene,
        &ReferenceExtractor::default(),
        Some(node),
        &EditingContext::Isolated { root: fx.root },
    );
    selection
}

/// Report `visible` rows in order; the last one is a paint report.
fn redraw(
    renderer: &mut OverlayRenderer,
    frame: &FrameContext<'_>,
    visible: &[(NodeId, Rect)],
) -> Vec<Curve> {
    let mut curves = Vec::new();
    renderer.begin_frame();
    for (i, (node, rect)) in visible.iter().enumerate() {
        let phase = if i + 1 == visible.len() {
            RowPhase::Paint
        } else {
            RowPhase::Layout
        };
        renderer.on_row(*node, *rect, phase, frame, &mut curves);
    }
    curves
}

#[test]
fn all_rows_visible_draws_one_curve_per_edge() {
    let fx = fixture();
    let selection = select(&fx, fx.a);
    let mut panels = PanelRegistry::new();
    panels.register("Hierarchy", panel());
    let frame = FrameContext {
        selection: &selection,
        panels: &panels,
        display: display(),
    };
    let visible: Vec<_> = [fx.root, fx.a, fx.b, fx.c, fx.d, fx.e]
        .into_iter()
        .enumerate()
        .map(|(i, node)| (node, row(i)))
        .collect();

    let mut renderer = OverlayRenderer::default();
    let curves = redraw(&mut renderer, &frame, &visible);

    let outgoing: Vec<_> = curves
        .iter()
        .filter(|c| c.direction == ReferenceDirection::Outgoing)
        .collect();
    let incoming: Vec<_> = curves
        .iter()
        .filter(|c| c.direction == ReferenceDirection::Incoming)
        .collect();
    assert_eq!(outgoing.len(), 3);
    assert_eq!(incoming.len(), 1);

    let selected_mid = row(1).center().y;
    for curve in &outgoing {
        assert_eq!(curve.start.y, selected_mid);
        assert_eq!(curve.color, Color32::BLUE);
    }
    assert_eq!(incoming[0].end.y, selected_mid);
    assert_eq!(incoming[0].start.y, row(5).center().y);
    assert_eq!(incoming[0].color, Color32::RED);
}

#[test]
fn off_screen_rows_use_panel_edge_anchors() {
    let fx = fixture();
    let selection = select(&fx, fx.a);
    let mut panels = PanelRegistry::new();
    panels.register("Hierarchy", panel());
    let frame = FrameContext {
        selection: &selection,
        panels: &panels,
        display: display(),
    };
    // Only the selected row is on screen.
    let selected_rect = row(10);
    let style = OverlayStyle::default();

    let mut renderer = OverlayRenderer::new(style.clone());
    let curves = redraw(&mut renderer, &frame, &[(fx.a, selected_rect)]);
    assert_eq!(curves.len(), 4);

    for curve in &curves {
        match curve.direction {
            ReferenceDirection::Outgoing => {
                // Bottom anchor: centre sits half a row above the panel bottom.
                assert_eq!(curve.end.y, panel().max.y - selected_rect.height() / 2.0);
                assert_eq!(curve.end.x, selected_rect.min.x);
            }
            ReferenceDirection::Incoming => {
                assert_eq!(curve.start.y, panel().min.y + selected_rect.height() / 2.0);
                assert_eq!(curve.start.x, selected_rect.max.x - style.start_inset);
            }
        }
    }
}

#[test]
fn missing_panel_anchors_to_display_bounds() {
    let fx = fixture();
    let selection = select(&fx, fx.b);
    let panels = PanelRegistry::new();
    let frame = FrameContext {
        selection: &selection,
        panels: &panels,
        display: display(),
    };

    let mut renderer = OverlayRenderer::default();
    let curves = redraw(&mut renderer, &frame, &[(fx.b, row(2))]);

    // B is only referenced (by A), so the single curve comes from the top.
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].direction, ReferenceDirection::Incoming);
    assert_eq!(curves[0].start.y, display().min.y + ROW_HEIGHT / 2.0);
}

#[test]
fn transform_only_selection_draws_nothing() {
    let mut builder = SceneBuilder::new();
    let root = builder.add_root("Root");
    let lonely = builder.add_child(root, "Lonely").unwrap();
    let scene = builder.build();
    let mut selection = SelectionContext::new();
    selection.select(
        &scene,
        &ReferenceExtractor::default(),
        Some(lonely),
        &EditingContext::Isolated { root },
    );
    let panels = PanelRegistry::new();
    let frame = FrameContext {
        selection: &selection,
        panels: &panels,
        display: display(),
    };

    let mut renderer = OverlayRenderer::default();
    let curves = redraw(&mut renderer, &frame, &[(root, row(0)), (lonely, row(1))]);
    assert!(selection.references().is_empty());
    assert!(curves.is_empty());
}

/// One redraw in which every row is reported in the paint phase.
fn paint_frame(
    renderer: &mut OverlayRenderer,
    frame: &FrameContext<'_>,
    visible: &[(NodeId, Rect)],
) -> Vec<Curve> {
    let mut curves = Vec::new();
    renderer.begin_frame();
    for (node, rect) in visible {
        renderer.on_row(*node, *rect, RowPhase::Paint, frame, &mut curves);
    }
    curves
}

#[test]
fn steady_frames_never_anchor_visible_rows() {
    let fx = fixture();
    let selection = select(&fx, fx.a);
    let mut panels = PanelRegistry::new();
    panels.register("Hierarchy", panel());
    let frame = FrameContext {
        selection: &selection,
        panels: &panels,
        display: display(),
    };
    let visible: Vec<_> = [fx.root, fx.a, fx.b, fx.c, fx.d, fx.e]
        .into_iter()
        .enumerate()
        .map(|(i, node)| (node, row(i)))
        .collect();

    let mut renderer = OverlayRenderer::default();
    paint_frame(&mut renderer, &frame, &visible);
    let curves = paint_frame(&mut renderer, &frame, &visible);

    // Every paint report runs a pass, including the root's, which comes
    // before the selected row in this frame.
    assert_eq!(curves.len(), visible.len() * 4);
    let targets: Vec<f32> = [2, 3, 4].map(|i| row(i).center().y).to_vec();
    for curve in &curves {
        match curve.direction {
            ReferenceDirection::Outgoing => {
                assert!(targets.contains(&curve.end.y), "anchored end: {curve:?}");
                assert_eq!(curve.start.y, row(1).center().y);
            }
            ReferenceDirection::Incoming => {
                assert_eq!(curve.start.y, row(5).center().y, "anchored start: {curve:?}");
            }
        }
    }
}

#[test]
fn rows_scrolled_away_fall_back_to_anchors() {
    let fx = fixture();
    let selection = select(&fx, fx.a);
    let mut panels = PanelRegistry::new();
    panels.register("Hierarchy", panel());
    let frame = FrameContext {
        selection: &selection,
        panels: &panels,
        display: display(),
    };
    let everything: Vec<_> = [fx.root, fx.a, fx.b, fx.c, fx.d, fx.e]
        .into_iter()
        .enumerate()
        .map(|(i, node)| (node, row(i)))
        .collect();
    let selected_only = [(fx.a, row(1))];

    let mut renderer = OverlayRenderer::default();
    paint_frame(&mut renderer, &frame, &everything);
    // First frame without the other rows still has their last rectangles.
    paint_frame(&mut renderer, &frame, &selected_only);
    let curves = paint_frame(&mut renderer, &frame, &selected_only);

    assert_eq!(curves.len(), 4);
    for curve in &curves {
        match curve.direction {
            ReferenceDirection::Outgoing => {
                assert_eq!(curve.end.y, panel().max.y - ROW_HEIGHT / 2.0)
            }
            ReferenceDirection::Incoming => {
                assert_eq!(curve.start.y, panel().min.y + ROW_HEIGHT / 2.0)
            }
        }
    }
}

#[test]
fn no_selection_draws_nothing() {
    let fx = fixture();
    let selection = SelectionContext::new();
    let panels = PanelRegistry::new();
    let frame = FrameContext {
        selection: &selection,
        panels: &panels,
        display: display(),
    };

    let mut renderer = OverlayRenderer::default();
    let curves = redraw(&mut renderer, &frame, &[(fx.a, row(0)), (fx.e, row(1))]);
    assert!(curves.is_empty());
    assert_eq!(renderer.selected_row(&selection), None);
}
