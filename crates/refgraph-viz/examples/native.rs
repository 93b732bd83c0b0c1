//! Native desktop runner for refgraph-viz.
//!
//! Run with: cargo run --example native --features native
//! Open a scene document: REFGRAPH_SCENE=level.json cargo run --example native --features native

use eframe::{run_native, NativeOptions};
use refgraph_viz::RefGraphApp;

fn main() -> eframe::Result<()> {
    #[cfg(debug_assertions)]
    {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(
                EnvFilter::from_default_env()
                    .add_directive("refgraph_viz=debug".parse().unwrap())
                    .add_directive("refgraph_core=debug".parse().unwrap()),
            )
            .init();
    }

    if std::env::args().skip(1).any(|arg| arg == "--help" || arg == "-h") {
        println!("Reference Graph Viewer");
        println!();
        println!("Usage: native");
        println!();
        println!("Environment:");
        println!("  REFGRAPH_SCENE  Path to a JSON scene document (default: built-in sample)");
        println!("  RUST_LOG        Log filter, e.g. refgraph_overlay=trace");
        println!();
        println!("Mouse and keys:");
        println!("  Click         Select a node");
        println!("  Double-click  Collapse or expand a node");
        println!("  Escape        Clear the selection");
        return Ok(());
    }

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Reference Graph Viewer"),
        ..Default::default()
    };

    run_native(
        "Reference Graph Viewer",
        options,
        Box::new(|cc| Ok(Box::new(RefGraphApp::new(cc)))),
    )
}
