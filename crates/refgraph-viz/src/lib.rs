//! egui hierarchy viewer for reference graphs.
//!
//! Shows a scene as a collapsible tree in a left "Hierarchy" panel. Selecting
//! a row extracts the node's references and draws a curve from the selected
//! row to every row it references (and from every row that references it).
//! The central panel lists the same relations by name.
//!
//! Run natively with: `cargo run --example native --features native`

mod app;
mod config;
mod sample;

pub use app::RefGraphApp;
pub use config::{ConfigError, ConfigResult, ViewerConfig, SCENE_ENV};
pub use sample::{sample_scene, SAMPLE_ENEMIES};
