//! Locating the hosting panel on screen.

use std::collections::HashMap;

use egui::Rect;
use tracing::debug;

/// Finds a panel's current screen rectangle by title.
pub trait PanelLocator {
    fn find_panel(&self, title: &str) -> Option<Rect>;
}

impl<F> PanelLocator for F
where
    F: Fn(&str) -> Option<Rect>,
{
    fn find_panel(&self, title: &str) -> Option<Rect> {
        self(title)
    }
}

/// Panel rectangles registered by the host as it lays panels out.
#[derive(Debug, Clone, Default)]
pub struct PanelRegistry {
    panels: HashMap<String, Rect>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, title: impl Into<String>, rect: Rect) {
        self.panels.insert(title.into(), rect);
    }

    pub fn remove(&mut self, title: &str) -> Option<Rect> {
        self.panels.remove(title)
    }
}

impl PanelLocator for PanelRegistry {
    fn find_panel(&self, title: &str) -> Option<Rect> {
        self.panels.get(title).copied()
    }
}

/// Bounds of the panel titled `title`, or `display` when it cannot be found.
pub fn resolve_panel_bounds(locator: &dyn PanelLocator, title: &str, display: Rect) -> Rect {
    match locator.find_panel(title) {
        Some(rect) => rect,
        None => {
            debug!(title, "panel not found, falling back to display bounds");
            display
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn registered_panel_is_found() {
        let mut registry = PanelRegistry::new();
        let rect = Rect::from_min_max(pos2(0.0, 40.0), pos2(240.0, 600.0));
        registry.register("Hierarchy", rect);

        let display = Rect::from_min_max(pos2(0.0, 0.0), pos2(1280.0, 800.0));
        assert_eq!(resolve_panel_bounds(&registry, "Hierarchy", display), rect);
    }

    #[test]
    fn missing_panel_falls_back_to_display() {
        let display = Rect::from_min_max(pos2(0.0, 0.0), pos2(1280.0, 800.0));
        let locator = |_: &str| -> Option<Rect> { None };
        assert_eq!(resolve_panel_bounds(&locator, "Hierarchy", display), display);
    }
}
