//! View Gate - editing vs preview, gated by the public flag

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Editing,
    Preview,
}

/// Display mode plus the session-immutable public flag.
///
/// A public session never exposes editing, whatever `mode` says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewGate {
    public: bool,
    mode: ViewMode,
}

impl ViewGate {
    pub fn new(public: bool) -> Self {
        let mode = if public { ViewMode::Preview } else { ViewMode::Editing };
        Self { public, mode }
    }

    /// Build a gate with an explicit mode. Public still wins.
    pub fn with_mode(public: bool, mode: ViewMode) -> Self {
        Self { public, mode }
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Flip between editing and preview. No-op for public sessions.
    pub fn toggle(&mut self) -> ViewMode {
        if !self.public {
            self.mode = match self.mode {
                ViewMode::Editing => ViewMode::Preview,
                ViewMode::Preview => ViewMode::Editing,
            };
        }
        self.mode
    }

    pub fn editing_visible(&self) -> bool {
        !self.public && self.mode == ViewMode::Editing
    }

    pub fn toggle_visible(&self) -> bool {
        !self.public
    }

    /// Label for the toggle button, naming the mode it switches to
    pub fn toggle_label(&self) -> &'static str {
        match self.mode {
            ViewMode::Editing => "Preview",
            ViewMode::Preview => "Edit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_modes() {
        assert_eq!(ViewGate::new(false).mode(), ViewMode::Editing);
        assert_eq!(ViewGate::new(true).mode(), ViewMode::Preview);
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut gate = ViewGate::new(false);
        assert_eq!(gate.toggle(), ViewMode::Preview);
        assert!(!gate.editing_visible());
        assert_eq!(gate.toggle_label(), "Edit");
        assert_eq!(gate.toggle(), ViewMode::Editing);
        assert!(gate.editing_visible());
    }

    #[test]
    fn test_public_never_edits() {
        let mut gate = ViewGate::new(true);
        assert_eq!(gate.toggle(), ViewMode::Preview);
        assert!(!gate.toggle_visible());

        let forced = ViewGate::with_mode(true, ViewMode::Editing);
        assert!(!forced.editing_visible());
        assert!(!forced.toggle_visible());
    }
}
