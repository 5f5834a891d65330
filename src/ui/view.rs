use ratatui::{prelude::Rect, Frame};

use crate::ui::controller::DashboardController;
use crate::ui::theme::Palette;

/// View contract for the dashboard screens.
///
/// Views hold no data of their own; they read everything from the controller
/// and draw with the palette they are handed.
pub trait View {
    fn render(&self, f: &mut Frame, area: Rect, controller: &DashboardController, palette: &Palette);

    fn title(&self) -> &'static str;

    /// Key hints shown in the status bar while the view is active
    fn key_hints(&self, _controller: &DashboardController) -> Vec<(&'static str, &'static str)> {
        vec![("Tab", "switch view"), ("q", "quit")]
    }
}
