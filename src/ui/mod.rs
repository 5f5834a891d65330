pub mod app;
pub mod components;
pub mod controller;
pub mod dashboard;
pub mod layout;
pub mod reports;
pub mod state;
pub mod submit;
pub mod theme;
pub mod view;

pub use app::{run_app, DashboardApp};
pub use controller::{DashboardController, Mode, Notice, NoticeKind, Tab};
pub use state::{Operation, OperationTracker, StateUpdate};
pub use theme::Palette;
pub use view::View;
