pub mod chart_projection;
pub mod view_model;
