pub mod analysis;
pub mod api;
pub mod export;
pub mod models;
pub mod ui;
