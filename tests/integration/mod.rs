pub mod dashboard_flow;
pub mod feedback_gateway;
pub mod report_gateway;
