//! DefectScan Gateway HTTP Server
//!
//! Serves the upload page, the analysis endpoint, and a health check.

pub mod analyze_api;
pub mod control_ui;
pub mod error;
pub mod health_api;
pub mod server;

pub use error::AppError;
pub use server::{GatewayState, build_router, start_server};
