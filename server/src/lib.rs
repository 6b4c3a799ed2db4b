//! CRUD gateway for employee records: an axum router translating each HTTP
//! operation into one [`platform_db::EmployeeStore`] call.

pub mod config;
pub mod employees;
pub mod http;

pub use config::{AppConfig, StoreBackend};
pub use http::{AppState, ServeConfig, build_router, serve, serve_listener};
