//! Client side of the employee records application.
//!
//! [`Controller`] owns the view state ([`AppState`]) and drives it through
//! the four gateway calls plus the paced screen transitions. Rendering is left
//! to whatever front end reads [`Controller::snapshot`].

pub mod config;
pub mod controller;
pub mod gateway;
pub mod session;
pub mod state;

pub use config::ClientConfig;
pub use controller::{Controller, Outcome, Pacing};
pub use gateway::{EmployeeGateway, GatewayError, GatewayResult, HttpGateway};
pub use products_hr::{Employee, EmployeeDraft};
pub use session::{FileSessionStore, MemorySessionStore, SessionError, SessionStore};
pub use state::{AppState, Mutation, Notification, View};
