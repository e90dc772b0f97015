//! API middleware components

pub mod auth;
pub mod cors;

pub use auth::{AuthContext, RequireRole, SessionAuth};
pub use cors::create_cors;
