//! # TutorHub Core
//!
//! Core business logic and domain layer for the TutorHub backend.
//! This crate contains domain entities, the credential and session services,
//! the account directory interface, and error types that form the foundation
//! of the application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
