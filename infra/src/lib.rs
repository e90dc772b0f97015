//! # Infrastructure Layer
//!
//! Concrete implementations of the persistence contracts defined in
//! `th_core`, using MySQL through SQLx.
//!
//! The account directory lives here; the domain layer only ever sees the
//! `AccountDirectory` trait.

pub mod database;

pub use database::mysql::MySqlAccountDirectory;
pub use database::{create_pool, InfraError};
