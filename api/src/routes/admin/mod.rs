//! Administrator-only route handlers

pub mod get_account;

pub use get_account::get_account;
