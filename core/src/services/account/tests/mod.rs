//! Tests for the account service

#[cfg(test)]
mod service_tests;
