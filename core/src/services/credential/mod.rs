//! Credential primitives: password hashing and secret generation.
//!
//! Both components are stateless; the hasher is a pure function of its
//! inputs and the configured work factor, the generator draws from the
//! operating system's secure random source.

mod generator;
mod hasher;

pub use generator::{SecretGenerator, VERIFICATION_CODE_LENGTH};
pub use hasher::CredentialHasher;
