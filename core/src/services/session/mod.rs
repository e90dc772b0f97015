//! Session token codec module.
//!
//! Encrypts and decrypts the identity claims carried by a session token.
//! The codec is stateless: a pure function of the injected secret
//! configuration and its input.

mod codec;
mod config;

#[cfg(test)]
mod tests;

pub use codec::SessionTokenCodec;
pub use config::SessionTokenConfig;
