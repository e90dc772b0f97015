//! Secure random generation of verification codes and opaque tokens.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

/// Length of a human-typable verification code in digits
pub const VERIFICATION_CODE_LENGTH: usize = 6;

/// Generator for one-time codes and opaque tokens.
///
/// All output is drawn from the operating system's CSPRNG; a predictable
/// code or token is a security failure, not a quality issue.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretGenerator;

impl SecretGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a 6-digit verification code, uniform over 100000..=999999
    pub fn verification_code(&self) -> String {
        let code: u32 = OsRng.gen_range(100_000..1_000_000);
        code.to_string()
    }

    /// Generate an opaque token of `n` random bytes, hex-encoded
    pub fn opaque_token(&self, n: usize) -> String {
        let mut bytes = vec![0u8; n];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}
