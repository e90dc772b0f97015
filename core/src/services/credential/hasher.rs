//! Password hashing with bcrypt.

use crate::errors::CredentialError;

/// Default bcrypt work factor
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// One-way, salted, work-factor-tunable password hasher.
///
/// bcrypt embeds a random salt in every digest, so hashing the same
/// plaintext twice yields different digests; verification extracts the salt
/// from the digest and compares in constant time.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    /// Creates a hasher with the given bcrypt cost
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password
    ///
    /// # Returns
    /// * `Ok(String)` - bcrypt digest including salt and cost
    /// * `Err(CredentialError::HashingFailed)` - hashing failed
    pub fn hash_password(&self, plaintext: &str) -> Result<String, CredentialError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            CredentialError::HashingFailed
        })
    }

    /// Verify a plaintext password against a stored digest
    ///
    /// A wrong password is not an error: it returns `Ok(false)`. Only a
    /// digest that bcrypt cannot parse yields `MalformedDigest`, which is a
    /// server-side integrity fault.
    pub fn verify_password(
        &self,
        plaintext: &str,
        digest: &str,
    ) -> Result<bool, CredentialError> {
        bcrypt::verify(plaintext, digest).map_err(|e| {
            tracing::error!(error = %e, "stored password digest is malformed");
            CredentialError::MalformedDigest
        })
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}
