//! Session token codec: AES-256-CBC over a scrypt-derived key.
//!
//! Wire format: `base64(hex(iv) + ":" + hex(ciphertext))`, fresh random IV
//! per token. Every decode failure (transport armor, cipher, payload shape,
//! or age) surfaces as the same opaque error so a caller cannot probe which
//! branch rejected the token; the branch is recorded in internal logs only.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use scrypt::{scrypt, Params};

use crate::domain::entities::session::SessionClaims;
use crate::errors::{DomainError, TokenError};

use super::config::SessionTokenConfig;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block size; also the IV length
const IV_LENGTH: usize = 16;

/// Derived key length for AES-256
const KEY_LENGTH: usize = 32;

/// scrypt cost parameters: N = 2^14, r = 8, p = 1
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Stateless codec for encrypted session tokens
pub struct SessionTokenCodec {
    /// Key derived once at construction; the codec never re-runs the KDF
    key: [u8; KEY_LENGTH],
    max_age_seconds: i64,
}

impl SessionTokenCodec {
    /// Creates a codec, deriving the encryption key from the configured
    /// secret and salt. The derivation is deliberately slow (scrypt); doing
    /// it here keeps the per-token cost to one cipher pass.
    pub fn new(config: SessionTokenConfig) -> Result<Self, DomainError> {
        let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LENGTH).map_err(|e| {
            DomainError::Internal {
                message: format!("Invalid scrypt parameters: {}", e),
            }
        })?;

        let mut key = [0u8; KEY_LENGTH];
        scrypt(
            config.secret.as_bytes(),
            config.kdf_salt.as_bytes(),
            &params,
            &mut key,
        )
        .map_err(|e| DomainError::Internal {
            message: format!("Key derivation failed: {}", e),
        })?;

        Ok(Self {
            key,
            max_age_seconds: config.max_age_seconds,
        })
    }

    /// Encrypts claims into a session token
    pub fn encode(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        let payload = serde_json::to_vec(claims).map_err(|e| {
            tracing::error!(error = %e, "failed to serialize session claims");
            TokenError::TokenGenerationFailed
        })?;

        self.encrypt_payload(&payload)
    }

    /// Decrypts a session token back into claims.
    ///
    /// Rejects the token when any layer fails: base64/hex armor, cipher
    /// text, payload shape (all claim fields are required), or the validity
    /// window. Always as `InvalidOrExpiredToken`.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let combined = BASE64
            .decode(token)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(|| self.reject("armor"))?;

        let (iv_hex, ciphertext_hex) = combined
            .split_once(':')
            .filter(|(iv, ct)| !iv.is_empty() && !ct.is_empty())
            .ok_or_else(|| self.reject("format"))?;

        let iv = hex::decode(iv_hex).map_err(|_| self.reject("iv"))?;
        let ciphertext = hex::decode(ciphertext_hex).map_err(|_| self.reject("ciphertext"))?;

        let decryptor = Aes256CbcDec::new_from_slices(&self.key, &iv)
            .map_err(|_| self.reject("iv-length"))?;
        let payload = decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| self.reject("cipher"))?;

        let claims: SessionClaims =
            serde_json::from_slice(&payload).map_err(|_| self.reject("claims"))?;

        if claims.is_expired(self.max_age_seconds) {
            return Err(self.reject("expired"));
        }

        Ok(claims)
    }

    /// Encrypts an arbitrary payload into the token wire format
    pub(crate) fn encrypt_payload(&self, payload: &[u8]) -> Result<String, TokenError> {
        let mut iv = [0u8; IV_LENGTH];
        OsRng.fill_bytes(&mut iv);

        let encryptor =
            Aes256CbcEnc::new_from_slices(&self.key, &iv).map_err(|_| {
                tracing::error!("invalid key or IV length for session token cipher");
                TokenError::TokenGenerationFailed
            })?;
        let ciphertext = encryptor.encrypt_padded_vec_mut::<Pkcs7>(payload);

        let combined = format!("{}:{}", hex::encode(iv), hex::encode(ciphertext));
        Ok(BASE64.encode(combined))
    }

    /// Records the internal rejection branch and returns the opaque error
    fn reject(&self, reason: &'static str) -> TokenError {
        tracing::debug!(reason = reason, "rejected session token");
        TokenError::InvalidOrExpiredToken
    }
}
