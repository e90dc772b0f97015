//! Business services containing domain logic and use cases.

pub mod account;
pub mod credential;
pub mod session;

// Re-export commonly used types
pub use account::{AccountService, AccountServiceConfig};
pub use credential::{CredentialHasher, SecretGenerator, VERIFICATION_CODE_LENGTH};
pub use session::{SessionTokenCodec, SessionTokenConfig};
