//! Authentication: the session guard and its collaborators.
//!
//! This module provides:
//! - `guard::authorize`: per-activation authorization check with silent
//!   token refresh
//! - `Session`/`TokenStore`: persistent access/refresh pair storage
//! - `token`: signature-less claim decoding (expiry only)
//! - `CredentialStore`: remembered username/password via the OS keyring

pub mod credentials;
pub mod guard;
pub mod session;
pub mod token;

pub use credentials::CredentialStore;
pub use guard::{authorize, AuthState, AuthStatus, RefreshTokens};
pub use session::{Session, TokenStore};
pub use token::TokenPair;
