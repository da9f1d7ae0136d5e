//! Authgate Core - token lifecycle and validation
//!
//! Issues HMAC-signed tokens on login and validates presented tokens in two
//! steps: the signature and expiry are checked locally, then the token is
//! cross-checked against the one currently on file in the identity store.
//! Refresh overwrites the stored token and logout clears it, which revokes
//! outstanding tokens before their natural expiry.

pub mod claims;
pub mod config;
pub mod crypto;
pub mod error;
pub mod service;
pub mod signer;

pub use claims::Claims;
pub use config::{parse_algorithm, AuthConfig};
pub use crypto::{SecretError, SigningSecret};
pub use error::*;
pub use service::{Credentials, IssuedToken, TokenService};
pub use signer::{SignedToken, TokenSigner};

pub use jsonwebtoken::Algorithm;
