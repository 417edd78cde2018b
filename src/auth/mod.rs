//! Authentication module for Coinone API.
//!
//! This module provides:
//! - Credential validation and pluggable credential storage
//! - Nonce generation (random UUID v4 and increasing millisecond nonces)
//! - HMAC-SHA512 signing of the base64-encoded JSON payload

mod credentials;
mod nonce;
mod signature;

pub use credentials::{
    ACCESS_TOKEN_ENV, CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore,
    SECRET_KEY_ENV, is_uuid_v4,
};
pub use nonce::{IncreasingNonce, Nonce, NonceProvider, NonceStyle};
pub use signature::{SignedPayload, encode_payload, sign_payload};
