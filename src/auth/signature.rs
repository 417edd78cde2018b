//! HMAC-SHA512 signature generation for Coinone API authentication.
//!
//! Coinone private endpoints require:
//! ```text
//! body      = JSON({access_token, nonce, ...params})
//! payload   = base64(body)
//! signature = hex(HMAC-SHA512(payload, secret_key))
//! ```
//!
//! `payload` and `signature` travel as headers, `body` as the request body.
//! The body is serialized once and reused for both, so the signed bytes and
//! the transmitted bytes cannot drift apart.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha512;

use crate::auth::{Credentials, Nonce};
use crate::error::{CoinoneError, CredentialField};

type HmacSha512 = Hmac<Sha512>;

/// Base64-encode a serialized payload (standard alphabet, padded).
pub fn encode_payload(body: &str) -> String {
    BASE64.encode(body.as_bytes())
}

/// Sign an encoded payload with the secret key.
///
/// # Returns
///
/// Lowercase hex HMAC-SHA512 digest (128 characters).
///
/// # Example
///
/// ```rust
/// use coinone_api_client::auth::{encode_payload, sign_payload};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let encoded = encode_payload(r#"{"access_token":"token","nonce":"n"}"#);
/// let signature = sign_payload("secret", &encoded)?;
/// assert_eq!(signature.len(), 128);
/// # Ok(())
/// # }
/// ```
pub fn sign_payload(secret_key: &str, encoded_payload: &str) -> Result<String, CoinoneError> {
    let mut hmac = HmacSha512::new_from_slice(secret_key.as_bytes()).map_err(|_| {
        CoinoneError::InvalidCredentialFormat {
            field: CredentialField::SecretKey,
        }
    })?;
    hmac.update(encoded_payload.as_bytes());
    Ok(hex::encode(hmac.finalize().into_bytes()))
}

/// Field order of the signed payload: token, nonce, then request fields.
#[derive(Serialize)]
struct AuthenticatedPayload<'a, P: Serialize + ?Sized> {
    access_token: &'a str,
    nonce: &'a Nonce,
    #[serde(flatten)]
    params: &'a P,
}

/// A request body together with its encoded form and signature.
#[derive(Debug, Clone)]
pub struct SignedPayload {
    /// Serialized JSON sent as the request body.
    pub body: String,
    /// `base64(body)`, sent in the payload header.
    pub encoded: String,
    /// Hex HMAC-SHA512 of `encoded`, sent in the signature header.
    pub signature: String,
    /// The nonce embedded in `body`.
    pub nonce: Nonce,
}

impl SignedPayload {
    /// Build and sign the payload for one request.
    ///
    /// `params` must serialize to a JSON object (or a unit/empty struct).
    pub fn new<P>(credentials: &Credentials, nonce: Nonce, params: &P) -> Result<Self, CoinoneError>
    where
        P: Serialize + ?Sized,
    {
        let payload = AuthenticatedPayload {
            access_token: credentials.access_token(),
            nonce: &nonce,
            params,
        };
        let body = serde_json::to_string(&payload)?;
        let encoded = encode_payload(&body);
        let signature = sign_payload(credentials.expose_secret(), &encoded)?;

        Ok(Self {
            body,
            encoded,
            signature,
            nonce,
        })
    }

    /// Body length in bytes, for the `Content-Length` header.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}
