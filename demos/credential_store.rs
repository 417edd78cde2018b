//! Example: Credential validation, persistence and signing.
//!
//! Run with: cargo run --example credential_store

use std::sync::Arc;

use coinone_api_client::auth::{
    CredentialStore, Credentials, FileCredentialStore, IncreasingNonce, NonceProvider, NonceStyle,
    SignedPayload,
};
use coinone_api_client::rest::CoinoneClient;
use coinone_api_client::CoinoneError;

const ACCESS_TOKEN: &str = "3f2a9c1e-7b4d-4e8a-9c21-5d6f7a8b9c0d";
const SECRET_KEY: &str = "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Credentials are validated on construction.
    match Credentials::new(ACCESS_TOKEN, "secret") {
        Err(CoinoneError::InvalidCredentialFormat { field }) => println!("Rejected {field}"),
        other => println!("Unexpected: {other:?}"),
    }

    // Persist a pair to disk, then reopen the store as a new session would.
    let path = std::env::temp_dir().join("coinone-api-client-example.json");
    let first_session = CoinoneClient::builder()
        .credential_store(Arc::new(FileCredentialStore::open(&path)?))
        .build();
    println!("Before configure: {:?}", first_session.status());
    if let Err(e) = first_session.configure("not-a-uuid", SECRET_KEY) {
        println!("configure refused: {e}");
    }
    first_session.configure(ACCESS_TOKEN, SECRET_KEY)?;

    let reopened = Arc::new(FileCredentialStore::open(&path)?);
    println!("Reloaded from {}: {:?}", reopened.path().display(), reopened.get());

    let client = CoinoneClient::builder()
        .credential_store(reopened.clone())
        .build();
    println!("Client status: {:?}", client.status());

    // The signed payload is what goes on the wire.
    let nonces = IncreasingNonce::new();
    if let Some(credentials) = reopened.get() {
        let signed = SignedPayload::new(
            &credentials,
            nonces.next_nonce(NonceStyle::Random),
            &serde_json::json!({ "currency": "BTC" }),
        )?;
        println!("Body:      {}", signed.body);
        println!("Payload:   {}", signed.encoded);
        println!("Signature: {}", signed.signature);
    }

    // Legacy endpoints use increasing millisecond nonces.
    let first = nonces.next_nonce(NonceStyle::Incrementing);
    let second = nonces.next_nonce(NonceStyle::Incrementing);
    println!("Legacy nonces: {first:?} < {second:?}");

    client.clear();
    println!("After clear: {:?}", client.status());
    println!("File removed: {}", !path.exists());

    Ok(())
}
