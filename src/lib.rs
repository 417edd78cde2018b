//! # Coinone Client
//!
//! An async Rust client library for the Coinone exchange REST API.
//!
//! ## Features
//!
//! - Signed requests for the private v2 and v2.1 endpoints
//! - Random (UUID v4) and increasing millisecond nonces, picked per endpoint
//! - Per-attempt timeouts and bounded retries with exponential backoff
//! - Pluggable credential storage (in-memory or JSON file)
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coinone_api_client::rest::CoinoneClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CoinoneClient::new();
//!     let book = client.get_orderbook("KRW", "BTC", None).await?;
//!     println!("Spread: {:?}", book.spread());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rest;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ApiError, CoinoneError};
pub use rest::{CoinoneApi, CoinoneClient};
pub use types::common::{CurrencyPair, OrderSide, OrderType};

/// Result type alias using CoinoneError
pub type Result<T> = std::result::Result<T, CoinoneError>;
