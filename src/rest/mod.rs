//! Coinone REST API client.
//!
//! Private endpoints are signed with the account's secret key and sent
//! through a [`Transport`] that bounds every attempt with a timeout and
//! retries transport failures with exponential backoff. Public endpoints are
//! plain GETs over the same transport.
//!
//! # Trait-based API
//!
//! The [`CoinoneApi`] trait abstracts all REST operations, so callers can
//! swap in mock implementations or decorators.
//!
//! ```rust,no_run
//! use coinone_api_client::rest::{CoinoneApi, CoinoneClient};
//!
//! async fn show_btc<C: CoinoneApi>(client: &C) -> Result<(), coinone_api_client::CoinoneError> {
//!     let ticker = client.get_ticker("KRW", "BTC").await?;
//!     println!("BTC: {}", ticker.last);
//!     Ok(())
//! }
//! ```

mod client;
mod endpoints;
pub mod private;
pub mod public;
mod traits;
pub mod transport;

pub use client::{ClientStatus, CoinoneClient, CoinoneClientBuilder, DefaultTransport};
pub use endpoints::*;
pub use traits::CoinoneApi;
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, RetryPolicy, RetryState, RetryStateMachine,
    RetryTransport, Transport,
};
