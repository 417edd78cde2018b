//! Public REST API endpoints (no authentication required).

mod types;

pub use types::*;

use crate::error::CoinoneError;
use crate::rest::client::CoinoneClient;
use crate::rest::endpoints::public;
use crate::rest::transport::Transport;

fn pair_path(endpoint: &str, quote_currency: &str, target_currency: &str) -> String {
    format!(
        "{}/{}/{}",
        endpoint,
        quote_currency.to_uppercase(),
        target_currency.to_uppercase()
    )
}

impl<T: Transport> CoinoneClient<T> {
    /// Get the ticker for a pair.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinone_api_client::rest::CoinoneClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = CoinoneClient::new();
    ///     let ticker = client.get_ticker("KRW", "BTC").await?;
    ///     println!("high {} low {} last {}", ticker.high, ticker.low, ticker.last);
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_ticker(
        &self,
        quote_currency: &str,
        target_currency: &str,
    ) -> Result<Ticker, CoinoneError> {
        let path = pair_path(public::TICKER, quote_currency, target_currency);
        let response: TickerResponse = self.public_get(&path, None::<&()>).await?;
        response.into_ticker().ok_or_else(|| {
            CoinoneError::MalformedResponse(format!(
                "no ticker for {}/{}",
                target_currency, quote_currency
            ))
        })
    }

    /// Get the order book for a pair.
    ///
    /// # Arguments
    ///
    /// * `size` - Levels per side; defaults to 15.
    pub async fn get_orderbook(
        &self,
        quote_currency: &str,
        target_currency: &str,
        size: Option<u32>,
    ) -> Result<Orderbook, CoinoneError> {
        let path = pair_path(public::ORDERBOOK, quote_currency, target_currency);
        let request = OrderbookRequest {
            size: size.unwrap_or(DEFAULT_ORDERBOOK_SIZE),
        };
        self.public_get(&path, Some(&request)).await
    }

    /// Get the price tick table for a pair.
    pub async fn get_range_units(
        &self,
        quote_currency: &str,
        target_currency: &str,
    ) -> Result<RangeUnits, CoinoneError> {
        let path = pair_path(public::RANGE_UNITS, quote_currency, target_currency);
        self.public_get(&path, None::<&()>).await
    }
}
