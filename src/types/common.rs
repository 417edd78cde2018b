//! Common domain types for the Coinone API.

use serde::{Deserialize, Serialize};

/// Buy or sell side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type for trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Limit order - rests at the given price
    Limit,
    /// Market order - buys for a quote amount or sells a target quantity
    Market,
    /// Stop-limit order - places a limit order once the trigger price is hit
    StopLimit,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderType::Limit => "LIMIT",
            OrderType::Market => "MARKET",
            OrderType::StopLimit => "STOP_LIMIT",
        };
        write!(f, "{}", s)
    }
}

/// A trading pair as Coinone names it: the target currency priced in the quote currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency prices are quoted in (e.g. `KRW`).
    pub quote_currency: String,
    /// Currency being traded (e.g. `BTC`).
    pub target_currency: String,
}

impl CurrencyPair {
    /// Create a pair, upper-casing both symbols.
    pub fn new(quote: impl AsRef<str>, target: impl AsRef<str>) -> Self {
        Self {
            quote_currency: quote.as_ref().to_uppercase(),
            target_currency: target.as_ref().to_uppercase(),
        }
    }

    /// BTC priced in KRW.
    pub fn btc_krw() -> Self {
        Self::new("KRW", "BTC")
    }

    /// ETH priced in KRW.
    pub fn eth_krw() -> Self {
        Self::new("KRW", "ETH")
    }

    /// XRP priced in KRW.
    pub fn xrp_krw() -> Self {
        Self::new("KRW", "XRP")
    }
}

impl std::fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.target_currency, self.quote_currency)
    }
}
