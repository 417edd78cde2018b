//! Types for public REST API endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::types::serde_helpers::maybe_decimal;

/// Order book depth used when none is given.
pub const DEFAULT_ORDERBOOK_SIZE: u32 = 15;

/// 24h market summary for one pair.
///
/// Accepts both the flat ticker layout and the newer one with
/// `quote_currency`/`target_currency` and `*_volume` fields.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker {
    /// Target currency symbol.
    #[serde(alias = "target_currency", default)]
    pub currency: String,
    /// Quote currency symbol, when reported.
    #[serde(default)]
    pub quote_currency: Option<String>,
    /// Last traded price.
    pub last: Decimal,
    #[serde(default)]
    pub first: Decimal,
    #[serde(default)]
    pub high: Decimal,
    #[serde(default)]
    pub low: Decimal,
    /// Traded volume in the target currency.
    #[serde(alias = "target_volume", default)]
    pub volume: Decimal,
    /// Traded volume in the quote currency.
    #[serde(deserialize_with = "maybe_decimal::deserialize", default)]
    pub quote_volume: Option<Decimal>,
    #[serde(deserialize_with = "maybe_decimal::deserialize", default)]
    pub yesterday_last: Option<Decimal>,
    #[serde(deserialize_with = "maybe_decimal::deserialize", default)]
    pub yesterday_volume: Option<Decimal>,
    /// Snapshot time in milliseconds.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TickerResponse {
    List { tickers: Vec<Ticker> },
    Flat(Ticker),
}

impl TickerResponse {
    pub(crate) fn into_ticker(self) -> Option<Ticker> {
        match self {
            TickerResponse::List { tickers } => tickers.into_iter().next(),
            TickerResponse::Flat(ticker) => Some(ticker),
        }
    }
}

/// Query parameters for the order book.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OrderbookRequest {
    /// Number of levels per side.
    pub size: u32,
}

impl Default for OrderbookRequest {
    fn default() -> Self {
        Self {
            size: DEFAULT_ORDERBOOK_SIZE,
        }
    }
}

/// One price level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderbookEntry {
    pub price: Decimal,
    pub qty: Decimal,
}

/// Order book snapshot.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct Orderbook {
    /// Snapshot time in milliseconds.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub timestamp: Option<i64>,
    /// Bids, best first.
    #[serde(alias = "bid", default)]
    pub bids: Vec<OrderbookEntry>,
    /// Asks, best first.
    #[serde(alias = "ask", default)]
    pub asks: Vec<OrderbookEntry>,
}

impl Orderbook {
    /// Highest bid.
    pub fn best_bid(&self) -> Option<&OrderbookEntry> {
        self.bids.first()
    }

    /// Lowest ask.
    pub fn best_ask(&self) -> Option<&OrderbookEntry> {
        self.asks.first()
    }

    /// Difference between best ask and best bid.
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }
}

/// Tick size applying from `range_min` up to `next_range_min`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RangePriceUnit {
    pub range_min: Decimal,
    #[serde(deserialize_with = "maybe_decimal::deserialize", default)]
    pub next_range_min: Option<Decimal>,
    pub price_unit: Decimal,
}

/// Price tick table for a pair.
#[derive(Debug, Clone, Deserialize)]
pub struct RangeUnits {
    #[serde(default)]
    pub range_price_units: Vec<RangePriceUnit>,
}

impl RangeUnits {
    /// Tick size that applies to `price`.
    pub fn price_unit_for(&self, price: Decimal) -> Option<Decimal> {
        self.range_price_units
            .iter()
            .find(|r| price >= r.range_min && r.next_range_min.is_none_or(|next| price < next))
            .map(|r| r.price_unit)
    }

    /// Round `price` down to a valid tick.
    pub fn floor_to_tick(&self, price: Decimal) -> Option<Decimal> {
        let unit = self.price_unit_for(price)?;
        if unit.is_zero() {
            return Some(price);
        }
        Some((price / unit).floor() * unit)
    }
}
