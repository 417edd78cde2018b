//! Example: Public market data endpoints.
//!
//! Run with: cargo run --example public_market_data

use coinone_api_client::rest::CoinoneClient;
use coinone_api_client::CurrencyPair;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = CoinoneClient::new();

    for pair in [CurrencyPair::btc_krw(), CurrencyPair::eth_krw(), CurrencyPair::xrp_krw()] {
        let quote = &pair.quote_currency;
        let target = &pair.target_currency;

        println!("=== {pair} ===");
        let ticker = client.get_ticker(quote, target).await?;
        println!("Last: {} (high {}, low {})", ticker.last, ticker.high, ticker.low);

        let book = client.get_orderbook(quote, target, Some(5)).await?;
        if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
            println!("Best bid {} x {}, best ask {} x {}", bid.price, bid.qty, ask.price, ask.qty);
        }

        let units = client.get_range_units(quote, target).await?;
        if let Some(tick) = units.price_unit_for(ticker.last) {
            println!("Tick size at last price: {tick}");
        }
        println!();
    }

    Ok(())
}
