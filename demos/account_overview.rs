//! Example: Private account endpoints.
//!
//! Run with: cargo run --example account_overview
//!
//! Reads `COINONE_ACCESS_TOKEN` and `COINONE_SECRET_KEY` from the environment
//! (or a `.env` file). Only read-only endpoints are called.

use std::sync::Arc;
use std::time::Duration;

use coinone_api_client::auth::{Credentials, IncreasingNonce};
use coinone_api_client::rest::CoinoneClient;
use coinone_api_client::rest::private::{ActiveOrdersRequest, TransactionHistoryRequest};
use coinone_api_client::CurrencyPair;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let _ = dotenv::dotenv();

    let credentials = match Credentials::try_from_env() {
        Some(creds) => creds?,
        None => {
            println!("Set COINONE_ACCESS_TOKEN and COINONE_SECRET_KEY to run this example.");
            return Ok(());
        }
    };

    let client = CoinoneClient::builder()
        .credentials(credentials)
        .nonce_provider(Arc::new(IncreasingNonce::new()))
        .user_agent("coinone-api-client-examples/account_overview")
        .max_attempts(2)
        .attempt_timeout(Duration::from_secs(5))
        .build();

    println!("=== Connection ===");
    if !client.test_connection().await {
        println!("Connection test failed; check the API key permissions.");
        return Ok(());
    }
    println!("OK");

    println!("\n=== Balances ===");
    for balance in client.get_balance().await? {
        if balance.total().is_zero() {
            continue;
        }
        println!(
            "{:>6}: available {} locked {}",
            balance.currency, balance.available, balance.limit
        );
    }

    println!("\n=== KRW ===");
    let krw = client.get_currency_balance("KRW").await?;
    println!("Available: {}", krw.available);

    println!("\n=== User Info ===");
    let info = client.get_user_info().await?;
    println!("Security level: {:?}", info.security_level);
    println!("Fee rates: {} currencies", info.fee_rate.len());

    println!("\n=== Deposit Addresses ===");
    let addresses = client.get_deposit_address().await?;
    println!("BTC: {:?}", addresses.address("BTC"));

    println!("\n=== Withdrawal Address Book ===");
    let book = client.get_withdrawal_addresses(None).await?;
    for entry in &book {
        println!("{} {} ({})", entry.currency, entry.address, entry.nickname);
    }

    println!("\n=== Active BTC/KRW Orders ===");
    let orders = client
        .get_active_orders(Some(&ActiveOrdersRequest::for_pair(&CurrencyPair::btc_krw())))
        .await?;
    for order in &orders {
        println!(
            "{} {} {} @ {:?} remaining {}",
            order.order_id, order.side, order.order_type, order.price, order.remain_qty
        );
    }

    println!("\n=== Last 30 Days of Transfers ===");
    let history = client
        .get_transaction_history(&TransactionHistoryRequest::last_days(30))
        .await?;
    for record in &history {
        println!(
            "{:?} {} {} {:?}",
            record.transaction_type, record.amount, record.currency, record.status
        );
    }

    Ok(())
}
