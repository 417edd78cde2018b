use coinone_api_client::auth::Credentials;
use coinone_api_client::rest::CoinoneClient;
use coinone_api_client::rest::private::TransactionHistoryRequest;

fn live_tests_enabled() -> bool {
    std::env::var("COINONE_LIVE_TESTS").ok().as_deref() == Some("1")
}

#[tokio::test]
#[ignore]
async fn live_public_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let client = CoinoneClient::new();
    let ticker = client.get_ticker("KRW", "BTC").await?;
    assert!(ticker.last > rust_decimal::Decimal::ZERO);

    let units = client.get_range_units("KRW", "BTC").await?;
    assert!(!units.range_price_units.is_empty());

    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_private_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let credentials = match Credentials::try_from_env() {
        Some(creds) => creds?,
        None => return Ok(()),
    };
    let client = CoinoneClient::builder().credentials(credentials).build();

    assert!(client.test_connection().await);
    let _balances = client.get_balance().await?;
    let _user_info = client.get_user_info().await?;
    let _history = client
        .get_transaction_history(&TransactionHistoryRequest::last_days(7))
        .await?;

    Ok(())
}
