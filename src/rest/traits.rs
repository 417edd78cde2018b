//! Trait definition for the Coinone REST API client.
//!
//! [`CoinoneApi`] abstracts every REST operation so callers can depend on it
//! and substitute a mock or a decorator in tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use coinone_api_client::rest::CoinoneApi;
//!
//! async fn print_krw<C: CoinoneApi>(client: &C) -> Result<(), coinone_api_client::CoinoneError> {
//!     let krw = client.get_currency_balance("KRW").await?;
//!     println!("KRW available: {}", krw.available);
//!     Ok(())
//! }
//! ```

use std::future::Future;

use rust_decimal::Decimal;

use crate::error::CoinoneError;
use crate::rest::private::{
    ActiveOrder, ActiveOrdersRequest, CurrencyBalance, DepositAddresses, OrderRequest,
    OrderResponse, TransactionHistoryRequest, TransactionRecord, UserInfo, WithdrawalAddress,
    WithdrawalAddressRequest, WithdrawalRequest, WithdrawalTransaction,
};
use crate::rest::public::{Orderbook, RangeUnits, Ticker};
use crate::types::OrderSide;

/// Trait defining all Coinone REST API operations.
///
/// All methods are async and return `Result<T, CoinoneError>`, except
/// [`test_connection`](CoinoneApi::test_connection) which reports failure as
/// `false`.
pub trait CoinoneApi: Send + Sync {
    // ========== Public Endpoints ==========

    /// Get the ticker for a pair.
    fn get_ticker(
        &self,
        quote_currency: &str,
        target_currency: &str,
    ) -> impl Future<Output = Result<Ticker, CoinoneError>> + Send;

    /// Get the order book for a pair.
    fn get_orderbook(
        &self,
        quote_currency: &str,
        target_currency: &str,
        size: Option<u32>,
    ) -> impl Future<Output = Result<Orderbook, CoinoneError>> + Send;

    /// Get the price tick table for a pair.
    fn get_range_units(
        &self,
        quote_currency: &str,
        target_currency: &str,
    ) -> impl Future<Output = Result<RangeUnits, CoinoneError>> + Send;

    // ========== Private Endpoints - Account ==========

    /// Get balances of every currency.
    fn get_balance(&self) -> impl Future<Output = Result<Vec<CurrencyBalance>, CoinoneError>> + Send;

    /// Get the balance of one currency.
    fn get_currency_balance(
        &self,
        currency: &str,
    ) -> impl Future<Output = Result<CurrencyBalance, CoinoneError>> + Send;

    /// Get account details.
    fn get_user_info(&self) -> impl Future<Output = Result<UserInfo, CoinoneError>> + Send;

    /// Get deposit addresses.
    fn get_deposit_address(
        &self,
    ) -> impl Future<Output = Result<DepositAddresses, CoinoneError>> + Send;

    /// Check that the configured credentials work.
    fn test_connection(&self) -> impl Future<Output = bool> + Send;

    // ========== Private Endpoints - Funding ==========

    /// Get registered withdrawal addresses.
    fn get_withdrawal_addresses(
        &self,
        request: Option<&WithdrawalAddressRequest>,
    ) -> impl Future<Output = Result<Vec<WithdrawalAddress>, CoinoneError>> + Send;

    /// Withdraw coins.
    fn withdraw(
        &self,
        request: &WithdrawalRequest,
    ) -> impl Future<Output = Result<WithdrawalTransaction, CoinoneError>> + Send;

    /// Get deposit and withdrawal history.
    fn get_transaction_history(
        &self,
        request: &TransactionHistoryRequest,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>, CoinoneError>> + Send;

    // ========== Private Endpoints - Trading ==========

    /// Place an order.
    fn create_order(
        &self,
        request: &OrderRequest,
    ) -> impl Future<Output = Result<OrderResponse, CoinoneError>> + Send;

    /// Place a limit order.
    #[allow(clippy::too_many_arguments)]
    fn create_limit_order(
        &self,
        quote_currency: &str,
        target_currency: &str,
        side: OrderSide,
        price: Decimal,
        qty: Decimal,
        post_only: bool,
        user_order_id: Option<&str>,
    ) -> impl Future<Output = Result<OrderResponse, CoinoneError>> + Send;

    /// Place a market buy spending `amount` of the quote currency.
    fn create_market_buy_order(
        &self,
        quote_currency: &str,
        target_currency: &str,
        amount: Decimal,
        limit_price: Option<Decimal>,
        user_order_id: Option<&str>,
    ) -> impl Future<Output = Result<OrderResponse, CoinoneError>> + Send;

    /// Place a market sell of `qty` of the target currency.
    fn create_market_sell_order(
        &self,
        quote_currency: &str,
        target_currency: &str,
        qty: Decimal,
        limit_price: Option<Decimal>,
        user_order_id: Option<&str>,
    ) -> impl Future<Output = Result<OrderResponse, CoinoneError>> + Send;

    /// Place a stop-limit order.
    #[allow(clippy::too_many_arguments)]
    fn create_stop_limit_order(
        &self,
        quote_currency: &str,
        target_currency: &str,
        side: OrderSide,
        price: Decimal,
        qty: Decimal,
        trigger_price: Decimal,
        user_order_id: Option<&str>,
    ) -> impl Future<Output = Result<OrderResponse, CoinoneError>> + Send;

    /// Get unfilled orders.
    fn get_active_orders(
        &self,
        request: Option<&ActiveOrdersRequest>,
    ) -> impl Future<Output = Result<Vec<ActiveOrder>, CoinoneError>> + Send;
}
