//! Private REST API endpoints (authentication required).
//!
//! These endpoints require credentials to be configured on the client. All
//! local validation runs before a nonce is drawn or any request is sent.

mod types;

pub use types::*;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoinoneError;
use crate::rest::client::CoinoneClient;
use crate::rest::endpoints::PrivateEndpoint;
use crate::rest::transport::Transport;
use crate::types::OrderSide;

#[derive(Serialize)]
struct Empty {}

impl<T: Transport> CoinoneClient<T> {
    /// Get balances of every currency in the account.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinone_api_client::auth::Credentials;
    /// use coinone_api_client::rest::CoinoneClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let credentials = Credentials::new(
    ///         "3f2a9c1e-7b4d-4e8a-9c21-5d6f7a8b9c0d",
    ///         "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d",
    ///     )?;
    ///     let client = CoinoneClient::builder().credentials(credentials).build();
    ///
    ///     for balance in client.get_balance().await? {
    ///         println!("{}: {} available", balance.currency, balance.available);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_balance(&self) -> Result<Vec<CurrencyBalance>, CoinoneError> {
        let response: BalanceResponse = self
            .private_post(PrivateEndpoint::BalanceAll, &Empty {})
            .await?;
        Ok(response.balances)
    }

    /// Get the balance of one currency. The lookup ignores case.
    pub async fn get_currency_balance(
        &self,
        currency: &str,
    ) -> Result<CurrencyBalance, CoinoneError> {
        self.get_balance()
            .await?
            .into_iter()
            .find(|b| b.currency.eq_ignore_ascii_case(currency))
            .ok_or_else(|| CoinoneError::CurrencyNotFound(currency.to_string()))
    }

    /// Get account details (legacy v2 endpoint, millisecond nonce).
    pub async fn get_user_info(&self) -> Result<UserInfo, CoinoneError> {
        let response: UserInfoResponse = self
            .private_post(PrivateEndpoint::UserInfo, &Empty {})
            .await?;
        Ok(response.user_info)
    }

    /// Get deposit addresses (legacy v2 endpoint, millisecond nonce).
    pub async fn get_deposit_address(&self) -> Result<DepositAddresses, CoinoneError> {
        self.private_post(PrivateEndpoint::DepositAddress, &Empty {})
            .await
    }

    /// Get registered withdrawal addresses, optionally for one currency.
    pub async fn get_withdrawal_addresses(
        &self,
        request: Option<&WithdrawalAddressRequest>,
    ) -> Result<Vec<WithdrawalAddress>, CoinoneError> {
        let response: WithdrawalAddressResponse = match request {
            Some(req) => {
                self.private_post(PrivateEndpoint::WithdrawalAddressBook, req)
                    .await?
            }
            None => {
                self.private_post(PrivateEndpoint::WithdrawalAddressBook, &Empty {})
                    .await?
            }
        };
        Ok(response.withdrawal_addresses)
    }

    /// Withdraw coins to a registered address.
    pub async fn withdraw(
        &self,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawalTransaction, CoinoneError> {
        request.validate()?;
        tracing::info!(currency = %request.currency, amount = %request.amount, "Submitting withdrawal");
        let response: WithdrawalResponse = self
            .private_post(PrivateEndpoint::Withdrawal, request)
            .await?;
        Ok(response.transaction)
    }

    /// Place an order.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinone_api_client::rest::CoinoneClient;
    /// use coinone_api_client::rest::private::OrderRequest;
    /// use coinone_api_client::types::OrderSide;
    /// use rust_decimal::Decimal;
    ///
    /// # async fn example(client: CoinoneClient) -> Result<(), Box<dyn std::error::Error>> {
    /// let price = Decimal::new(50_000_000, 0);
    /// let qty = Decimal::new(1, 3); // 0.001
    /// let order = OrderRequest::limit("KRW", "BTC", OrderSide::Buy, price, qty).with_post_only(true);
    /// let response = client.create_order(&order).await?;
    /// println!("Order ID: {}", response.order_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse, CoinoneError> {
        request.validate()?;
        tracing::info!(
            order_type = %request.order_type,
            side = %request.side,
            quote = %request.quote_currency,
            target = %request.target_currency,
            "Placing order"
        );
        self.private_post(PrivateEndpoint::Order, request).await
    }

    /// Place a limit order.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_limit_order(
        &self,
        quote_currency: &str,
        target_currency: &str,
        side: OrderSide,
        price: Decimal,
        qty: Decimal,
        post_only: bool,
        user_order_id: Option<&str>,
    ) -> Result<OrderResponse, CoinoneError> {
        let mut order = OrderRequest::limit(quote_currency, target_currency, side, price, qty)
            .with_post_only(post_only);
        if let Some(id) = user_order_id {
            order = order.with_user_order_id(id);
        }
        self.create_order(&order).await
    }

    /// Place a market buy spending `amount` of the quote currency.
    pub async fn create_market_buy_order(
        &self,
        quote_currency: &str,
        target_currency: &str,
        amount: Decimal,
        limit_price: Option<Decimal>,
        user_order_id: Option<&str>,
    ) -> Result<OrderResponse, CoinoneError> {
        let mut order = OrderRequest::market_buy(quote_currency, target_currency, amount);
        order.limit_price = limit_price;
        order.user_order_id = user_order_id.map(str::to_string);
        self.create_order(&order).await
    }

    /// Place a market sell of `qty` of the target currency.
    pub async fn create_market_sell_order(
        &self,
        quote_currency: &str,
        target_currency: &str,
        qty: Decimal,
        limit_price: Option<Decimal>,
        user_order_id: Option<&str>,
    ) -> Result<OrderResponse, CoinoneError> {
        let mut order = OrderRequest::market_sell(quote_currency, target_currency, qty);
        order.limit_price = limit_price;
        order.user_order_id = user_order_id.map(str::to_string);
        self.create_order(&order).await
    }

    /// Place a stop-limit order.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_stop_limit_order(
        &self,
        quote_currency: &str,
        target_currency: &str,
        side: OrderSide,
        price: Decimal,
        qty: Decimal,
        trigger_price: Decimal,
        user_order_id: Option<&str>,
    ) -> Result<OrderResponse, CoinoneError> {
        let mut order = OrderRequest::stop_limit(
            quote_currency,
            target_currency,
            side,
            price,
            qty,
            trigger_price,
        );
        order.user_order_id = user_order_id.map(str::to_string);
        self.create_order(&order).await
    }

    /// Get unfilled orders, optionally filtered by pair and order type.
    pub async fn get_active_orders(
        &self,
        request: Option<&ActiveOrdersRequest>,
    ) -> Result<Vec<ActiveOrder>, CoinoneError> {
        let response: ActiveOrdersResponse = match request {
            Some(req) => self.private_post(PrivateEndpoint::ActiveOrders, req).await?,
            None => {
                self.private_post(PrivateEndpoint::ActiveOrders, &Empty {})
                    .await?
            }
        };
        Ok(response.active_orders)
    }

    /// Get deposit and withdrawal history for a window of at most 90 days.
    pub async fn get_transaction_history(
        &self,
        request: &TransactionHistoryRequest,
    ) -> Result<Vec<TransactionRecord>, CoinoneError> {
        let request = request.validated_at(now_millis())?;
        let response: TransactionHistoryResponse = self
            .private_post(PrivateEndpoint::TransactionHistory, &request)
            .await?;
        Ok(response.transactions)
    }

    /// Check that the configured credentials work by fetching balances.
    ///
    /// Never fails; any error is logged and reported as `false`.
    pub async fn test_connection(&self) -> bool {
        match self.get_balance().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Coinone connection test failed");
                false
            }
        }
    }
}
