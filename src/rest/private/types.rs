//! Types for private REST API endpoints.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use time::OffsetDateTime;

use crate::error::CoinoneError;
use crate::types::serde_helpers::{empty_string_as_none, is_blank, maybe_decimal};
use crate::types::{CurrencyPair, OrderSide, OrderType};

/// Longest window the transaction history endpoint accepts.
pub const MAX_HISTORY_WINDOW_MS: i64 = 90 * 24 * 60 * 60 * 1000;

/// Page size used when none is given.
pub const DEFAULT_HISTORY_SIZE: u32 = 50;

/// Largest page size the transaction history endpoint accepts.
pub const MAX_HISTORY_SIZE: u32 = 100;

/// Balance of a single currency.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyBalance {
    /// Currency symbol (e.g. `BTC`).
    pub currency: String,
    /// Amount free to trade or withdraw.
    #[serde(default)]
    pub available: Decimal,
    /// Amount locked in open orders or pending withdrawals.
    #[serde(default)]
    pub limit: Decimal,
    /// Average purchase price, when Coinone tracks one.
    #[serde(deserialize_with = "maybe_decimal::deserialize", default)]
    pub average_price: Option<Decimal>,
}

impl CurrencyBalance {
    /// Available plus locked amount.
    pub fn total(&self) -> Decimal {
        self.available + self.limit
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BalanceResponse {
    #[serde(default)]
    pub balances: Vec<CurrencyBalance>,
}

/// Account details from the legacy user info endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Virtual account used for KRW deposits.
    #[serde(default)]
    pub virtual_account_info: Option<VirtualAccountInfo>,
    /// Registered mobile phone.
    #[serde(default)]
    pub mobile_info: Option<MobileInfo>,
    /// Linked bank account.
    #[serde(default)]
    pub bank_info: Option<BankInfo>,
    /// Registered email address.
    #[serde(default)]
    pub email_info: Option<EmailInfo>,
    /// Account security level.
    #[serde(deserialize_with = "maybe_string::deserialize", default)]
    pub security_level: Option<String>,
    /// Maker and taker fee rates keyed by currency.
    #[serde(default)]
    pub fee_rate: HashMap<String, FeeRate>,
}

/// Virtual deposit account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualAccountInfo {
    #[serde(default)]
    pub depositor: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub bank_name: String,
}

/// Mobile phone registration.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileInfo {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub phone_corp: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub is_authenticated: bool,
}

/// Linked bank account.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankInfo {
    #[serde(default)]
    pub depository: String,
    #[serde(default)]
    pub bank_code: String,
    #[serde(default)]
    pub account_number: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub is_authenticated: bool,
}

/// Email registration.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailInfo {
    #[serde(default)]
    pub email: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub is_authenticated: bool,
}

/// Maker and taker fee for one currency.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeRate {
    #[serde(deserialize_with = "maybe_decimal::deserialize", default)]
    pub maker: Option<Decimal>,
    #[serde(deserialize_with = "maybe_decimal::deserialize", default)]
    pub taker: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserInfoResponse {
    #[serde(rename = "userInfo", default)]
    pub user_info: UserInfo,
}

/// Deposit addresses keyed by lowercase currency.
///
/// Currencies that need a secondary address carry it under `{currency}_tag`
/// or `{currency}_memo` (e.g. `xrp_tag`, `eos_memo`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepositAddresses {
    /// Raw address map as returned by Coinone.
    #[serde(rename = "walletAddress", default)]
    pub wallet_address: HashMap<String, Option<String>>,
}

impl DepositAddresses {
    /// Deposit address for `currency`, if one exists.
    pub fn address(&self, currency: &str) -> Option<&str> {
        self.lookup(&currency.to_lowercase())
    }

    /// Secondary address (tag or memo) for `currency`, if one exists.
    pub fn secondary_address(&self, currency: &str) -> Option<&str> {
        let currency = currency.to_lowercase();
        self.lookup(&format!("{currency}_tag"))
            .or_else(|| self.lookup(&format!("{currency}_memo")))
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.wallet_address
            .get(key)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.is_empty())
    }
}

/// Request for the withdrawal address book.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WithdrawalAddressRequest {
    /// Restrict to one currency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl WithdrawalAddressRequest {
    /// Only addresses registered for `currency`.
    pub fn for_currency(currency: impl Into<String>) -> Self {
        Self {
            currency: Some(currency.into()),
        }
    }
}

/// A registered withdrawal address.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalAddress {
    pub currency: String,
    pub address: String,
    /// Memo or destination tag.
    #[serde(deserialize_with = "empty_string_as_none::deserialize", default)]
    pub secondary_address: Option<String>,
    #[serde(default)]
    pub nickname: String,
    /// Registration time in milliseconds.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub created_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WithdrawalAddressResponse {
    #[serde(default)]
    pub withdrawal_addresses: Vec<WithdrawalAddress>,
}

/// Request to withdraw coins to a registered address.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalRequest {
    pub currency: String,
    pub amount: Decimal,
    pub address: String,
    /// Memo or destination tag. Omitted from the payload when blank.
    #[serde(skip_serializing_if = "is_blank")]
    pub secondary_address: Option<String>,
}

impl WithdrawalRequest {
    /// Create a withdrawal without a secondary address.
    pub fn new(currency: impl Into<String>, amount: Decimal, address: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            amount,
            address: address.into(),
            secondary_address: None,
        }
    }

    /// Set the memo or destination tag.
    pub fn with_secondary_address(mut self, secondary: impl Into<String>) -> Self {
        self.secondary_address = Some(secondary.into());
        self
    }

    /// Check required fields before anything is sent.
    pub fn validate(&self) -> Result<(), CoinoneError> {
        if self.currency.trim().is_empty() {
            return Err(CoinoneError::InvalidWithdrawalParams(
                "currency is required".to_string(),
            ));
        }
        if self.address.trim().is_empty() {
            return Err(CoinoneError::InvalidWithdrawalParams(
                "address is required".to_string(),
            ));
        }
        if self.amount <= Decimal::ZERO {
            return Err(CoinoneError::InvalidWithdrawalParams(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// A submitted withdrawal.
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalTransaction {
    pub id: String,
    pub currency: String,
    #[serde(default)]
    pub address: String,
    #[serde(deserialize_with = "empty_string_as_none::deserialize", default)]
    pub secondary_address: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WithdrawalResponse {
    pub transaction: WithdrawalTransaction,
}

/// Request to place an order.
///
/// Use the constructors for the common shapes; [`OrderRequest::validate`]
/// checks that the fields required by `order_type` and `side` are present.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub quote_currency: String,
    pub target_currency: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: OrderSide,
    /// Limit price (LIMIT, STOP_LIMIT).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Quantity of the target currency (LIMIT, STOP_LIMIT, MARKET SELL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,
    /// Quote currency to spend (MARKET BUY).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// Maker-only flag (LIMIT).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    /// Worst acceptable price (MARKET).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
    /// Activation price (STOP_LIMIT).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    /// Caller-chosen order identifier.
    #[serde(skip_serializing_if = "is_blank")]
    pub user_order_id: Option<String>,
}

impl OrderRequest {
    fn empty(pair: CurrencyPair, order_type: OrderType, side: OrderSide) -> Self {
        Self {
            quote_currency: pair.quote_currency,
            target_currency: pair.target_currency,
            order_type,
            side,
            price: None,
            qty: None,
            amount: None,
            post_only: None,
            limit_price: None,
            trigger_price: None,
            user_order_id: None,
        }
    }

    /// A limit order. `post_only` defaults to `false`.
    pub fn limit(
        quote_currency: &str,
        target_currency: &str,
        side: OrderSide,
        price: Decimal,
        qty: Decimal,
    ) -> Self {
        let mut order = Self::empty(
            CurrencyPair::new(quote_currency, target_currency),
            OrderType::Limit,
            side,
        );
        order.price = Some(price);
        order.qty = Some(qty);
        order.post_only = Some(false);
        order
    }

    /// A market buy spending `amount` of the quote currency.
    pub fn market_buy(quote_currency: &str, target_currency: &str, amount: Decimal) -> Self {
        let mut order = Self::empty(
            CurrencyPair::new(quote_currency, target_currency),
            OrderType::Market,
            OrderSide::Buy,
        );
        order.amount = Some(amount);
        order
    }

    /// A market sell of `qty` of the target currency.
    pub fn market_sell(quote_currency: &str, target_currency: &str, qty: Decimal) -> Self {
        let mut order = Self::empty(
            CurrencyPair::new(quote_currency, target_currency),
            OrderType::Market,
            OrderSide::Sell,
        );
        order.qty = Some(qty);
        order
    }

    /// A stop-limit order that activates at `trigger_price`.
    pub fn stop_limit(
        quote_currency: &str,
        target_currency: &str,
        side: OrderSide,
        price: Decimal,
        qty: Decimal,
        trigger_price: Decimal,
    ) -> Self {
        let mut order = Self::empty(
            CurrencyPair::new(quote_currency, target_currency),
            OrderType::StopLimit,
            side,
        );
        order.price = Some(price);
        order.qty = Some(qty);
        order.trigger_price = Some(trigger_price);
        order
    }

    /// Set the maker-only flag.
    pub fn with_post_only(mut self, post_only: bool) -> Self {
        self.post_only = Some(post_only);
        self
    }

    /// Set the worst acceptable price for a market order.
    pub fn with_limit_price(mut self, limit_price: Decimal) -> Self {
        self.limit_price = Some(limit_price);
        self
    }

    /// Set a caller-chosen order identifier.
    pub fn with_user_order_id(mut self, id: impl Into<String>) -> Self {
        self.user_order_id = Some(id.into());
        self
    }

    /// Check that the fields required for this type and side are present.
    pub fn validate(&self) -> Result<(), CoinoneError> {
        if self.quote_currency.trim().is_empty() || self.target_currency.trim().is_empty() {
            return Err(CoinoneError::InvalidOrderParams(
                "quote_currency and target_currency are required".to_string(),
            ));
        }

        let missing = |field: &str| {
            CoinoneError::InvalidOrderParams(format!(
                "{} {} order requires {}",
                self.order_type, self.side, field
            ))
        };

        match (self.order_type, self.side) {
            (OrderType::Limit, _) => {
                self.price.ok_or_else(|| missing("price"))?;
                self.qty.ok_or_else(|| missing("qty"))?;
            }
            (OrderType::Market, OrderSide::Buy) => {
                self.amount.ok_or_else(|| missing("amount"))?;
            }
            (OrderType::Market, OrderSide::Sell) => {
                self.qty.ok_or_else(|| missing("qty"))?;
            }
            (OrderType::StopLimit, _) => {
                self.price.ok_or_else(|| missing("price"))?;
                self.qty.ok_or_else(|| missing("qty"))?;
                self.trigger_price.ok_or_else(|| missing("trigger_price"))?;
            }
        }
        Ok(())
    }
}

/// Result of placing an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    /// Exchange-assigned order ID.
    pub order_id: String,
}

/// Filters for the active orders query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActiveOrdersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_type: Option<Vec<OrderType>>,
}

impl ActiveOrdersRequest {
    /// Only orders on `pair`.
    pub fn for_pair(pair: &CurrencyPair) -> Self {
        Self {
            quote_currency: Some(pair.quote_currency.clone()),
            target_currency: Some(pair.target_currency.clone()),
            order_type: None,
        }
    }

    /// Only orders of the given types.
    pub fn with_order_types(mut self, types: impl IntoIterator<Item = OrderType>) -> Self {
        self.order_type = Some(types.into_iter().collect());
        self
    }
}

/// An unfilled or partially filled order.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveOrder {
    pub order_id: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: OrderSide,
    pub quote_currency: String,
    pub target_currency: String,
    #[serde(deserialize_with = "maybe_decimal::deserialize", default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub original_qty: Decimal,
    #[serde(default)]
    pub remain_qty: Decimal,
    #[serde(default)]
    pub executed_qty: Decimal,
    #[serde(default)]
    pub canceled_qty: Decimal,
    #[serde(default)]
    pub fee: Decimal,
    #[serde(default)]
    pub fee_rate: Decimal,
    #[serde(deserialize_with = "maybe_decimal::deserialize", default)]
    pub average_executed_price: Option<Decimal>,
    /// Placement time in milliseconds.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub ordered_at: i64,
    #[serde(default)]
    pub is_triggered: Option<bool>,
    #[serde(deserialize_with = "maybe_decimal::deserialize", default)]
    pub trigger_price: Option<Decimal>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub triggered_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActiveOrdersResponse {
    #[serde(default)]
    pub active_orders: Vec<ActiveOrder>,
}

/// Query for deposit and withdrawal history.
///
/// The window `[from_ts, to_ts]` is in milliseconds, may span at most 90 days
/// and may not reach into the future.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionHistoryRequest {
    /// Restrict to one currency; all currencies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Pagination cursor from a previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_id: Option<String>,
    /// `true` for deposits only, `false` for withdrawals only, unset for both.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_deposit: Option<bool>,
    /// Page size, clamped to `1..=100`. Defaults to 50.
    pub size: Option<u32>,
    pub from_ts: i64,
    pub to_ts: i64,
}

impl TransactionHistoryRequest {
    /// Query the window `[from_ts, to_ts]`.
    pub fn new(from_ts: i64, to_ts: i64) -> Self {
        Self {
            currency: None,
            to_id: None,
            is_deposit: None,
            size: None,
            from_ts,
            to_ts,
        }
    }

    /// Query the last `days` days up to now. `days` is clamped to `1..=90`.
    pub fn last_days(days: u32) -> Self {
        let to_ts = now_millis();
        let days = i64::from(days.clamp(1, 90));
        Self::new(to_ts - days * 24 * 60 * 60 * 1000, to_ts)
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_to_id(mut self, to_id: impl Into<String>) -> Self {
        self.to_id = Some(to_id.into());
        self
    }

    pub fn deposits_only(mut self) -> Self {
        self.is_deposit = Some(true);
        self
    }

    pub fn withdrawals_only(mut self) -> Self {
        self.is_deposit = Some(false);
        self
    }

    /// Check the window against `now_ms` and normalize the page size.
    pub fn validated_at(&self, now_ms: i64) -> Result<Self, CoinoneError> {
        if self
            .to_ts
            .checked_sub(self.from_ts)
            .is_none_or(|span| span > MAX_HISTORY_WINDOW_MS)
        {
            return Err(CoinoneError::InvalidTimeRange(
                "time range cannot exceed 90 days".to_string(),
            ));
        }
        if self.from_ts >= self.to_ts {
            return Err(CoinoneError::InvalidTimeRange(
                "start time must be earlier than end time".to_string(),
            ));
        }
        if self.from_ts > now_ms || self.to_ts > now_ms {
            return Err(CoinoneError::InvalidTimeRange(
                "time cannot be later than current time".to_string(),
            ));
        }

        let mut normalized = self.clone();
        normalized.currency = normalized.currency.filter(|c| !c.trim().is_empty());
        normalized.to_id = normalized.to_id.filter(|id| !id.trim().is_empty());
        normalized.size = Some(
            self.size
                .unwrap_or(DEFAULT_HISTORY_SIZE)
                .clamp(1, MAX_HISTORY_SIZE),
        );
        Ok(normalized)
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

/// Lifecycle state of a deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    DepositWait,
    DepositSuccess,
    DepositFail,
    DepositRefund,
    DepositReject,
    WithdrawalRegister,
    WithdrawalWait,
    WithdrawalSuccess,
    WithdrawalFail,
    WithdrawalRefund,
    WithdrawalRefundFail,
    /// A status this library does not know yet.
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// Whether the transaction may still change state.
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            TransactionStatus::DepositWait
                | TransactionStatus::WithdrawalRegister
                | TransactionStatus::WithdrawalWait
        )
    }

    /// Whether the funds arrived or left successfully.
    pub fn is_success(self) -> bool {
        matches!(
            self,
            TransactionStatus::DepositSuccess | TransactionStatus::WithdrawalSuccess
        )
    }
}

/// One deposit or withdrawal.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub currency: String,
    /// Blockchain transaction ID.
    #[serde(default)]
    pub txid: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub from_address: String,
    #[serde(deserialize_with = "empty_string_as_none::deserialize", default)]
    pub from_secondary_address: Option<String>,
    #[serde(default)]
    pub to_address: String,
    #[serde(deserialize_with = "empty_string_as_none::deserialize", default)]
    pub to_secondary_address: Option<String>,
    #[serde(default)]
    pub confirmations: u32,
    pub amount: Decimal,
    #[serde(default)]
    pub fee: Decimal,
    pub status: TransactionStatus,
    /// Creation time in milliseconds.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransactionHistoryResponse {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

/// Current wall-clock time in milliseconds since UNIX epoch.
pub(crate) fn now_millis() -> i64 {
    i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

/// Deserialize an optional string that Coinone may send as a number.
mod maybe_string {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_limit_order_serialization_skips_unset_fields() {
        let order = OrderRequest::limit("KRW", "BTC", OrderSide::Buy, dec("50000000"), dec("0.001"));
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(
            json,
            r#"{"quote_currency":"KRW","target_currency":"BTC","type":"LIMIT","side":"BUY","price":"50000000","qty":"0.001","post_only":false}"#
        );
        order.validate().unwrap();
    }

    #[test]
    fn test_order_validation_per_type_and_side() {
        let mut order = OrderRequest::market_buy("KRW", "BTC", dec("10000"));
        order.validate().unwrap();
        order.amount = None;
        let err = order.validate().unwrap_err();
        assert!(matches!(err, CoinoneError::InvalidOrderParams(ref m) if m.contains("amount")));

        let mut order = OrderRequest::market_sell("KRW", "BTC", dec("0.1"));
        order.validate().unwrap();
        order.qty = None;
        assert!(order.validate().is_err());

        let mut order =
            OrderRequest::stop_limit("KRW", "BTC", OrderSide::Sell, dec("1"), dec("2"), dec("3"));
        order.validate().unwrap();
        order.trigger_price = None;
        let err = order.validate().unwrap_err();
        assert!(matches!(err, CoinoneError::InvalidOrderParams(ref m) if m.contains("trigger_price")));

        let order = OrderRequest::market_buy("", "BTC", dec("10000"));
        assert!(order.validate().is_err());
    }

    #[test]
    fn test_market_order_extras() {
        let order = OrderRequest::market_buy("krw", "eth", dec("10000"))
            .with_limit_price(dec("4000000"))
            .with_user_order_id("my-order-1");
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["quote_currency"], "KRW");
        assert_eq!(json["target_currency"], "ETH");
        assert_eq!(json["limit_price"], "4000000");
        assert_eq!(json["user_order_id"], "my-order-1");
        assert!(json.get("qty").is_none());
        assert!(json.get("post_only").is_none());
    }

    #[test]
    fn test_withdrawal_validation() {
        let request = WithdrawalRequest::new("BTC", dec("0.01"), "bc1qaddress");
        request.validate().unwrap();
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"currency":"BTC","amount":"0.01","address":"bc1qaddress"}"#
        );

        let blank_tag = request.clone().with_secondary_address("   ");
        assert!(!serde_json::to_string(&blank_tag).unwrap().contains("secondary_address"));

        let zero = WithdrawalRequest::new("BTC", Decimal::ZERO, "bc1qaddress");
        assert!(matches!(zero.validate(), Err(CoinoneError::InvalidWithdrawalParams(_))));

        let no_address = WithdrawalRequest::new("BTC", dec("1"), " ");
        assert!(matches!(
            no_address.validate(),
            Err(CoinoneError::InvalidWithdrawalParams(_))
        ));
    }

    #[test]
    fn test_history_window_validation() {
        let now = 1_700_000_000_000;
        let day = 24 * 60 * 60 * 1000;

        let ok = TransactionHistoryRequest::new(now - 90 * day, now)
            .validated_at(now)
            .unwrap();
        assert_eq!(ok.size, Some(DEFAULT_HISTORY_SIZE));

        let too_long = TransactionHistoryRequest::new(now - 90 * day - 1, now);
        assert!(matches!(
            too_long.validated_at(now),
            Err(CoinoneError::InvalidTimeRange(_))
        ));

        let reversed = TransactionHistoryRequest::new(now, now - day);
        assert!(reversed.validated_at(now).is_err());

        let empty = TransactionHistoryRequest::new(now - day, now - day);
        assert!(empty.validated_at(now).is_err());

        let future = TransactionHistoryRequest::new(now - day, now + 1);
        assert!(future.validated_at(now).is_err());
    }

    #[test]
    fn test_history_window_extreme_bounds() {
        let now = 1_700_000_000_000;
        for (from, to) in [
            (i64::MIN, 0),
            (i64::MIN, now),
            (i64::MIN, i64::MAX),
            (i64::MAX, i64::MIN),
            (0, i64::MAX),
        ] {
            let result = TransactionHistoryRequest::new(from, to).validated_at(now);
            assert!(
                matches!(result, Err(CoinoneError::InvalidTimeRange(_))),
                "window {from}..{to} should be rejected"
            );
        }
    }

    #[test]
    fn test_history_size_clamped() {
        let now = 1_700_000_000_000;
        let request = TransactionHistoryRequest::new(now - 1000, now);

        let big = request.clone().with_size(500).validated_at(now).unwrap();
        assert_eq!(big.size, Some(MAX_HISTORY_SIZE));

        let zero = request.with_size(0).validated_at(now).unwrap();
        assert_eq!(zero.size, Some(1));
    }

    #[test]
    fn test_history_serialization_omits_unset_filters() {
        let now = 1_700_000_000_000;
        let request = TransactionHistoryRequest::new(now - 1000, now)
            .withdrawals_only()
            .validated_at(now)
            .unwrap();
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"is_deposit":false,"size":50,"from_ts":1699999999000,"to_ts":1700000000000}"#
        );
    }

    #[test]
    fn test_last_days_clamps() {
        let request = TransactionHistoryRequest::last_days(365);
        assert_eq!(request.to_ts - request.from_ts, MAX_HISTORY_WINDOW_MS);

        let request = TransactionHistoryRequest::last_days(0);
        assert_eq!(request.to_ts - request.from_ts, 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_transaction_record_parsing() {
        let json = r#"{
            "id": "tx-1",
            "currency": "XRP",
            "txid": "ABCDEF",
            "type": "DEPOSIT",
            "from_address": "rSender",
            "from_secondary_address": "",
            "to_address": "rReceiver",
            "to_secondary_address": "12345",
            "confirmations": 12,
            "amount": "100.5",
            "fee": "0",
            "status": "DEPOSIT_SUCCESS",
            "created_at": 1700000000000
        }"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.transaction_type, TransactionType::Deposit);
        assert!(record.status.is_success());
        assert!(record.from_secondary_address.is_none());
        assert_eq!(record.to_secondary_address.as_deref(), Some("12345"));
        assert_eq!(record.amount, dec("100.5"));
        assert_eq!(record.created_at, 1_700_000_000_000);

        let unknown: TransactionStatus = serde_json::from_str(r#""SOMETHING_NEW""#).unwrap();
        assert_eq!(unknown, TransactionStatus::Unknown);
    }

    #[test]
    fn test_active_order_parsing() {
        let json = r#"{
            "order_id": "0e30219d-1e3a-4a68-9e28-b8d8c8a2b6a1",
            "type": "STOP_LIMIT",
            "side": "SELL",
            "quote_currency": "KRW",
            "target_currency": "BTC",
            "price": "49000000",
            "original_qty": "0.01",
            "remain_qty": "0.01",
            "executed_qty": "0",
            "canceled_qty": "0",
            "fee": "0",
            "fee_rate": "0.002",
            "average_executed_price": "0",
            "ordered_at": "1700000000000",
            "is_triggered": false,
            "trigger_price": "49500000"
        }"#;
        let order: ActiveOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_type, OrderType::StopLimit);
        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(order.ordered_at, 1_700_000_000_000);
        assert_eq!(order.trigger_price, Some(dec("49500000")));
        assert!(order.triggered_at.is_none());
    }

    #[test]
    fn test_deposit_addresses_lookup() {
        let json = r#"{"walletAddress":{"btc":"1BTC","xrp":"rXRP","xrp_tag":"42","eos":null}}"#;
        let addresses: DepositAddresses = serde_json::from_str(json).unwrap();
        assert_eq!(addresses.address("BTC"), Some("1BTC"));
        assert_eq!(addresses.secondary_address("xrp"), Some("42"));
        assert_eq!(addresses.address("eos"), None);
        assert_eq!(addresses.address("doge"), None);
    }

    #[test]
    fn test_user_info_parsing() {
        let json = r#"{
            "userInfo": {
                "securityLevel": 4,
                "emailInfo": {"email": "user@example.com", "isAuthenticated": "true"},
                "feeRate": {"btc": {"maker": "0.001", "taker": "0.002"}}
            }
        }"#;
        let response: UserInfoResponse = serde_json::from_str(json).unwrap();
        let info = response.user_info;
        assert_eq!(info.security_level.as_deref(), Some("4"));
        assert!(info.email_info.unwrap().is_authenticated);
        assert_eq!(info.fee_rate["btc"].taker, Some(dec("0.002")));
        assert!(info.bank_info.is_none());
    }

    #[test]
    fn test_balance_total() {
        let balance: CurrencyBalance = serde_json::from_str(
            r#"{"currency":"BTC","available":"0.5","limit":"0.25","average_price":""}"#,
        )
        .unwrap();
        assert_eq!(balance.total(), dec("0.75"));
        assert!(balance.average_price.is_none());
    }
}
