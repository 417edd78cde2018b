//! Coinone REST API endpoint constants.

use crate::auth::NonceStyle;

/// Base URL for the Coinone REST API.
pub const COINONE_BASE_URL: &str = "https://api.coinone.co.kr";

/// Header carrying `base64(body)` on private requests.
///
/// Coinone's wire name is `X-COINONE-PAYLOAD`; header names are case-insensitive.
pub const PAYLOAD_HEADER: &str = "x-coinone-payload";
/// Header carrying the hex HMAC-SHA512 signature on private requests.
///
/// Coinone's wire name is `X-COINONE-SIGNATURE`; header names are case-insensitive.
pub const SIGNATURE_HEADER: &str = "x-coinone-signature";

/// Public endpoints (no authentication required).
///
/// Each path is followed by `/{quote_currency}/{target_currency}`.
pub mod public {
    /// Get ticker information.
    pub const TICKER: &str = "/public/v2/ticker";
    /// Get order book.
    pub const ORDERBOOK: &str = "/public/v2/orderbook";
    /// Get price tick ranges.
    pub const RANGE_UNITS: &str = "/public/v2/range_units";
}

/// Private endpoints (authentication required).
///
/// The path and the nonce scheme of every endpoint are fixed here, so the
/// pairing can be audited in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivateEndpoint {
    /// Get all balances.
    BalanceAll,
    /// Get user info (legacy v2).
    UserInfo,
    /// Get deposit addresses (legacy v2).
    DepositAddress,
    /// Get withdrawal address book.
    WithdrawalAddressBook,
    /// Withdraw coins.
    Withdrawal,
    /// Place an order.
    Order,
    /// Get active orders.
    ActiveOrders,
    /// Get deposit/withdrawal history.
    TransactionHistory,
}

impl PrivateEndpoint {
    /// Every private endpoint, in table order.
    pub const ALL: [PrivateEndpoint; 8] = [
        PrivateEndpoint::BalanceAll,
        PrivateEndpoint::UserInfo,
        PrivateEndpoint::DepositAddress,
        PrivateEndpoint::WithdrawalAddressBook,
        PrivateEndpoint::Withdrawal,
        PrivateEndpoint::Order,
        PrivateEndpoint::ActiveOrders,
        PrivateEndpoint::TransactionHistory,
    ];

    /// Request path.
    pub const fn path(self) -> &'static str {
        match self {
            PrivateEndpoint::BalanceAll => "/v2.1/account/balance/all",
            PrivateEndpoint::UserInfo => "/v2/account/user_info",
            PrivateEndpoint::DepositAddress => "/v2/account/deposit_address",
            PrivateEndpoint::WithdrawalAddressBook => "/v2.1/transaction/coin/withdrawal/address_book",
            PrivateEndpoint::Withdrawal => "/v2.1/transaction/coin/withdrawal",
            PrivateEndpoint::Order => "/v2.1/order",
            PrivateEndpoint::ActiveOrders => "/v2.1/order/active_orders",
            PrivateEndpoint::TransactionHistory => "/v2.1/transaction/coin/history",
        }
    }

    /// Nonce scheme the endpoint accepts.
    pub const fn nonce_style(self) -> NonceStyle {
        match self {
            PrivateEndpoint::UserInfo | PrivateEndpoint::DepositAddress => NonceStyle::Incrementing,
            PrivateEndpoint::BalanceAll
            | PrivateEndpoint::WithdrawalAddressBook
            | PrivateEndpoint::Withdrawal
            | PrivateEndpoint::Order
            | PrivateEndpoint::ActiveOrders
            | PrivateEndpoint::TransactionHistory => NonceStyle::Random,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_endpoints_use_incrementing_nonce() {
        for endpoint in PrivateEndpoint::ALL {
            let legacy = endpoint.path().starts_with("/v2/");
            let expected = if legacy {
                NonceStyle::Incrementing
            } else {
                NonceStyle::Random
            };
            assert_eq!(endpoint.nonce_style(), expected, "{endpoint:?}");
        }
    }

    #[test]
    fn test_nonce_table() {
        assert_eq!(PrivateEndpoint::UserInfo.nonce_style(), NonceStyle::Incrementing);
        assert_eq!(PrivateEndpoint::DepositAddress.nonce_style(), NonceStyle::Incrementing);
        assert_eq!(PrivateEndpoint::BalanceAll.nonce_style(), NonceStyle::Random);
        assert_eq!(PrivateEndpoint::Order.nonce_style(), NonceStyle::Random);
        assert_eq!(PrivateEndpoint::TransactionHistory.nonce_style(), NonceStyle::Random);
    }
}
