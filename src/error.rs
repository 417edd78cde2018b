//! Error types for the Coinone client library.

use std::time::Duration;

use thiserror::Error;

/// The main error type for all Coinone client operations.
#[derive(Error, Debug)]
pub enum CoinoneError {
    /// Access token or secret key is not a UUID v4 string
    #[error("Invalid credential format: {field} must be a UUID v4 string")]
    InvalidCredentialFormat {
        /// Which half of the pair failed validation
        field: CredentialField,
    },

    /// A private endpoint was called without stored credentials
    #[error("Missing credentials: access token and secret key required for private endpoints")]
    NotConfigured,

    /// Order parameters are incomplete for the order type and side
    #[error("Invalid order parameters: {0}")]
    InvalidOrderParams(String),

    /// Withdrawal parameters are incomplete
    #[error("Invalid withdrawal parameters: {0}")]
    InvalidWithdrawalParams(String),

    /// Transaction history window rejected locally
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    /// Requested currency is not present in the balance set
    #[error("Balance not found for currency {0}")]
    CurrencyNotFound(String),

    /// Every transport attempt failed
    #[error("Transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The exchange answered with a non-2xx status
    #[error("HTTP error: {status}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// 2xx response whose body is not a valid envelope
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Coinone API returned `result: "error"`
    #[error("Coinone API error: {0}")]
    Exchange(ApiError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Request query parameters could not be encoded
    #[error("Query encoding error: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),

    /// A header value could not be built
    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// Credential store could not be read or written
    #[error("Credential store error: {0}")]
    CredentialStore(String),
}

impl CoinoneError {
    /// Whether a caller may reasonably retry the same request.
    ///
    /// Local validation failures and exchange rejections are never retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            CoinoneError::Transport(_) => true,
            CoinoneError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns the exchange error if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            CoinoneError::Exchange(e) => Some(e),
            _ => None,
        }
    }
}

/// Identifies one half of a credential pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    /// The public access token
    AccessToken,
    /// The secret signing key
    SecretKey,
}

impl std::fmt::Display for CredentialField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialField::AccessToken => write!(f, "access token"),
            CredentialField::SecretKey => write!(f, "secret key"),
        }
    }
}

/// Failure of the network layer, before any HTTP response was read.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be sent or its body could not be read
    #[error("request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),

    /// The attempt did not complete before its deadline
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// All attempts failed; carries the last failure
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        /// Number of attempts made
        attempts: u32,
        /// The failure of the final attempt
        #[source]
        last: Box<TransportError>,
    },
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Request(reqwest_middleware::Error::Reqwest(e))
    }
}

/// Coinone API error codes and messages.
///
/// These are errors returned by the Coinone API itself in the response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The error code from Coinone (e.g., "103")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.code, self.message)
    }
}

impl ApiError {
    /// Create a new API error from code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Check if this is an insufficient balance error.
    pub fn is_insufficient_balance(&self) -> bool {
        self.code == error_codes::LACK_OF_BALANCE
    }

    /// Check if this is a nonce error.
    pub fn is_invalid_nonce(&self) -> bool {
        matches!(
            self.code.as_str(),
            error_codes::NONCE_MISSING | error_codes::NONCE_NOT_POSITIVE | error_codes::NONCE_NOT_INCREASING
        )
    }

    /// Check if this is a signature error.
    pub fn is_invalid_signature(&self) -> bool {
        matches!(
            self.code.as_str(),
            error_codes::SIGNATURE_MISSING | error_codes::SIGNATURE_INCORRECT
        )
    }

    /// Check if this is an access token error.
    pub fn is_invalid_access_token(&self) -> bool {
        matches!(
            self.code.as_str(),
            error_codes::ACCESS_TOKEN_MISSING | error_codes::INVALID_ACCESS_TOKEN
        )
    }
}

/// Known Coinone error codes for pattern matching.
pub mod error_codes {
    /// Authentication errors
    pub const ACCESS_TOKEN_MISSING: &str = "11";
    pub const INVALID_ACCESS_TOKEN: &str = "12";
    pub const INVALID_API_PERMISSION: &str = "40";

    /// Request errors
    pub const LACK_OF_BALANCE: &str = "103";
    pub const ORDER_NOT_FOUND: &str = "104";
    pub const PARAMETER_ERROR: &str = "107";
    pub const UNKNOWN_CURRENCY: &str = "108";

    /// Signing errors
    pub const PAYLOAD_MISSING: &str = "120";
    pub const SIGNATURE_MISSING: &str = "121";
    pub const NONCE_MISSING: &str = "122";
    pub const SIGNATURE_INCORRECT: &str = "123";
    pub const NONCE_NOT_POSITIVE: &str = "130";
    pub const NONCE_NOT_INCREASING: &str = "131";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = ApiError::new("103", "Lack of Balance");
        assert_eq!(error.to_string(), "103 - Lack of Balance");
        assert!(error.is_insufficient_balance());
        assert!(!error.is_invalid_nonce());
    }

    #[test]
    fn test_nonce_codes() {
        assert!(ApiError::new("131", "nonce").is_invalid_nonce());
        assert!(ApiError::new("123", "sig").is_invalid_signature());
        assert!(ApiError::new("12", "token").is_invalid_access_token());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(CoinoneError::Transport(TransportError::Timeout(Duration::from_secs(10))).is_retryable());
        assert!(
            CoinoneError::Http {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !CoinoneError::Http {
                status: 400,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(!CoinoneError::NotConfigured.is_retryable());
        assert!(!CoinoneError::Exchange(ApiError::new("103", "Lack of Balance")).is_retryable());
    }

    #[test]
    fn test_credential_field_in_message() {
        let err = CoinoneError::InvalidCredentialFormat {
            field: CredentialField::SecretKey,
        };
        assert!(err.to_string().contains("secret key"));
    }
}
