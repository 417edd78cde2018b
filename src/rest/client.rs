//! Coinone REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{
    ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::auth::{
    CredentialStore, Credentials, IncreasingNonce, MemoryCredentialStore, NonceProvider,
    NonceStyle, SignedPayload, is_uuid_v4,
};
use crate::error::{ApiError, CoinoneError};
use crate::rest::endpoints::{COINONE_BASE_URL, PAYLOAD_HEADER, PrivateEndpoint, SIGNATURE_HEADER};
use crate::rest::private::{
    ActiveOrder, ActiveOrdersRequest, CurrencyBalance, DepositAddresses, OrderRequest,
    OrderResponse, TransactionHistoryRequest, TransactionRecord, UserInfo, WithdrawalAddress,
    WithdrawalAddressRequest, WithdrawalRequest, WithdrawalTransaction,
};
use crate::rest::public::{Orderbook, RangeUnits, Ticker};
use crate::rest::traits::CoinoneApi;
use crate::rest::transport::{
    HttpRequest, HttpResponse, HttpTransport, RetryPolicy, RetryTransport, Transport,
};
use crate::types::OrderSide;

/// Transport used by [`CoinoneClient::new`] and [`CoinoneClientBuilder::build`].
pub type DefaultTransport = RetryTransport<HttpTransport>;

/// The Coinone REST API client.
///
/// Handles request signing, timeouts and retries for the private endpoints,
/// and plain GETs for the public ones. Credentials live in a
/// [`CredentialStore`] and are read once per request.
///
/// # Example
///
/// ```rust,no_run
/// use coinone_api_client::rest::CoinoneClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CoinoneClient::new();
///     let ticker = client.get_ticker("KRW", "BTC").await?;
///     println!("BTC/KRW last: {}", ticker.last);
///     Ok(())
/// }
/// ```
///
/// For private endpoints, configure credentials first:
///
/// ```rust,no_run
/// use coinone_api_client::rest::CoinoneClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CoinoneClient::new();
///     client.configure(
///         "3f2a9c1e-7b4d-4e8a-9c21-5d6f7a8b9c0d",
///         "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d",
///     )?;
///
///     let balances = client.get_balance().await?;
///     println!("Balances: {:?}", balances);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CoinoneClient<T = DefaultTransport> {
    transport: T,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
    nonce_provider: Arc<dyn NonceProvider>,
}

/// Snapshot of the client's credential state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientStatus {
    /// Whether a credential pair is stored.
    pub has_credentials: bool,
    /// Whether the stored access token is a UUID v4 string.
    pub access_token_valid: bool,
    /// Whether the stored secret key is a UUID v4 string.
    pub secret_key_valid: bool,
}

impl CoinoneClient {
    /// Create a new client with default settings and no credentials.
    ///
    /// Use [`CoinoneClient::configure`] or [`CoinoneClient::builder()`] to
    /// enable private endpoints.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> CoinoneClientBuilder {
        CoinoneClientBuilder::new()
    }
}

impl<T: Transport> CoinoneClient<T> {
    /// Validate and store a credential pair.
    ///
    /// Both values are checked before anything is stored, so a failed call
    /// leaves the previous pair in place.
    pub fn configure(
        &self,
        access_token: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<(), CoinoneError> {
        let credentials = Credentials::new(access_token, secret_key)?;
        if self.credentials.set(credentials) {
            Ok(())
        } else {
            Err(CoinoneError::CredentialStore(
                "failed to save credentials".to_string(),
            ))
        }
    }

    /// Discard stored credentials. Calling it again is a no-op.
    pub fn clear(&self) {
        if !self.credentials.clear() {
            tracing::warn!("Credential store refused to clear credentials");
        }
    }

    /// Report whether credentials are configured.
    pub fn status(&self) -> ClientStatus {
        match self.credentials.get() {
            Some(creds) => ClientStatus {
                has_credentials: true,
                access_token_valid: is_uuid_v4(creds.access_token()),
                secret_key_valid: is_uuid_v4(creds.expose_secret()),
            },
            None => ClientStatus {
                has_credentials: false,
                access_token_valid: false,
                secret_key_valid: false,
            },
        }
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sign and send a request to a private endpoint.
    ///
    /// Credentials are snapshotted once at the start, so a concurrent
    /// [`clear`](Self::clear) either fails this call with
    /// [`CoinoneError::NotConfigured`] before any I/O or does not affect it.
    /// The body is serialized once; the same bytes are signed and sent.
    ///
    /// Returns the validated response envelope.
    pub async fn execute_signed<P>(
        &self,
        endpoint: &str,
        params: &P,
        nonce_style: NonceStyle,
    ) -> Result<Value, CoinoneError>
    where
        P: Serialize + ?Sized + Sync,
    {
        let credentials = self.credentials.get().ok_or(CoinoneError::NotConfigured)?;
        let nonce = self.nonce_provider.next_nonce(nonce_style);
        let signed = SignedPayload::new(&credentials, nonce, params)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(PAYLOAD_HEADER),
            HeaderValue::from_str(&signed.encoded)?,
        );
        headers.insert(
            HeaderName::from_static(SIGNATURE_HEADER),
            HeaderValue::from_str(&signed.signature)?,
        );
        headers.insert(CONTENT_LENGTH, HeaderValue::from(signed.content_length()));

        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = HttpRequest::post(url, signed.body);
        request.headers = headers;

        tracing::debug!(endpoint, %nonce_style, "Sending signed request");
        let result = match self.transport.send(request).await {
            Ok(response) => parse_envelope(response, true),
            Err(e) => Err(CoinoneError::from(e)),
        };

        if let Err(e) = &result {
            tracing::warn!(endpoint, error = %e, "Coinone API request failed");
        }
        result
    }

    /// Sign and send a request to a private endpoint, deserializing the envelope.
    pub(crate) async fn private_post<R, P>(
        &self,
        endpoint: PrivateEndpoint,
        params: &P,
    ) -> Result<R, CoinoneError>
    where
        R: DeserializeOwned,
        P: Serialize + ?Sized + Sync,
    {
        let envelope = self
            .execute_signed(endpoint.path(), params, endpoint.nonce_style())
            .await?;
        from_envelope(envelope)
    }

    /// Make a public GET request with optional query parameters.
    pub(crate) async fn public_get<R, Q>(
        &self,
        endpoint: &str,
        params: Option<&Q>,
    ) -> Result<R, CoinoneError>
    where
        R: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint))?;
        if let Some(params) = params {
            let query = serde_urlencoded::to_string(params)?;
            if !query.is_empty() {
                url.set_query(Some(&query));
            }
        }

        let mut request = HttpRequest::get(url.as_str());
        request
            .headers
            .insert(ACCEPT, HeaderValue::from_static("application/json"));

        let response = self.transport.send(request).await?;
        from_envelope(parse_envelope(response, false)?)
    }
}

impl Default for CoinoneClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for CoinoneClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinoneClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.credentials.get().is_some())
            .finish()
    }
}

/// Builder for [`CoinoneClient`].
pub struct CoinoneClientBuilder {
    base_url: String,
    credential_store: Option<Arc<dyn CredentialStore>>,
    nonce_provider: Option<Arc<dyn NonceProvider>>,
    user_agent: Option<String>,
    retry_policy: RetryPolicy,
}

impl CoinoneClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: COINONE_BASE_URL.to_string(),
            credential_store: None,
            nonce_provider: None,
            user_agent: None,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Start with an in-memory store holding `credentials`.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credential_store = Some(Arc::new(MemoryCredentialStore::with_credentials(
            credentials,
        )));
        self
    }

    /// Use a custom credential store.
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credential_store = Some(store);
        self
    }

    /// Set a custom nonce provider.
    pub fn nonce_provider(mut self, provider: Arc<dyn NonceProvider>) -> Self {
        self.nonce_provider = Some(provider);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the whole retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Set the total number of attempts per request.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.retry_policy.max_attempts = attempts.max(1);
        self
    }

    /// Set the deadline for each attempt.
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.retry_policy.attempt_timeout = timeout;
        self
    }

    /// Build the client over `reqwest` with retries.
    pub fn build(self) -> CoinoneClient {
        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("coinone-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("coinone-api-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let policy = self.retry_policy;
        self.build_with_transport(RetryTransport::new(HttpTransport::new(reqwest_client), policy))
    }

    /// Build the client over a caller-supplied transport.
    ///
    /// The transport is used as-is; wrap it in [`RetryTransport`] to get
    /// timeouts and retries.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> CoinoneClient<T> {
        let credentials = self
            .credential_store
            .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new()));
        let nonce_provider = self
            .nonce_provider
            .unwrap_or_else(|| Arc::new(IncreasingNonce::new()));

        CoinoneClient {
            transport,
            base_url: self.base_url,
            credentials,
            nonce_provider,
        }
    }
}

impl Default for CoinoneClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a response and normalize its error shape.
///
/// v2.1 endpoints report errors as `error_code`, the legacy v2 endpoints as
/// `errorCode`; both end up in [`ApiError::code`]. Public endpoints may omit
/// `result` entirely, so it is only mandatory when `require_result` is set.
pub(crate) fn parse_envelope(
    response: HttpResponse,
    require_result: bool,
) -> Result<Value, CoinoneError> {
    if !response.status.is_success() {
        return Err(CoinoneError::Http {
            status: response.status.as_u16(),
            body: response.body,
        });
    }

    let value: Value = serde_json::from_str(&response.body).map_err(|e| {
        CoinoneError::MalformedResponse(format!(
            "Failed to parse response: {}. Body: {}",
            e, response.body
        ))
    })?;

    let Some(object) = value.as_object() else {
        return Err(CoinoneError::MalformedResponse(format!(
            "Expected a JSON object. Body: {}",
            response.body
        )));
    };

    match object.get("result") {
        Some(Value::String(result)) if result == "success" => Ok(value),
        Some(Value::String(_)) => {
            let code = object
                .get("error_code")
                .or_else(|| object.get("errorCode"))
                .and_then(code_to_string)
                .unwrap_or_else(|| "unknown".to_string());
            let message = object
                .get("error_msg")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string();
            Err(CoinoneError::Exchange(ApiError::new(code, message)))
        }
        Some(other) => Err(CoinoneError::MalformedResponse(format!(
            "Unexpected 'result' value: {}",
            other
        ))),
        None if require_result => Err(CoinoneError::MalformedResponse(
            "Response missing 'result' field".to_string(),
        )),
        None => Ok(value),
    }
}

fn code_to_string(code: &Value) -> Option<String> {
    match code {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Deserialize a validated envelope into a typed response.
pub(crate) fn from_envelope<R: DeserializeOwned>(envelope: Value) -> Result<R, CoinoneError> {
    serde_json::from_value(envelope)
        .map_err(|e| CoinoneError::MalformedResponse(format!("Unexpected response shape: {e}")))
}

impl<T: Transport> CoinoneApi for CoinoneClient<T> {
    // ========== Public Endpoints ==========

    async fn get_ticker(
        &self,
        quote_currency: &str,
        target_currency: &str,
    ) -> Result<Ticker, CoinoneError> {
        CoinoneClient::get_ticker(self, quote_currency, target_currency).await
    }

    async fn get_orderbook(
        &self,
        quote_currency: &str,
        target_currency: &str,
        size: Option<u32>,
    ) -> Result<Orderbook, CoinoneError> {
        CoinoneClient::get_orderbook(self, quote_currency, target_currency, size).await
    }

    async fn get_range_units(
        &self,
        quote_currency: &str,
        target_currency: &str,
    ) -> Result<RangeUnits, CoinoneError> {
        CoinoneClient::get_range_units(self, quote_currency, target_currency).await
    }

    // ========== Private Endpoints - Account ==========

    async fn get_balance(&self) -> Result<Vec<CurrencyBalance>, CoinoneError> {
        CoinoneClient::get_balance(self).await
    }

    async fn get_currency_balance(&self, currency: &str) -> Result<CurrencyBalance, CoinoneError> {
        CoinoneClient::get_currency_balance(self, currency).await
    }

    async fn get_user_info(&self) -> Result<UserInfo, CoinoneError> {
        CoinoneClient::get_user_info(self).await
    }

    async fn get_deposit_address(&self) -> Result<DepositAddresses, CoinoneError> {
        CoinoneClient::get_deposit_address(self).await
    }

    async fn test_connection(&self) -> bool {
        CoinoneClient::test_connection(self).await
    }

    // ========== Private Endpoints - Funding ==========

    async fn get_withdrawal_addresses(
        &self,
        request: Option<&WithdrawalAddressRequest>,
    ) -> Result<Vec<WithdrawalAddress>, CoinoneError> {
        CoinoneClient::get_withdrawal_addresses(self, request).await
    }

    async fn withdraw(
        &self,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawalTransaction, CoinoneError> {
        CoinoneClient::withdraw(self, request).await
    }

    async fn get_transaction_history(
        &self,
        request: &TransactionHistoryRequest,
    ) -> Result<Vec<TransactionRecord>, CoinoneError> {
        CoinoneClient::get_transaction_history(self, request).await
    }

    // ========== Private Endpoints - Trading ==========

    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse, CoinoneError> {
        CoinoneClient::create_order(self, request).await
    }

    async fn create_limit_order(
        &self,
        quote_currency: &str,
        target_currency: &str,
        side: OrderSide,
        price: Decimal,
        qty: Decimal,
        post_only: bool,
        user_order_id: Option<&str>,
    ) -> Result<OrderResponse, CoinoneError> {
        CoinoneClient::create_limit_order(
            self,
            quote_currency,
            target_currency,
            side,
            price,
            qty,
            post_only,
            user_order_id,
        )
        .await
    }

    async fn create_market_buy_order(
        &self,
        quote_currency: &str,
        target_currency: &str,
        amount: Decimal,
        limit_price: Option<Decimal>,
        user_order_id: Option<&str>,
    ) -> Result<OrderResponse, CoinoneError> {
        CoinoneClient::create_market_buy_order(
            self,
            quote_currency,
            target_currency,
            amount,
            limit_price,
            user_order_id,
        )
        .await
    }

    async fn create_market_sell_order(
        &self,
        quote_currency: &str,
        target_currency: &str,
        qty: Decimal,
        limit_price: Option<Decimal>,
        user_order_id: Option<&str>,
    ) -> Result<OrderResponse, CoinoneError> {
        CoinoneClient::create_market_sell_order(
            self,
            quote_currency,
            target_currency,
            qty,
            limit_price,
            user_order_id,
        )
        .await
    }

    async fn create_stop_limit_order(
        &self,
        quote_currency: &str,
        target_currency: &str,
        side: OrderSide,
        price: Decimal,
        qty: Decimal,
        trigger_price: Decimal,
        user_order_id: Option<&str>,
    ) -> Result<OrderResponse, CoinoneError> {
        CoinoneClient::create_stop_limit_order(
            self,
            quote_currency,
            target_currency,
            side,
            price,
            qty,
            trigger_price,
            user_order_id,
        )
        .await
    }

    async fn get_active_orders(
        &self,
        request: Option<&ActiveOrdersRequest>,
    ) -> Result<Vec<ActiveOrder>, CoinoneError> {
        CoinoneClient::get_active_orders(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use reqwest::StatusCode;
    use crate::auth::sign_payload;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Recording {
        reply: String,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl Recording {
        fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for Recording {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            Ok(response(200, &self.reply))
        }
    }

    const TOKEN: &str = "3f2a9c1e-7b4d-4e8a-9c21-5d6f7a8b9c0d";
    const SECRET: &str = "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d";

    struct CountingStore {
        inner: MemoryCredentialStore,
        gets: AtomicUsize,
    }

    impl CredentialStore for CountingStore {
        fn get(&self) -> Option<Credentials> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get()
        }

        fn set(&self, credentials: Credentials) -> bool {
            self.inner.set(credentials)
        }

        fn clear(&self) -> bool {
            self.inner.clear()
        }
    }

    /// Clears the credential store while the request is in flight.
    struct ClearingTransport {
        store: Arc<CountingStore>,
        inner: Recording,
    }

    impl Transport for ClearingTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.store.clear();
            self.inner.send(request).await
        }
    }

    fn recording_client(reply: &str) -> CoinoneClient<Recording> {
        CoinoneClient::builder()
            .base_url("http://localhost:9/")
            .build_with_transport(Recording::replying(reply))
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_success_envelope_passes_through() {
        let value = parse_envelope(
            response(200, r#"{"result":"success","error_code":"0","balances":[]}"#),
            true,
        )
        .unwrap();
        assert_eq!(value["balances"], serde_json::json!([]));
    }

    #[test]
    fn test_error_code_spelling_v21() {
        let err = parse_envelope(
            response(
                200,
                r#"{"result":"error","error_code":"103","error_msg":"Lack of Balance"}"#,
            ),
            true,
        )
        .unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(api.code, "103");
        assert_eq!(api.message, "Lack of Balance");
    }

    #[test]
    fn test_error_code_spelling_legacy() {
        let err = parse_envelope(response(200, r#"{"result":"error","errorCode":"131"}"#), true)
            .unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(api.code, "131");
        assert_eq!(api.message, "Unknown error");
        assert!(api.is_invalid_nonce());
    }

    #[test]
    fn test_numeric_error_code() {
        let err = parse_envelope(response(200, r#"{"result":"error","error_code":107}"#), true)
            .unwrap_err();
        assert_eq!(err.api_error().unwrap().code, "107");
    }

    #[test]
    fn test_any_non_success_result_is_error() {
        let err = parse_envelope(response(200, r#"{"result":"fail"}"#), true).unwrap_err();
        assert!(matches!(err, CoinoneError::Exchange(_)));
    }

    #[test]
    fn test_non_2xx_is_http_error() {
        let err = parse_envelope(response(502, "Bad Gateway"), true).unwrap_err();
        assert!(matches!(err, CoinoneError::Http { status: 502, .. }));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_envelope(response(200, "<html>"), true).unwrap_err();
        assert!(matches!(err, CoinoneError::MalformedResponse(_)));

        let err = parse_envelope(response(200, "[1,2]"), true).unwrap_err();
        assert!(matches!(err, CoinoneError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_result_depends_on_strictness() {
        let err = parse_envelope(response(200, r#"{"last":"1"}"#), true).unwrap_err();
        assert!(matches!(err, CoinoneError::MalformedResponse(_)));

        assert!(parse_envelope(response(200, r#"{"last":"1"}"#), false).is_ok());
    }

    #[test]
    fn test_status_without_credentials() {
        let client = CoinoneClient::new();
        let status = client.status();
        assert!(!status.has_credentials);
        assert!(!status.access_token_valid);
    }

    #[test]
    fn test_configure_rejects_bad_pair_and_keeps_previous() {
        let client = CoinoneClient::new();
        client
            .configure(
                "3f2a9c1e-7b4d-4e8a-9c21-5d6f7a8b9c0d",
                "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d",
            )
            .unwrap();

        let err = client
            .configure("3f2a9c1e-7b4d-4e8a-9c21-5d6f7a8b9c0d", "not-a-uuid")
            .unwrap_err();
        assert!(matches!(err, CoinoneError::InvalidCredentialFormat { .. }));

        let status = client.status();
        assert!(status.has_credentials);
        assert!(status.access_token_valid);
        assert!(status.secret_key_valid);

        client.clear();
        client.clear();
        assert!(!client.status().has_credentials);
    }

    #[test]
    fn test_unconfigured_client_sends_nothing() {
        let client = recording_client(r#"{"result":"success","balances":[]}"#);
        let err = tokio_test::block_on(client.get_balance()).unwrap_err();
        assert!(matches!(err, CoinoneError::NotConfigured));
        assert!(client.transport.sent().is_empty());
    }

    #[test]
    fn test_unexpected_shape_is_malformed() {
        let client = recording_client(r#"{"result":"success","balances":"none"}"#);
        client
            .configure(
                "3f2a9c1e-7b4d-4e8a-9c21-5d6f7a8b9c0d",
                "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d",
            )
            .unwrap();

        let err = tokio_test::block_on(client.get_balance()).unwrap_err();
        assert!(matches!(err, CoinoneError::MalformedResponse(_)));

        let sent = client.transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://localhost:9/v2.1/account/balance/all");
        assert!(sent[0].headers.contains_key(SIGNATURE_HEADER));
    }

    #[test]
    fn test_public_get_builds_query() {
        let client = recording_client(r#"{"result":"success","bids":[],"asks":[]}"#);
        let book = tokio_test::block_on(client.get_orderbook("krw", "btc", None)).unwrap();
        assert!(book.best_bid().is_none());

        let sent = client.transport.sent();
        assert_eq!(sent[0].method, reqwest::Method::GET);
        assert_eq!(
            sent[0].url,
            "http://localhost:9/public/v2/orderbook/KRW/BTC?size=15"
        );
        assert!(sent[0].body.is_none());
    }

    #[test]
    fn test_clear_during_request_does_not_affect_it() {
        let store = Arc::new(CountingStore {
            inner: MemoryCredentialStore::with_credentials(Credentials::new(TOKEN, SECRET).unwrap()),
            gets: AtomicUsize::new(0),
        });
        let client = CoinoneClient::builder()
            .base_url("http://localhost:9")
            .credential_store(store.clone())
            .build_with_transport(ClearingTransport {
                store: store.clone(),
                inner: Recording::replying(r#"{"result":"success","balances":[]}"#),
            });

        let balances = tokio_test::block_on(client.get_balance()).unwrap();
        assert!(balances.is_empty());
        assert_eq!(store.gets.load(Ordering::SeqCst), 1);

        let sent = client.transport.inner.sent();
        assert_eq!(sent.len(), 1);
        let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["access_token"], TOKEN);

        let payload = sent[0].headers[PAYLOAD_HEADER].to_str().unwrap();
        let signature = sent[0].headers[SIGNATURE_HEADER].to_str().unwrap();
        assert_eq!(signature, sign_payload(SECRET, payload).unwrap());

        let err = tokio_test::block_on(client.get_balance()).unwrap_err();
        assert!(matches!(err, CoinoneError::NotConfigured));
        assert_eq!(store.gets.load(Ordering::SeqCst), 2);
        assert_eq!(client.transport.inner.sent().len(), 1);
    }

    #[test]
    fn test_unencodable_query_is_request_error() {
        #[derive(Serialize)]
        struct Levels {
            sizes: Vec<u32>,
        }

        let client = recording_client(r#"{"result":"success"}"#);
        let params = Levels { sizes: vec![5, 15] };
        let err = tokio_test::block_on(
            client.public_get::<Value, _>("/public/v2/orderbook/KRW/BTC", Some(&params)),
        )
        .unwrap_err();
        assert!(matches!(err, CoinoneError::Query(_)));
        assert!(client.transport.sent().is_empty());
    }
}
