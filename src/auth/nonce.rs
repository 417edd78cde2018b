//! Nonce generation for Coinone API authentication.
//!
//! Coinone's v2.1 endpoints take a random UUID v4 nonce. The legacy v2
//! endpoints take a numeric nonce that must grow on every call.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// Which nonce scheme an endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonceStyle {
    /// Fresh UUID v4 string per request.
    Random,
    /// Millisecond timestamp, strictly increasing within a session.
    Incrementing,
}

impl std::fmt::Display for NonceStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NonceStyle::Random => write!(f, "random"),
            NonceStyle::Incrementing => write!(f, "incrementing"),
        }
    }
}

/// A nonce value as it appears in the signed payload.
///
/// Serializes as a JSON string for [`Nonce::Random`] and a JSON number for
/// [`Nonce::Incrementing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Nonce {
    /// UUID v4 nonce.
    Random(String),
    /// Numeric nonce.
    Incrementing(u64),
}

/// Trait for providing nonces for authenticated requests.
pub trait NonceProvider: Send + Sync {
    /// Generate a nonce of the requested style.
    ///
    /// Incrementing values must be greater than any previously returned
    /// incrementing value.
    fn next_nonce(&self, style: NonceStyle) -> Nonce;
}

/// Default nonce provider.
///
/// Random nonces come from [`Uuid::new_v4`]. Incrementing nonces use
/// milliseconds since UNIX epoch, bumped past the last value handed out so
/// two requests in the same millisecond never share a nonce.
pub struct IncreasingNonce {
    last_nonce: AtomicU64,
}

impl IncreasingNonce {
    /// Create a new nonce provider.
    pub fn new() -> Self {
        Self {
            last_nonce: AtomicU64::new(0),
        }
    }

    /// Get current time in milliseconds since UNIX epoch.
    fn current_time_millis() -> u64 {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        u64::try_from(millis).unwrap_or_default()
    }

    fn next_incrementing(&self) -> u64 {
        let now = Self::current_time_millis();
        let previous = self
            .last_nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

impl Default for IncreasingNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceProvider for IncreasingNonce {
    fn next_nonce(&self, style: NonceStyle) -> Nonce {
        match style {
            NonceStyle::Random => Nonce::Random(Uuid::new_v4().to_string()),
            NonceStyle::Incrementing => Nonce::Incrementing(self.next_incrementing()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    use crate::auth::is_uuid_v4;

    fn numeric(nonce: Nonce) -> u64 {
        match nonce {
            Nonce::Incrementing(n) => n,
            other => panic!("expected numeric nonce, got {other:?}"),
        }
    }

    #[test]
    fn test_nonce_strictly_increasing() {
        let provider = IncreasingNonce::new();

        let mut last = 0u64;
        for _ in 0..1000 {
            let nonce = numeric(provider.next_nonce(NonceStyle::Incrementing));
            assert!(nonce > last, "Nonce must be strictly increasing");
            last = nonce;
        }
    }

    #[test]
    fn test_incrementing_nonce_is_wall_clock_millis() {
        let provider = IncreasingNonce::new();
        let before = IncreasingNonce::current_time_millis();
        let nonce = numeric(provider.next_nonce(NonceStyle::Incrementing));
        // Milliseconds, not micros or seconds.
        assert!(nonce >= before);
        assert!(nonce < before + 60_000);
    }

    #[test]
    fn test_random_nonce_is_uuid_v4() {
        let provider = IncreasingNonce::new();
        match provider.next_nonce(NonceStyle::Random) {
            Nonce::Random(s) => assert!(is_uuid_v4(&s)),
            other => panic!("expected random nonce, got {other:?}"),
        }
    }

    #[test]
    fn test_nonce_serialization() {
        let random = Nonce::Random("abc".to_string());
        assert_eq!(serde_json::to_string(&random).unwrap(), "\"abc\"");

        let numeric = Nonce::Incrementing(1_700_000_000_000);
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "1700000000000");
    }

    #[test]
    fn test_nonce_unique_across_threads() {
        let provider = std::sync::Arc::new(IncreasingNonce::new());
        let mut handles = vec![];

        for _ in 0..4 {
            let p = provider.clone();
            handles.push(thread::spawn(move || {
                let mut nonces = Vec::new();
                for _ in 0..1000 {
                    nonces.push(numeric(p.next_nonce(NonceStyle::Incrementing)));
                }
                nonces
            }));
        }

        let mut all_nonces = HashSet::new();
        for handle in handles {
            let nonces = handle.join().unwrap();
            for nonce in nonces {
                assert!(
                    all_nonces.insert(nonce),
                    "Nonce must be unique across threads"
                );
            }
        }
    }
}
