//! Credential management for Coinone API authentication.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::{Uuid, Variant};

use crate::error::{CoinoneError, CredentialField};

/// Default environment variable holding the access token.
pub const ACCESS_TOKEN_ENV: &str = "COINONE_ACCESS_TOKEN";
/// Default environment variable holding the secret key.
pub const SECRET_KEY_ENV: &str = "COINONE_SECRET_KEY";

/// A validated access token / secret key pair.
///
/// Both halves are UUID v4 strings. The only way to build a value is
/// [`Credentials::new`], so holding a `Credentials` means holding a pair
/// that passed the format check.
#[derive(Clone)]
pub struct Credentials {
    access_token: String,
    secret_key: SecretString,
}

impl Credentials {
    /// Validate and create credentials.
    pub fn new(
        access_token: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, CoinoneError> {
        let access_token = access_token.into();
        let secret_key = secret_key.into();

        if !is_uuid_v4(&access_token) {
            return Err(CoinoneError::InvalidCredentialFormat {
                field: CredentialField::AccessToken,
            });
        }
        if !is_uuid_v4(&secret_key) {
            return Err(CoinoneError::InvalidCredentialFormat {
                field: CredentialField::SecretKey,
            });
        }

        Ok(Self {
            access_token,
            secret_key: SecretString::from(secret_key),
        })
    }

    /// Read credentials from `COINONE_ACCESS_TOKEN` and `COINONE_SECRET_KEY`.
    ///
    /// Returns `None` if either variable is unset.
    pub fn try_from_env() -> Option<Result<Self, CoinoneError>> {
        Self::try_from_env_vars(ACCESS_TOKEN_ENV, SECRET_KEY_ENV)
    }

    /// Read credentials from custom environment variable names.
    ///
    /// Returns `None` if either variable is unset.
    pub fn try_from_env_vars(
        token_var: &str,
        secret_var: &str,
    ) -> Option<Result<Self, CoinoneError>> {
        let access_token = std::env::var(token_var).ok()?;
        let secret_key = std::env::var(secret_var).ok()?;
        Some(Self::new(access_token, secret_key))
    }

    /// The public access token, sent inside every signed payload.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Get the secret key for signing.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Check the canonical hyphenated UUID v4 form: 8-4-4-4-12 hex digits,
/// version nibble `4`, variant nibble one of `8`, `9`, `a`, `b`.
pub fn is_uuid_v4(value: &str) -> bool {
    // Uuid::try_parse also accepts the simple, braced and urn forms.
    if value.len() != 36 {
        return false;
    }
    match Uuid::try_parse(value) {
        Ok(uuid) => uuid.get_version_num() == 4 && uuid.get_variant() == Variant::RFC4122,
        Err(_) => false,
    }
}

/// On-disk shape, matching what the dashboard keeps in local storage.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCredentials {
    access_token: String,
    secret_key: String,
}

/// Storage for the credential pair used by the client.
///
/// Implement this trait to keep credentials somewhere else, for example
/// an OS keyring or a secrets manager.
pub trait CredentialStore: Send + Sync {
    /// Snapshot the current pair, if any.
    fn get(&self) -> Option<Credentials>;

    /// Replace the stored pair. Returns `false` if the store could not be updated.
    fn set(&self, credentials: Credentials) -> bool;

    /// Remove the stored pair. Returns `false` if the store could not be updated.
    fn clear(&self) -> bool;
}

/// In-memory credential store. The default for a new client.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: RwLock<Option<Credentials>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `credentials`.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            slot: RwLock::new(Some(credentials)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<Credentials> {
        self.slot.read().ok().and_then(|slot| slot.clone())
    }

    fn set(&self, credentials: Credentials) -> bool {
        match self.slot.write() {
            Ok(mut slot) => {
                *slot = Some(credentials);
                true
            }
            Err(_) => false,
        }
    }

    fn clear(&self) -> bool {
        match self.slot.write() {
            Ok(mut slot) => {
                *slot = None;
                true
            }
            Err(_) => false,
        }
    }
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn get(&self) -> Option<Credentials> {
        (**self).get()
    }

    fn set(&self, credentials: Credentials) -> bool {
        (**self).set(credentials)
    }

    fn clear(&self) -> bool {
        (**self).clear()
    }
}

/// Credential store persisted as a small JSON file.
///
/// The pair is cached in memory; every `set`/`clear` writes through to disk.
/// A file holding a pair that no longer validates is ignored on load.
pub struct FileCredentialStore {
    path: PathBuf,
    cache: MemoryCredentialStore,
}

impl FileCredentialStore {
    /// Open a store at `path`, loading any pair already saved there.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoinoneError> {
        let path = path.into();
        let cache = MemoryCredentialStore::new();

        if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| CoinoneError::CredentialStore(format!("{}: {e}", path.display())))?;
            match serde_json::from_str::<StoredCredentials>(&raw) {
                Ok(stored) => match Credentials::new(stored.access_token, stored.secret_key) {
                    Ok(credentials) => {
                        cache.set(credentials);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Ignoring saved credentials");
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to load saved credentials");
                }
            }
        }

        Ok(Self { path, cache })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, credentials: &Credentials) -> std::io::Result<()> {
        let stored = StoredCredentials {
            access_token: credentials.access_token().to_string(),
            secret_key: credentials.expose_secret().to_string(),
        };
        let json = serde_json::to_string(&stored)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, json)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<Credentials> {
        self.cache.get()
    }

    fn set(&self, credentials: Credentials) -> bool {
        if let Err(e) = self.write(&credentials) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to save API key");
            return false;
        }
        self.cache.set(credentials)
    }

    fn clear(&self) -> bool {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to delete API key");
                return false;
            }
        }
        self.cache.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "3f2a9c1e-7b4d-4e8a-9c21-5d6f7a8b9c0d";
    const SECRET: &str = "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d";

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::new(TOKEN, SECRET).unwrap();
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains(TOKEN));
        assert!(!debug_str.contains(SECRET));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_uuid_v4_shape() {
        assert!(is_uuid_v4(TOKEN));
        assert!(is_uuid_v4(&TOKEN.to_uppercase()));
        // version nibble 1
        assert!(!is_uuid_v4("3f2a9c1e-7b4d-1e8a-9c21-5d6f7a8b9c0d"));
        // variant nibble c
        assert!(!is_uuid_v4("3f2a9c1e-7b4d-4e8a-cc21-5d6f7a8b9c0d"));
        // simple and braced forms
        assert!(!is_uuid_v4("3f2a9c1e7b4d4e8a9c215d6f7a8b9c0d"));
        assert!(!is_uuid_v4("{3f2a9c1e-7b4d-4e8a-9c21-5d6f7a8b9c0d}"));
        assert!(!is_uuid_v4(""));
        assert!(!is_uuid_v4("not-a-uuid-at-all-but-36-chars-long!"));
    }

    #[test]
    fn test_invalid_pair_names_field() {
        let err = Credentials::new("bad", SECRET).unwrap_err();
        assert!(matches!(
            err,
            CoinoneError::InvalidCredentialFormat {
                field: CredentialField::AccessToken
            }
        ));

        let err = Credentials::new(TOKEN, "bad").unwrap_err();
        assert!(matches!(
            err,
            CoinoneError::InvalidCredentialFormat {
                field: CredentialField::SecretKey
            }
        ));
    }

    #[test]
    fn test_memory_store_set_clear() {
        let store = MemoryCredentialStore::new();
        assert!(store.get().is_none());

        assert!(store.set(Credentials::new(TOKEN, SECRET).unwrap()));
        assert_eq!(store.get().unwrap().access_token(), TOKEN);

        assert!(store.clear());
        assert!(store.clear());
        assert!(store.get().is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        let store = FileCredentialStore::open(&path).unwrap();
        assert!(store.get().is_none());
        assert!(store.set(Credentials::new(TOKEN, SECRET).unwrap()));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"accessToken\""));
        assert!(raw.contains("\"secretKey\""));

        let reopened = FileCredentialStore::open(&path).unwrap();
        let creds = reopened.get().unwrap();
        assert_eq!(creds.access_token(), TOKEN);
        assert_eq!(creds.expose_secret(), SECRET);

        assert!(reopened.clear());
        assert!(!path.exists());
        assert!(FileCredentialStore::open(&path).unwrap().get().is_none());
    }

    #[test]
    fn test_file_store_ignores_invalid_pair() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"accessToken":"nope","secretKey":"nope"}"#).unwrap();

        let store = FileCredentialStore::open(&path).unwrap();
        assert!(store.get().is_none());
    }
}
