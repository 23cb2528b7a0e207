//! Access token cache and storage.
//!
//! [`TokenCache`] is owned by the orchestrator and asked for a valid token
//! before each API call; it re-authenticates through its [`TokenSource`]
//! only when the cached token is missing, expired, or inside the safety
//! margin. [`TokenStore`] optionally persists the token between runs.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::auth::TokenSource;
use crate::error::{ZoomError, ZoomResult};

/// Seconds before expiry at which a token stops being served from cache.
pub const DEFAULT_EXPIRY_MARGIN_SECS: i64 = 60;

/// A bearer access token with its absolute expiry.
///
/// The token is replaced wholesale on refresh and never used past expiry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    secret: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Creates a token expiring `expires_in_secs` from now.
    pub fn new(secret: impl Into<String>, expires_in_secs: i64) -> Self {
        Self::with_expiry(secret, Utc::now() + Duration::seconds(expires_in_secs))
    }

    /// Creates a token with an explicit expiry timestamp.
    pub fn with_expiry(secret: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    /// The bearer secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Absolute expiry timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the token is still usable at `now` with the given
    /// safety margin before expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now + margin < self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The secret is a live credential, keep it out of debug output.
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Serves cached tokens and refreshes them through a [`TokenSource`].
pub struct TokenCache<S> {
    source: S,
    cached: RwLock<Option<AccessToken>>,
    margin: Duration,
    store: Option<TokenStore>,
    clock: fn() -> DateTime<Utc>,
}

impl<S: TokenSource> TokenCache<S> {
    /// Creates an empty cache backed by the given source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: RwLock::new(None),
            margin: Duration::seconds(DEFAULT_EXPIRY_MARGIN_SECS),
            store: None,
            clock: Utc::now,
        }
    }

    /// Sets the safety margin before expiry.
    #[must_use]
    pub fn with_margin_secs(mut self, secs: i64) -> Self {
        self.margin = Duration::seconds(secs);
        self
    }

    /// Attaches a file-backed store, loading any persisted token into the
    /// cache. A corrupt or unreadable store is ignored with a warning.
    #[must_use]
    pub fn with_store(mut self, store: TokenStore) -> Self {
        match store.load() {
            Ok(Some(token)) => {
                debug!("loaded persisted token from {:?}", store.path());
                *self.cached.write().unwrap() = Some(token);
            }
            Ok(None) => {}
            Err(e) => warn!("ignoring token cache file: {}", e),
        }
        self.store = Some(store);
        self
    }

    /// Replaces the clock used for validity checks.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns a valid access token, refreshing through the source if the
    /// cached one is missing or no longer valid past the safety margin.
    ///
    /// # Errors
    ///
    /// Propagates the source failure unchanged; the cache never retries.
    pub async fn get_token(&self) -> ZoomResult<AccessToken> {
        let now = (self.clock)();

        {
            let cached = self.cached.read().unwrap();
            if let Some(token) = cached.as_ref()
                && token.is_valid_at(now, self.margin)
            {
                return Ok(token.clone());
            }
        }

        debug!("no valid cached token, requesting a fresh one");
        let fresh = self.source.fetch_token().await?;

        if let Some(ref store) = self.store
            && let Err(e) = store.save(&fresh)
        {
            warn!("failed to persist token cache: {}", e);
        }

        *self.cached.write().unwrap() = Some(fresh.clone());
        Ok(fresh)
    }
}

/// File-backed token persistence.
///
/// The token is stored as JSON. Since it is a bearer credential the file is
/// written atomically with mode 0600 on Unix.
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the store path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted token, if any.
    pub fn load(&self) -> ZoomResult<Option<AccessToken>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ZoomError::configuration(format!("failed to read token cache file: {}", e))
        })?;

        let token: AccessToken = serde_json::from_str(&content).map_err(|e| {
            ZoomError::configuration(format!("failed to parse token cache file: {}", e))
        })?;

        Ok(Some(token))
    }

    /// Persists a token, replacing any previous value.
    pub fn save(&self, token: &AccessToken) -> ZoomResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ZoomError::configuration(format!("failed to create token cache directory: {}", e))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(token)
            .map_err(|e| ZoomError::internal(format!("failed to serialize token: {}", e)))?;

        fs::write(&temp_path, &content).map_err(|e| {
            ZoomError::configuration(format!("failed to write token cache file: {}", e))
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            ZoomError::configuration(format!("failed to rename token cache file: {}", e))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            let _ = fs::set_permissions(&self.path, perms);
        }

        debug!("persisted token to {:?}", self.path);
        Ok(())
    }

    /// Removes the persisted token, if present.
    pub fn clear(&self) -> ZoomResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                ZoomError::configuration(format!("failed to remove token cache file: {}", e))
            })?;
            info!("cleared token cache at {:?}", self.path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BoxFuture;
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        token: AccessToken,
    }

    impl CountingSource {
        fn new(token: AccessToken) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: calls.clone(),
                    token,
                },
                calls,
            )
        }
    }

    impl TokenSource for CountingSource {
        fn fetch_token(&self) -> BoxFuture<'_, ZoomResult<AccessToken>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let token = self.token.clone();
            Box::pin(async move { Ok(token) })
        }
    }

    struct FailingSource;

    impl TokenSource for FailingSource {
        fn fetch_token(&self) -> BoxFuture<'_, ZoomResult<AccessToken>> {
            Box::pin(async { Err(ZoomError::authentication("exchange rejected")) })
        }
    }

    fn valid_token(secret: &str) -> AccessToken {
        AccessToken::with_expiry(secret, fixed_now() + Duration::hours(1))
    }

    #[test]
    fn token_validity_honors_margin() {
        let token = AccessToken::with_expiry("tok", fixed_now() + Duration::seconds(30));
        assert!(token.is_valid_at(fixed_now(), Duration::seconds(0)));
        assert!(!token.is_valid_at(fixed_now(), Duration::seconds(60)));
        assert!(!token.is_valid_at(fixed_now() + Duration::minutes(5), Duration::seconds(0)));
    }

    #[test]
    fn debug_redacts_secret() {
        let token = valid_token("very-secret");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn valid_cached_token_is_reused() {
        let (source, calls) = CountingSource::new(valid_token("fresh"));
        let cache = TokenCache::new(source).with_clock(fixed_now);
        *cache.cached.write().unwrap() = Some(valid_token("cached"));

        let first = cache.get_token().await.unwrap();
        let second = cache.get_token().await.unwrap();

        assert_eq!(first.secret(), "cached");
        assert_eq!(second.secret(), "cached");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn expired_token_triggers_single_refresh() {
        let (source, calls) = CountingSource::new(valid_token("fresh"));
        let cache = TokenCache::new(source).with_clock(fixed_now);
        *cache.cached.write().unwrap() = Some(AccessToken::with_expiry(
            "stale",
            fixed_now() - Duration::minutes(5),
        ));

        let token = cache.get_token().await.unwrap();
        assert_eq!(token.secret(), "fresh");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The fresh token is now cached
        let again = cache.get_token().await.unwrap();
        assert_eq!(again.secret(), "fresh");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn token_inside_margin_is_refreshed() {
        let (source, calls) = CountingSource::new(valid_token("fresh"));
        let cache = TokenCache::new(source).with_clock(fixed_now);
        *cache.cached.write().unwrap() = Some(AccessToken::with_expiry(
            "almost-expired",
            fixed_now() + Duration::seconds(30),
        ));

        let token = cache.get_token().await.unwrap();
        assert_eq!(token.secret(), "fresh");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn source_failure_propagates() {
        let cache = TokenCache::new(FailingSource).with_clock(fixed_now);
        let err = cache.get_token().await.unwrap_err();
        assert_eq!(err.code(), crate::error::ZoomErrorCode::AuthenticationFailed);
    }

    #[tokio::test]
    async fn refreshed_token_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let (source, _) = CountingSource::new(valid_token("fresh"));
        let cache = TokenCache::new(source)
            .with_clock(fixed_now)
            .with_store(TokenStore::new(&path));

        cache.get_token().await.unwrap();
        assert!(path.exists());

        let persisted = TokenStore::new(&path).load().unwrap().unwrap();
        assert_eq!(persisted.secret(), "fresh");
    }

    #[tokio::test]
    async fn persisted_token_is_loaded_on_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        TokenStore::new(&path).save(&valid_token("persisted")).unwrap();

        let (source, calls) = CountingSource::new(valid_token("fresh"));
        let cache = TokenCache::new(source)
            .with_clock(fixed_now)
            .with_store(TokenStore::new(&path));

        let token = cache.get_token().await.unwrap();
        assert_eq!(token.secret(), "persisted");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn store_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn store_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        let store = TokenStore::new(&path);

        store.save(&valid_token("tok")).unwrap();
        assert!(path.exists());

        store.clear().unwrap();
        assert!(!path.exists());
    }
}
