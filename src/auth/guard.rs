//! The session guard.
//!
//! Every protected view activation runs `authorize` from scratch: it checks
//! the stored access token's expiry claim and, when that fails, spends at
//! most one refresh exchange before giving up. The result is deliberately
//! binary - every failure mode collapses to `Unauthenticated` so the caller
//! has exactly one fallback, the login screen. Nothing is cached between
//! activations, which keeps externally revoked tokens from lingering.
//!
//! Concurrent activations each run their own refresh; they are not
//! de-duplicated. With a backend that rotates refresh tokens on first use,
//! overlapping activations can race and the loser reports `Unauthenticated`
//! (see DESIGN.md). Activations in this app are serialized through the input
//! loop, so the window does not open in practice.

use chrono::Utc;
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::auth::session::TokenStore;
use crate::auth::token::{self, TokenPair};

/// Outcome of one guard activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated,
    Unauthenticated,
}

/// What the UI knows about the session: `Unknown` only while a check is in
/// flight, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unknown,
    Authenticated,
    Unauthenticated,
}

impl From<AuthStatus> for AuthState {
    fn from(status: AuthStatus) -> Self {
        match status {
            AuthStatus::Authenticated => AuthState::Authenticated,
            AuthStatus::Unauthenticated => AuthState::Unauthenticated,
        }
    }
}

/// The token refresh transport, implemented by `ApiClient` and by test fakes.
pub trait RefreshTokens {
    /// Exchange a refresh token for a new pair.
    fn refresh(
        &self,
        refresh_token: &str,
    ) -> impl std::future::Future<Output = Result<TokenPair, ApiError>> + Send;
}

/// Decide whether the caller may proceed or must re-authenticate.
///
/// Reads the access token from the store; a token whose `exp` claim is
/// strictly in the future authorizes without any network traffic. An absent
/// token fails without network traffic. An expired or undecodable token gets
/// exactly one refresh attempt; success overwrites both stored tokens,
/// failure leaves the store untouched.
pub async fn authorize<S, R>(store: &mut S, refresher: &R) -> AuthStatus
where
    S: TokenStore,
    R: RefreshTokens,
{
    let Some(access) = store.access_token() else {
        debug!("No access token stored");
        return AuthStatus::Unauthenticated;
    };

    let now = Utc::now().timestamp();
    match token::expiry(&access) {
        Some(exp) if exp > now => return AuthStatus::Authenticated,
        Some(exp) => debug!(exp, now, "Access token expired"),
        None => debug!("Access token undecodable, treating as expired"),
    }

    let Some(refresh) = store.refresh_token() else {
        debug!("No refresh token stored");
        return AuthStatus::Unauthenticated;
    };

    match refresher.refresh(&refresh).await {
        Ok(pair) => {
            if let Err(e) = store.store(&pair.access, &pair.refresh) {
                // The session is valid either way; the next activation will
                // just have to refresh again.
                warn!(error = %e, "Failed to persist refreshed tokens");
            }
            AuthStatus::Authenticated
        }
        Err(e) => {
            debug!(error = %e, "Token refresh failed");
            AuthStatus::Unauthenticated
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::auth::token::encode_unsigned;

    #[derive(Default)]
    struct MemoryStore {
        access: Option<String>,
        refresh: Option<String>,
        writes: usize,
    }

    impl TokenStore for MemoryStore {
        fn access_token(&self) -> Option<String> {
            self.access.clone()
        }

        fn refresh_token(&self) -> Option<String> {
            self.refresh.clone()
        }

        fn store(&mut self, access: &str, refresh: &str) -> anyhow::Result<()> {
            self.access = Some(access.to_string());
            self.refresh = Some(refresh.to_string());
            self.writes += 1;
            Ok(())
        }

        fn clear(&mut self) -> anyhow::Result<()> {
            self.access = None;
            self.refresh = None;
            Ok(())
        }
    }

    /// Counts refresh calls; `None` response plays a 401 from the backend.
    struct FakeRefresher {
        calls: AtomicUsize,
        response: Option<TokenPair>,
    }

    impl FakeRefresher {
        fn succeeding(access: &str, refresh: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Some(TokenPair {
                    access: access.to_string(),
                    refresh: refresh.to_string(),
                }),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: None,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RefreshTokens for FakeRefresher {
        async fn refresh(&self, _refresh_token: &str) -> Result<TokenPair, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Some(pair) => Ok(pair.clone()),
                None => Err(ApiError::Unauthorized),
            }
        }
    }

    fn token_expiring_in(secs: i64) -> String {
        encode_unsigned(&format!(r#"{{"exp": {}}}"#, Utc::now().timestamp() + secs))
    }

    #[tokio::test]
    async fn test_absent_access_token_fails_without_network() {
        let mut store = MemoryStore::default();
        let refresher = FakeRefresher::succeeding("A2", "R2");

        let status = authorize(&mut store, &refresher).await;

        assert_eq!(status, AuthStatus::Unauthenticated);
        assert_eq!(refresher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_absent_access_token_with_refresh_present_still_fails() {
        // The guard never spends the refresh token when the access token is
        // missing entirely.
        let mut store = MemoryStore {
            refresh: Some("R1".to_string()),
            ..Default::default()
        };
        let refresher = FakeRefresher::succeeding("A2", "R2");

        let status = authorize(&mut store, &refresher).await;

        assert_eq!(status, AuthStatus::Unauthenticated);
        assert_eq!(refresher.call_count(), 0);
        assert_eq!(store.refresh.as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn test_future_expiry_authorizes_without_network() {
        let mut store = MemoryStore {
            access: Some(token_expiring_in(1)),
            refresh: Some("R1".to_string()),
            ..Default::default()
        };
        let refresher = FakeRefresher::succeeding("A2", "R2");

        let status = authorize(&mut store, &refresher).await;

        assert_eq!(status, AuthStatus::Authenticated);
        assert_eq!(refresher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_authorize_is_idempotent_for_valid_token() {
        let mut store = MemoryStore {
            access: Some(token_expiring_in(3600)),
            refresh: Some("R1".to_string()),
            ..Default::default()
        };
        let refresher = FakeRefresher::succeeding("A2", "R2");

        assert_eq!(authorize(&mut store, &refresher).await, AuthStatus::Authenticated);
        assert_eq!(authorize(&mut store, &refresher).await, AuthStatus::Authenticated);
        assert_eq!(refresher.call_count(), 0);
        assert_eq!(store.writes, 0);
    }

    #[tokio::test]
    async fn test_expired_token_triggers_exactly_one_refresh() {
        let mut store = MemoryStore {
            access: Some(token_expiring_in(-1)),
            refresh: Some("R1".to_string()),
            ..Default::default()
        };
        let refresher = FakeRefresher::succeeding("A2", "R2");

        let status = authorize(&mut store, &refresher).await;

        assert_eq!(status, AuthStatus::Authenticated);
        assert_eq!(refresher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_successful_refresh_rotates_both_tokens() {
        let mut store = MemoryStore {
            access: Some(token_expiring_in(-60)),
            refresh: Some("R1".to_string()),
            ..Default::default()
        };
        let refresher = FakeRefresher::succeeding("A2", "R2");

        let status = authorize(&mut store, &refresher).await;

        assert_eq!(status, AuthStatus::Authenticated);
        assert_eq!(store.access.as_deref(), Some("A2"));
        assert_eq!(store.refresh.as_deref(), Some("R2"));
        assert_eq!(store.writes, 1);
    }

    #[tokio::test]
    async fn test_rejected_refresh_leaves_storage_untouched() {
        let expired = token_expiring_in(-60);
        let mut store = MemoryStore {
            access: Some(expired.clone()),
            refresh: Some("R1".to_string()),
            ..Default::default()
        };
        let refresher = FakeRefresher::failing();

        let status = authorize(&mut store, &refresher).await;

        assert_eq!(status, AuthStatus::Unauthenticated);
        assert_eq!(refresher.call_count(), 1);
        assert_eq!(store.access.as_deref(), Some(expired.as_str()));
        assert_eq!(store.refresh.as_deref(), Some("R1"));
        assert_eq!(store.writes, 0);
    }

    #[tokio::test]
    async fn test_expired_token_without_refresh_fails_without_network() {
        let mut store = MemoryStore {
            access: Some(token_expiring_in(-60)),
            ..Default::default()
        };
        let refresher = FakeRefresher::succeeding("A2", "R2");

        let status = authorize(&mut store, &refresher).await;

        assert_eq!(status, AuthStatus::Unauthenticated);
        assert_eq!(refresher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_token_falls_into_refresh_path() {
        let mut store = MemoryStore {
            access: Some("not-a-jwt".to_string()),
            refresh: Some("R1".to_string()),
            ..Default::default()
        };
        let refresher = FakeRefresher::succeeding("A2", "R2");

        let status = authorize(&mut store, &refresher).await;

        assert_eq!(status, AuthStatus::Authenticated);
        assert_eq!(refresher.call_count(), 1);
        assert_eq!(store.access.as_deref(), Some("A2"));
    }

    #[tokio::test]
    async fn test_malformed_token_without_refresh_fails() {
        let mut store = MemoryStore {
            access: Some("garbage".to_string()),
            ..Default::default()
        };
        let refresher = FakeRefresher::failing();

        let status = authorize(&mut store, &refresher).await;

        assert_eq!(status, AuthStatus::Unauthenticated);
        assert_eq!(refresher.call_count(), 0);
    }
}
