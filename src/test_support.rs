//! Shared fixtures for in-crate tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::services::auth::authorized_client::CachedAuthorizedClientStore;
use crate::services::auth::classifier::BypassPaths;
use crate::services::auth::introspection::{TokenIntrospector, TokenVerdict, UserProfile};
use crate::services::auth::login::LoginCompletionHandler;
use crate::services::cache::{CacheClient, MemoryCache};
use crate::services::session::SessionStore;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "SESSION";

/// Introspector returning a fixed verdict and counting calls.
pub struct FakeIntrospector {
    verdict: TokenVerdict,
    calls: AtomicUsize,
    last_token: Mutex<Option<String>>,
}

impl FakeIntrospector {
    pub fn new(verdict: TokenVerdict) -> Self {
        Self {
            verdict,
            calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenIntrospector for FakeIntrospector {
    async fn validate(&self, token: &str) -> TokenVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some(token.to_string());
        self.verdict.clone()
    }

    async fn user_info(&self, _token: &str) -> UserProfile {
        UserProfile::invalid("not used")
    }
}

pub fn state_with(introspector: Arc<dyn TokenIntrospector>) -> AppState {
    let cache: Arc<dyn CacheClient> = Arc::new(MemoryCache::new());
    let sessions = SessionStore::new(cache.clone(), Duration::from_secs(60));
    let login = Arc::new(LoginCompletionHandler::new(
        Arc::new(CachedAuthorizedClientStore::new(cache)),
        sessions.clone(),
        Url::parse("http://localhost:5173/oauth-callback").unwrap(),
    ));
    let bypass = BypassPaths::new(
        vec!["/oauth2/".to_string(), "/login/".to_string()],
        vec!["/error".to_string(), "/auth/user".to_string()],
    );

    AppState::new(introspector, bypass, sessions, SESSION_COOKIE, login)
}
