/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - introspector, bypass allow-list, session store, login completion handler
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::{
    TokenIntrospector,
    classifier::BypassPaths,
    login::{LoginCompletionHandler, LoginRedirect, OAuth2Login},
};
use crate::services::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub introspector: Arc<dyn TokenIntrospector>,
    pub bypass: Arc<BypassPaths>,
    pub sessions: SessionStore,
    pub session_cookie: Arc<str>,
    // Invoked by the OAuth2 handshake integration once a login completes.
    pub login: Arc<LoginCompletionHandler>,
}

impl AppState {
    pub fn new(
        introspector: Arc<dyn TokenIntrospector>,
        bypass: BypassPaths,
        sessions: SessionStore,
        session_cookie: impl Into<Arc<str>>,
        login: Arc<LoginCompletionHandler>,
    ) -> Self {
        Self {
            introspector,
            bypass: Arc::new(bypass),
            sessions,
            session_cookie: session_cookie.into(),
            login,
        }
    }

    /// Entry point for the OAuth2 handshake integration once a login succeeded
    /// on the browser session `session_id`.
    pub async fn complete_login(&self, session_id: &str, login: &OAuth2Login) -> LoginRedirect {
        self.login.on_authentication_success(session_id, login).await
    }
}
