use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use url::{Url, form_urlencoded};

use super::types::{LoginRedirect, OAuth2Login};
use crate::services::auth::authorized_client::AuthorizedClientStore;
use crate::services::auth::classifier::INTERNAL_TOKEN_PREFIX;
use crate::services::cache::CacheResult;
use crate::services::session::{SessionStore, SessionUser};

/// Turns a completed OAuth2 login into a redirect to the frontend.
///
/// The frontend always receives a token: the provider's access token when the
/// authorized-client store has one, otherwise an internal `oauth_` token derived
/// from the email. Profile fields replace whatever the session held before and
/// back the `/auth/user` fallback.
///
/// The OAuth2 handshake itself runs outside this crate. Its integration calls
/// [`record_authorized_client`](Self::record_authorized_client) once the provider
/// issued a token, then [`AppState::complete_login`](crate::state::AppState::complete_login)
/// and returns the resulting redirect to the browser.
#[derive(Clone)]
pub struct LoginCompletionHandler {
    clients: Arc<dyn AuthorizedClientStore>,
    sessions: SessionStore,
    callback_url: Url,
}

impl LoginCompletionHandler {
    pub fn new(
        clients: Arc<dyn AuthorizedClientStore>,
        sessions: SessionStore,
        callback_url: Url,
    ) -> Self {
        Self {
            clients,
            sessions,
            callback_url,
        }
    }

    /// Remember the provider access token for `login` until `ttl` elapses.
    pub async fn record_authorized_client(
        &self,
        login: &OAuth2Login,
        access_token: &str,
        ttl: Duration,
    ) -> CacheResult<()> {
        self.clients
            .save_access_token(
                &login.registration_id,
                &login.principal_name,
                access_token,
                ttl,
            )
            .await
    }

    pub async fn on_authentication_success(
        &self,
        session_id: &str,
        login: &OAuth2Login,
    ) -> LoginRedirect {
        let email = login.attribute("email");
        let name = login.attribute("name");
        let picture = login.attribute("picture");

        let provider_token = self.provider_access_token(login).await;

        let token = match &provider_token {
            Some(access_token) => {
                info!(registration_id = %login.registration_id, "using provider access token");
                access_token.clone()
            }
            None => {
                if email.is_none() {
                    warn!(
                        registration_id = %login.registration_id,
                        "login without email and without provider token"
                    );
                }
                info!(registration_id = %login.registration_id, "using internal token format");
                internal_token_for(email.as_deref().unwrap_or_default())
            }
        };

        let user = SessionUser {
            email,
            name,
            picture,
            provider_access_token: provider_token,
        };

        // The token in the redirect is the primary credential; a lost session write
        // only disables the session fallback.
        if let Err(err) = self.sessions.put_user(session_id, &user).await {
            warn!(error = %err, "failed to store login in session");
        }

        let mut location = self.callback_url.clone();
        location.query_pairs_mut().append_pair("token", &token);

        LoginRedirect { location, token }
    }

    async fn provider_access_token(&self, login: &OAuth2Login) -> Option<String> {
        match self
            .clients
            .load_access_token(&login.registration_id, &login.principal_name)
            .await
        {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                warn!(error = %err, "authorized client lookup failed");
                None
            }
        }
    }
}

/// `oauth_` + form-url-encoded email, with `@` spelled `_at_`.
///
/// `x@y.com` becomes `oauth_x_at_y.com`.
pub fn internal_token_for(email: &str) -> String {
    let marked = email.replace('@', "_at_");
    let encoded: String = form_urlencoded::byte_serialize(marked.as_bytes()).collect();
    format!("{INTERNAL_TOKEN_PREFIX}{encoded}")
}
