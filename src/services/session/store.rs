/*
 * Responsibility
 * - browser session ごとの属性 (email/name/picture/provider token) を保持する
 * - 保存先は CacheClient (Valkey or memory)、key は session id で分離する
 */
use std::sync::Arc;
use std::time::Duration;

use crate::services::cache::{CacheClient, CacheResult};

pub const USER_EMAIL: &str = "user_email";
pub const USER_NAME: &str = "user_name";
pub const USER_PICTURE: &str = "user_picture";
pub const PROVIDER_ACCESS_TOKEN: &str = "provider_access_token";

/// Profile captured at login completion and served by the session fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub provider_access_token: Option<String>,
}

/// Session-scoped key-value store.
///
/// Keys look like `session:<session id>:<attribute>`; every write refreshes the TTL
/// of that attribute only.
#[derive(Clone)]
pub struct SessionStore {
    cache: Arc<dyn CacheClient>,
    ttl: Duration,
    prefix: String,
}

impl SessionStore {
    pub fn new(cache: Arc<dyn CacheClient>, ttl: Duration) -> Self {
        Self {
            cache,
            ttl,
            prefix: "session".to_string(),
        }
    }

    fn key(&self, session_id: &str, attribute: &str) -> String {
        format!("{}:{}:{}", self.prefix, session_id, attribute)
    }

    pub async fn put(&self, session_id: &str, attribute: &str, value: &str) -> CacheResult<()> {
        self.cache
            .set_with_ttl(&self.key(session_id, attribute), value, self.ttl)
            .await
    }

    pub async fn get(&self, session_id: &str, attribute: &str) -> CacheResult<Option<String>> {
        self.cache.get_string(&self.key(session_id, attribute)).await
    }

    pub async fn remove(&self, session_id: &str, attribute: &str) -> CacheResult<()> {
        self.cache.delete(&self.key(session_id, attribute)).await
    }

    /// Replace the session's profile with `user`.
    ///
    /// Present fields are written, absent ones are removed, so nothing from an
    /// earlier login on the same session survives.
    pub async fn put_user(&self, session_id: &str, user: &SessionUser) -> CacheResult<()> {
        let fields = [
            (USER_EMAIL, &user.email),
            (USER_NAME, &user.name),
            (USER_PICTURE, &user.picture),
            (PROVIDER_ACCESS_TOKEN, &user.provider_access_token),
        ];

        for (attribute, value) in fields {
            match value {
                Some(value) => self.put(session_id, attribute, value).await?,
                None => self.remove(session_id, attribute).await?,
            }
        }
        Ok(())
    }

    /// Load the session user; `None` unless an email was stored for this session.
    pub async fn load_user(&self, session_id: &str) -> CacheResult<Option<SessionUser>> {
        let Some(email) = self.get(session_id, USER_EMAIL).await? else {
            return Ok(None);
        };

        Ok(Some(SessionUser {
            email: Some(email),
            name: self.get(session_id, USER_NAME).await?,
            picture: self.get(session_id, USER_PICTURE).await?,
            provider_access_token: self.get(session_id, PROVIDER_ACCESS_TOKEN).await?,
        }))
    }
}
