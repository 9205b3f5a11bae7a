/// Factory: build auth services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::authorized_client::CachedAuthorizedClientStore;
use crate::services::auth::introspection::{
    IntrospectionError, ProviderIntrospector, TokenIntrospector,
};
use crate::services::auth::login::LoginCompletionHandler;
use crate::services::cache::CacheClient;
use crate::services::session::SessionStore;

pub fn build_introspector(config: &Config) -> Result<Arc<dyn TokenIntrospector>, IntrospectionError> {
    let introspector = ProviderIntrospector::new(
        &config.provider_base_url,
        config.oauth2_client_id.clone(),
        config.introspection_timeout,
    )?;

    Ok(Arc::new(introspector))
}

pub fn build_login_handler(
    config: &Config,
    cache: Arc<dyn CacheClient>,
    sessions: SessionStore,
) -> Arc<LoginCompletionHandler> {
    let clients = Arc::new(CachedAuthorizedClientStore::new(cache));

    Arc::new(LoginCompletionHandler::new(
        clients,
        sessions,
        config.frontend_callback_url.clone(),
    ))
}
