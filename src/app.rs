/*
 * Responsibility
 * - Config読み込み → 依存生成 (cache, session, introspector, login handler) → Router 組み立て
 * - Middleware の適用 (bearer filter / CORS / request-id / trace / timeout)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::{health::health, session_user::session_user};
use crate::config::Config;
use crate::middleware;
use crate::services::auth::{build_introspector, build_login_handler, classifier::BypassPaths};
use crate::services::cache::{CacheClient, MemoryCache, ValkeyClient};
use crate::services::session::SessionStore;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,token_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing; stderr can be hidden depending on how
        // the process is launched.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting token gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let cache: Arc<dyn CacheClient> = match &config.valkey_url {
        Some(url) => Arc::new(
            ValkeyClient::new(url)
                .await
                .context("failed to connect to valkey")?,
        ),
        None => {
            tracing::warn!("VALKEY_URL not set, sessions are kept in process memory");
            Arc::new(MemoryCache::new())
        }
    };
    tracing::info!(backend = cache.backend_name(), "session backend ready");

    let sessions = SessionStore::new(cache.clone(), config.session_ttl);
    let introspector = build_introspector(config).context("failed to build introspector")?;
    let login = build_login_handler(config, cache, sessions.clone());

    let bypass = BypassPaths::new(config.bypass_prefixes.clone(), config.bypass_paths.clone());

    Ok(AppState::new(
        introspector,
        bypass,
        sessions,
        config.session_cookie_name.as_str(),
        login,
    ))
}

/// Application routes with the bearer filter applied, without transport layers.
pub fn routes(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/auth/user", get(session_user))
        .nest("/api/v1", api::v1::routes());

    middleware::auth::bearer::apply(router, state.clone()).with_state(state)
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = routes(state);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config.request_timeout)
}
