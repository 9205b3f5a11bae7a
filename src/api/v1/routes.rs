/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - bearer middleware は app 側で全体に掛ける (bypass allow-list は full path で判定するため)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::me::me;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
