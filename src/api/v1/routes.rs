/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - v1 配下はすべて AuthGate を通す (health は app.rs 側で gate の外に置く)
 */
use axum::{Router, routing::get};

use crate::middleware::auth::gate;
use crate::state::AppState;

use crate::api::v1::handlers::{admin::admin_ping, me::me};

pub fn routes(state: AppState) -> Router<AppState> {
    let gated = Router::new()
        .route("/me", get(me))
        .route("/admin/ping", get(admin_ping));

    gate::apply(gated, state)
}
