/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: auth_gate: 公開鍵と fake auth 設定を持つ AuthGate
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - 起動後は読み取り専用
 */
use std::sync::Arc;

use crate::middleware::auth::AuthGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth_gate: Arc<AuthGate>,
}

impl AppState {
    pub fn new(auth_gate: Arc<AuthGate>) -> Self {
        Self { auth_gate }
    }
}
