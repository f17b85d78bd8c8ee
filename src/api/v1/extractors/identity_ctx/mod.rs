/*!
 * Identity context extractor
 *
 * Responsibility:
 * - 認証済みリクエストのコンテキスト（IdentityCtx）を handler に提供する
 * - role の解決 (resolve_role_and_issuer) もここから使う
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - IdentityCtx
 * - IdentityCtxExtractor
 * - CallerRole
 * - resolve_role_and_issuer
 */

mod core;
mod types;

pub use core::{CallerRole, IdentityCtxExtractor, resolve_role_and_issuer};
pub use types::IdentityCtx;
