/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型 (issuer + roles)
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - issuer と roles は 1 つの値として格納するので、片方だけ見えることはない
 * - extensions のキーは非公開の IdentitySlot 型 (他の layer が入れた値と衝突しない)
 */
use axum::http::Extensions;

use crate::services::auth::claims::Claims;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `issuer` は呼び出し元の identity (例: wallet address)
/// - `roles` は ability の一覧。署名付き credential 由来なら昇順、
///   fake header 由来なら header に書かれた順
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityCtx {
    issuer: String,
    roles: Vec<String>,
}

impl IdentityCtx {
    pub fn new(issuer: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            issuer: issuer.into(),
            roles,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// middleware → extractor への受け渡し。一度入れたら上書きしない
    pub fn attach(self, extensions: &mut Extensions) {
        if extensions.get::<IdentitySlot>().is_none() {
            extensions.insert(IdentitySlot(self));
        }
    }

    pub fn from_extensions(extensions: &Extensions) -> Option<&IdentityCtx> {
        extensions.get::<IdentitySlot>().map(|slot| &slot.0)
    }
}

impl From<Claims> for IdentityCtx {
    fn from(claims: Claims) -> Self {
        Self {
            issuer: claims.identity,
            roles: claims.abilities.into_iter().collect(),
        }
    }
}

#[derive(Clone)]
struct IdentitySlot(IdentityCtx);
