/*
 * Responsibility
 * - middlware の公開インターフェース (re-export)
 * - auth (AuthGate), cors, http (request-id / trace / limit / timeout)
 */
pub mod auth;
pub mod cors;
pub mod http;
