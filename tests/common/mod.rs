//! Shared helpers for router-level tests.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use ed25519_dalek::SigningKey;
use ed25519_dalek::pkcs8::{EncodePrivateKey, EncodePublicKey, spki::der::pem::LineEnding};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

use bearer_gate::app::build_router;
use bearer_gate::config::Config;
use bearer_gate::services::auth::build_auth_gate;
use bearer_gate::state::AppState;

/// Stand-in for the external credential issuer: a deterministic Ed25519 key pair.
pub struct TestIssuer {
    encoding_key: EncodingKey,
    pub public_pem: String,
    /// Raw 32-byte public key, standard base64.
    pub public_b64: String,
}

impl TestIssuer {
    pub fn new(seed: u8) -> Self {
        let signing_key = SigningKey::from_bytes(&[seed; 32]);
        let private_der = signing_key.to_pkcs8_der().unwrap();
        let public_pem = signing_key
            .verifying_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap();

        Self {
            encoding_key: EncodingKey::from_ed_der(private_der.as_bytes()),
            public_pem,
            public_b64: STANDARD.encode(signing_key.verifying_key().as_bytes()),
        }
    }

    pub fn sign_payload(&self, payload: &Value) -> String {
        jsonwebtoken::encode(&Header::new(Algorithm::EdDSA), payload, &self.encoding_key).unwrap()
    }

    pub fn sign(&self, identity: &str, abilities: &[&str]) -> String {
        self.sign_payload(&json!({ "name": identity, "role": { "abilities": abilities } }))
    }

    pub fn bearer(&self, identity: &str, abilities: &[&str]) -> String {
        format!("Bearer {}", self.sign(identity, abilities))
    }
}

pub fn test_config(issuer: &TestIssuer, allow_fake_auth: bool) -> Config {
    let public_pem = issuer.public_pem.clone();
    let allow = allow_fake_auth.to_string();

    Config::from_lookup(|key| match key {
        "AUTH_PUBLIC_KEY_PEM" => Some(public_pem.clone()),
        "ALLOW_FAKE_AUTH" => Some(allow.clone()),
        _ => None,
    })
    .unwrap()
}

pub fn test_app(issuer: &TestIssuer, allow_fake_auth: bool) -> Router {
    let config = test_config(issuer, allow_fake_auth);
    let gate = build_auth_gate(&config).unwrap();
    build_router(AppState::new(gate), &config)
}

/// Same as `test_app`, but the gate is configured through `AUTH_PUBLIC_KEY_B64`.
pub fn test_app_with_raw_key(issuer: &TestIssuer) -> Router {
    let public_b64 = issuer.public_b64.clone();
    let config = Config::from_lookup(|key| match key {
        "AUTH_PUBLIC_KEY_B64" => Some(public_b64.clone()),
        _ => None,
    })
    .unwrap();

    let gate = build_auth_gate(&config).unwrap();
    build_router(AppState::new(gate), &config)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub request_id: Option<String>,
    pub json: Value,
}

pub async fn get(app: Router, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };

    TestResponse {
        status,
        request_id,
        json,
    }
}

pub fn assert_unauthenticated(response: &TestResponse) {
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json["error"]["code"], "UNAUTHENTICATED");
    assert_eq!(response.json["error"]["message"], "bearer token is not correct");
}
