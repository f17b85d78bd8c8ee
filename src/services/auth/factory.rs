/// Factory: build `AuthGate` from application `Config`.
use std::sync::Arc;

use crate::config::{Config, PublicKeySource};
use crate::middleware::auth::AuthGate;
use crate::services::auth::claims::{ClaimsError, Ed25519ClaimsVerifier, VerifierPolicy};

pub fn build_auth_gate(config: &Config) -> Result<Arc<AuthGate>, ClaimsError> {
    let policy = VerifierPolicy {
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
        leeway_seconds: config.auth_leeway_seconds,
    };

    let verifier = match &config.auth_public_key {
        PublicKeySource::Pem(pem) => Ed25519ClaimsVerifier::from_pem(pem, policy)?,
        PublicKeySource::Base64(b64) => Ed25519ClaimsVerifier::from_base64(b64, policy)?,
    };
    let verifier = Arc::new(verifier);

    let gate = if config.allow_fake_auth {
        AuthGate::with_insecure_fake_identity(verifier)
    } else {
        AuthGate::new(verifier)
    };

    Ok(Arc::new(gate))
}
