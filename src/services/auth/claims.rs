use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Deserializer, de::IgnoredAny};
use std::{
    collections::{BTreeMap, BTreeSet},
    error::Error as StdError,
    fmt,
};

/// Errors returned while loading the public key or verifying a credential.
#[derive(Debug)]
pub enum ClaimsError {
    Jwt(jsonwebtoken::errors::Error),
    InvalidKey(String),
}

impl fmt::Display for ClaimsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "credential verification failed: {}", e),
            Self::InvalidKey(reason) => write!(f, "invalid ed25519 public key: {}", reason),
        }
    }
}

impl StdError for ClaimsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ClaimsError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Granted ability labels. Set semantics: duplicates in the payload collapse.
pub type Abilities = BTreeSet<String>;

/// Verified content of a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub identity: String,
    pub abilities: Abilities,
}

// Payload layout as produced by the issuer:
// { "name": "0xABC", "role": { "abilities": ["admin"] }, "exp": ... }
// `abilities` may also be a set-as-object, `{"admin": {}}` / `{"admin": true}`;
// only the keys count.
// `exp` / `iss` / `aud` are checked by jsonwebtoken from the raw payload.
#[derive(Debug, Clone, Deserialize)]
struct CredentialClaims {
    name: String,
    role: RoleClaim,
}

#[derive(Debug, Clone, Deserialize)]
struct RoleClaim {
    #[serde(deserialize_with = "list_or_set")]
    abilities: Abilities,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AbilitiesWire {
    List(Vec<String>),
    Set(BTreeMap<String, IgnoredAny>),
}

fn list_or_set<'de, D>(deserializer: D) -> Result<Abilities, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match AbilitiesWire::deserialize(deserializer)? {
        AbilitiesWire::List(labels) => labels.into_iter().collect(),
        AbilitiesWire::Set(labels) => labels.into_keys().collect(),
    })
}

impl From<CredentialClaims> for Claims {
    fn from(c: CredentialClaims) -> Self {
        Self {
            identity: c.name,
            abilities: c.role.abilities,
        }
    }
}

/// Turns the raw credential value (the part after the scheme) into `Claims`.
///
/// Implementations must be pure: same input, same output, no side effects.
pub trait ClaimsVerifier: Send + Sync {
    fn verify(&self, credential: &str) -> Result<Claims, ClaimsError>;
}

/// Optional registered-claim checks on top of the signature.
#[derive(Debug, Clone, Default)]
pub struct VerifierPolicy {
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

/// EdDSA (Ed25519) credential verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct Ed25519ClaimsVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for Ed25519ClaimsVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("Ed25519ClaimsVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl Ed25519ClaimsVerifier {
    /// `public_key_pem` must be an Ed25519 SubjectPublicKeyInfo PEM.
    pub fn from_pem(public_key_pem: &str, policy: VerifierPolicy) -> Result<Self, ClaimsError> {
        let decoding_key = DecodingKey::from_ed_pem(public_key_pem.as_bytes())
            .map_err(|e| ClaimsError::InvalidKey(e.to_string()))?;

        Ok(Self::with_key(decoding_key, policy))
    }

    /// `public_key_b64` is the raw 32-byte public key in standard base64.
    pub fn from_base64(public_key_b64: &str, policy: VerifierPolicy) -> Result<Self, ClaimsError> {
        let raw = STANDARD
            .decode(public_key_b64.trim())
            .map_err(|e| ClaimsError::InvalidKey(e.to_string()))?;

        if raw.len() != 32 {
            return Err(ClaimsError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                raw.len()
            )));
        }

        // jsonwebtoken takes raw OKP keys in their JWK (`x`) encoding.
        let decoding_key = DecodingKey::from_ed_components(&URL_SAFE_NO_PAD.encode(&raw))
            .map_err(|e| ClaimsError::InvalidKey(e.to_string()))?;

        Ok(Self::with_key(decoding_key, policy))
    }

    fn with_key(decoding_key: DecodingKey, policy: VerifierPolicy) -> Self {
        let mut validation = Validation::new(Algorithm::EdDSA);
        // The issuer is not required to stamp registered claims; `exp` is
        // still enforced whenever it is present.
        validation.required_spec_claims.clear();
        validation.leeway = policy.leeway_seconds;

        if let Some(issuer) = policy.issuer.as_deref() {
            validation.set_issuer(&[issuer]);
            validation.required_spec_claims.insert("iss".to_string());
        }
        match policy.audience.as_deref() {
            Some(audience) => {
                validation.set_audience(&[audience]);
                validation.required_spec_claims.insert("aud".to_string());
            }
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key,
            validation,
        }
    }
}

impl ClaimsVerifier for Ed25519ClaimsVerifier {
    fn verify(&self, credential: &str) -> Result<Claims, ClaimsError> {
        let data = jsonwebtoken::decode::<CredentialClaims>(
            credential,
            &self.decoding_key,
            &self.validation,
        )?;

        Ok(data.claims.into())
    }
}
