/*
 * Responsibility
 * - 環境変数や設定の読み込み (公開鍵、fake auth、CORS 許可など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - production で fake auth を有効にする設定は拒否する
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn from_value(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where the issuer's Ed25519 public key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKeySource {
    /// SubjectPublicKeyInfo PEM.
    Pem(String),
    /// Raw 32-byte key, standard base64.
    Base64(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth_public_key: PublicKeySource,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub auth_leeway_seconds: u64,

    // Trust X-Fake-User-Addr / X-Fake-Role without verification. Never in production.
    pub allow_fake_auth: bool,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source (process env, a map in tests, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = parse_or(non_empty("PORT"), "PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_value(non_empty("APP_ENV").as_deref());

        let cors_allowed_origins = non_empty("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth_public_key = match (
            non_empty("AUTH_PUBLIC_KEY_PEM"),
            non_empty("AUTH_PUBLIC_KEY_B64"),
        ) {
            (Some(pem), _) => PublicKeySource::Pem(pem.replace("\\n", "\n")),
            (None, Some(b64)) => PublicKeySource::Base64(b64),
            (None, None) => return Err(ConfigError::Missing("AUTH_PUBLIC_KEY_PEM")),
        };

        let auth_issuer = non_empty("AUTH_ISSUER");
        let auth_audience = non_empty("AUTH_AUDIENCE");

        let auth_leeway_seconds = parse_or(non_empty("AUTH_LEEWAY_SECONDS"), "AUTH_LEEWAY_SECONDS", 60)?;

        let allow_fake_auth = match non_empty("ALLOW_FAKE_AUTH") {
            None => false,
            Some(v) => parse_flag(&v).ok_or(ConfigError::Invalid("ALLOW_FAKE_AUTH"))?,
        };
        if allow_fake_auth && app_env.is_production() {
            return Err(ConfigError::Invalid("ALLOW_FAKE_AUTH"));
        }

        let request_timeout_seconds = parse_or(
            non_empty("REQUEST_TIMEOUT_SECONDS"),
            "REQUEST_TIMEOUT_SECONDS",
            30,
        )?;
        let request_body_limit_bytes = parse_or(
            non_empty("REQUEST_BODY_LIMIT_BYTES"),
            "REQUEST_BODY_LIMIT_BYTES",
            1024 * 1024,
        )?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            auth_public_key,
            auth_issuer,
            auth_audience,
            auth_leeway_seconds,
            allow_fake_auth,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    const KEY: (&str, &str) = ("AUTH_PUBLIC_KEY_B64", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=");

    #[test]
    fn defaults() {
        let config = config(&[KEY]).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(!config.allow_fake_auth);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.auth_issuer, None);
        assert_eq!(config.auth_audience, None);
        assert_eq!(config.auth_leeway_seconds, 60);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.request_body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn public_key_is_required() {
        assert_eq!(
            config(&[]).unwrap_err(),
            ConfigError::Missing("AUTH_PUBLIC_KEY_PEM")
        );
        assert_eq!(
            config(&[("AUTH_PUBLIC_KEY_PEM", "  ")]).unwrap_err(),
            ConfigError::Missing("AUTH_PUBLIC_KEY_PEM")
        );
    }

    #[test]
    fn pem_wins_and_unescapes_newlines() {
        let config = config(&[
            ("AUTH_PUBLIC_KEY_PEM", "-----BEGIN PUBLIC KEY-----\\nabc\\n-----END PUBLIC KEY-----"),
            KEY,
        ])
        .unwrap();
        assert_eq!(
            config.auth_public_key,
            PublicKeySource::Pem("-----BEGIN PUBLIC KEY-----\nabc\n-----END PUBLIC KEY-----".into())
        );
    }

    #[test]
    fn fake_auth_flag_parsing() {
        for value in ["true", "TRUE", "1", "yes", "on"] {
            assert!(config(&[KEY, ("ALLOW_FAKE_AUTH", value)]).unwrap().allow_fake_auth);
        }
        for value in ["false", "0", "no", "off"] {
            assert!(!config(&[KEY, ("ALLOW_FAKE_AUTH", value)]).unwrap().allow_fake_auth);
        }
        assert_eq!(
            config(&[KEY, ("ALLOW_FAKE_AUTH", "maybe")]).unwrap_err(),
            ConfigError::Invalid("ALLOW_FAKE_AUTH")
        );
    }

    #[test]
    fn fake_auth_refused_in_production() {
        assert_eq!(
            config(&[KEY, ("APP_ENV", "production"), ("ALLOW_FAKE_AUTH", "true")]).unwrap_err(),
            ConfigError::Invalid("ALLOW_FAKE_AUTH")
        );
        assert_eq!(
            config(&[KEY, ("APP_ENV", "PROD"), ("ALLOW_FAKE_AUTH", "1")]).unwrap_err(),
            ConfigError::Invalid("ALLOW_FAKE_AUTH")
        );

        let config = config(&[KEY, ("APP_ENV", "production"), ("ALLOW_FAKE_AUTH", "false")]).unwrap();
        assert!(config.app_env.is_production());
        assert!(!config.allow_fake_auth);
    }

    #[test]
    fn numeric_values_must_parse() {
        assert_eq!(
            config(&[KEY, ("PORT", "http")]).unwrap_err(),
            ConfigError::Invalid("PORT")
        );
        assert_eq!(
            config(&[KEY, ("AUTH_LEEWAY_SECONDS", "-1")]).unwrap_err(),
            ConfigError::Invalid("AUTH_LEEWAY_SECONDS")
        );

        let config = config(&[KEY, ("PORT", "8080"), ("REQUEST_TIMEOUT_SECONDS", "5")]).unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.request_timeout_seconds, 5);
    }

    #[test]
    fn cors_origins_are_trimmed() {
        let config = config(&[
            KEY,
            ("CORS_ALLOWED_ORIGINS", " https://a.example , ,https://b.example"),
        ])
        .unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }
}
