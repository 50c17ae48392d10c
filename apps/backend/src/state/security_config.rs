use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::error::AppError;

/// Access tokens live for seven days unless `JWT_TTL_SECS` says otherwise.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// HS256 keys shorter than the hash output are rejected at startup.
pub const MIN_SECRET_LEN: usize = 32;

/// Configuration for JWT security settings
#[derive(Clone)]
pub struct SecurityConfig {
    /// JWT secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (HS256)
    pub algorithm: Algorithm,
    /// Lifetime stamped into every issued token
    pub token_ttl: Duration,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret and the default TTL.
    ///
    /// No length check here; startup goes through [`SecurityConfig::from_env`].
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Load from `JWT_SECRET` / `JWT_TTL_SECS`.
    ///
    /// A missing or short secret is a hard error; there is no fallback key.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::config("Required environment variable 'JWT_SECRET' is not set"))?;

        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::config(format!(
                "JWT_SECRET must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        let ttl = match lookup("JWT_TTL_SECS") {
            None => DEFAULT_TOKEN_TTL,
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    AppError::config(format!("JWT_TTL_SECS must be a positive integer, got '{raw}'"))
                })?;
                if secs == 0 {
                    return Err(AppError::config("JWT_TTL_SECS must be greater than zero"));
                }
                Duration::from_secs(secs)
            }
        };

        Ok(Self::new(secret.into_bytes()).with_token_ttl(ttl))
    }
}

// Keep the secret out of Debug output (and therefore out of logs).
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    const GOOD_SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn missing_secret_is_a_config_error() {
        let err = SecurityConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn blank_secret_is_rejected() {
        let err = SecurityConfig::from_lookup(lookup_from(&[("JWT_SECRET", "   ")])).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn short_secret_is_rejected() {
        let err =
            SecurityConfig::from_lookup(lookup_from(&[("JWT_SECRET", "too-short")])).unwrap_err();
        assert!(err.to_string().contains("at least"));
    }

    #[test]
    fn default_ttl_is_seven_days() {
        let config =
            SecurityConfig::from_lookup(lookup_from(&[("JWT_SECRET", GOOD_SECRET)])).unwrap();
        assert_eq!(config.token_ttl, Duration::from_secs(604_800));
        assert_eq!(config.jwt_secret, GOOD_SECRET.as_bytes());
    }

    #[test]
    fn ttl_override_is_parsed() {
        let config = SecurityConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", GOOD_SECRET),
            ("JWT_TTL_SECS", "3600"),
        ]))
        .unwrap();
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn invalid_ttl_is_rejected() {
        for raw in ["0", "-1", "soon"] {
            let result = SecurityConfig::from_lookup(lookup_from(&[
                ("JWT_SECRET", GOOD_SECRET),
                ("JWT_TTL_SECS", raw),
            ]));
            assert!(result.is_err(), "expected {raw} to be rejected");
        }
    }

    #[test]
    fn debug_redacts_secret() {
        let config = SecurityConfig::new(GOOD_SECRET.as_bytes());
        let printed = format!("{config:?}");
        assert!(!printed.contains(GOOD_SECRET));
        assert!(printed.contains("REDACTED"));
    }
}
