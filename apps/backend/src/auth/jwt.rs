use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::claims::{IdentityClaim, TokenSubject};
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Why a token was rejected. Kept for debug logging; callers only ever
/// surface the opaque [`InvalidToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTokenReason {
    Expired,
    BadSignature,
    WrongAlgorithm,
    Malformed,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid token")]
pub struct InvalidToken {
    reason: InvalidTokenReason,
}

impl InvalidToken {
    pub fn reason(&self) -> InvalidTokenReason {
        self.reason
    }
}

/// Sign an access token for `subject`, valid for the configured TTL from `now`.
pub fn issue_token(
    subject: &TokenSubject,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;
    let exp = iat + security.token_ttl.as_secs() as i64;

    let claims = IdentityClaim {
        sub: subject.id,
        email: subject.email.clone(),
        role: subject.role,
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify signature, algorithm and expiry, returning the embedded claim.
pub fn verify_token(token: &str, security: &SecurityConfig) -> Result<IdentityClaim, InvalidToken> {
    // Default Validation already checks exp; pin algorithm to configured algorithm.
    let validation = Validation::new(security.algorithm);

    decode::<IdentityClaim>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        let reason = match e.kind() {
            ErrorKind::ExpiredSignature => InvalidTokenReason::Expired,
            ErrorKind::InvalidSignature => InvalidTokenReason::BadSignature,
            ErrorKind::InvalidAlgorithm => InvalidTokenReason::WrongAlgorithm,
            _ => InvalidTokenReason::Malformed,
        };
        InvalidToken { reason }
    })
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use jsonwebtoken::Algorithm;

    use super::*;
    use crate::auth::claims::Role;

    const SECRET: &str = "test_secret_key_for_testing_purposes_only";

    fn subject() -> TokenSubject {
        TokenSubject {
            id: 42,
            email: "bendahara@masjid.test".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let security = SecurityConfig::new(SECRET.as_bytes());
        let now = SystemTime::now();

        let token = issue_token(&subject(), now, &security).unwrap();
        let claim = verify_token(&token, &security).unwrap();

        assert_eq!(claim.account_id(), 42);
        assert_eq!(claim.email, "bendahara@masjid.test");
        assert_eq!(claim.role, Role::Admin);
        assert_eq!(
            claim.iat,
            now.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
        );
        assert_eq!(claim.exp, claim.iat + 7 * 24 * 60 * 60);
    }

    #[test]
    fn ttl_comes_from_config() {
        let security =
            SecurityConfig::new(SECRET.as_bytes()).with_token_ttl(Duration::from_secs(600));
        let token = issue_token(&subject(), SystemTime::now(), &security).unwrap();
        let claim = verify_token(&token, &security).unwrap();
        assert_eq!(claim.exp - claim.iat, 600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let security =
            SecurityConfig::new(SECRET.as_bytes()).with_token_ttl(Duration::from_secs(60));
        // Well past exp plus the validator's default leeway.
        let issued = SystemTime::now() - Duration::from_secs(60 * 60);

        let token = issue_token(&subject(), issued, &security).unwrap();
        let err = verify_token(&token, &security).unwrap_err();
        assert_eq!(err.reason(), InvalidTokenReason::Expired);
    }

    #[test]
    fn different_secret_is_rejected() {
        let security_a = SecurityConfig::new("secret-A-0123456789abcdef01234567".as_bytes());
        let security_b = SecurityConfig::new("secret-B-0123456789abcdef01234567".as_bytes());

        let token = issue_token(&subject(), SystemTime::now(), &security_a).unwrap();
        let err = verify_token(&token, &security_b).unwrap_err();
        assert_eq!(err.reason(), InvalidTokenReason::BadSignature);
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let mut hs384 = SecurityConfig::new(SECRET.as_bytes());
        hs384.algorithm = Algorithm::HS384;
        let token = issue_token(&subject(), SystemTime::now(), &hs384).unwrap();

        let err = verify_token(&token, &SecurityConfig::new(SECRET.as_bytes())).unwrap_err();
        assert_eq!(err.reason(), InvalidTokenReason::WrongAlgorithm);
    }

    #[test]
    fn garbage_is_malformed() {
        let security = SecurityConfig::new(SECRET.as_bytes());
        for token in ["", "not-a-jwt", "a.b.c"] {
            let err = verify_token(token, &security).unwrap_err();
            assert_eq!(err.reason(), InvalidTokenReason::Malformed, "token {token:?}");
        }
    }
}
