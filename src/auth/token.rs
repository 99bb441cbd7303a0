use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Why a bearer token was refused
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Bearer token required")]
    Missing,

    #[error("Invalid token")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token lifetime out of range")]
    LifetimeOutOfRange,

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// A freshly signed access token and its lifetime in seconds
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// Stateless JWT issuance and verification
#[derive(Clone)]
pub struct TokenService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn lifetime_secs(&self) -> i64 {
        i64::try_from(self.config.lifetime.as_secs()).unwrap_or(i64::MAX)
    }

    /// Issue a token asserting `username` as subject
    pub fn issue(&self, username: &str) -> Result<IssuedToken, AuthError> {
        self.issue_at(username, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let expires_in = self.lifetime_secs();
        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or(AuthError::LifetimeOutOfRange)?;

        let claims = Claims {
            sub: username.to_string(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let access_token = encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)?;

        Ok(IssuedToken {
            access_token,
            expires_in,
        })
    }

    /// Check signature, issuer, audience and expiry; return the subject
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.leeway = 0;
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => {
                    tracing::debug!(error = %e, "rejected bearer token");
                    AuthError::InvalidSignature
                }
            }
        })?;

        Ok(token_data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use jsonwebtoken::Algorithm;

    fn test_config() -> JwtConfig {
        let mut config = AppConfig::development().jwt;
        config.secret = "test-secret-key-for-testing".to_string();
        config
    }

    #[test]
    fn issued_token_verifies_to_subject() {
        let service = TokenService::new(test_config());
        let issued = service.issue("admin").unwrap();

        assert!(!issued.access_token.is_empty());
        assert_eq!(issued.expires_in, 24 * 3600);
        assert_eq!(service.verify(&issued.access_token).unwrap(), "admin");
    }

    #[test]
    fn token_past_lifetime_is_expired() {
        let service = TokenService::new(test_config());
        let issued_at = Utc::now() - Duration::hours(25);
        let issued = service.issue_at("admin", issued_at).unwrap();

        assert!(matches!(
            service.verify(&issued.access_token),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn oversized_lifetime_is_an_error_not_a_panic() {
        let mut config = test_config();
        config.lifetime = std::time::Duration::from_secs(100_000_000_000 * 3600);
        let service = TokenService::new(config);

        assert!(matches!(
            service.issue("admin"),
            Err(AuthError::LifetimeOutOfRange)
        ));

        let mut config = test_config();
        config.lifetime = std::time::Duration::from_secs(u64::MAX);
        let service = TokenService::new(config);
        assert_eq!(service.lifetime_secs(), i64::MAX);
        assert!(matches!(
            service.issue("admin"),
            Err(AuthError::LifetimeOutOfRange)
        ));
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let service = TokenService::new(test_config());
        let mut other_config = test_config();
        other_config.secret = "some-other-secret".to_string();
        let forged = TokenService::new(other_config).issue("admin").unwrap();

        assert!(matches!(
            service.verify(&forged.access_token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn wrong_audience_is_invalid() {
        let service = TokenService::new(test_config());
        let mut other_config = test_config();
        other_config.audience = "someone-else".to_string();
        let token = TokenService::new(other_config).issue("admin").unwrap();

        assert!(matches!(
            service.verify(&token.access_token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn malformed_token_is_invalid() {
        let service = TokenService::new(test_config());
        assert!(matches!(
            service.verify("not-a-token"),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn algorithm_mismatch_is_invalid() {
        let service = TokenService::new(test_config());
        let mut other_config = test_config();
        other_config.algorithm = Algorithm::HS512;
        let token = TokenService::new(other_config).issue("admin").unwrap();

        assert!(matches!(
            service.verify(&token.access_token),
            Err(AuthError::InvalidSignature)
        ));
    }
}
