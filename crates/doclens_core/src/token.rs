//! crates/doclens_core/src/token.rs
//!
//! Issues, verifies, and refreshes signed session tokens. A token is an
//! HS256-signed JWT carrying the user's identity; validity derives purely
//! from the signature and the embedded expiry, nothing is stored server-side.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Failure taxonomy for token verification.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token decoded but its signature does not match the server secret.
    #[error("invalid token signature")]
    Invalid,
    /// The token is well-formed and signed, but its expiry is in the past.
    #[error("token expired")]
    Expired,
    /// The string is not a decodable token at all.
    #[error("malformed token")]
    Malformed,
    /// Signing a new token failed.
    #[error("token could not be signed: {0}")]
    Signing(String),
}

/// Identity claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// The result of a sliding-window renewal check.
#[derive(Debug, Clone)]
pub enum Refresh {
    /// Remaining lifetime was above the threshold; the original token stands.
    Kept(String),
    /// A fresh token was issued with identical identity claims.
    Renewed(String),
}

impl Refresh {
    pub fn token(&self) -> &str {
        match self {
            Refresh::Kept(token) | Refresh::Renewed(token) => token,
        }
    }
}

/// Signs and verifies session tokens against a single server secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl: Duration,
}

impl TokenService {
    /// Creates a service around the shared secret. `default_ttl` is the
    /// lifetime used for tokens issued during sliding renewal.
    pub fn new(secret: &str, default_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl,
        }
    }

    /// Signs a new token for the given identity, valid for `ttl` from now.
    pub fn issue(&self, user_id: Uuid, email: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Decodes and validates a token. Pure computation, no side effects.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a token is rejected the moment its expiry passes.
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::Invalid,
                _ => TokenError::Malformed,
            })
    }

    /// Returns the original token while its remaining lifetime is at least
    /// `threshold`, otherwise reissues one with the same identity and a
    /// renewed expiry.
    pub fn refresh_if_near_expiry(
        &self,
        token: &str,
        threshold: Duration,
    ) -> Result<Refresh, TokenError> {
        let claims = self.verify(token)?;
        let remaining = claims.exp - Utc::now().timestamp();
        if remaining >= threshold.num_seconds() {
            return Ok(Refresh::Kept(token.to_string()));
        }
        let renewed = self.issue(claims.sub, &claims.email, self.default_ttl)?;
        Ok(Refresh::Renewed(renewed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret-keep-out", Duration::days(30))
    }

    #[test]
    fn verify_returns_issued_claims_unchanged() {
        let service = service();
        let user_id = Uuid::new_v4();
        let token = service
            .issue(user_id, "user@example.com", Duration::hours(24))
            .unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let service = service();
        let token = service
            .issue(Uuid::new_v4(), "user@example.com", Duration::seconds(-60))
            .unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn verify_rejects_tampered_signature() {
        let service = service();
        let token = service
            .issue(Uuid::new_v4(), "user@example.com", Duration::hours(1))
            .unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let mut sig: Vec<char> = parts[2].chars().collect();
        let last = sig.len() - 1;
        sig[last] = if sig[last] == 'A' { 'B' } else { 'A' };
        parts[2] = sig.into_iter().collect();
        let tampered = parts.join(".");

        assert!(matches!(
            service.verify(&tampered),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn verify_rejects_token_signed_with_other_secret() {
        let service = service();
        let other = TokenService::new("a-different-secret", Duration::days(30));
        let token = other
            .issue(Uuid::new_v4(), "user@example.com", Duration::hours(1))
            .unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn verify_rejects_garbage_as_malformed() {
        let service = service();
        assert!(matches!(
            service.verify("definitely-not-a-jwt"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(
            service.verify("still.not.a-jwt"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(service.verify(""), Err(TokenError::Malformed)));
    }

    #[test]
    fn refresh_keeps_token_with_plenty_of_lifetime() {
        let service = service();
        let token = service
            .issue(Uuid::new_v4(), "user@example.com", Duration::hours(10))
            .unwrap();

        let refresh = service
            .refresh_if_near_expiry(&token, Duration::hours(1))
            .unwrap();
        match refresh {
            Refresh::Kept(kept) => assert_eq!(kept, token),
            Refresh::Renewed(_) => panic!("token should not have been renewed"),
        }
    }

    #[test]
    fn refresh_reissues_token_near_expiry() {
        let service = service();
        let user_id = Uuid::new_v4();
        let token = service
            .issue(user_id, "user@example.com", Duration::minutes(30))
            .unwrap();
        let old_claims = service.verify(&token).unwrap();

        let refresh = service
            .refresh_if_near_expiry(&token, Duration::hours(1))
            .unwrap();
        let Refresh::Renewed(renewed) = refresh else {
            panic!("token should have been renewed");
        };

        let new_claims = service.verify(&renewed).unwrap();
        assert_eq!(new_claims.sub, user_id);
        assert_eq!(new_claims.email, old_claims.email);
        assert!(new_claims.exp > old_claims.exp);
    }

    #[test]
    fn refresh_propagates_verification_failure() {
        let service = service();
        let token = service
            .issue(Uuid::new_v4(), "user@example.com", Duration::seconds(-60))
            .unwrap();

        assert!(matches!(
            service.refresh_if_near_expiry(&token, Duration::hours(1)),
            Err(TokenError::Expired)
        ));
    }
}
