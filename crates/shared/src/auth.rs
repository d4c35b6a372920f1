use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use domain::UserId;

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No authorization token provided")]
    MissingToken,

    #[error("Invalid authorization token")]
    InvalidToken,
}

/// Subject claims embedded in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn subject(&self) -> UserId {
        UserId::from_string(self.sub.clone())
    }
}

/// Issues and verifies bearer tokens. HS256 with a shared secret; the
/// auth collaborator issues with the same secret the endpoints verify
/// against.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, subject: &UserId, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| AuthError::InvalidToken)
    }

    /// Decodes and verifies a token. Expired or undecodable tokens are
    /// a terminal authorization failure, never an anonymous caller.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Pulls the bearer token out of an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MissingToken)?;
    let token = value.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)?;
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_decode_round_trips_subject() {
        let codec = TokenCodec::new("test-secret");
        let user = UserId::new();

        let token = codec.issue(&user, Duration::hours(1)).unwrap();
        let claims = codec.decode(&token).unwrap();

        assert_eq!(claims.subject(), user);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let issuer = TokenCodec::new("secret-a");
        let verifier = TokenCodec::new("secret-b");

        let token = issuer.issue(&UserId::new(), Duration::hours(1)).unwrap();
        assert!(matches!(
            verifier.decode(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_decode_rejects_expired_token() {
        let codec = TokenCodec::new("test-secret");

        let token = codec.issue(&UserId::new(), Duration::hours(-2)).unwrap();
        assert!(matches!(codec.decode(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let codec = TokenCodec::new("test-secret");
        assert!(codec.decode("not.a.jwt").is_err());
        assert!(codec.decode("").is_err());
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(Some("Bearer abc123")).unwrap(), "abc123");
        assert!(matches!(bearer_token(None), Err(AuthError::MissingToken)));
        assert!(matches!(
            bearer_token(Some("abc123")),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(Some("Bearer ")),
            Err(AuthError::MissingToken)
        ));
    }
}
