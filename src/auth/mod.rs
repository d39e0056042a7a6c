//! Access token issuing and verification
//!
//! Issued tokens are stateless HS256 JWTs carrying the user id as their
//! subject claim. No expiry is set; a token stays valid until the signing
//! key changes.
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub mod password;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum VerifyError {
    #[error("Not a valid access token")]
    InvalidToken,
    #[error("Access token has an invalid signature")]
    InvalidSignature,
}

/// Claims carried by every issued access token
#[derive(Debug, Serialize, Deserialize)]
struct AccessTokenClaims {
    /// Subject (User ID)
    sub: i64,
}

/// Signs and verifies access tokens with a shared secret.
///
/// Is provided to the endpoints as application data.
pub struct TokenContext {
    secret: String,
}

impl TokenContext {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Issues a new access token for the given user id.
    pub fn issue_access_token(&self, user_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = AccessTokenClaims { sub: user_id };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Verifies a raw access token and returns the user id from its subject
    /// claim.
    ///
    /// Returns `Err(_)` when the signature is invalid, the subject claim is
    /// missing or the token cannot be decoded.
    pub fn verify_access_token(&self, token: &str) -> Result<i64, VerifyError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.into_kind() {
            ErrorKind::InvalidSignature => VerifyError::InvalidSignature,
            _ => VerifyError::InvalidToken,
        })?;

        Ok(token_data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn context() -> TokenContext {
        TokenContext::new("test_secret".to_string())
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let ctx = context();

        let token = ctx.issue_access_token(42).unwrap();
        let user_id = ctx.verify_access_token(&token).expect("token must verify");

        assert_eq!(user_id, 42);
    }

    #[test]
    fn foreign_signing_key_is_rejected() {
        let ctx = context();
        let other = TokenContext::new("other_secret".to_string());

        let token = other.issue_access_token(42).unwrap();

        assert_eq!(
            ctx.verify_access_token(&token),
            Err(VerifyError::InvalidSignature)
        );
    }

    #[test]
    fn missing_subject_is_rejected() {
        let ctx = context();

        // signed with the right key, but without a sub claim
        let token = encode(
            &Header::default(),
            &serde_json::json!({ "iat": 0 }),
            &EncodingKey::from_secret(b"test_secret"),
        )
        .unwrap();

        assert_eq!(
            ctx.verify_access_token(&token),
            Err(VerifyError::InvalidToken)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        let ctx = context();

        assert_eq!(
            ctx.verify_access_token("not-a-jwt"),
            Err(VerifyError::InvalidToken)
        );
    }
}
