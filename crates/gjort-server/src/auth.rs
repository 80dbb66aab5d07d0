use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use gjort_common::models::auth::Claims;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};

/// Access token lifetime: 24 hours from issuance
pub const ACCESS_TOKEN_TTL_SECS: i64 = 86_400;

/// Hash a password using argon2id with a per-call random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash. The comparison inside argon2
/// verification is constant-time.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Why a token failed verification. The API collapses all three into a
/// single 401; the distinction exists for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Malformed,
    SignatureInvalid,
    Expired,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "malformed token"),
            TokenError::SignatureInvalid => write!(f, "invalid signature"),
            TokenError::Expired => write!(f, "token expired"),
        }
    }
}

/// Create an access token (JWT) for the given user id
pub fn create_access_token(user_id: &str, jwt_secret: &str) -> Result<String> {
    create_access_token_at(user_id, jwt_secret, chrono::Utc::now().timestamp())
}

/// Create an access token with an explicit issue time. Split out so
/// tests can simulate the clock.
pub fn create_access_token_at(user_id: &str, jwt_secret: &str, issued_at: i64) -> Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        iat: issued_at,
        exp: issued_at + ACCESS_TOKEN_TTL_SECS,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .context("Failed to create access token")
}

/// Validate an access token and return its claims. Expiry is exact --
/// zero leeway -- so a token is rejected the second after `exp`.
pub fn validate_access_token(token: &str, jwt_secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    match jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims),
        Err(e) => Err(match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            _ => TokenError::Malformed,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify_correct() {
        let password = "my-secure-password";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).unwrap());
    }

    #[test]
    fn test_password_hash_is_not_plaintext() {
        let password = "secret1";
        let hash = hash_password(password).unwrap();
        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_password_verify_wrong() {
        let hash = hash_password("correct-password").unwrap();
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_password_different_salts() {
        let password = "same-password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();
        assert_ne!(hash1, hash2);
        // Both still verify
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("whatever", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_token_create_and_validate() {
        let secret = "test-jwt-secret";
        let token = create_access_token("user-123", secret).unwrap();
        let claims = validate_access_token(&token, secret).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.exp, claims.iat + ACCESS_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_token_wrong_secret_fails() {
        let token = create_access_token("user-123", "secret-1").unwrap();
        let err = validate_access_token(&token, "secret-2").unwrap_err();
        assert_eq!(err, TokenError::SignatureInvalid);
    }

    #[test]
    fn test_token_garbage_is_malformed() {
        assert_eq!(
            validate_access_token("not-a-jwt", "secret").unwrap_err(),
            TokenError::Malformed
        );
        assert_eq!(
            validate_access_token("", "secret").unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_token_tampered_payload_fails() {
        let secret = "test-jwt-secret";
        let token = create_access_token("user-123", secret).unwrap();
        // Swap the payload segment for one from a different token
        let other = create_access_token("user-456", secret).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);
        assert_eq!(
            validate_access_token(&tampered, secret).unwrap_err(),
            TokenError::SignatureInvalid
        );
    }

    #[test]
    fn test_token_expired_after_24h() {
        let secret = "test-jwt-secret";
        let now = chrono::Utc::now().timestamp();

        // Issued 24h + 1s ago: just past expiry
        let token = create_access_token_at("user-123", secret, now - ACCESS_TOKEN_TTL_SECS - 1)
            .unwrap();
        assert_eq!(
            validate_access_token(&token, secret).unwrap_err(),
            TokenError::Expired
        );

        // Issued 1h ago: still well within the window
        let token = create_access_token_at("user-123", secret, now - 3_600).unwrap();
        assert!(validate_access_token(&token, secret).is_ok());
    }
}
