use anyhow::{Context, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

/// Generate an HS256 bearer token for a user.
pub fn generate_jwt(user_id: impl Into<String>, secret: &str, expiration_days: i64) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("Failed to get current time")?
        .as_secs() as usize;

    let claims = Claims {
        sub: user_id.into(),
        exp: now + (expiration_days.max(1) as usize) * 24 * 60 * 60,
        iat: now,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT")?;

    Ok(token)
}

/// Validate and decode a bearer token.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT")?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_minimum_32_characters_long";

    #[test]
    fn generate_and_validate_roundtrip() {
        let token = generate_jwt("01JCZX6Y8RQW3V5T7N9M1K2P4D", SECRET, 1).unwrap();
        let claims = validate_jwt(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "01JCZX6Y8RQW3V5T7N9M1K2P4D");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_fails_validation() {
        let token = generate_jwt("01JCZX6Y8RQW3V5T7N9M1K2P4D", SECRET, 1).unwrap();
        assert!(validate_jwt(&token, "another_secret_key_32_characters!!").is_err());
    }

    #[test]
    fn garbage_token_fails_validation() {
        assert!(validate_jwt("not-a-jwt", SECRET).is_err());
    }
}
