use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,  // User ID (Subject)
    pub iat: usize,
    pub exp: usize,
    pub role: String,
    pub user_id: i32,
    /// Granted scopes, e.g. `get:students`
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Claims {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.permissions.iter().any(|p| p == scope)
    }
}

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_seconds: u64,
}

impl JwtManager {
    pub fn new(secret: &str, expiration_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_seconds,
        }
    }

    pub fn expiration_seconds(&self) -> u64 {
        self.expiration_seconds
    }

    pub fn generate_token(
        &self,
        user_id: i32,
        role: &str,
        permissions: Vec<String>,
    ) -> Result<String, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| JwtError::CreationError(e.to_string()))?
            .as_secs() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.expiration_seconds as usize,
            role: role.to_string(),
            user_id,
            permissions,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreationError(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| JwtError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_keeps_scopes() {
        let jwt = JwtManager::new("test-secret", 60);
        let token = jwt
            .generate_token(7, "instructor", vec!["get:courses".into()])
            .unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.role, "instructor");
        assert!(claims.has_scope("get:courses"));
        assert!(!claims.has_scope("delete:courses"));
    }

    #[test]
    fn wrong_secret_rejected() {
        let issuer = JwtManager::new("secret-a", 60);
        let verifier = JwtManager::new("secret-b", 60);
        let token = issuer.generate_token(1, "admin", vec![]).unwrap();
        assert!(matches!(
            verifier.validate_token(&token),
            Err(JwtError::ValidationError(_))
        ));
    }

    #[test]
    fn garbage_rejected() {
        let jwt = JwtManager::new("secret", 60);
        assert!(jwt.validate_token("not.a.jwt").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let jwt = JwtManager::new("secret", 60);
        let claims = Claims {
            sub: "1".into(),
            iat: 1_000,
            exp: 2_000,
            role: "admin".into(),
            user_id: 1,
            permissions: vec![],
        };
        let token = encode(&Header::default(), &claims, &jwt.encoding_key).unwrap();
        assert!(jwt.validate_token(&token).is_err());
    }
}
