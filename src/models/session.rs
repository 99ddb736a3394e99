//! Session identity and its bearer-token form

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The user on whose behalf an operation runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// JWT claims carrying a [`Session`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(session: &Session, expiration_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: session.id.clone(),
            name: session.name.clone(),
            exp: (now + Duration::hours(expiration_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Decode and validate a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn session(&self) -> Session {
        Session {
            id: self.sub.clone(),
            name: self.name.clone(),
        }
    }
}
