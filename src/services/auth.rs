// src/services/auth.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::auth::Claims,
    models::ids::UserKey,
};

// Emissão e validação de tokens. O login (senha, SSO) é feito fora daqui.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            jwt_secret,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    pub fn create_token(&self, user: UserKey) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.user,
            tenant: user.tenant,
            exp: (now + self.token_ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> Result<UserKey, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(UserKey::new(token_data.claims.tenant, token_data.claims.sub))
    }
}
