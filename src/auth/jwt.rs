use crate::core::constants::{RECOMMENDED_SECRET_BYTES, TOKEN_TTL_HOURS};
use crate::core::errors::TodoError;
use crate::core::models::user::{Role, User};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // User ID
    pub email: String,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity recovered from a verified token, attached to authenticated requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUserInfo {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for TokenUserInfo {
    fn from(claims: Claims) -> Self {
        TokenUserInfo {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: impl Into<String>) -> Self {
        if secret.len() < RECOMMENDED_SECRET_BYTES {
            tracing::warn!(
                "JWT secret is {} bytes; at least {} bytes are recommended for HS512",
                secret.len(),
                RECOMMENDED_SECRET_BYTES
            );
        }
        JwtService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String, TodoError> {
        self.issue_token_at(user, Utc::now())
    }

    pub(crate) fn issue_token_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, TodoError> {
        let expiry = issued_at + Duration::hours(TOKEN_TTL_HOURS);
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| TodoError::InternalServerError(format!("JWT encoding error: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<TokenUserInfo, TodoError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        // Expired means expired: no clock-skew allowance.
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| TodoError::InvalidToken(e.to_string()))?;

        tracing::debug!("claims: {:?}", token_data.claims);
        Ok(token_data.claims.into())
    }
}
