use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpersonationClaims {
    /// Profile being viewed.
    pub sub: Uuid,
    pub imp: bool,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpersonationToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues short-lived bearer tokens for the admin "view as student" mode.
pub struct ImpersonationService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl ImpersonationService {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, profile_id: Uuid) -> Result<ImpersonationToken> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = ImpersonationClaims {
            sub: profile_id,
            imp: true,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(ImpersonationToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<ImpersonationClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<ImpersonationClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("Rejected impersonation token: {}", e);
                AppError::Unauthorized
            })?;
        if !data.claims.imp {
            return Err(AppError::Unauthorized);
        }

        Ok(data.claims)
    }
}
