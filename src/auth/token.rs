//! Signed, time-bounded identity tokens (HS256 JWT)
//!
//! Claims are only reachable through [`Verification::Verified`], so nothing can
//! read a subject or role out of a token that has not passed signature and
//! expiry checks.

use crate::{config::AppConfig, error::AppError, models::user::Role};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Who a token is issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub role: Role,
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// User role
    pub role: Role,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Expiration (unix seconds)
    pub exp: i64,
}

/// Claims that passed signature and expiry checks.
///
/// Only [`TokenService::verify`] constructs this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims(Claims);

impl VerifiedClaims {
    pub fn subject(&self) -> &str {
        &self.0.sub
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn claims(&self) -> &Claims {
        &self.0
    }

    pub fn into_identity(self) -> Identity {
        Identity {
            subject: self.0.sub,
            role: self.0.role,
        }
    }
}

/// Outcome of verifying a presented token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Unverified,
    Verified(VerifiedClaims),
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Verified(_))
    }

    /// Decoded claims; `None` for a token that did not verify.
    pub fn decode(self) -> Option<VerifiedClaims> {
        match self {
            Verification::Verified(claims) => Some(claims),
            Verification::Unverified => None,
        }
    }
}

/// Token service. Holds the process-wide signing secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    /// Create token service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            config.security.jwt_secret.expose_secret(),
            config.security.token_ttl_secs,
        )
    }

    pub fn new(secret: &str, ttl_secs: i64) -> Result<Self, AppError> {
        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        })
    }

    /// Default lifetime of issued tokens, in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token with the configured lifetime
    pub fn issue_default(&self, identity: &Identity) -> Result<String, AppError> {
        self.issue(identity, self.ttl_secs)
    }

    /// Issue a token valid for `ttl_secs`. A non-positive ttl yields a token
    /// that is already expired.
    pub fn issue(&self, identity: &Identity, ttl_secs: i64) -> Result<String, AppError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: identity.subject.clone(),
            role: identity.role,
            iat: now,
            exp: now.saturating_add(ttl_secs),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            AppError::Internal(format!("Failed to encode token: {}", e))
        })
    }

    /// Verify signature and expiry. Malformed input is reported as
    /// [`Verification::Unverified`], never as an error.
    pub fn verify(&self, token: &str) -> Verification {
        if token.is_empty() {
            return Verification::Unverified;
        }

        let claims = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!("Token validation failed: {:?}", e);
                return Verification::Unverified;
            }
        };

        // Expiry is a closed bound: a token is dead at exp, not after it
        let now = Utc::now().timestamp();
        if now >= claims.exp || claims.exp <= claims.iat {
            tracing::debug!(exp = claims.exp, now, "Token expired");
            return Verification::Unverified;
        }

        Verification::Verified(VerifiedClaims(claims))
    }
}
