//! HS256 JWT bearer tokens.
//!
//! Expiry is checked against an injected [`Clock`] rather than by
//! `jsonwebtoken`, so tests can move time and the check is strict: a token is
//! rejected from the second its `exp` is reached.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::{Clock, DefaultClock};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{TokenService, TokenServiceError};
use crate::domain::{AccessToken, Email, TokenSubject, UserId};

use super::TokenSecret;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    uid: i64,
    iat: i64,
    exp: i64,
}

/// Token service signing HS256 JWTs with a process-wide secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl JwtTokenService {
    /// Build a service using the system clock.
    pub fn new(secret: &TokenSecret) -> Self {
        Self::with_clock(secret, Arc::new(DefaultClock))
    }

    /// Build a service reading time from `clock`.
    pub fn with_clock(secret: &TokenSecret, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(
        &self,
        user_id: UserId,
        email: &Email,
        ttl: Duration,
    ) -> Result<AccessToken, TokenServiceError> {
        let iat = self.clock.utc().timestamp();
        let exp = iat.saturating_add(ttl.num_seconds());
        let (Some(issued_at), Some(expires_at)) =
            (DateTime::<Utc>::from_timestamp(iat, 0), DateTime::<Utc>::from_timestamp(exp, 0))
        else {
            return Err(TokenServiceError::signing("token timestamps out of range"));
        };
        let claims = Claims {
            sub: email.as_ref().to_owned(),
            uid: user_id.get(),
            iat,
            exp,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenServiceError::signing(err.to_string()))?;
        Ok(AccessToken::new(token, issued_at, expires_at))
    }

    fn verify(&self, token: &str) -> Result<TokenSubject, TokenServiceError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!(error = %err, "token rejected");
            TokenServiceError::invalid_token()
        })?;
        let now = self.clock.utc().timestamp();
        if data.claims.exp <= now {
            debug!(exp = data.claims.exp, now, "token rejected: expired");
            return Err(TokenServiceError::invalid_token());
        }
        Ok(TokenSubject::new(UserId::new(data.claims.uid), data.claims.sub))
    }
}
