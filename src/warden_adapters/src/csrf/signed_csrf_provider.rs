use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use rand::{Rng, distr::Alphanumeric};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use warden_core::{CsrfError, CsrfToken, CsrfTokenProvider, SessionId};

const NONCE_LENGTH: usize = 32;

#[derive(Clone)]
pub struct CsrfConfig {
    pub secret: Secret<String>,
    pub ttl_in_seconds: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct CsrfClaims {
    sid: String,
    nonce: String,
    exp: usize,
}

/// Issues CSRF tokens as HMAC-signed claims bound to the caller's session.
///
/// Nothing is stored server side: a token is valid while its signature
/// checks out, it has not expired and its `sid` matches the session.
#[derive(Clone)]
pub struct SignedCsrfTokenProvider {
    config: CsrfConfig,
}

impl SignedCsrfTokenProvider {
    pub fn new(config: CsrfConfig) -> Self {
        Self { config }
    }

    fn key(&self) -> &[u8] {
        self.config.secret.expose_secret().as_bytes()
    }

    fn expiry(&self) -> Result<usize, CsrfError> {
        let delta = chrono::Duration::try_seconds(self.config.ttl_in_seconds)
            .ok_or_else(|| CsrfError::Signing("Invalid CSRF token lifetime".to_string()))?;

        Utc::now()
            .checked_add_signed(delta)
            .ok_or_else(|| CsrfError::Signing("Duration out of range".to_string()))?
            .timestamp()
            .try_into()
            .map_err(|_| CsrfError::Signing("Expiry is before the epoch".to_string()))
    }
}

fn nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

impl CsrfTokenProvider for SignedCsrfTokenProvider {
    fn generate(&self, session_id: &SessionId) -> Result<CsrfToken, CsrfError> {
        let claims = CsrfClaims {
            sid: session_id.as_str().to_owned(),
            nonce: nonce(),
            exp: self.expiry()?,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.key()),
        )
        .map(CsrfToken::new)
        .map_err(|e| CsrfError::Signing(e.to_string()))
    }

    fn validate(&self, session_id: &SessionId, token: &str) -> Result<(), CsrfError> {
        if token.trim().is_empty() {
            return Err(CsrfError::Missing);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<CsrfClaims>(token, &DecodingKey::from_secret(self.key()), &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CsrfError::Expired,
                _ => CsrfError::Invalid,
            })?
            .claims;

        if claims.sid != session_id.as_str() {
            return Err(CsrfError::Invalid);
        }

        Ok(())
    }
}
