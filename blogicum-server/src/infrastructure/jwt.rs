use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_TTL_SECONDS: i64 = 24 * 60 * 60;
const EXP_LEEWAY_SECONDS: u64 = 10;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("failed to sign token")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token rejected")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

/// Payload of an access token. `exp` is a unix timestamp in seconds.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) user_id: i64,
    pub(crate) username: String,
    pub(crate) exp: i64,
}

/// HS256 signer/verifier built once from the shared secret.
#[derive(Clone)]
pub(crate) struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtService {
    /// A non-positive `ttl_seconds` means one day.
    pub(crate) fn new(secret: &str, ttl_seconds: i64) -> Self {
        let ttl_seconds = if ttl_seconds > 0 {
            ttl_seconds
        } else {
            DEFAULT_TTL_SECONDS
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = EXP_LEEWAY_SECONDS;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    pub(crate) fn generate_token(&self, user_id: i64, username: &str) -> Result<String, JwtError> {
        let claims = Claims {
            user_id,
            username: username.to_owned(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(JwtError::Encode)
    }

    pub(crate) fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(JwtError::Decode)
    }
}
