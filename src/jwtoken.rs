//! Session tokens. The signing key lives in local configuration, so a token only saves the
//! user from signing in again; it is not proof of identity.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::lobby::UserAccount;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    pub exp: i64,
}

impl Claims {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

pub fn generate_token(
    user: &UserAccount,
    issued_at: DateTime<Utc>,
    ttl: Duration,
    key: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let new_claims = Claims {
        user_id: user.id.clone(),
        email: user.email.clone(),
        exp: (issued_at + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &new_claims,
        &EncodingKey::from_secret(key.as_ref()),
    )
}

/// Decodes without checking expiry; callers compare `exp` against their own clock.
pub fn decode_token(token: &str, key: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    let data = decode::<Claims>(token, &DecodingKey::from_secret(key.as_ref()), &validation)?;
    Ok(data.claims)
}
