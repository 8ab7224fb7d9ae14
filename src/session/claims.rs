//! Best-effort reading of the JWT payload
//!
//! The client never verifies signatures; it only peeks at the middle segment
//! to learn when the token expires. Anything that does not decode is simply
//! "no claims".

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Claims the client cares about
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenClaims {
    pub sub: Option<String>,
    /// Expiry, seconds since the epoch
    pub exp: Option<f64>,
}

impl TokenClaims {
    /// Decode the payload segment of `token`. `None` when it is not a readable JWT.
    pub fn from_token(token: &str) -> Option<Self> {
        let payload = decode_payload(token)?;
        Some(Self {
            sub: payload.get("sub").and_then(Value::as_str).map(str::to_string),
            exp: payload.get("exp").and_then(Value::as_f64),
        })
    }

    /// Strictly before `now`; a token without `exp` never expires
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp
            .map_or(false, |exp| exp * 1000.0 < now.timestamp_millis() as f64)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp = self.exp?;
        Utc.timestamp_millis_opt((exp * 1000.0) as i64).single()
    }
}

/// JSON value of the second dot-separated segment
pub fn decode_payload(token: &str) -> Option<Value> {
    let segment = token.split('.').nth(1)?;
    // accept base64url as well as padded standard base64
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let bytes = STANDARD_NO_PAD.decode(normalized).ok()?;
    serde_json::from_slice(&bytes).ok()
}
