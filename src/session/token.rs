//! Stored token records and credential structure checks

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// base64url with optional padding, the encoding of signed-claim segments
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Standard alphabet, accepted for issuers that do not use base64url
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Token record persisted by the session store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Opaque bearer credential
    pub token: String,
    /// When the record was stored
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub issued_at: DateTime<Utc>,
    /// When the record stops being usable
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
    /// Random per-write tag
    pub nonce: String,
}

impl TokenRecord {
    /// Create a record valid for `ttl` from `issued_at`
    pub fn new(
        token: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        nonce: impl Into<String>,
    ) -> Self {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        Self {
            token: token.into(),
            issued_at,
            expires_at: issued_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            nonce: nonce.into(),
        }
    }

    /// Whether the record has passed its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Remaining lifetime at `now`, zero once expired
    pub fn time_to_expiry_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Claims decoded from the middle segment of a signed credential
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialClaims {
    /// `iat`, seconds since the epoch
    pub issued_at: f64,
    /// `exp`, seconds since the epoch
    pub expires_at: f64,
    /// `sub`, when present
    pub subject: Option<String>,
}

impl CredentialClaims {
    /// Embedded expiry as a timestamp
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis((self.expires_at * 1000.0) as i64)
    }

    /// Whether the embedded expiry is strictly after `now`
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at * 1000.0 > now.timestamp_millis() as f64
    }
}

/// Decode the claims of a three-segment signed credential.
///
/// Returns `None` unless the credential has exactly three `.`-separated
/// segments and the middle one decodes to a JSON object carrying non-zero
/// numeric `iat` and `exp` fields. The signature is not verified.
pub fn decode_claims(token: &str) -> Option<CredentialClaims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };

    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .or_else(|_| STANDARD_LENIENT.decode(payload))
        .ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;

    let numeric = |name: &str| {
        claims
            .get(name)
            .and_then(serde_json::Value::as_f64)
            .filter(|value| *value != 0.0)
    };

    Some(CredentialClaims {
        issued_at: numeric("iat")?,
        expires_at: numeric("exp")?,
        subject: claims
            .get("sub")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
    })
}

/// Whether `token` is structurally valid and its embedded expiry is after `now`
pub fn is_live_credential(token: &str, now: DateTime<Utc>) -> bool {
    decode_claims(token).is_some_and(|claims| claims.is_live_at(now))
}

#[cfg(test)]
pub(crate) mod test_support {
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::Utc;

    /// Build an unsigned credential expiring `exp_offset_secs` from now
    pub fn credential(exp_offset_secs: i64) -> String {
        let now = Utc::now().timestamp();
        credential_with_claims(serde_json::json!({
            "sub": "veteran-42",
            "iat": now,
            "exp": now + exp_offset_secs,
        }))
    }

    pub fn credential_with_claims(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }
}
