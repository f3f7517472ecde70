//! `inspect-token` command

use crate::session::decode_claims;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::process::ExitCode;

/// Summary printed for a decodable credential
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReport {
    pub subject: Option<String>,
    pub issued_at: Option<String>,
    pub expires_at: Option<String>,
    pub live: bool,
    pub seconds_remaining: i64,
}

impl TokenReport {
    /// Describe `token` as seen at `now`; `None` if it is not a structurally
    /// valid credential
    pub fn inspect(token: &str, now: DateTime<Utc>) -> Option<Self> {
        let claims = decode_claims(token)?;
        let format = |secs: f64| {
            DateTime::from_timestamp_millis((secs * 1000.0) as i64)
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
        };
        let remaining = claims
            .expiry()
            .map(|expiry| (expiry - now).num_seconds().max(0))
            .unwrap_or(0);

        Some(Self {
            subject: claims.subject.clone(),
            issued_at: format(claims.issued_at),
            expires_at: format(claims.expires_at),
            live: claims.is_live_at(now),
            seconds_remaining: remaining,
        })
    }
}

pub fn run_inspect_token(token: &str) -> anyhow::Result<ExitCode> {
    match TokenReport::inspect(token.trim(), Utc::now()) {
        Some(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(if report.live {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        None => {
            eprintln!("Not a structurally valid credential");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::token::test_support::credential_with_claims;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_for_live_credential() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let token = credential_with_claims(serde_json::json!({
            "sub": "veteran-7",
            "iat": 1_700_000_000,
            "exp": 1_700_000_090,
        }));

        let report = TokenReport::inspect(&token, now).unwrap();
        assert_eq!(report.subject.as_deref(), Some("veteran-7"));
        assert_eq!(report.issued_at.as_deref(), Some("2023-11-14T22:13:20Z"));
        assert_eq!(report.expires_at.as_deref(), Some("2023-11-14T22:14:50Z"));
        assert!(report.live);
        assert_eq!(report.seconds_remaining, 90);
    }

    #[test]
    fn test_report_for_expired_credential() {
        let now = DateTime::from_timestamp(1_700_000_100, 0).unwrap();
        let token = credential_with_claims(serde_json::json!({
            "iat": 1_700_000_000,
            "exp": 1_700_000_090,
        }));

        let report = TokenReport::inspect(&token, now).unwrap();
        assert!(!report.live);
        assert_eq!(report.seconds_remaining, 0);
        assert_eq!(report.subject, None);
    }

    #[test]
    fn test_opaque_token_not_reported() {
        assert!(TokenReport::inspect("validtoken", Utc::now()).is_none());
    }
}
