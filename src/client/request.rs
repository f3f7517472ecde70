//! Request options and response status mapping

use reqwest::Method;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fallback message when neither the status table nor the body explain a failure
pub const UNKNOWN_ERROR_MESSAGE: &str = "不明なエラーが発生しました";

/// User-facing message for the statuses the client knows about
pub fn status_message(status: u16) -> Option<&'static str> {
    let message = match status {
        400 => "入力内容に問題があります",
        401 => "ログインが必要です",
        403 => "アクセス権限がありません",
        404 => "リソースが見つかりません",
        429 => "リクエストが多すぎます。しばらく待ってから再試行してください",
        500 => "サーバーエラーが発生しました",
        503 => "サービスが一時的に利用できません",
        _ => return None,
    };
    Some(message)
}

/// Pick the message for a failed response: status table, then body, then generic
pub(crate) fn error_message(status: u16, body_message: Option<&str>) -> String {
    status_message(status)
        .or(body_message.filter(|message| !message.trim().is_empty()))
        .unwrap_or(UNKNOWN_ERROR_MESSAGE)
        .to_string()
}

/// Phase of a single call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Building,
    InFlight,
    Succeeded,
    Failed,
    TimedOut,
    Cancelled,
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Building => "building",
            Self::InFlight => "in-flight",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::TimedOut => "timed-out",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Options for one outbound call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method, GET by default
    pub method: Method,
    /// Extra headers; these override the defaults on name collision
    pub headers: Vec<(String, String)>,
    /// Serialized request body
    pub body: Option<String>,
    /// Timeout budget; the client default applies when unset or zero
    pub timeout: Option<Duration>,
    /// External cancellation signal
    pub cancellation: Option<CancellationToken>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
            timeout: None,
            cancellation: None,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a raw body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `payload` as the JSON body
    pub fn with_json<T: Serialize + ?Sized>(mut self, payload: &T) -> crate::Result<Self> {
        self.body = Some(serde_json::to_string(payload)?);
        Ok(self)
    }

    /// Per-call budget; zero keeps the client default
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}
