//! HTTP request client
//!
//! Each call moves through [`CallState`]: it is built (headers, bearer token,
//! body), sent, and then settles exactly once as succeeded, failed, timed out
//! or cancelled. The timeout timer and the cancellation wait are raced against
//! the request in one `select!`, so whichever settles first drops the others.

use super::request::{CallState, RequestOptions, error_message};
use crate::{
    Error, Result,
    config::ApiSettings,
    session::SessionStore,
    utils::{Stopwatch, VERSION},
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// The network entry point for UI flows
#[derive(Debug, Clone)]
pub struct RequestClient {
    http: Client,
    /// Origin plus base path, without a trailing slash
    prefix: String,
    default_timeout: Duration,
    session: SessionStore,
}

impl RequestClient {
    /// Create a client for the configured API
    pub fn new(settings: &ApiSettings, session: SessionStore) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("veteran-client/{}", VERSION))
            .build()?;
        Self::with_http_client(http, settings, session)
    }

    /// Create a client reusing an existing HTTP client
    pub fn with_http_client(
        http: Client,
        settings: &ApiSettings,
        session: SessionStore,
    ) -> Result<Self> {
        let prefix = format!(
            "{}{}",
            settings.base_url.trim_end_matches('/'),
            settings.base_path.trim_end_matches('/')
        );
        Url::parse(&prefix)?;

        Ok(Self {
            http,
            prefix,
            default_timeout: settings.timeout(),
            session,
        })
    }

    /// Absolute URL for an endpoint path
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let url = if endpoint.starts_with('/') {
            format!("{}{}", self.prefix, endpoint)
        } else {
            format!("{}/{}", self.prefix, endpoint)
        };
        Ok(Url::parse(&url)?)
    }

    /// Perform one call and return the parsed response body.
    ///
    /// # Errors
    ///
    /// * [`Error::Timeout`] when no response arrives within the budget.
    /// * [`Error::Cancelled`] when the caller's cancellation token fires first.
    /// * [`Error::Api`] for a non-success status, with a user-facing message.
    /// * [`Error::Network`] or [`Error::Json`] for transport or decoding failures.
    pub async fn call(&self, endpoint: &str, options: RequestOptions) -> Result<Value> {
        let budget = options
            .timeout
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or(self.default_timeout);
        let cancellation = options.cancellation.clone().unwrap_or_default();
        let method = options.method.clone();

        debug!(%method, endpoint, state = %CallState::Building, "Preparing request");
        let request = self.build_request(endpoint, options)?;

        debug!(%method, endpoint, state = %CallState::InFlight, ?budget, "Sending request");
        let stopwatch = Stopwatch::start(format!("{} {}", method, endpoint));
        let outcome = tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(Error::Cancelled),
            _ = tokio::time::sleep(budget) => Err(Error::timeout(budget)),
            result = Self::execute(request) => result,
        };

        let state = match &outcome {
            Ok(_) => CallState::Succeeded,
            Err(Error::Timeout { .. }) => CallState::TimedOut,
            Err(Error::Cancelled) => CallState::Cancelled,
            Err(_) => CallState::Failed,
        };
        let elapsed = stopwatch.finish();
        match &outcome {
            Ok(_) => debug!(%method, endpoint, %state, ?elapsed, "Request settled"),
            Err(e) => warn!(%method, endpoint, %state, ?elapsed, "Request settled: {}", e),
        }

        outcome
    }

    /// [`call`](Self::call) and deserialize the body into `T`
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let body = self.call(endpoint, options).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn get(&self, endpoint: &str, options: RequestOptions) -> Result<Value> {
        self.call(endpoint, options.with_method(Method::GET)).await
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        data: &T,
        options: RequestOptions,
    ) -> Result<Value> {
        let options = options.with_method(Method::POST).with_json(data)?;
        self.call(endpoint, options).await
    }

    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        data: &T,
        options: RequestOptions,
    ) -> Result<Value> {
        let options = options.with_method(Method::PATCH).with_json(data)?;
        self.call(endpoint, options).await
    }

    pub async fn delete(&self, endpoint: &str, options: RequestOptions) -> Result<Value> {
        self.call(endpoint, options.with_method(Method::DELETE)).await
    }

    fn build_request(&self, endpoint: &str, options: RequestOptions) -> Result<RequestBuilder> {
        let url = self.endpoint_url(endpoint)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.get_token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => warn!("Stored token is not a valid header value: {}", e),
            }
        }

        for (name, value) in options.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::internal(format!("Invalid header name {:?}: {}", name, e)))?;
            let header_value = HeaderValue::from_str(&value)
                .map_err(|e| Error::internal(format!("Invalid value for header {}: {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        let mut request = self.http.request(options.method, url).headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }
        Ok(request)
    }

    async fn execute(request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await;

        if !status.is_success() {
            let body_message = body
                .ok()
                .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
                .and_then(|value| {
                    value
                        .get("error")
                        .or_else(|| value.get("message"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                });
            let status = status.as_u16();
            return Err(Error::api(
                status,
                error_message(status, body_message.as_deref()),
            ));
        }

        let body = body?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}
