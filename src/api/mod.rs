//! REST transport.
//!
//! Thin wrapper over `reqwest` that attaches the bearer token and language
//! tag, unwraps the backend's response envelope and applies the retry policy.

pub mod endpoints;

pub use endpoints::Endpoint;

use std::time::Duration;

use reqwest::{Method, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::errors::PortalError;
use crate::models::Language;

/// First backoff delay; doubles per retry up to the configured cap.
const BASE_BACKOFF: Duration = Duration::from_millis(250);

/// Per-request credentials and locale.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub token: Option<String>,
    pub language: Language,
}

impl RequestContext {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Success/error envelope the backend wraps most responses in.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// HTTP client for the dashboard backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
    backoff_cap: Duration,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, PortalError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| PortalError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            backoff_cap: config.backoff_cap,
        })
    }

    /// Full URL for `path`; fails if parsing would move the request elsewhere.
    fn url(&self, path: &str) -> Result<Url, PortalError> {
        let url = Url::parse(&format!("{}/api{}", self.base_url, path))
            .map_err(|e| PortalError::Config(format!("Invalid backend URL: {}", e)))?;
        if !url.path().ends_with(&format!("/api{}", path)) {
            return Err(PortalError::Validation(format!(
                "Refusing to request {}: path resolves to {}",
                path,
                url.path()
            )));
        }
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        ctx: &RequestContext,
        params: &[(String, String)],
    ) -> Result<T, PortalError> {
        self.send::<T, ()>(Method::GET, path, ctx, params, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        ctx: &RequestContext,
        body: &B,
    ) -> Result<T, PortalError> {
        self.send(Method::POST, path, ctx, &[], Some(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        ctx: &RequestContext,
        body: &B,
    ) -> Result<T, PortalError> {
        self.send(Method::PUT, path, ctx, &[], Some(body)).await
    }

    /// Delete; whatever the backend echoes back is discarded.
    pub async fn delete(&self, path: &str, ctx: &RequestContext) -> Result<(), PortalError> {
        self.send::<IgnoredAny, ()>(Method::DELETE, path, ctx, &[], None)
            .await
            .map(|_| ())
    }

    /// PUT whose response body is irrelevant to the caller.
    pub async fn put_ignoring_body<B: Serialize>(
        &self,
        path: &str,
        ctx: &RequestContext,
        body: &B,
    ) -> Result<(), PortalError> {
        self.send::<IgnoredAny, B>(Method::PUT, path, ctx, &[], Some(body))
            .await
            .map(|_| ())
    }

    /// Send a request, retrying transport failures and 5xx answers.
    ///
    /// Only idempotent methods are retried. A POST that timed out may already
    /// have created its record, so it is sent once and the error returned.
    pub async fn send<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        ctx: &RequestContext,
        params: &[(String, String)],
        body: Option<&B>,
    ) -> Result<T, PortalError> {
        let mut attempt = 0;
        loop {
            match self.send_once(method.clone(), path, ctx, params, body).await {
                Ok(value) => return Ok(value),
                Err(e)
                    if e.is_retryable()
                        && method.is_idempotent()
                        && attempt < self.max_retries =>
                {
                    let delay = backoff(attempt, self.backoff_cap);
                    tracing::warn!(
                        "{} {} failed ({}), retrying in {:?}",
                        method,
                        path,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        ctx: &RequestContext,
        params: &[(String, String)],
        body: Option<&B>,
    ) -> Result<T, PortalError> {
        let mut request = self
            .http
            .request(method, self.url(path)?)
            .header(reqwest::header::ACCEPT_LANGUAGE, ctx.language.as_tag())
            .query(&[("lang", ctx.language.as_tag())]);

        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(token) = &ctx.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(PortalError::from_status(status, error_message(status, &text)));
        }

        decode_body(&text)
    }
}

/// Delay before retry number `attempt` (zero-based).
fn backoff(attempt: u32, cap: Duration) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    BASE_BACKOFF.saturating_mul(factor).min(cap)
}

/// Unwrap `{success, data, message}` or accept a bare JSON body.
fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, PortalError> {
    let value: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(text)?
    };

    let is_envelope = value
        .as_object()
        .map(|obj| obj.contains_key("success"))
        .unwrap_or(false);

    let payload = if is_envelope {
        let envelope: Envelope = serde_json::from_value(value)?;
        if !envelope.success {
            return Err(PortalError::Server {
                status: StatusCode::OK.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            });
        }
        envelope.data.unwrap_or(Value::Null)
    } else {
        value
    };

    serde_json::from_value(payload)
        .map_err(|e| PortalError::Decode(format!("Unexpected response shape: {}", e)))
}

/// Pull a readable message out of an error body.
fn error_message(status: StatusCode, text: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(text).ok();
    let message = parsed.as_ref().and_then(|body| {
        body.get("message")
            .and_then(Value::as_str)
            .or_else(|| body.get("error").and_then(Value::as_str))
            .or_else(|| {
                body.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
            })
    });

    match message {
        Some(message) => message.to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    }
}

/// Flatten a filter object into query parameters; `null` fields are dropped.
pub fn query_params<F: Serialize>(filters: &F) -> Result<Vec<(String, String)>, PortalError> {
    let value = serde_json::to_value(filters)?;
    let Value::Object(map) = value else {
        return Ok(Vec::new());
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(s) => s,
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.to_string(),
            };
            Some((key, rendered))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let cap = Duration::from_secs(4);
        assert_eq!(backoff(0, cap), Duration::from_millis(250));
        assert_eq!(backoff(1, cap), Duration::from_millis(500));
        assert_eq!(backoff(3, cap), Duration::from_secs(2));
        assert_eq!(backoff(10, cap), cap);
        assert_eq!(backoff(40, cap), cap);
    }

    #[test]
    fn test_decode_envelope_and_bare_bodies() {
        let wrapped: Vec<u8> = decode_body(r#"{"success": true, "data": [1, 2]}"#).unwrap();
        assert_eq!(wrapped, vec![1, 2]);

        let bare: Vec<u8> = decode_body("[3]").unwrap();
        assert_eq!(bare, vec![3]);

        assert!(decode_body::<()>("").is_ok());
        assert!(decode_body::<IgnoredAny>(r#"{"success": true, "data": {"id": "1"}}"#).is_ok());
    }

    #[test]
    fn test_decode_unsuccessful_envelope() {
        let err = decode_body::<Value>(r#"{"success": false, "message": "Not allowed"}"#)
            .unwrap_err();
        assert_eq!(err.message(), "Not allowed");
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"message": "Missing title"}"#),
            "Missing title"
        );
        assert_eq!(
            error_message(StatusCode::FORBIDDEN, r#"{"error": {"message": "No access"}}"#),
            "No access"
        );
        assert_eq!(error_message(StatusCode::NOT_FOUND, "<html>"), "Not Found");
    }

    #[test]
    fn test_query_params_skip_nulls() {
        let params = query_params(&json!({
            "status": "resolved",
            "priority": null,
            "page": 2,
            "ids": ["a", "b"]
        }))
        .unwrap();
        assert_eq!(
            params,
            vec![
                ("ids".to_string(), "a,b".to_string()),
                ("page".to_string(), "2".to_string()),
                ("status".to_string(), "resolved".to_string()),
            ]
        );
    }
}
