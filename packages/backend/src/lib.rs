#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP client for the external inference backend.
//!
//! Every endpoint the dashboard proxies goes through one code path:
//! [`BackendClient::proxy_json`] sends a [`BackendRequest`] with a fixed timeout,
//! and [`BackendClient::proxy_with_fallback`] substitutes a caller-supplied
//! fallback when the backend is unreachable, slow, or answering with a
//! non-2xx status. Each call's outcome is reported to the shared
//! [`monitor::BackendMonitor`], which also drives the periodic health poll.

pub mod monitor;

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart;

use crate::monitor::BackendMonitor;

/// Maximum length of a response body included in error messages.
const BODY_PREVIEW_LEN: usize = 500;

/// Errors from talking to the inference backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {timeout:?}")]
    Timeout {
        /// The configured timeout.
        timeout: Duration,
    },

    /// The connection could not be established or was dropped.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// The backend answered 2xx but the payload was unusable.
    #[error("invalid backend payload: {0}")]
    Decode(String),

    /// The HTTP client could not be built or the request was malformed.
    #[error("HTTP client error: {0}")]
    Config(String),
}

impl BackendError {
    /// Whether this error means "backend offline" and should trigger a
    /// fallback, as opposed to a payload or configuration problem.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Unreachable(_) | Self::Status { .. }
        )
    }
}

/// An uploaded file forwarded as `multipart/form-data`.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Form field name.
    pub field: String,
    /// Original file name.
    pub file_name: String,
    /// MIME type, if the client sent one.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// A request to forward to the backend.
#[derive(Debug, Clone)]
pub enum BackendRequest {
    /// `GET path`.
    Get {
        /// Path relative to the backend base URL.
        path: String,
    },
    /// `POST path` with a JSON body.
    PostJson {
        /// Path relative to the backend base URL.
        path: String,
        /// Request body.
        body: serde_json::Value,
    },
    /// `POST path` with a multipart file upload.
    PostMultipart {
        /// Path relative to the backend base URL.
        path: String,
        /// File to upload.
        upload: Upload,
    },
}

impl BackendRequest {
    /// Path this request targets.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Get { path } | Self::PostJson { path, .. } | Self::PostMultipart { path, .. } => {
                path
            }
        }
    }
}

/// Result of a proxied call that may have fallen back to local data.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyOutcome<T> {
    /// The backend answered.
    Upstream(T),
    /// The backend was unavailable; `value` is the local substitute.
    Fallback {
        /// Locally produced value.
        value: T,
        /// Why the backend call failed.
        reason: BackendError,
    },
}

impl<T> ProxyOutcome<T> {
    /// Whether the value came from the fallback path.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Borrows the carried value regardless of origin.
    #[must_use]
    pub const fn value(&self) -> &T {
        match self {
            Self::Upstream(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// Maps the carried value, keeping its origin.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProxyOutcome<U> {
        match self {
            Self::Upstream(value) => ProxyOutcome::Upstream(f(value)),
            Self::Fallback { value, reason } => ProxyOutcome::Fallback {
                value: f(value),
                reason,
            },
        }
    }
}

/// Client for the inference backend.
pub struct BackendClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
    monitor: Arc<BackendMonitor>,
}

impl BackendClient {
    /// Creates a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
            monitor: Arc::new(BackendMonitor::new()),
        })
    }

    /// The backend base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shared availability monitor updated by every call.
    #[must_use]
    pub fn monitor(&self) -> Arc<BackendMonitor> {
        Arc::clone(&self.monitor)
    }

    /// Absolute URL for a backend path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends `request` and parses the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on timeout, connection failure, non-2xx
    /// status, or an unparseable body.
    pub async fn proxy_json(&self, request: BackendRequest) -> Result<serde_json::Value, BackendError> {
        let ticket = self.monitor.begin();
        let path = request.path().to_string();

        let result = self.send(request).await;

        match &result {
            Ok(_) => {
                self.monitor.record_success(ticket);
            }
            Err(e) if e.is_unavailable() => {
                log::warn!("Backend call to {path} failed: {e}");
                self.monitor.record_failure(ticket, e);
            }
            Err(e) => {
                // The backend answered, so it is online even though the
                // payload was unusable.
                log::error!("Backend call to {path} returned unusable data: {e}");
                self.monitor.record_success(ticket);
            }
        }

        result
    }

    /// Sends `request`, converting the response with `convert`, and falls
    /// back to `fallback()` when the backend is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] only when the backend answered but the
    /// payload could not be decoded or converted; availability failures
    /// are absorbed into [`ProxyOutcome::Fallback`].
    pub async fn proxy_with_fallback<T>(
        &self,
        request: BackendRequest,
        convert: impl FnOnce(serde_json::Value) -> Result<T, BackendError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<ProxyOutcome<T>, BackendError> {
        match self.proxy_json(request).await {
            Ok(value) => convert(value).map(ProxyOutcome::Upstream),
            Err(reason) if reason.is_unavailable() => Ok(ProxyOutcome::Fallback {
                value: fallback(),
                reason,
            }),
            Err(e) => Err(e),
        }
    }

    async fn send(&self, request: BackendRequest) -> Result<serde_json::Value, BackendError> {
        let builder = match request {
            BackendRequest::Get { path } => self.client.get(self.url(&path)),
            BackendRequest::PostJson { path, body } => self.client.post(self.url(&path)).json(&body),
            BackendRequest::PostMultipart { path, upload } => {
                let mut part = multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
                if let Some(content_type) = upload.content_type.as_deref() {
                    part = part
                        .mime_str(content_type)
                        .map_err(|e| BackendError::Config(e.to_string()))?;
                }
                let form = multipart::Form::new().part(upload.field, part);
                self.client.post(self.url(&path)).multipart(form)
            }
        };

        let response = builder.send().await.map_err(|e| self.classify(&e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(&e))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: preview(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            BackendError::Decode(format!("{e} (body preview: {})", preview(&text)))
        })
    }

    fn classify(&self, e: &reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout {
                timeout: self.timeout,
            }
        } else if e.is_builder() {
            BackendError::Config(e.to_string())
        } else {
            BackendError::Unreachable(e.to_string())
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > BODY_PREVIEW_LEN {
        format!("{}...", text.chars().take(BODY_PREVIEW_LEN).collect::<String>())
    } else {
        text.to_string()
    }
}
