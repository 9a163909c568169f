use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::error::Error as StdError;

use super::kind::{ErrorCategory, PaymentErrorKind, Severity};
use crate::modules::payments::services::gateway_trait::GatewayKind;

/// A classified payment failure.
///
/// Built once where a failure is classified and never mutated afterwards;
/// `user_message`, `retryable` and `severity` always come from the kind's
/// policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentError {
    #[serde(rename = "type")]
    kind: PaymentErrorKind,
    code: String,
    message: String,
    user_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gateway: Option<GatewayKind>,
    retryable: bool,
    severity: Severity,
}

impl PaymentError {
    pub fn new(
        kind: PaymentErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let policy = kind.policy();
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            user_message: policy.user_message.to_string(),
            details: None,
            timestamp: Utc::now(),
            gateway: None,
            retryable: policy.retryable,
            severity: policy.severity,
        }
    }

    pub(crate) fn with_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }

    pub(crate) fn with_gateway(mut self, gateway: Option<GatewayKind>) -> Self {
        self.gateway = gateway;
        self
    }

    pub fn kind(&self) -> PaymentErrorKind {
        self.kind
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Diagnostic message; may contain raw provider text
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn gateway(&self) -> Option<GatewayKind> {
        self.gateway
    }

    pub fn retryable(&self) -> bool {
        self.retryable
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.kind, self.code, self.message)
    }
}

/// Transport-level failure reasons, before classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    ConnectionRefused,
    TimedOut,
    Dns,
    Other,
}

impl TransportFailure {
    pub fn code(self) -> &'static str {
        match self {
            TransportFailure::ConnectionRefused => "ECONNREFUSED",
            TransportFailure::TimedOut => "ETIMEDOUT",
            TransportFailure::Dns => "ENOTFOUND",
            TransportFailure::Other => "ENETWORK",
        }
    }
}

/// Raw failure returned by a gateway adapter. Adapters never classify;
/// `PaymentErrorHandler::handle_gateway_error` turns these into
/// `PaymentError`s.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("transport failure ({code}): {message}", code = .kind.code())]
    Transport {
        kind: TransportFailure,
        message: String,
    },

    #[error("provider responded with HTTP {status}: {message}")]
    Api {
        status: u16,
        body: Value,
        message: String,
    },

    #[error("gateway client not configured: {0}")]
    NotConfigured(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("malformed provider response: {0}")]
    Decode(String),

    #[error("request could not be built: {0}")]
    Request(String),

    #[error("transfer failed: {0}")]
    Simulated(String),
}

impl ProviderError {
    /// Build an `Api` error from a response body, taking the message from
    /// the body's `message` field when present
    pub fn api(status: u16, body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status));
        ProviderError::Api {
            status,
            body,
            message,
        }
    }

    /// Failures below the provider's business logic: transport errors,
    /// throttling and provider-side 5xx responses
    pub fn is_network_level(&self) -> bool {
        match self {
            ProviderError::Transport { .. } => true,
            ProviderError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn code(&self) -> String {
        match self {
            ProviderError::Transport { kind, .. } => kind.code().to_string(),
            ProviderError::Api { status, .. } => format!("HTTP_{}", status),
            ProviderError::NotConfigured(_) => "GATEWAY_NOT_CONFIGURED".to_string(),
            ProviderError::NotImplemented(_) => "NOT_IMPLEMENTED".to_string(),
            ProviderError::Decode(_) => "INVALID_RESPONSE".to_string(),
            ProviderError::Request(_) => "INVALID_REQUEST".to_string(),
            ProviderError::Simulated(_) => "TRANSFER_FAILED".to_string(),
        }
    }

    pub fn details(&self) -> Option<Value> {
        match self {
            ProviderError::Transport { kind, .. } => Some(json!({ "code": kind.code() })),
            ProviderError::Api { status, body, .. } => {
                Some(json!({ "status": status, "response": body }))
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ProviderError::Decode(err.to_string());
        }

        let message = error_chain(&err);
        let kind = if err.is_timeout() {
            TransportFailure::TimedOut
        } else if err.is_connect() {
            if message.to_lowercase().contains("dns") {
                TransportFailure::Dns
            } else {
                TransportFailure::ConnectionRefused
            }
        } else {
            TransportFailure::Other
        };

        ProviderError::Transport { kind, message }
    }
}

fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
