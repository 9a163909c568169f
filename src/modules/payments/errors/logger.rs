use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use super::kind::{PaymentErrorKind, Severity};
use super::payment_error::PaymentError;
use crate::modules::payments::services::gateway_trait::GatewayKind;

/// JSON record shipped to the logging endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLogRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: PaymentErrorKind,
    pub code: String,
    pub message: String,
    pub gateway: Option<GatewayKind>,
    pub severity: Severity,
    pub retryable: bool,
    pub details: Option<Value>,
}

impl From<&PaymentError> for ErrorLogRecord {
    fn from(error: &PaymentError) -> Self {
        Self {
            timestamp: error.timestamp(),
            kind: error.kind(),
            code: error.code().to_string(),
            message: error.message().to_string(),
            gateway: error.gateway(),
            severity: error.severity(),
            retryable: error.retryable(),
            details: error.details().cloned(),
        }
    }
}

/// Where classified payment errors are reported
#[derive(Debug, Clone)]
pub enum ErrorLogger {
    /// Local diagnostic output through `tracing`
    Console,
    /// POST each record to an external logging service
    Remote { client: Client, endpoint: String },
}

impl ErrorLogger {
    /// Remote logging only applies in production with an endpoint set
    pub fn for_environment(is_production: bool, endpoint: Option<String>, client: Client) -> Self {
        match endpoint {
            Some(endpoint) if is_production => ErrorLogger::Remote { client, endpoint },
            _ => ErrorLogger::Console,
        }
    }

    /// Report an error. Never fails: a remote sink that cannot be reached
    /// falls back to the console.
    pub async fn log(&self, error: &PaymentError) {
        match self {
            ErrorLogger::Console => log_to_console(error),
            ErrorLogger::Remote { client, endpoint } => {
                let record = ErrorLogRecord::from(error);
                match client.post(endpoint).json(&record).send().await {
                    Ok(response) if response.status().is_success() => {}
                    Ok(response) => {
                        warn!(
                            endpoint = %endpoint,
                            status = %response.status(),
                            "Logging service rejected payment error record"
                        );
                        log_to_console(error);
                    }
                    Err(e) => {
                        warn!(
                            endpoint = %endpoint,
                            error = %e,
                            "Failed to ship payment error record"
                        );
                        log_to_console(error);
                    }
                }
            }
        }
    }
}

fn log_to_console(error: &PaymentError) {
    let gateway = error
        .gateway()
        .map(|g| g.as_str())
        .unwrap_or("NONE");
    let details = error
        .details()
        .map(Value::to_string)
        .unwrap_or_default();

    match error.severity() {
        Severity::Low => info!(
            kind = %error.kind(),
            code = %error.code(),
            gateway = %gateway,
            retryable = error.retryable(),
            details = %details,
            "Payment error: {}",
            error.message()
        ),
        Severity::Medium => warn!(
            kind = %error.kind(),
            code = %error.code(),
            gateway = %gateway,
            retryable = error.retryable(),
            details = %details,
            "Payment error: {}",
            error.message()
        ),
        Severity::High | Severity::Critical => error!(
            kind = %error.kind(),
            code = %error.code(),
            gateway = %gateway,
            severity = %error.severity(),
            retryable = error.retryable(),
            details = %details,
            "Payment error: {}",
            error.message()
        ),
    }
}
