use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::modules::payments::errors::PaymentError;

/// The only thing callers ever receive from the orchestrator.
///
/// Successful responses never carry `error`/`error_details`; failed ones
/// always carry both and never carry `payment_url`/`reference`. The
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payment_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_details: Option<PaymentError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transaction: Option<Value>,
}

impl PaymentResponse {
    /// Payment initialized; the student continues at `payment_url`
    pub fn initiated(payment_url: String, reference: String) -> Self {
        Self {
            payment_url: Some(payment_url),
            reference: Some(reference),
            message: Some("Payment initialized successfully".to_string()),
            ..Self::empty(true)
        }
    }

    /// Provider confirmed the transaction; `transaction` is its payload
    pub fn verified(reference: String, transaction: Value) -> Self {
        Self {
            reference: Some(reference),
            message: Some("Payment verified successfully".to_string()),
            transaction: Some(transaction),
            ..Self::empty(true)
        }
    }

    pub fn transferred(reference: String) -> Self {
        Self {
            reference: Some(reference),
            message: Some("Bank transfer processed successfully".to_string()),
            ..Self::empty(true)
        }
    }

    /// Failed operation; only the policy's user message is exposed as `error`
    pub fn failure(error: PaymentError) -> Self {
        Self {
            error: Some(error.user_message().to_string()),
            error_details: Some(error),
            ..Self::empty(false)
        }
    }

    fn empty(success: bool) -> Self {
        Self {
            success,
            payment_url: None,
            reference: None,
            message: None,
            error: None,
            error_details: None,
            transaction: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn payment_url(&self) -> Option<&str> {
        self.payment_url.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_details(&self) -> Option<&PaymentError> {
        self.error_details.as_ref()
    }

    pub fn transaction(&self) -> Option<&Value> {
        self.transaction.as_ref()
    }
}

/// Result of a gateway liveness probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayHealth {
    pub healthy: bool,

    /// Probe latency in milliseconds; zero when no probe was made
    pub response_time: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
