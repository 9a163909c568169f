//! Per-provider rules mapping raw failures onto `PaymentErrorKind`.
//!
//! Provider wording is free text, so every rule set is a best-effort
//! heuristic and anything unmatched lands on `GatewayError` (or
//! `UnknownError` for the generic rules).

use serde_json::Value;

use super::kind::PaymentErrorKind;
use super::payment_error::{ProviderError, TransportFailure};
use crate::modules::payments::services::gateway_trait::GatewayKind;

/// Maps a raw provider failure onto a taxonomy kind
pub trait ErrorClassifier: Send + Sync {
    fn classify(&self, error: &ProviderError) -> PaymentErrorKind;
}

/// Phrase rules for Paystack, checked in order
const PAYSTACK_PHRASES: [(&str, PaymentErrorKind); 5] = [
    ("invalid key", PaymentErrorKind::InvalidApiKey),
    ("insufficient funds", PaymentErrorKind::InsufficientFunds),
    ("invalid amount", PaymentErrorKind::InvalidAmount),
    ("invalid email", PaymentErrorKind::InvalidEmail),
    ("invalid reference", PaymentErrorKind::InvalidReference),
];

pub struct PaystackClassifier;

impl ErrorClassifier for PaystackClassifier {
    fn classify(&self, error: &ProviderError) -> PaymentErrorKind {
        let text = match error {
            ProviderError::Api { body, message, .. } => [
                body.pointer("/data/gateway_response"),
                body.get("gateway_response"),
                body.get("message"),
            ]
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .chain(std::iter::once(message.as_str()))
            .collect::<Vec<_>>()
            .join(" "),
            other => other.to_string(),
        }
        .to_lowercase();

        PAYSTACK_PHRASES
            .iter()
            .find(|(phrase, _)| text.contains(phrase))
            .map(|(_, kind)| *kind)
            .unwrap_or(PaymentErrorKind::GatewayError)
    }
}

pub struct FlutterwaveClassifier;

impl ErrorClassifier for FlutterwaveClassifier {
    fn classify(&self, error: &ProviderError) -> PaymentErrorKind {
        let ProviderError::Api { body, message, .. } = error else {
            return PaymentErrorKind::GatewayError;
        };

        let status = lowercase_field(body, "status");
        let detail = format!("{} {}", lowercase_field(body, "message"), message.to_lowercase());

        if status.contains("insufficient funds")
            || (status == "error" && detail.contains("insufficient funds"))
        {
            PaymentErrorKind::InsufficientFunds
        } else {
            PaymentErrorKind::GatewayError
        }
    }
}

pub struct StripeClassifier;

impl ErrorClassifier for StripeClassifier {
    fn classify(&self, error: &ProviderError) -> PaymentErrorKind {
        let ProviderError::Api { body, .. } = error else {
            return PaymentErrorKind::GatewayError;
        };

        let error_type = body
            .pointer("/error/type")
            .or_else(|| body.get("type"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        match error_type {
            "card_error" => PaymentErrorKind::CardDeclined,
            "validation_error" => PaymentErrorKind::MissingRequiredFields,
            "api_error" => PaymentErrorKind::GatewayError,
            _ => PaymentErrorKind::GatewayError,
        }
    }
}

/// Transport and HTTP-status rules shared by every provider
pub struct GenericClassifier;

impl ErrorClassifier for GenericClassifier {
    fn classify(&self, error: &ProviderError) -> PaymentErrorKind {
        match error {
            ProviderError::Transport { kind, .. } => match kind {
                TransportFailure::ConnectionRefused => PaymentErrorKind::ConnectionRefused,
                TransportFailure::TimedOut => PaymentErrorKind::TimeoutError,
                TransportFailure::Dns => PaymentErrorKind::DnsResolutionFailed,
                TransportFailure::Other => PaymentErrorKind::NetworkError,
            },
            ProviderError::Api { status: 429, .. } => PaymentErrorKind::RateLimitExceeded,
            ProviderError::Api { status, .. } if *status >= 500 => {
                PaymentErrorKind::InternalServerError
            }
            _ => PaymentErrorKind::UnknownError,
        }
    }
}

static PAYSTACK: PaystackClassifier = PaystackClassifier;
static FLUTTERWAVE: FlutterwaveClassifier = FlutterwaveClassifier;
static STRIPE: StripeClassifier = StripeClassifier;
static GENERIC: GenericClassifier = GenericClassifier;

/// Rules for a gateway; unknown gateways get the generic rules
pub fn classifier_for(gateway: Option<GatewayKind>) -> &'static dyn ErrorClassifier {
    match gateway {
        Some(GatewayKind::Paystack) => &PAYSTACK,
        Some(GatewayKind::Flutterwave) => &FLUTTERWAVE,
        Some(GatewayKind::Stripe) => &STRIPE,
        None => &GENERIC,
    }
}

pub fn generic_classifier() -> &'static dyn ErrorClassifier {
    &GENERIC
}

fn lowercase_field(body: &Value, field: &str) -> String {
    body.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase()
}
