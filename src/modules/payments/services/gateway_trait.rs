use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::core::Result;
use crate::modules::payments::errors::ProviderError;
use crate::modules::payments::models::PaymentRequest;

/// Payment providers the marketplace can route to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayKind {
    Paystack,
    Flutterwave,
    Stripe,
}

impl GatewayKind {
    pub const ALL: [GatewayKind; 3] = [
        GatewayKind::Paystack,
        GatewayKind::Flutterwave,
        GatewayKind::Stripe,
    ];

    /// Upper-case tag used when classifying errors
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayKind::Paystack => "PAYSTACK",
            GatewayKind::Flutterwave => "FLUTTERWAVE",
            GatewayKind::Stripe => "STRIPE",
        }
    }

    /// Lower-case name used in URLs and JSON
    pub fn slug(&self) -> &'static str {
        match self {
            GatewayKind::Paystack => "paystack",
            GatewayKind::Flutterwave => "flutterwave",
            GatewayKind::Stripe => "stripe",
        }
    }
}

impl fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for GatewayKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paystack" => Ok(GatewayKind::Paystack),
            "flutterwave" => Ok(GatewayKind::Flutterwave),
            "stripe" => Ok(GatewayKind::Stripe),
            _ => Err(format!("Unknown payment gateway: {}", s)),
        }
    }
}

/// What an adapter hands back after initializing a payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInitialization {
    /// Hosted checkout page for the student
    pub payment_url: String,
    pub reference: String,
}

/// One external payment provider.
///
/// Adapters report failures as raw `ProviderError`s and never classify or
/// retry; the orchestrator does both.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn kind(&self) -> GatewayKind;

    /// Start a payment and return the checkout URL
    async fn initialize(
        &self,
        request: &PaymentRequest,
        callback_url: &str,
    ) -> std::result::Result<PaymentInitialization, ProviderError>;

    /// Look up a transaction by reference and return the provider's payload
    async fn verify(&self, reference: &str) -> std::result::Result<Value, ProviderError>;

    /// Cheap read-only call used for health checks
    async fn probe(&self) -> std::result::Result<(), ProviderError>;
}

/// Shared HTTP client for provider calls, bounded by `timeout`
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Reference for a new payment, e.g. `PSK_booking-42_5f0c...`
pub fn generate_reference(prefix: &str, booking_id: &str) -> String {
    format!("{}_{}_{}", prefix, booking_id, Uuid::new_v4().simple())
}

/// Amount in the currency's minor unit (kobo, cents)
pub(crate) fn to_minor_units(amount: Decimal) -> std::result::Result<i64, ProviderError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.round().to_i64())
        .ok_or_else(|| ProviderError::Request(format!("invalid amount {}", amount)))
}

/// Join `segments` onto `base_url`, percent-encoding each one so caller
/// input can never add path levels or a query string. Empty, `.` and `..`
/// segments are refused.
pub(crate) fn endpoint(
    base_url: &str,
    segments: &[&str],
) -> std::result::Result<Url, ProviderError> {
    if let Some(segment) = segments
        .iter()
        .find(|s| matches!(**s, "" | "." | ".."))
    {
        return Err(ProviderError::Request(format!(
            "invalid path segment {:?}",
            segment
        )));
    }

    let mut url = Url::parse(base_url)
        .map_err(|e| ProviderError::Request(format!("invalid base URL {}: {}", base_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| ProviderError::Request(format!("base URL {} cannot take a path", base_url)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Read a provider response as JSON, turning non-2xx statuses into
/// `ProviderError::Api` with the body attached
pub(crate) async fn read_json(response: Response) -> std::result::Result<Value, ProviderError> {
    let status = response.status();
    let text = response.text().await?;

    let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| json!({ "message": text }));

    if !status.is_success() {
        return Err(ProviderError::api(status.as_u16(), body));
    }

    Ok(body)
}

/// Pull a string field out of a provider payload
pub(crate) fn required_str(
    body: &Value,
    pointer: &str,
) -> std::result::Result<String, ProviderError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Decode(format!("missing {} in provider response", pointer)))
}
