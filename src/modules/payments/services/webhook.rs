use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::Value;
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::gateway_trait::GatewayKind;
use crate::modules::payments::errors::{PaymentError, PaymentErrorKind};

type HmacSha512 = Hmac<Sha512>;

/// A provider notification that passed signature verification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookEvent {
    pub gateway: GatewayKind,
    pub event: String,
    pub reference: String,
    pub status: Option<String>,
    pub raw: Value,
}

/// Checks provider webhook signatures before their payloads are trusted
#[derive(Debug, Clone, Default)]
pub struct WebhookVerifier {
    /// Paystack signs bodies with the account secret key
    paystack_secret: Option<String>,
    /// Flutterwave echoes a shared secret hash in `verif-hash`
    flutterwave_hash: Option<String>,
}

impl WebhookVerifier {
    pub fn new(paystack_secret: Option<String>, flutterwave_hash: Option<String>) -> Self {
        Self {
            paystack_secret,
            flutterwave_hash,
        }
    }

    /// Header carrying the signature for a gateway
    pub fn signature_header(kind: GatewayKind) -> &'static str {
        match kind {
            GatewayKind::Paystack => "x-paystack-signature",
            GatewayKind::Flutterwave => "verif-hash",
            GatewayKind::Stripe => "stripe-signature",
        }
    }

    pub fn verify(
        &self,
        kind: GatewayKind,
        signature: Option<&str>,
        payload: &[u8],
    ) -> Result<WebhookEvent, PaymentError> {
        match kind {
            GatewayKind::Paystack => {
                let secret = self.secret(kind, self.paystack_secret.as_deref())?;
                verify_paystack_signature(secret, signature, payload)?;
                parse_event(kind, payload, "/data/reference")
            }
            GatewayKind::Flutterwave => {
                let expected = self.secret(kind, self.flutterwave_hash.as_deref())?;
                if !hashes_match(signature, expected) {
                    return Err(invalid_signature(kind, "verif-hash does not match"));
                }
                parse_event(kind, payload, "/data/tx_ref")
            }
            GatewayKind::Stripe => Err(PaymentError::new(
                PaymentErrorKind::NotImplemented,
                "NOT_IMPLEMENTED",
                "Stripe webhooks are not supported",
            )
            .with_gateway(Some(kind))),
        }
    }

    fn secret<'a>(
        &self,
        kind: GatewayKind,
        secret: Option<&'a str>,
    ) -> Result<&'a str, PaymentError> {
        secret.ok_or_else(|| {
            PaymentError::new(
                PaymentErrorKind::GatewayUnavailable,
                "WEBHOOK_SECRET_NOT_CONFIGURED",
                format!("No webhook secret configured for {}", kind.as_str()),
            )
            .with_gateway(Some(kind))
        })
    }
}

/// Paystack: hex HMAC-SHA512 of the raw body, keyed by the secret key
pub fn verify_paystack_signature(
    secret: &str,
    signature: Option<&str>,
    payload: &[u8],
) -> Result<(), PaymentError> {
    let kind = GatewayKind::Paystack;
    let signature = signature.ok_or_else(|| invalid_signature(kind, "signature header missing"))?;
    let expected =
        hex::decode(signature).map_err(|_| invalid_signature(kind, "signature is not hex"))?;

    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|_| invalid_signature(kind, "unusable secret key"))?;
    mac.update(payload);
    mac.verify_slice(&expected)
        .map_err(|_| invalid_signature(kind, "signature does not match payload"))
}

/// Constant-time comparison of a presented secret hash
fn hashes_match(presented: Option<&str>, expected: &str) -> bool {
    presented.is_some_and(|presented| presented.as_bytes().ct_eq(expected.as_bytes()).into())
}

fn parse_event(
    kind: GatewayKind,
    payload: &[u8],
    reference_pointer: &str,
) -> Result<WebhookEvent, PaymentError> {
    let raw: Value = serde_json::from_slice(payload)
        .map_err(|e| processing_failed(kind, format!("payload is not JSON: {}", e)))?;

    let reference = raw
        .pointer(reference_pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| processing_failed(kind, format!("payload has no {}", reference_pointer)))?;

    Ok(WebhookEvent {
        gateway: kind,
        event: raw
            .get("event")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        reference,
        status: raw
            .pointer("/data/status")
            .and_then(Value::as_str)
            .map(str::to_string),
        raw,
    })
}

fn invalid_signature(kind: GatewayKind, reason: &str) -> PaymentError {
    PaymentError::new(
        PaymentErrorKind::WebhookSignatureInvalid,
        "INVALID_SIGNATURE",
        format!("{} webhook rejected: {}", kind.as_str(), reason),
    )
    .with_gateway(Some(kind))
}

fn processing_failed(kind: GatewayKind, reason: String) -> PaymentError {
    PaymentError::new(
        PaymentErrorKind::WebhookProcessingFailed,
        "INVALID_PAYLOAD",
        format!("{} webhook rejected: {}", kind.as_str(), reason),
    )
    .with_gateway(Some(kind))
}

/// Hex HMAC-SHA512 of `payload`, as Paystack would send it
pub fn sign_paystack_payload(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
