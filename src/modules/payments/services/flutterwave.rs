use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{json, Value};

use super::gateway_trait::{
    generate_reference, read_json, required_str, GatewayKind, PaymentGateway,
    PaymentInitialization,
};
use crate::modules::payments::errors::ProviderError;
use crate::modules::payments::models::PaymentRequest;

/// Flutterwave (v3 Standard) client
///
/// API Documentation: https://developer.flutterwave.com/reference
pub struct FlutterwaveGateway {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl FlutterwaveGateway {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.flutterwave.com/v3";

    pub fn new(client: Client, secret_key: String, base_url: Option<String>) -> Self {
        Self {
            client,
            secret_key,
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
        }
    }

    fn ensure_success(body: Value) -> Result<Value, ProviderError> {
        if body.get("status").and_then(Value::as_str) == Some("success") {
            Ok(body)
        } else {
            Err(ProviderError::api(200, body))
        }
    }
}

#[async_trait]
impl PaymentGateway for FlutterwaveGateway {
    fn kind(&self) -> GatewayKind {
        GatewayKind::Flutterwave
    }

    async fn initialize(
        &self,
        request: &PaymentRequest,
        callback_url: &str,
    ) -> Result<PaymentInitialization, ProviderError> {
        let url = format!("{}/payments", self.base_url);
        let reference = generate_reference("FLW", &request.booking_id);
        let amount = request
            .amount
            .to_f64()
            .ok_or_else(|| ProviderError::Request(format!("invalid amount {}", request.amount)))?;

        let body = json!({
            "tx_ref": reference,
            "amount": amount,
            "currency": request.currency,
            "redirect_url": callback_url,
            "customer": {
                "email": request.student_email,
                "name": request.student_name,
            },
            "meta": {
                "booking_id": request.booking_id,
                "tutor_name": request.tutor_name,
                "session_date": request.session_date,
            },
            "customizations": {
                "title": format!("Tutoring session with {}", request.tutor_name),
            }
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await?;

        let body = Self::ensure_success(read_json(response).await?)?;

        Ok(PaymentInitialization {
            payment_url: required_str(&body, "/data/link")?,
            reference,
        })
    }

    async fn verify(&self, reference: &str) -> Result<Value, ProviderError> {
        let url = format!("{}/transactions/verify_by_reference", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .query(&[("tx_ref", reference)])
            .send()
            .await?;

        let body = Self::ensure_success(read_json(response).await?)?;
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        let url = format!("{}/transactions", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .query(&[("page", "1")])
            .send()
            .await?;

        Self::ensure_success(read_json(response).await?).map(|_| ())
    }
}
