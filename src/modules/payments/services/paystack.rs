use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::gateway_trait::{
    endpoint, generate_reference, read_json, required_str, to_minor_units, GatewayKind,
    PaymentGateway, PaymentInitialization,
};
use crate::modules::payments::errors::ProviderError;
use crate::modules::payments::models::PaymentRequest;

/// Paystack client
///
/// API Documentation: https://paystack.com/docs/api/transaction/
pub struct PaystackGateway {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl PaystackGateway {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.paystack.co";

    /// # Arguments
    /// * `client` - Shared HTTP client (carries the request timeout)
    /// * `secret_key` - Paystack secret key (from PAYSTACK_SECRET_KEY env var)
    /// * `base_url` - API base URL, defaults to the live API
    pub fn new(client: Client, secret_key: String, base_url: Option<String>) -> Self {
        Self {
            client,
            secret_key,
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Paystack answers HTTP 200 with `"status": false` for some rejections
    fn ensure_accepted(body: Value) -> Result<Value, ProviderError> {
        if body.get("status").and_then(Value::as_bool) == Some(true) {
            Ok(body)
        } else {
            Err(ProviderError::api(200, body))
        }
    }
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    fn kind(&self) -> GatewayKind {
        GatewayKind::Paystack
    }

    async fn initialize(
        &self,
        request: &PaymentRequest,
        callback_url: &str,
    ) -> Result<PaymentInitialization, ProviderError> {
        let url = endpoint(&self.base_url, &["transaction", "initialize"])?;
        let reference = generate_reference("PSK", &request.booking_id);

        let body = json!({
            "email": request.student_email,
            "amount": to_minor_units(request.amount)?,
            "currency": request.currency,
            "reference": reference,
            "callback_url": callback_url,
            "metadata": {
                "booking_id": request.booking_id,
                "student_name": request.student_name,
                "tutor_name": request.tutor_name,
                "session_date": request.session_date,
            }
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await?;

        let body = Self::ensure_accepted(read_json(response).await?)?;

        Ok(PaymentInitialization {
            payment_url: required_str(&body, "/data/authorization_url")?,
            reference: required_str(&body, "/data/reference").unwrap_or(reference),
        })
    }

    async fn verify(&self, reference: &str) -> Result<Value, ProviderError> {
        let url = endpoint(&self.base_url, &["transaction", "verify", reference])?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        let body = Self::ensure_accepted(read_json(response).await?)?;
        Ok(body.get("data").cloned().unwrap_or(Value::Null))
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        let url = endpoint(&self.base_url, &["transaction"])?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .query(&[("perPage", "1")])
            .send()
            .await?;

        Self::ensure_accepted(read_json(response).await?).map(|_| ())
    }
}
