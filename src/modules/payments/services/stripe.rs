use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::gateway_trait::{read_json, GatewayKind, PaymentGateway, PaymentInitialization};
use crate::modules::payments::errors::ProviderError;
use crate::modules::payments::models::PaymentRequest;

/// Stripe client.
///
/// Only the health probe talks to Stripe. Initializing and verifying
/// payments are not supported yet and always return
/// `ProviderError::NotImplemented`.
pub struct StripeGateway {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl StripeGateway {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.stripe.com";

    pub fn new(client: Client, secret_key: String, base_url: Option<String>) -> Self {
        Self {
            client,
            secret_key,
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    fn kind(&self) -> GatewayKind {
        GatewayKind::Stripe
    }

    async fn initialize(
        &self,
        _request: &PaymentRequest,
        _callback_url: &str,
    ) -> Result<PaymentInitialization, ProviderError> {
        Err(ProviderError::NotImplemented(
            "Stripe payment initialization".to_string(),
        ))
    }

    async fn verify(&self, _reference: &str) -> Result<Value, ProviderError> {
        Err(ProviderError::NotImplemented(
            "Stripe payment verification".to_string(),
        ))
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        let url = format!("{}/v1/balance_transactions", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .query(&[("limit", "1")])
            .send()
            .await?;

        read_json(response).await.map(|_| ())
    }
}
