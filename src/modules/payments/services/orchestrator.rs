use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use super::bank_transfer::{BankTransferProcessor, SimulatedBankTransfer};
use super::flutterwave::FlutterwaveGateway;
use super::gateway_trait::{build_http_client, GatewayKind, PaymentGateway};
use super::paystack::PaystackGateway;
use super::stripe::StripeGateway;
use super::validation::{
    validate_bank_transfer_request, validate_payment_request, validate_reference,
};
use crate::config::Config;
use crate::core::Result;
use crate::modules::payments::errors::{
    ErrorLogger, PaymentError, PaymentErrorHandler, PaymentErrorKind, ProviderError, RetryPolicy,
};
use crate::modules::payments::models::{BankTransferRequest, PaymentRequest, PaymentResponse};

/// Single entry point for payment operations.
///
/// Validates requests, routes them to the configured gateway adapter, and
/// turns every failure into a `PaymentResponse`, retrying with exponential
/// backoff when the classified error allows it. Each call carries its own
/// attempt counter; nothing is shared between calls.
pub struct PaymentOrchestrator {
    gateways: HashMap<GatewayKind, Arc<dyn PaymentGateway>>,
    bank: Arc<dyn BankTransferProcessor>,
    errors: PaymentErrorHandler,
    callback_base_url: String,
}

impl PaymentOrchestrator {
    pub fn new(
        errors: PaymentErrorHandler,
        bank: Arc<dyn BankTransferProcessor>,
        callback_base_url: impl Into<String>,
    ) -> Self {
        Self {
            gateways: HashMap::new(),
            bank,
            errors,
            callback_base_url: callback_base_url.into(),
        }
    }

    /// Build from configuration, registering only the gateways whose
    /// secret key is set
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(Duration::from_millis(config.payments.request_timeout_ms))?;

        let logger = ErrorLogger::for_environment(
            config.app.is_production(),
            config.app.logging_endpoint.clone(),
            client.clone(),
        );
        let retry_policy = RetryPolicy {
            max_retries: config.payments.max_retries,
            base_delay: Duration::from_millis(config.payments.retry_base_ms),
            max_delay: Duration::from_millis(config.payments.retry_max_ms),
        };
        let bank = SimulatedBankTransfer::new(
            Duration::from_millis(config.payments.bank_transfer_delay_ms),
            config.payments.bank_transfer_failure_rate,
        );

        let mut orchestrator = Self::new(
            PaymentErrorHandler::new(retry_policy, logger),
            Arc::new(bank),
            config.app.base_url.clone(),
        );

        if let Some(key) = &config.paystack.secret_key {
            orchestrator.register_gateway(Arc::new(PaystackGateway::new(
                client.clone(),
                key.clone(),
                config.paystack.base_url.clone(),
            )));
        }
        if let Some(key) = &config.flutterwave.secret_key {
            orchestrator.register_gateway(Arc::new(FlutterwaveGateway::new(
                client.clone(),
                key.clone(),
                config.flutterwave.base_url.clone(),
            )));
        }
        if let Some(key) = &config.stripe.secret_key {
            orchestrator.register_gateway(Arc::new(StripeGateway::new(
                client.clone(),
                key.clone(),
                config.stripe.base_url.clone(),
            )));
        }

        for kind in GatewayKind::ALL {
            if !orchestrator.is_gateway_available(kind) {
                warn!(gateway = %kind, "Payment gateway not configured");
            }
        }

        Ok(orchestrator)
    }

    /// Register (or replace) the adapter for its gateway
    pub fn register_gateway(&mut self, gateway: Arc<dyn PaymentGateway>) {
        self.gateways.insert(gateway.kind(), gateway);
    }

    pub fn is_gateway_available(&self, kind: GatewayKind) -> bool {
        self.gateways.contains_key(&kind)
    }

    pub(crate) fn gateway(&self, kind: GatewayKind) -> Option<&Arc<dyn PaymentGateway>> {
        self.gateways.get(&kind)
    }

    pub fn error_handler(&self) -> &PaymentErrorHandler {
        &self.errors
    }

    /// Where the provider sends the student after checkout
    pub fn callback_url(&self, kind: GatewayKind) -> String {
        format!(
            "{}/payment/callback?gateway={}",
            self.callback_base_url.trim_end_matches('/'),
            kind.slug()
        )
    }

    pub async fn create_payment(
        &self,
        kind: GatewayKind,
        request: &PaymentRequest,
    ) -> PaymentResponse {
        if let Some(error) = validate_payment_request(request) {
            return self.fail(error.with_gateway(Some(kind))).await;
        }

        let Some(gateway) = self.gateway(kind) else {
            return self.fail(self.unavailable(kind)).await;
        };

        info!(
            gateway = %kind,
            booking_id = %request.booking_id,
            amount = %request.amount,
            currency = %request.currency,
            "Creating payment"
        );

        let callback_url = self.callback_url(kind);
        let result = self
            .with_retries(
                "create_payment",
                || gateway.initialize(request, &callback_url),
                |raw| self.errors.handle_gateway_error(raw, kind.as_str()),
            )
            .await;

        match result {
            Ok(init) => {
                info!(
                    gateway = %kind,
                    reference = %init.reference,
                    "Payment initialized"
                );
                PaymentResponse::initiated(init.payment_url, init.reference)
            }
            Err(error) => PaymentResponse::failure(error),
        }
    }

    pub async fn verify_payment(&self, kind: GatewayKind, reference: &str) -> PaymentResponse {
        if let Some(error) = validate_reference(reference) {
            return self.fail(error.with_gateway(Some(kind))).await;
        }

        let Some(gateway) = self.gateway(kind) else {
            return self.fail(self.unavailable(kind)).await;
        };

        let result = self
            .with_retries(
                "verify_payment",
                || gateway.verify(reference),
                |raw| self.errors.handle_gateway_error(raw, kind.as_str()),
            )
            .await;

        match result {
            Ok(transaction) => {
                info!(gateway = %kind, reference = %reference, "Payment verified");
                PaymentResponse::verified(reference.to_string(), transaction)
            }
            Err(error) => PaymentResponse::failure(error),
        }
    }

    pub async fn process_bank_transfer(&self, request: &BankTransferRequest) -> PaymentResponse {
        if let Some(error) = validate_bank_transfer_request(request) {
            return self.fail(error).await;
        }

        info!(
            source = %request.source_account.id,
            destination = %request.destination_account.id,
            amount = %request.amount,
            currency = %request.currency,
            "Processing bank transfer"
        );

        let result = self
            .with_retries(
                "process_bank_transfer",
                || self.bank.transfer(request),
                |raw| {
                    self.errors.create_error(
                        PaymentErrorKind::BankTransactionFailed,
                        "BANK_TRANSFER_FAILED",
                        raw.to_string(),
                        raw.details(),
                        None,
                    )
                },
            )
            .await;

        match result {
            Ok(reference) => {
                info!(reference = %reference, "Bank transfer completed");
                PaymentResponse::transferred(reference)
            }
            Err(error) => PaymentResponse::failure(error),
        }
    }

    /// Run `call` until it succeeds, the classified error is not retryable,
    /// or `max_retries` retries have been spent
    async fn with_retries<T, F, Fut, C>(
        &self,
        operation: &'static str,
        mut call: F,
        classify: C,
    ) -> std::result::Result<T, PaymentError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, ProviderError>>,
        C: Fn(&ProviderError) -> PaymentError,
    {
        let max_retries = self.errors.retry_policy().max_retries;
        let mut attempt: u32 = 0;

        loop {
            let raw = match call().await {
                Ok(value) => return Ok(value),
                Err(raw) => raw,
            };

            let error = classify(&raw);
            self.errors.log_error(&error).await;

            if !self.errors.should_retry(&error) || attempt >= max_retries {
                return Err(error);
            }

            let delay = self.errors.get_retry_delay(&error, attempt);
            attempt += 1;
            warn!(
                operation,
                attempt,
                max_retries,
                kind = %error.kind(),
                delay_ms = delay.as_millis() as u64,
                "Retrying payment operation"
            );
            sleep(delay).await;
        }
    }

    fn unavailable(&self, kind: GatewayKind) -> PaymentError {
        self.errors.create_error(
            PaymentErrorKind::GatewayUnavailable,
            "GATEWAY_NOT_CONFIGURED",
            format!("{} gateway is not configured", kind.as_str()),
            None,
            Some(kind),
        )
    }

    async fn fail(&self, error: PaymentError) -> PaymentResponse {
        self.errors.log_error(&error).await;
        PaymentResponse::failure(error)
    }
}
