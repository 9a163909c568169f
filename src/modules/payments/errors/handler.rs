use rand::Rng;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::classifier::{classifier_for, generic_classifier, ErrorClassifier};
use super::kind::{PaymentErrorKind, Severity};
use super::logger::ErrorLogger;
use super::payment_error::{PaymentError, ProviderError};
use crate::modules::payments::services::gateway_trait::GatewayKind;

/// Exponential backoff settings shared by every orchestrated operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Jitter added on top of the backoff, as a fraction of it
    pub const MAX_JITTER: f64 = 0.1;

    /// Backoff before jitter: `base * 2^attempt`, capped at `max_delay`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        let max_ms = self.max_delay.as_millis() as u64;
        let backoff_ms = base_ms
            .saturating_mul(2u64.saturating_pow(attempt))
            .min(max_ms);
        Duration::from_millis(backoff_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
        }
    }
}

/// Builds, classifies and reports payment errors, and owns the retry
/// decision for the orchestrator
#[derive(Debug, Clone)]
pub struct PaymentErrorHandler {
    retry_policy: RetryPolicy,
    logger: ErrorLogger,
}

impl PaymentErrorHandler {
    pub fn new(retry_policy: RetryPolicy, logger: ErrorLogger) -> Self {
        Self {
            retry_policy,
            logger,
        }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn create_error(
        &self,
        kind: PaymentErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<Value>,
        gateway: Option<GatewayKind>,
    ) -> PaymentError {
        PaymentError::new(kind, code, message)
            .with_details(details)
            .with_gateway(gateway)
    }

    /// Classify a raw adapter failure for the named gateway.
    ///
    /// Transport failures, throttling and provider 5xx responses use the
    /// generic rules whatever the gateway; unrecognised gateway names do too.
    pub fn handle_gateway_error(&self, raw: &ProviderError, gateway_name: &str) -> PaymentError {
        let gateway = gateway_name.parse::<GatewayKind>().ok();

        let kind = match raw {
            ProviderError::NotConfigured(_) => PaymentErrorKind::GatewayUnavailable,
            ProviderError::NotImplemented(_) => PaymentErrorKind::NotImplemented,
            e if e.is_network_level() => generic_classifier().classify(e),
            e => classifier_for(gateway).classify(e),
        };

        self.create_error(kind, raw.code(), raw.to_string(), raw.details(), gateway)
    }

    pub async fn log_error(&self, error: &PaymentError) {
        self.logger.log(error).await;
    }

    /// Critical errors are never retried, whatever the kind's policy says
    pub fn should_retry(&self, error: &PaymentError) -> bool {
        error.retryable() && error.severity() != Severity::Critical
    }

    /// Backoff for the given zero-based attempt plus up to 10% jitter
    pub fn get_retry_delay(&self, error: &PaymentError, attempt: u32) -> Duration {
        let backoff = self.retry_policy.backoff(attempt);
        let backoff_ms = backoff.as_millis() as u64;
        let factor = rand::thread_rng().gen_range(0.0..=RetryPolicy::MAX_JITTER);
        let jitter_ms = (backoff_ms as f64 * factor).floor() as u64;
        let delay = Duration::from_millis(backoff_ms + jitter_ms);

        debug!(
            kind = %error.kind(),
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Computed retry delay"
        );

        delay
    }
}

impl Default for PaymentErrorHandler {
    fn default() -> Self {
        Self::new(RetryPolicy::default(), ErrorLogger::Console)
    }
}
