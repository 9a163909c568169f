// Scripted Gateway
//
// In-process `PaymentGateway` whose calls follow a fixed script. Every call
// is counted so tests can assert how often the orchestrator dispatched.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tutorpay::payments::models::PaymentRequest;
use tutorpay::payments::services::{GatewayKind, PaymentGateway, PaymentInitialization};
use tutorpay::payments::ProviderError;

pub struct ScriptedGateway {
    kind: GatewayKind,
    /// Failures returned before calls start succeeding; `None` never succeeds
    failures_before_success: Option<usize>,
    failure: ProviderError,
    calls: AtomicUsize,
    last_callback_url: Mutex<Option<String>>,
}

impl ScriptedGateway {
    pub fn succeeding(kind: GatewayKind) -> Self {
        Self::new(kind, Some(0), ProviderError::Decode("unused".to_string()))
    }

    pub fn failing(kind: GatewayKind, failure: ProviderError) -> Self {
        Self::new(kind, None, failure)
    }

    /// Fails `times` times, then succeeds
    pub fn flaky(kind: GatewayKind, times: usize, failure: ProviderError) -> Self {
        Self::new(kind, Some(times), failure)
    }

    fn new(
        kind: GatewayKind,
        failures_before_success: Option<usize>,
        failure: ProviderError,
    ) -> Self {
        Self {
            kind,
            failures_before_success,
            failure,
            calls: AtomicUsize::new(0),
            last_callback_url: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_callback_url(&self) -> Option<String> {
        self.last_callback_url.lock().unwrap().clone()
    }

    fn next(&self) -> Result<(), ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failures_before_success {
            Some(limit) if call >= limit => Ok(()),
            _ => Err(self.failure.clone()),
        }
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    fn kind(&self) -> GatewayKind {
        self.kind
    }

    async fn initialize(
        &self,
        request: &PaymentRequest,
        callback_url: &str,
    ) -> Result<PaymentInitialization, ProviderError> {
        *self.last_callback_url.lock().unwrap() = Some(callback_url.to_string());
        self.next()?;
        Ok(PaymentInitialization {
            payment_url: format!("https://checkout.example.com/{}", request.booking_id),
            reference: format!("REF_{}", request.booking_id),
        })
    }

    async fn verify(&self, reference: &str) -> Result<Value, ProviderError> {
        self.next()?;
        Ok(json!({ "reference": reference, "status": "success" }))
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        self.next()
    }
}
