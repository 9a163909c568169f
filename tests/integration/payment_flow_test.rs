// Payment orchestration end to end against scripted gateways: validation
// short-circuits, routing, classification and the retry budget.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

use tutorpay::payments::errors::TransportFailure;
use tutorpay::payments::{GatewayKind, PaymentErrorKind, ProviderError};

fn connection_refused() -> ProviderError {
    ProviderError::Transport {
        kind: TransportFailure::ConnectionRefused,
        message: "tcp connect error: Connection refused".to_string(),
    }
}

#[tokio::test]
async fn test_successful_paystack_payment() {
    let gateway = Arc::new(ScriptedGateway::succeeding(GatewayKind::Paystack));
    let orchestrator = orchestrator_with(vec![gateway.clone()], reliable_bank());

    let response = orchestrator
        .create_payment(GatewayKind::Paystack, &payment_request())
        .await;

    assert!(response.is_success());
    assert_eq!(response.payment_url(), Some("https://checkout.example.com/b1"));
    assert_eq!(response.reference(), Some("REF_b1"));
    assert_eq!(response.message(), Some("Payment initialized successfully"));
    assert!(response.error().is_none());
    assert!(response.error_details().is_none());
    assert_eq!(gateway.calls(), 1);
    assert_eq!(
        gateway.last_callback_url().as_deref(),
        Some("https://tutors.example.com/payment/callback?gateway=paystack")
    );
}

#[tokio::test]
async fn test_invalid_amount_never_reaches_gateway() {
    let gateway = Arc::new(ScriptedGateway::succeeding(GatewayKind::Paystack));
    let orchestrator = orchestrator_with(vec![gateway.clone()], reliable_bank());

    let mut request = payment_request();
    request.amount = Decimal::ZERO;

    let response = orchestrator.create_payment(GatewayKind::Paystack, &request).await;

    assert!(!response.is_success());
    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::InvalidAmount);
    assert!(!error.retryable());
    assert_eq!(response.error(), Some(error.user_message()));
    assert!(response.payment_url().is_none());
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_unconfigured_gateway_is_unavailable() {
    let orchestrator = orchestrator_with(vec![], reliable_bank());

    let response = orchestrator
        .create_payment(GatewayKind::Flutterwave, &payment_request())
        .await;

    assert!(!response.is_success());
    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::GatewayUnavailable);
    assert!(!error.retryable());
    assert_eq!(error.gateway(), Some(GatewayKind::Flutterwave));
}

#[tokio::test]
async fn test_retryable_failure_spends_full_budget() {
    let gateway = Arc::new(ScriptedGateway::failing(
        GatewayKind::Paystack,
        connection_refused(),
    ));
    let orchestrator = orchestrator_with(vec![gateway.clone()], reliable_bank());

    let response = orchestrator
        .create_payment(GatewayKind::Paystack, &payment_request())
        .await;

    assert!(!response.is_success());
    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::ConnectionRefused);
    assert_eq!(error.code(), "ECONNREFUSED");
    // One initial attempt plus max_retries
    assert_eq!(gateway.calls(), 4);
}

#[tokio::test]
async fn test_transient_failure_recovers() {
    let gateway = Arc::new(ScriptedGateway::flaky(
        GatewayKind::Paystack,
        2,
        ProviderError::api(503, json!({ "message": "upstream unavailable" })),
    ));
    let orchestrator = orchestrator_with(vec![gateway.clone()], reliable_bank());

    let response = orchestrator
        .create_payment(GatewayKind::Paystack, &payment_request())
        .await;

    assert!(response.is_success());
    assert_eq!(gateway.calls(), 3);
}

#[tokio::test]
async fn test_non_retryable_failure_is_not_retried() {
    let gateway = Arc::new(ScriptedGateway::failing(
        GatewayKind::Paystack,
        ProviderError::api(400, json!({ "status": false, "message": "Insufficient Funds" })),
    ));
    let orchestrator = orchestrator_with(vec![gateway.clone()], reliable_bank());

    let response = orchestrator
        .create_payment(GatewayKind::Paystack, &payment_request())
        .await;

    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::InsufficientFunds);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn test_critical_failure_is_not_retried() {
    let gateway = Arc::new(ScriptedGateway::failing(
        GatewayKind::Paystack,
        ProviderError::api(401, json!({ "status": false, "message": "Invalid key" })),
    ));
    let orchestrator = orchestrator_with(vec![gateway.clone()], reliable_bank());

    let response = orchestrator
        .create_payment(GatewayKind::Paystack, &payment_request())
        .await;

    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::InvalidApiKey);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn test_stripe_is_not_implemented() {
    let gateway = Arc::new(ScriptedGateway::failing(
        GatewayKind::Stripe,
        ProviderError::NotImplemented("Stripe payment initialization".to_string()),
    ));
    let orchestrator = orchestrator_with(vec![gateway.clone()], reliable_bank());

    let response = orchestrator
        .create_payment(GatewayKind::Stripe, &payment_request())
        .await;

    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::NotImplemented);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn test_verify_payment_returns_transaction() {
    let gateway = Arc::new(ScriptedGateway::succeeding(GatewayKind::Flutterwave));
    let orchestrator = orchestrator_with(vec![gateway.clone()], reliable_bank());

    let response = orchestrator
        .verify_payment(GatewayKind::Flutterwave, "FLW_b1_abc")
        .await;

    assert!(response.is_success());
    assert_eq!(response.reference(), Some("FLW_b1_abc"));
    assert_eq!(response.transaction().unwrap()["status"], "success");
}

#[tokio::test]
async fn test_empty_reference_is_rejected_before_dispatch() {
    let gateway = Arc::new(ScriptedGateway::succeeding(GatewayKind::Paystack));
    let orchestrator = orchestrator_with(vec![gateway.clone()], reliable_bank());

    let response = orchestrator.verify_payment(GatewayKind::Paystack, "").await;

    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::InvalidReference);
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_path_like_reference_is_rejected_before_dispatch() {
    let gateway = Arc::new(ScriptedGateway::succeeding(GatewayKind::Paystack));
    let orchestrator = orchestrator_with(vec![gateway.clone()], reliable_bank());

    for reference in ["..", "../transaction", "x?perPage=100&"] {
        let response = orchestrator.verify_payment(GatewayKind::Paystack, reference).await;

        let error = response.error_details().unwrap();
        assert_eq!(error.kind(), PaymentErrorKind::InvalidReference, "{:?}", reference);
        assert_eq!(error.gateway(), Some(GatewayKind::Paystack));
    }
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_verify_retries_timeouts() {
    let gateway = Arc::new(ScriptedGateway::failing(
        GatewayKind::Paystack,
        ProviderError::Transport {
            kind: TransportFailure::TimedOut,
            message: "operation timed out".to_string(),
        },
    ));
    let orchestrator = orchestrator_with(vec![gateway.clone()], reliable_bank());

    let response = orchestrator
        .verify_payment(GatewayKind::Paystack, "PSK_b1_abc")
        .await;

    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::TimeoutError);
    assert_eq!(gateway.calls(), 4);
}

#[tokio::test]
async fn test_concurrent_calls_keep_separate_budgets() {
    let failing = Arc::new(ScriptedGateway::failing(
        GatewayKind::Paystack,
        connection_refused(),
    ));
    let healthy = Arc::new(ScriptedGateway::succeeding(GatewayKind::Flutterwave));
    let orchestrator = orchestrator_with(vec![failing.clone(), healthy.clone()], reliable_bank());
    let request = payment_request();

    let (failed, succeeded) = tokio::join!(
        orchestrator.create_payment(GatewayKind::Paystack, &request),
        orchestrator.create_payment(GatewayKind::Flutterwave, &request),
    );

    assert!(!failed.is_success());
    assert!(succeeded.is_success());
    assert_eq!(failing.calls(), 4);
    assert_eq!(healthy.calls(), 1);
}
