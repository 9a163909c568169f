// Paystack adapter against a local mock of the Paystack API

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tutorpay::payments::services::{build_http_client, PaystackGateway};
use tutorpay::payments::{
    GatewayKind, PaymentErrorKind, PaymentGateway, PaymentOrchestrator, ProviderError,
};

const SECRET_KEY: &str = "sk_test_paystack";

fn paystack(server: &MockServer) -> PaystackGateway {
    let client = build_http_client(Duration::from_secs(5)).unwrap();
    PaystackGateway::new(client, SECRET_KEY.to_string(), Some(server.uri()))
}

fn orchestrator(server: &MockServer) -> PaymentOrchestrator {
    orchestrator_with(vec![Arc::new(paystack(server))], reliable_bank())
}

#[tokio::test]
async fn test_initialize_sends_minor_units_and_returns_checkout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .and(header("authorization", "Bearer sk_test_paystack"))
        .and(body_partial_json(json!({
            "email": "a@b.com",
            "amount": 500000,
            "currency": "NGN",
            "callback_url": "https://tutors.example.com/payment/callback?gateway=paystack",
            "metadata": { "booking_id": "b1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "Authorization URL created",
            "data": {
                "authorization_url": "https://checkout.paystack.com/abc",
                "access_code": "abc",
                "reference": "PSK_b1_xyz"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = orchestrator(&server)
        .create_payment(GatewayKind::Paystack, &payment_request())
        .await;

    assert!(response.is_success(), "{:?}", response);
    assert_eq!(response.payment_url(), Some("https://checkout.paystack.com/abc"));
    assert_eq!(response.reference(), Some("PSK_b1_xyz"));
}

#[tokio::test]
async fn test_insufficient_funds_is_classified_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": false,
            "message": "Insufficient Funds"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = orchestrator(&server)
        .create_payment(GatewayKind::Paystack, &payment_request())
        .await;

    assert!(!response.is_success());
    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::InsufficientFunds);
    assert_eq!(error.code(), "HTTP_400");
    assert_eq!(error.gateway(), Some(GatewayKind::Paystack));
    assert_eq!(error.details().unwrap()["status"], 400);
}

#[tokio::test]
async fn test_status_false_on_http_200_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": false,
            "message": "Invalid key"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = orchestrator(&server)
        .create_payment(GatewayKind::Paystack, &payment_request())
        .await;

    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::InvalidApiKey);
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": false,
            "message": "An error occurred"
        })))
        .expect(4)
        .mount(&server)
        .await;

    let response = orchestrator(&server)
        .create_payment(GatewayKind::Paystack, &payment_request())
        .await;

    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::InternalServerError);
}

#[tokio::test]
async fn test_throttling_maps_to_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transaction/verify/PSK_b1_xyz"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(4)
        .mount(&server)
        .await;

    let response = orchestrator(&server)
        .verify_payment(GatewayKind::Paystack, "PSK_b1_xyz")
        .await;

    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::RateLimitExceeded);
    assert_eq!(error.code(), "HTTP_429");
}

#[tokio::test]
async fn test_verify_returns_transaction_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transaction/verify/PSK_b1_xyz"))
        .and(header("authorization", "Bearer sk_test_paystack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "Verification successful",
            "data": { "reference": "PSK_b1_xyz", "status": "success", "amount": 500000 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = orchestrator(&server)
        .verify_payment(GatewayKind::Paystack, "PSK_b1_xyz")
        .await;

    assert!(response.is_success());
    let transaction = response.transaction().unwrap();
    assert_eq!(transaction["status"], "success");
    assert_eq!(transaction["amount"], 500000);
}

#[tokio::test]
async fn test_probe_lists_one_transaction() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transaction"))
        .and(query_param("perPage", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(paystack(&server).probe().await.is_ok());
}

#[tokio::test]
async fn test_unreachable_host_is_connection_refused() {
    // Nothing listens on the discard port
    let client = build_http_client(Duration::from_secs(2)).unwrap();
    let gateway = PaystackGateway::new(
        client,
        SECRET_KEY.to_string(),
        Some("http://127.0.0.1:9".to_string()),
    );
    let orchestrator = orchestrator_with(vec![Arc::new(gateway)], reliable_bank());

    let response = orchestrator
        .create_payment(GatewayKind::Paystack, &payment_request())
        .await;

    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::ConnectionRefused);
    assert!(error.retryable());
}

#[tokio::test]
async fn test_oversized_amount_fails_without_calling_provider() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transaction/initialize"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut request = payment_request();
    request.amount = Decimal::MAX;

    let response = orchestrator(&server)
        .create_payment(GatewayKind::Paystack, &request)
        .await;

    assert!(!response.is_success());
    let error = response.error_details().unwrap();
    assert_eq!(error.kind(), PaymentErrorKind::InvalidAmount);
    assert_eq!(error.code(), "INVALID_REQUEST");
    assert!(!error.retryable());
}

#[tokio::test]
async fn test_verify_reference_stays_one_path_segment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": { "status": "success" }
        })))
        .mount(&server)
        .await;

    let gateway = paystack(&server);
    for reference in ["x?perPage=100&", "a/b"] {
        gateway.verify(reference).await.unwrap();
    }
    assert!(matches!(
        gateway.verify("..").await,
        Err(ProviderError::Request(_))
    ));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        let url = &request.url;
        assert!(
            url.path().starts_with("/transaction/verify/"),
            "unexpected path {}",
            url.path()
        );
        assert_eq!(url.path_segments().unwrap().count(), 3, "{}", url);
        assert!(url.query().is_none(), "{}", url);
    }
}

#[tokio::test]
async fn test_malformed_reference_is_rejected_before_dispatch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": true })))
        .expect(0)
        .mount(&server)
        .await;

    let orchestrator = orchestrator(&server);
    for reference in ["..", "x?perPage=100&"] {
        let response = orchestrator
            .verify_payment(GatewayKind::Paystack, reference)
            .await;

        let error = response.error_details().unwrap();
        assert_eq!(error.kind(), PaymentErrorKind::InvalidReference, "{:?}", reference);
        assert_eq!(error.code(), "INVALID_REFERENCE_FORMAT");
    }
}
