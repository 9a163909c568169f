// Remote error reporting with console fallback

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tutorpay::payments::errors::{ErrorLogRecord, ErrorLogger, PaymentErrorHandler, RetryPolicy};
use tutorpay::payments::services::build_http_client;
use tutorpay::payments::{PaymentErrorKind, ProviderError};

fn remote_handler(server: &MockServer) -> PaymentErrorHandler {
    let client = build_http_client(Duration::from_secs(2)).unwrap();
    let logger =
        ErrorLogger::for_environment(true, Some(format!("{}/ingest", server.uri())), client);
    PaymentErrorHandler::new(RetryPolicy::default(), logger)
}

#[tokio::test]
async fn test_production_errors_are_shipped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ingest"))
        .and(body_partial_json(json!({
            "type": "INSUFFICIENT_FUNDS",
            "code": "HTTP_400",
            "gateway": "paystack",
            "severity": "LOW",
            "retryable": false
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let handler = remote_handler(&server);
    let raw = ProviderError::api(400, json!({ "status": false, "message": "Insufficient Funds" }));
    let error = handler.handle_gateway_error(&raw, "PAYSTACK");

    handler.log_error(&error).await;
}

#[tokio::test]
async fn test_record_is_well_formed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let handler = remote_handler(&server);
    let error = handler.create_error(
        PaymentErrorKind::BankTransactionFailed,
        "BANK_TRANSFER_FAILED",
        "bank rejected transfer",
        None,
        None,
    );
    handler.log_error(&error).await;

    let requests = server.received_requests().await.unwrap();
    let record: ErrorLogRecord = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(record.kind, PaymentErrorKind::BankTransactionFailed);
    assert_eq!(record.code, "BANK_TRANSFER_FAILED");
    assert!(record.gateway.is_none());
}

#[tokio::test]
async fn test_rejected_record_falls_back_without_failing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let handler = remote_handler(&server);
    let error = handler.create_error(
        PaymentErrorKind::GatewayError,
        "HTTP_400",
        "gateway said no",
        None,
        None,
    );

    handler.log_error(&error).await;
}

#[tokio::test]
async fn test_unreachable_logging_service_falls_back() {
    let client = build_http_client(Duration::from_millis(500)).unwrap();
    let logger = ErrorLogger::for_environment(
        true,
        Some("http://127.0.0.1:9/ingest".to_string()),
        client,
    );
    let handler = PaymentErrorHandler::new(RetryPolicy::default(), logger);
    let error = handler.create_error(
        PaymentErrorKind::TimeoutError,
        "ETIMEDOUT",
        "operation timed out",
        None,
        None,
    );

    handler.log_error(&error).await;
}
