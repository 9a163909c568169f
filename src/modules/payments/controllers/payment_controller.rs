use std::sync::Arc;

use actix_web::{error::InternalError, http::StatusCode, web, HttpResponse};

use crate::modules::payments::errors::{ErrorCategory, PaymentError, PaymentErrorKind};
use crate::modules::payments::models::{BankTransferRequest, PaymentRequest, PaymentResponse};
use crate::modules::payments::services::{GatewayKind, PaymentOrchestrator};

/// Initialize a payment with a gateway
/// POST /api/payments/{gateway}
pub async fn create_payment(
    orchestrator: web::Data<Arc<PaymentOrchestrator>>,
    path: web::Path<String>,
    request: web::Json<PaymentRequest>,
) -> HttpResponse {
    let kind = match parse_gateway(&path) {
        Ok(kind) => kind,
        Err(response) => return payment_response(&response),
    };

    let response = orchestrator.create_payment(kind, &request).await;
    payment_response(&response)
}

/// Verify a payment by its reference
/// GET /api/payments/{gateway}/verify/{reference}
pub async fn verify_payment(
    orchestrator: web::Data<Arc<PaymentOrchestrator>>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (gateway, reference) = path.into_inner();
    let kind = match parse_gateway(&gateway) {
        Ok(kind) => kind,
        Err(response) => return payment_response(&response),
    };

    let response = orchestrator.verify_payment(kind, &reference).await;
    payment_response(&response)
}

/// Move funds between two bank accounts
/// POST /api/bank-transfers
pub async fn process_bank_transfer(
    orchestrator: web::Data<Arc<PaymentOrchestrator>>,
    request: web::Json<BankTransferRequest>,
) -> HttpResponse {
    let response = orchestrator.process_bank_transfer(&request).await;
    payment_response(&response)
}

/// Render a `PaymentResponse` with a status matching its outcome
pub fn payment_response(response: &PaymentResponse) -> HttpResponse {
    let status = response
        .error_details()
        .map(status_for)
        .unwrap_or(StatusCode::OK);

    HttpResponse::build(status).json(response)
}

/// HTTP status for a classified payment error
pub fn status_for(error: &PaymentError) -> StatusCode {
    use PaymentErrorKind::*;

    match error.kind() {
        // The service's provider key was rejected; the caller is not at fault
        InvalidApiKey => StatusCode::BAD_GATEWAY,
        GatewayUnavailable | ServiceUnavailable | BankServiceUnavailable => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        NotImplemented => StatusCode::NOT_IMPLEMENTED,
        GatewayTimeout | TimeoutError => StatusCode::GATEWAY_TIMEOUT,
        InsufficientFunds | PaymentDeclined | CardDeclined | CardExpired
        | BankInsufficientFunds => StatusCode::PAYMENT_REQUIRED,
        DuplicateTransaction | DuplicateRecord => StatusCode::CONFLICT,
        RecordNotFound => StatusCode::NOT_FOUND,
        BankAccountInvalid | BankAccountNotVerified | BankRoutingInvalid => {
            StatusCode::BAD_REQUEST
        }
        WebhookSignatureInvalid => StatusCode::UNAUTHORIZED,
        _ => match error.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Authentication => StatusCode::UNAUTHORIZED,
            ErrorCategory::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            ErrorCategory::Security => StatusCode::FORBIDDEN,
            ErrorCategory::Gateway | ErrorCategory::Network => StatusCode::BAD_GATEWAY,
            ErrorCategory::Bank
            | ErrorCategory::Webhook
            | ErrorCategory::Database
            | ErrorCategory::Generic => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

/// Map a `{gateway}` path segment, answering unknown names with
/// GATEWAY_UNAVAILABLE
pub(crate) fn parse_gateway(name: &str) -> Result<GatewayKind, PaymentResponse> {
    name.parse::<GatewayKind>().map_err(|message| {
        PaymentResponse::failure(PaymentError::new(
            PaymentErrorKind::GatewayUnavailable,
            "UNKNOWN_GATEWAY",
            message,
        ))
    })
}

/// Malformed JSON bodies become MISSING_REQUIRED_FIELDS responses
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let error = PaymentError::new(
            PaymentErrorKind::MissingRequiredFields,
            "INVALID_REQUEST_BODY",
            err.to_string(),
        );
        let response = payment_response(&PaymentResponse::failure(error));
        InternalError::from_response(err, response).into()
    })
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/payments/{gateway}", web::post().to(create_payment))
        .route(
            "/payments/{gateway}/verify/{reference}",
            web::get().to(verify_payment),
        )
        .route("/bank-transfers", web::post().to(process_bank_transfer));
}
