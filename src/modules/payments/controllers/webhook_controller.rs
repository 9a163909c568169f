use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::info;

use super::payment_controller::{parse_gateway, payment_response};
use crate::modules::payments::models::PaymentResponse;
use crate::modules::payments::services::{PaymentOrchestrator, WebhookVerifier};

/// Receive a provider notification
/// POST /api/webhooks/{gateway}
///
/// The signature is checked against the raw body before anything in it is
/// trusted. Verified events are acknowledged; recording them against a
/// booking is left to the booking service.
pub async fn receive_webhook(
    orchestrator: web::Data<Arc<PaymentOrchestrator>>,
    verifier: web::Data<WebhookVerifier>,
    path: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let kind = match parse_gateway(&path) {
        Ok(kind) => kind,
        Err(response) => return payment_response(&response),
    };

    let signature = req
        .headers()
        .get(WebhookVerifier::signature_header(kind))
        .and_then(|h| h.to_str().ok());

    match verifier.verify(kind, signature, &body) {
        Ok(event) => {
            info!(
                gateway = %kind,
                event = %event.event,
                reference = %event.reference,
                status = ?event.status,
                "Webhook verified"
            );
            HttpResponse::Ok().json(json!({
                "received": true,
                "event": event.event,
                "reference": event.reference,
            }))
        }
        Err(error) => {
            orchestrator.error_handler().log_error(&error).await;
            payment_response(&PaymentResponse::failure(error))
        }
    }
}

/// Configure webhook routes (mounted under /api)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhooks/{gateway}", web::post().to(receive_webhook));
}
