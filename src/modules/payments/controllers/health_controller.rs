use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use super::payment_controller::{parse_gateway, payment_response};
use crate::modules::payments::services::PaymentOrchestrator;

/// Liveness response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

/// GET /health - Liveness probe
/// Does not contact any payment provider
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: "tutorpay".to_string(),
    })
}

/// GET /api/gateways/health - Probe every gateway concurrently
pub async fn all_gateways_health(
    orchestrator: web::Data<Arc<PaymentOrchestrator>>,
) -> HttpResponse {
    let report = orchestrator.get_all_gateways_health().await;
    HttpResponse::Ok().json(report)
}

/// GET /api/gateways/{gateway}/health - Probe one gateway
/// Returns 503 when the gateway is unhealthy or not configured
pub async fn gateway_health(
    orchestrator: web::Data<Arc<PaymentOrchestrator>>,
    path: web::Path<String>,
) -> HttpResponse {
    let kind = match parse_gateway(&path) {
        Ok(kind) => kind,
        Err(response) => return payment_response(&response),
    };

    let health = orchestrator.get_gateway_health(kind).await;
    if health.healthy {
        HttpResponse::Ok().json(health)
    } else {
        HttpResponse::ServiceUnavailable().json(health)
    }
}

/// Configure gateway health routes (mounted under /api)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/gateways/health", web::get().to(all_gateways_health))
        .route("/gateways/{gateway}/health", web::get().to(gateway_health));
}
