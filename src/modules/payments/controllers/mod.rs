pub mod health_controller;
pub mod payment_controller;
pub mod webhook_controller;

use actix_web::web;

pub use health_controller::health_check;
pub use payment_controller::{json_config, payment_response, status_for};

/// Mount every payment route under `/api`, plus the `/health` liveness probe
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api")
            .configure(payment_controller::configure)
            .configure(health_controller::configure)
            .configure(webhook_controller::configure),
    );
}
