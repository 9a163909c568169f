use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tutorpay::config::Config;
use tutorpay::middleware::{RateLimiter, RequestIdMiddlewareFactory};
use tutorpay::payments::{self, PaymentOrchestrator, WebhookVerifier};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    init_tracing(&config);

    config
        .validate()
        .context("Configuration validation failed")?;

    tracing::info!("Starting tutorpay payment service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let orchestrator = Arc::new(
        PaymentOrchestrator::from_config(&config).context("Failed to build payment gateways")?,
    );
    let verifier = WebhookVerifier::new(
        config.paystack.webhook_secret.clone(),
        config.flutterwave.webhook_secret.clone(),
    );
    let rate_limiter = RateLimiter::new(config.security.rate_limit_per_minute);

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(rate_limiter.clone())
            .wrap(RequestIdMiddlewareFactory)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(orchestrator.clone()))
            .app_data(web::Data::new(verifier.clone()))
            .configure(payments::configure)
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("tutorpay={},actix_web=info", config.app.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.app.log_format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
