use crate::core::{AppError, Result};
use std::env;
use std::str::FromStr;

pub mod server;

pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub paystack: GatewayConfig,
    pub flutterwave: GatewayConfig,
    pub stripe: GatewayConfig,
    pub payments: PaymentsConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// `json` switches the log output to JSON lines
    pub log_format: String,
    /// Public base URL of the marketplace, used for provider callbacks
    pub base_url: String,
    /// Error log collector, only used in production
    pub logging_endpoint: Option<String>,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// Per-provider settings. A missing secret key leaves the gateway
/// unregistered.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub secret_key: Option<String>,
    pub base_url: Option<String>,
    pub webhook_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    pub max_retries: u32,
    pub retry_base_ms: u64,
    pub retry_max_ms: u64,
    /// Per-request deadline for provider HTTP calls
    pub request_timeout_ms: u64,
    pub bank_transfer_delay_ms: u64,
    pub bank_transfer_failure_rate: f64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub rate_limit_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
                base_url: env::var("APP_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
                logging_endpoint: optional_var("LOGGING_ENDPOINT"),
            },
            server: ServerConfig::from_env()?,
            paystack: GatewayConfig {
                secret_key: optional_var("PAYSTACK_SECRET_KEY"),
                base_url: optional_var("PAYSTACK_BASE_URL"),
                // Paystack signs webhooks with the secret key itself
                webhook_secret: optional_var("PAYSTACK_SECRET_KEY"),
            },
            flutterwave: GatewayConfig {
                secret_key: optional_var("FLUTTERWAVE_SECRET_KEY"),
                base_url: optional_var("FLUTTERWAVE_BASE_URL"),
                webhook_secret: optional_var("FLUTTERWAVE_WEBHOOK_HASH"),
            },
            stripe: GatewayConfig {
                secret_key: optional_var("STRIPE_SECRET_KEY"),
                base_url: optional_var("STRIPE_BASE_URL"),
                webhook_secret: None,
            },
            payments: PaymentsConfig {
                max_retries: parse_var("PAYMENT_MAX_RETRIES", 3)?,
                retry_base_ms: parse_var("PAYMENT_RETRY_BASE_MS", 1000)?,
                retry_max_ms: parse_var("PAYMENT_RETRY_MAX_MS", 30_000)?,
                request_timeout_ms: parse_var("PAYMENT_REQUEST_TIMEOUT_MS", 30_000)?,
                bank_transfer_delay_ms: parse_var("BANK_TRANSFER_DELAY_MS", 2000)?,
                bank_transfer_failure_rate: parse_var("BANK_TRANSFER_FAILURE_RATE", 0.05)?,
            },
            security: SecurityConfig {
                rate_limit_per_minute: parse_var("RATE_LIMIT_PER_MINUTE", 120)?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.payments.retry_base_ms == 0 {
            return Err(AppError::configuration(
                "PAYMENT_RETRY_BASE_MS must be greater than 0",
            ));
        }

        if self.payments.retry_max_ms < self.payments.retry_base_ms {
            return Err(AppError::configuration(
                "PAYMENT_RETRY_MAX_MS must not be smaller than PAYMENT_RETRY_BASE_MS",
            ));
        }

        if self.payments.request_timeout_ms == 0 {
            return Err(AppError::configuration(
                "PAYMENT_REQUEST_TIMEOUT_MS must be greater than 0",
            ));
        }

        if !(0.0..=1.0).contains(&self.payments.bank_transfer_failure_rate) {
            return Err(AppError::configuration(
                "BANK_TRANSFER_FAILURE_RATE must be between 0 and 1",
            ));
        }

        if self.security.rate_limit_per_minute == 0 {
            return Err(AppError::configuration(
                "Rate limit must be greater than 0",
            ));
        }

        if self.app.is_production() && self.app.logging_endpoint.is_none() {
            tracing::warn!("LOGGING_ENDPOINT not set; payment errors will only be logged locally");
        }

        Ok(())
    }
}

/// Unset and blank variables are both treated as absent
fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T> {
    match optional_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::configuration(format!("Invalid {}: {:?}", key, raw))),
        None => Ok(default),
    }
}
