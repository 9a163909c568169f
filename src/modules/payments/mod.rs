pub mod controllers;
pub mod errors;
pub mod models;
pub mod services;

pub use controllers::configure;
pub use errors::{PaymentError, PaymentErrorHandler, PaymentErrorKind, ProviderError, Severity};
pub use models::{BankTransferRequest, GatewayHealth, PaymentRequest, PaymentResponse};
pub use services::{GatewayKind, PaymentGateway, PaymentOrchestrator, WebhookVerifier};
