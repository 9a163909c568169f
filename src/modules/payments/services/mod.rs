pub mod bank_transfer;
pub mod flutterwave;
pub mod gateway_trait;
pub mod health;
pub mod orchestrator;
pub mod paystack;
pub mod stripe;
pub mod validation;
pub mod webhook;

pub use bank_transfer::{BankTransferProcessor, SimulatedBankTransfer};
pub use flutterwave::FlutterwaveGateway;
pub use gateway_trait::{
    build_http_client, generate_reference, GatewayKind, PaymentGateway, PaymentInitialization,
};
pub use orchestrator::PaymentOrchestrator;
pub use paystack::PaystackGateway;
pub use stripe::StripeGateway;
pub use validation::{
    validate_bank_transfer_request, validate_payment_request, validate_reference,
};
pub use webhook::{sign_paystack_payload, verify_paystack_signature, WebhookEvent, WebhookVerifier};
