pub mod payment_request;
pub mod payment_response;

pub use payment_request::{AccountType, BankAccount, BankTransferRequest, PaymentRequest};
pub use payment_response::{GatewayHealth, PaymentResponse};
