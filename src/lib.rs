//! Payment error handling and gateway abstraction for the tutoring marketplace.
//!
//! The orchestrator in [`modules::payments`] validates payment requests,
//! routes them to Paystack, Flutterwave, Stripe or the bank-transfer path,
//! and turns every provider failure into a uniform `PaymentResponse`.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::payments;
