//! Payment error taxonomy, classification and reporting

pub mod classifier;
pub mod handler;
pub mod kind;
pub mod logger;
pub mod payment_error;

pub use classifier::{
    classifier_for, ErrorClassifier, FlutterwaveClassifier, GenericClassifier,
    PaystackClassifier, StripeClassifier,
};
pub use handler::{PaymentErrorHandler, RetryPolicy};
pub use kind::{ErrorCategory, ErrorPolicy, PaymentErrorKind, Severity};
pub use logger::{ErrorLogRecord, ErrorLogger};
pub use payment_error::{PaymentError, ProviderError, TransportFailure};
