use serde::{Deserialize, Serialize};
use std::fmt;

/// How bad a payment failure is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Grouping of error kinds, used for HTTP status mapping and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Authentication,
    Validation,
    Gateway,
    Bank,
    Webhook,
    Database,
    Network,
    RateLimit,
    Security,
    Generic,
}

/// Fixed policy attached to every error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    /// Message safe to show to a student; never contains provider text
    pub user_message: &'static str,
    pub retryable: bool,
    pub severity: Severity,
}

impl ErrorPolicy {
    const fn new(user_message: &'static str, retryable: bool, severity: Severity) -> Self {
        Self {
            user_message,
            retryable,
            severity,
        }
    }
}

/// Closed taxonomy of payment failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentErrorKind {
    // Authentication
    InvalidApiKey,
    UnauthorizedAccess,
    TokenExpired,

    // Validation
    InvalidAmount,
    InvalidCurrency,
    InvalidEmail,
    InvalidReference,
    MissingRequiredFields,

    // Gateway / provider
    GatewayError,
    GatewayTimeout,
    GatewayUnavailable,
    PaymentDeclined,
    InsufficientFunds,
    CardDeclined,
    CardExpired,
    DuplicateTransaction,
    NotImplemented,

    // Bank integration
    BankAccountInvalid,
    BankAccountNotVerified,
    BankTransactionFailed,
    BankInsufficientFunds,
    BankRoutingInvalid,
    BankServiceUnavailable,

    // Webhooks
    WebhookSignatureInvalid,
    WebhookProcessingFailed,
    WebhookTimeout,

    // Database
    DatabaseError,
    DatabaseConnectionFailed,
    RecordNotFound,
    DuplicateRecord,

    // Network
    NetworkError,
    ConnectionRefused,
    TimeoutError,
    DnsResolutionFailed,

    // Rate limiting
    RateLimitExceeded,
    TooManyRequests,

    // Security / fraud
    FraudDetected,
    SuspiciousActivity,
    SecurityViolation,

    // Catch-all
    UnknownError,
    InternalServerError,
    ServiceUnavailable,
}

impl PaymentErrorKind {
    /// Every kind, in declaration order
    pub const ALL: [PaymentErrorKind; 42] = [
        PaymentErrorKind::InvalidApiKey,
        PaymentErrorKind::UnauthorizedAccess,
        PaymentErrorKind::TokenExpired,
        PaymentErrorKind::InvalidAmount,
        PaymentErrorKind::InvalidCurrency,
        PaymentErrorKind::InvalidEmail,
        PaymentErrorKind::InvalidReference,
        PaymentErrorKind::MissingRequiredFields,
        PaymentErrorKind::GatewayError,
        PaymentErrorKind::GatewayTimeout,
        PaymentErrorKind::GatewayUnavailable,
        PaymentErrorKind::PaymentDeclined,
        PaymentErrorKind::InsufficientFunds,
        PaymentErrorKind::CardDeclined,
        PaymentErrorKind::CardExpired,
        PaymentErrorKind::DuplicateTransaction,
        PaymentErrorKind::NotImplemented,
        PaymentErrorKind::BankAccountInvalid,
        PaymentErrorKind::BankAccountNotVerified,
        PaymentErrorKind::BankTransactionFailed,
        PaymentErrorKind::BankInsufficientFunds,
        PaymentErrorKind::BankRoutingInvalid,
        PaymentErrorKind::BankServiceUnavailable,
        PaymentErrorKind::WebhookSignatureInvalid,
        PaymentErrorKind::WebhookProcessingFailed,
        PaymentErrorKind::WebhookTimeout,
        PaymentErrorKind::DatabaseError,
        PaymentErrorKind::DatabaseConnectionFailed,
        PaymentErrorKind::RecordNotFound,
        PaymentErrorKind::DuplicateRecord,
        PaymentErrorKind::NetworkError,
        PaymentErrorKind::ConnectionRefused,
        PaymentErrorKind::TimeoutError,
        PaymentErrorKind::DnsResolutionFailed,
        PaymentErrorKind::RateLimitExceeded,
        PaymentErrorKind::TooManyRequests,
        PaymentErrorKind::FraudDetected,
        PaymentErrorKind::SuspiciousActivity,
        PaymentErrorKind::SecurityViolation,
        PaymentErrorKind::UnknownError,
        PaymentErrorKind::InternalServerError,
        PaymentErrorKind::ServiceUnavailable,
    ];

    /// Policy for this kind. The match is exhaustive, so adding a kind
    /// without a policy does not compile.
    pub const fn policy(self) -> ErrorPolicy {
        use PaymentErrorKind::*;
        use Severity::*;

        match self {
            InvalidApiKey => ErrorPolicy::new(
                "Payment service configuration error. Please contact support.",
                false,
                Critical,
            ),
            UnauthorizedAccess => ErrorPolicy::new(
                "You are not authorized to perform this action.",
                false,
                High,
            ),
            TokenExpired => ErrorPolicy::new(
                "Your session has expired. Please sign in again.",
                false,
                Medium,
            ),

            InvalidAmount => ErrorPolicy::new("Please enter a valid payment amount.", false, Low),
            InvalidCurrency => {
                ErrorPolicy::new("The selected currency is not supported.", false, Low)
            }
            InvalidEmail => ErrorPolicy::new("Please provide a valid email address.", false, Low),
            InvalidReference => ErrorPolicy::new(
                "The payment reference is invalid or missing.",
                false,
                Low,
            ),
            MissingRequiredFields => ErrorPolicy::new(
                "Some required payment details are missing.",
                false,
                Low,
            ),

            GatewayError => ErrorPolicy::new(
                "The payment provider encountered an error. Please try again.",
                true,
                High,
            ),
            GatewayTimeout => ErrorPolicy::new(
                "The payment provider took too long to respond. Please try again.",
                true,
                Medium,
            ),
            GatewayUnavailable => ErrorPolicy::new(
                "This payment method is currently unavailable. Please choose another.",
                false,
                High,
            ),
            PaymentDeclined => ErrorPolicy::new(
                "Your payment was declined. Please try a different payment method.",
                false,
                Medium,
            ),
            InsufficientFunds => ErrorPolicy::new(
                "Insufficient funds. Please check your balance and try again.",
                false,
                Low,
            ),
            CardDeclined => ErrorPolicy::new(
                "Your card was declined. Please use a different card.",
                false,
                Medium,
            ),
            CardExpired => ErrorPolicy::new(
                "Your card has expired. Please use a different card.",
                false,
                Low,
            ),
            DuplicateTransaction => ErrorPolicy::new(
                "This payment has already been processed.",
                false,
                Medium,
            ),
            NotImplemented => ErrorPolicy::new(
                "This payment method is not supported yet.",
                false,
                Medium,
            ),

            BankAccountInvalid => ErrorPolicy::new(
                "The bank account details provided are invalid.",
                false,
                Medium,
            ),
            BankAccountNotVerified => ErrorPolicy::new(
                "Please verify your bank account before making transfers.",
                false,
                Medium,
            ),
            BankTransactionFailed => ErrorPolicy::new(
                "The bank transfer could not be completed. Please try again.",
                true,
                High,
            ),
            BankInsufficientFunds => ErrorPolicy::new(
                "Insufficient funds in the source account.",
                false,
                Low,
            ),
            BankRoutingInvalid => {
                ErrorPolicy::new("The bank routing number is invalid.", false, Medium)
            }
            BankServiceUnavailable => ErrorPolicy::new(
                "Bank transfers are temporarily unavailable. Please try again later.",
                true,
                High,
            ),

            WebhookSignatureInvalid => ErrorPolicy::new(
                "The payment notification could not be verified.",
                false,
                Critical,
            ),
            WebhookProcessingFailed => ErrorPolicy::new(
                "The payment notification could not be processed.",
                true,
                High,
            ),
            WebhookTimeout => ErrorPolicy::new(
                "The payment notification timed out.",
                true,
                Medium,
            ),

            DatabaseError => ErrorPolicy::new(
                "We could not save your payment details. Please try again.",
                true,
                High,
            ),
            DatabaseConnectionFailed => ErrorPolicy::new(
                "Our payment system is temporarily unavailable. Please try again later.",
                true,
                Critical,
            ),
            RecordNotFound => ErrorPolicy::new(
                "The requested payment record was not found.",
                false,
                Low,
            ),
            DuplicateRecord => {
                ErrorPolicy::new("This payment record already exists.", false, Low)
            }

            NetworkError => ErrorPolicy::new(
                "A network error occurred. Please check your connection and try again.",
                true,
                Medium,
            ),
            ConnectionRefused => ErrorPolicy::new(
                "We could not reach the payment provider. Please try again shortly.",
                true,
                High,
            ),
            TimeoutError => {
                ErrorPolicy::new("The request timed out. Please try again.", true, Medium)
            }
            DnsResolutionFailed => ErrorPolicy::new(
                "We could not reach the payment provider. Please try again shortly.",
                true,
                High,
            ),

            RateLimitExceeded => ErrorPolicy::new(
                "Too many payment attempts. Please wait a moment and try again.",
                true,
                Medium,
            ),
            TooManyRequests => ErrorPolicy::new(
                "Too many requests. Please slow down and try again.",
                true,
                Low,
            ),

            FraudDetected => ErrorPolicy::new(
                "This transaction was flagged for review. Please contact support.",
                false,
                Critical,
            ),
            SuspiciousActivity => ErrorPolicy::new(
                "Unusual activity was detected on this payment. Please contact support.",
                false,
                High,
            ),
            SecurityViolation => ErrorPolicy::new(
                "A security check failed. Please contact support.",
                false,
                Critical,
            ),

            UnknownError => ErrorPolicy::new(
                "An unexpected error occurred. Please try again.",
                true,
                Medium,
            ),
            InternalServerError => ErrorPolicy::new(
                "The payment service encountered an internal error. Please try again later.",
                true,
                High,
            ),
            ServiceUnavailable => ErrorPolicy::new(
                "The payment service is temporarily unavailable. Please try again later.",
                true,
                High,
            ),
        }
    }

    pub const fn category(self) -> ErrorCategory {
        use PaymentErrorKind::*;

        match self {
            InvalidApiKey | UnauthorizedAccess | TokenExpired => ErrorCategory::Authentication,
            InvalidAmount | InvalidCurrency | InvalidEmail | InvalidReference
            | MissingRequiredFields => ErrorCategory::Validation,
            GatewayError | GatewayTimeout | GatewayUnavailable | PaymentDeclined
            | InsufficientFunds | CardDeclined | CardExpired | DuplicateTransaction
            | NotImplemented => ErrorCategory::Gateway,
            BankAccountInvalid | BankAccountNotVerified | BankTransactionFailed
            | BankInsufficientFunds | BankRoutingInvalid | BankServiceUnavailable => {
                ErrorCategory::Bank
            }
            WebhookSignatureInvalid | WebhookProcessingFailed | WebhookTimeout => {
                ErrorCategory::Webhook
            }
            DatabaseError | DatabaseConnectionFailed | RecordNotFound | DuplicateRecord => {
                ErrorCategory::Database
            }
            NetworkError | ConnectionRefused | TimeoutError | DnsResolutionFailed => {
                ErrorCategory::Network
            }
            RateLimitExceeded | TooManyRequests => ErrorCategory::RateLimit,
            FraudDetected | SuspiciousActivity | SecurityViolation => ErrorCategory::Security,
            UnknownError | InternalServerError | ServiceUnavailable => ErrorCategory::Generic,
        }
    }

    /// Stable tag, identical to the serialized form
    pub const fn as_str(self) -> &'static str {
        use PaymentErrorKind::*;

        match self {
            InvalidApiKey => "INVALID_API_KEY",
            UnauthorizedAccess => "UNAUTHORIZED_ACCESS",
            TokenExpired => "TOKEN_EXPIRED",
            InvalidAmount => "INVALID_AMOUNT",
            InvalidCurrency => "INVALID_CURRENCY",
            InvalidEmail => "INVALID_EMAIL",
            InvalidReference => "INVALID_REFERENCE",
            MissingRequiredFields => "MISSING_REQUIRED_FIELDS",
            GatewayError => "GATEWAY_ERROR",
            GatewayTimeout => "GATEWAY_TIMEOUT",
            GatewayUnavailable => "GATEWAY_UNAVAILABLE",
            PaymentDeclined => "PAYMENT_DECLINED",
            InsufficientFunds => "INSUFFICIENT_FUNDS",
            CardDeclined => "CARD_DECLINED",
            CardExpired => "CARD_EXPIRED",
            DuplicateTransaction => "DUPLICATE_TRANSACTION",
            NotImplemented => "NOT_IMPLEMENTED",
            BankAccountInvalid => "BANK_ACCOUNT_INVALID",
            BankAccountNotVerified => "BANK_ACCOUNT_NOT_VERIFIED",
            BankTransactionFailed => "BANK_TRANSACTION_FAILED",
            BankInsufficientFunds => "BANK_INSUFFICIENT_FUNDS",
            BankRoutingInvalid => "BANK_ROUTING_INVALID",
            BankServiceUnavailable => "BANK_SERVICE_UNAVAILABLE",
            WebhookSignatureInvalid => "WEBHOOK_SIGNATURE_INVALID",
            WebhookProcessingFailed => "WEBHOOK_PROCESSING_FAILED",
            WebhookTimeout => "WEBHOOK_TIMEOUT",
            DatabaseError => "DATABASE_ERROR",
            DatabaseConnectionFailed => "DATABASE_CONNECTION_FAILED",
            RecordNotFound => "RECORD_NOT_FOUND",
            DuplicateRecord => "DUPLICATE_RECORD",
            NetworkError => "NETWORK_ERROR",
            ConnectionRefused => "CONNECTION_REFUSED",
            TimeoutError => "TIMEOUT_ERROR",
            DnsResolutionFailed => "DNS_RESOLUTION_FAILED",
            RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            TooManyRequests => "TOO_MANY_REQUESTS",
            FraudDetected => "FRAUD_DETECTED",
            SuspiciousActivity => "SUSPICIOUS_ACTIVITY",
            SecurityViolation => "SECURITY_VIOLATION",
            UnknownError => "UNKNOWN_ERROR",
            InternalServerError => "INTERNAL_SERVER_ERROR",
            ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for PaymentErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
