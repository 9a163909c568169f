use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

use crate::modules::payments::errors::{PaymentError, PaymentErrorKind};
use crate::modules::payments::models::{BankTransferRequest, PaymentRequest};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").expect("valid reference pattern")
});

static ACCOUNT_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8,17}$").expect("valid account number pattern"));

/// Pre-flight checks for a payment, in order: amount, currency, email,
/// booking id. Returns the first violation, or `None` when valid.
pub fn validate_payment_request(request: &PaymentRequest) -> Option<PaymentError> {
    if request.amount <= Decimal::ZERO {
        return Some(PaymentError::new(
            PaymentErrorKind::InvalidAmount,
            "INVALID_AMOUNT",
            format!("Amount must be greater than zero, got {}", request.amount),
        ));
    }

    if request.currency.trim().is_empty() {
        return Some(PaymentError::new(
            PaymentErrorKind::InvalidCurrency,
            "INVALID_CURRENCY",
            "Currency is required",
        ));
    }

    if !EMAIL_PATTERN.is_match(&request.student_email) {
        return Some(PaymentError::new(
            PaymentErrorKind::InvalidEmail,
            "INVALID_EMAIL",
            format!("Invalid student email: {:?}", request.student_email),
        ));
    }

    if request.booking_id.trim().is_empty() {
        return Some(PaymentError::new(
            PaymentErrorKind::MissingRequiredFields,
            "MISSING_BOOKING_ID",
            "Booking ID is required",
        ));
    }

    None
}

/// A reference must be present and made of letters, digits, `_`, `.` and
/// `-`, starting with a letter or digit
pub fn validate_reference(reference: &str) -> Option<PaymentError> {
    if reference.trim().is_empty() {
        return Some(PaymentError::new(
            PaymentErrorKind::InvalidReference,
            "MISSING_REFERENCE",
            "Payment reference is required",
        ));
    }

    if !REFERENCE_PATTERN.is_match(reference) {
        return Some(PaymentError::new(
            PaymentErrorKind::InvalidReference,
            "INVALID_REFERENCE_FORMAT",
            format!("Invalid payment reference: {:?}", reference),
        ));
    }

    None
}

/// Pre-flight checks for a bank transfer, in order: amount, source account
/// number, destination account number
pub fn validate_bank_transfer_request(request: &BankTransferRequest) -> Option<PaymentError> {
    if request.amount <= Decimal::ZERO {
        return Some(PaymentError::new(
            PaymentErrorKind::InvalidAmount,
            "INVALID_AMOUNT",
            format!("Transfer amount must be greater than zero, got {}", request.amount),
        ));
    }

    let accounts = [
        ("source", &request.source_account.account_number),
        ("destination", &request.destination_account.account_number),
    ];

    accounts
        .into_iter()
        .find(|(_, number)| !ACCOUNT_NUMBER_PATTERN.is_match(number))
        .map(|(side, _)| {
            PaymentError::new(
                PaymentErrorKind::BankAccountInvalid,
                "INVALID_ACCOUNT_NUMBER",
                format!("Invalid {} account number: expected 8-17 digits", side),
            )
        })
}
