use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A student's payment for a tutoring session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Amount in major units (e.g. naira, not kobo)
    pub amount: Decimal,

    /// ISO currency code
    pub currency: String,

    /// Booking the payment settles
    pub booking_id: String,

    pub student_email: String,

    pub student_name: String,

    pub tutor_name: String,

    /// Session date as supplied by the booking, passed through as metadata
    pub session_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: String,

    /// 8 to 17 digits
    pub account_number: String,

    pub routing_number: String,

    pub bank_name: String,

    pub account_type: AccountType,

    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTransferRequest {
    pub amount: Decimal,

    pub currency: String,

    pub source_account: BankAccount,

    pub destination_account: BankAccount,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub reference: String,
}
