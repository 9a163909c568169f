/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors raised while wiring the service together. Payment failures never
/// use this type; they are reported through `PaymentError` inside a
/// `PaymentResponse`.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

// Helper functions for common error scenarios
impl AppError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }
}
