use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use uuid::Uuid;

use crate::modules::payments::errors::ProviderError;
use crate::modules::payments::models::BankTransferRequest;

/// Moves money between two bank accounts and returns a transfer reference
#[async_trait]
pub trait BankTransferProcessor: Send + Sync {
    async fn transfer(&self, request: &BankTransferRequest) -> Result<String, ProviderError>;
}

/// Stand-in for a real bank integration: waits, then fails at a fixed rate
#[derive(Debug, Clone)]
pub struct SimulatedBankTransfer {
    delay: Duration,
    failure_rate: f64,
}

impl SimulatedBankTransfer {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);
    pub const DEFAULT_FAILURE_RATE: f64 = 0.05;

    /// `failure_rate` is clamped to `0.0..=1.0`
    pub fn new(delay: Duration, failure_rate: f64) -> Self {
        Self {
            delay,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

impl Default for SimulatedBankTransfer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY, Self::DEFAULT_FAILURE_RATE)
    }
}

#[async_trait]
impl BankTransferProcessor for SimulatedBankTransfer {
    async fn transfer(&self, request: &BankTransferRequest) -> Result<String, ProviderError> {
        sleep(self.delay).await;

        let failed = rand::thread_rng().gen_bool(self.failure_rate);
        if failed {
            return Err(ProviderError::Simulated(format!(
                "bank rejected transfer of {} {} from account {}",
                request.amount, request.currency, request.source_account.id
            )));
        }

        let suffix = Uuid::new_v4().simple().to_string();
        Ok(format!(
            "BT_{}_{}",
            Utc::now().timestamp_millis(),
            suffix[..9].to_uppercase()
        ))
    }
}
