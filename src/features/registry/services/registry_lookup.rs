use async_trait::async_trait;
use std::time::Duration;

use crate::core::error::{AppError, Result};

pub const INVALID_N_NUMBER: &str = "Invalid N-Number. Please check and try again.";

/// Registry data for one aircraft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AircraftRecord {
    pub tail_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub aircraft_type: String,
}

#[async_trait]
pub trait RegistryLookup: Send + Sync {
    /// Look up an aircraft; unknown or malformed tail numbers are a `BadRequest`
    async fn lookup(&self, tail_number: &str) -> Result<AircraftRecord>;
}

/// Simulated registry: every US (`N`) registration resolves to the same
/// Cessna after a fixed delay.
pub struct StubRegistry {
    delay: Duration,
}

impl StubRegistry {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RegistryLookup for StubRegistry {
    async fn lookup(&self, tail_number: &str) -> Result<AircraftRecord> {
        let tail_number = tail_number.trim().to_uppercase();
        if tail_number.is_empty() {
            return Err(AppError::Validation("Tail number is required".to_string()));
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if !tail_number.starts_with('N') {
            tracing::debug!("Registry stub rejected tail number {}", tail_number);
            return Err(AppError::BadRequest(INVALID_N_NUMBER.to_string()));
        }

        Ok(AircraftRecord {
            tail_number,
            make: "CESSNA".to_string(),
            model: "172S".to_string(),
            year: 2012,
            aircraft_type: "Fixed wing single engine".to_string(),
        })
    }
}
