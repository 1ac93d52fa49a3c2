//! Retentativa limitada de operações que falham por motivo transitório.
//!
//! Só erros com [`RideError::is_retryable`] são repetidos; erros de validação
//! e de conflito voltam imediatamente ao chamador.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::warn;

use crate::error::RideError;

/// Configuração da retentativa com backoff exponencial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Máximo de novas tentativas após a primeira.
    pub max_retries: u32,
    /// Atraso base em milissegundos.
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
        }
    }
}

impl RetryPolicy {
    /// delay = base_delay_ms * 2^(attempt - 1)
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        self.base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
    }

    /// Executa `op`, repetindo enquanto o erro for transitório e houver
    /// tentativas restantes.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, RideError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RideError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = self.delay_for_attempt(attempt);
                    warn!(
                        operation,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms,
                        error = %err,
                        "retrying after transient store failure"
                    );
                    sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
