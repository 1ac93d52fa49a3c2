//! Porta de armazenamento de contas e corridas.
//!
//! O núcleo só conversa com o armazenamento através de [`DataStore`].
//! Toda implementação deve garantir de forma atômica as restrições de
//! unicidade de [`Constraint`](crate::error::Constraint): email por conta e
//! uma corrida `REQUESTED` por passageiro. É essa garantia, e não a consulta
//! prévia feita pelos serviços, que mantém o invariante sob concorrência.

mod file;
mod memory;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::account::Account;
use crate::error::StoreError;
use crate::ride::Ride;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Falha com `UniqueViolation { AccountEmail }` se o email já existir.
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError>;

    async fn find_account_by_id(&self, account_id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Corrida com status `REQUESTED` do passageiro, se houver.
    async fn find_active_ride_for_passenger(
        &self,
        passenger_id: Uuid,
    ) -> Result<Option<Ride>, StoreError>;

    /// Falha com `UniqueViolation { ActiveRidePerPassenger }` se o passageiro
    /// já tiver uma corrida ativa.
    async fn insert_ride(&self, ride: &Ride) -> Result<(), StoreError>;

    async fn find_ride_by_id(&self, ride_id: Uuid) -> Result<Option<Ride>, StoreError>;
}

/// Limita a duração de uma chamada ao armazenamento.
pub async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
