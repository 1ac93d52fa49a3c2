use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::DataStore;
use crate::account::Account;
use crate::error::{Constraint, StoreError};
use crate::ride::Ride;

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    rides: HashMap<Uuid, Ride>,
}

/// Armazenamento em memória, compartilhável entre tarefas via `Arc`.
///
/// As restrições de unicidade são verificadas sob o mesmo lock de escrita
/// que faz a inserção.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantidade de corridas `REQUESTED` do passageiro.
    pub async fn count_active_rides(&self, passenger_id: Uuid) -> usize {
        self.tables
            .read()
            .await
            .rides
            .values()
            .filter(|ride| ride.passenger_id == passenger_id && ride.status.is_active())
            .count()
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::UniqueViolation {
                constraint: Constraint::AccountEmail,
            });
        }
        tables.accounts.insert(account.account_id, account.clone());
        debug!(account_id = %account.account_id, "account stored in memory");
        Ok(())
    }

    async fn find_account_by_id(&self, account_id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.tables.read().await.accounts.get(&account_id).cloned())
    }

    async fn find_active_ride_for_passenger(
        &self,
        passenger_id: Uuid,
    ) -> Result<Option<Ride>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .rides
            .values()
            .find(|ride| ride.passenger_id == passenger_id && ride.status.is_active())
            .cloned())
    }

    async fn insert_ride(&self, ride: &Ride) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let conflict = ride.status.is_active()
            && tables
                .rides
                .values()
                .any(|r| r.passenger_id == ride.passenger_id && r.status.is_active());
        if conflict {
            return Err(StoreError::UniqueViolation {
                constraint: Constraint::ActiveRidePerPassenger,
            });
        }
        tables.rides.insert(ride.ride_id, ride.clone());
        debug!(ride_id = %ride.ride_id, passenger_id = %ride.passenger_id, "ride stored in memory");
        Ok(())
    }

    async fn find_ride_by_id(&self, ride_id: Uuid) -> Result<Option<Ride>, StoreError> {
        Ok(self.tables.read().await.rides.get(&ride_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::SignupInput;
    use crate::ride::Coordinates;

    fn account(email: &str) -> Account {
        Account::new(SignupInput {
            name: "John Doe".into(),
            email: email.into(),
            cpf: Some("97456321558".into()),
            is_passenger: true,
            ..Default::default()
        })
    }

    fn origin() -> Coordinates {
        Coordinates {
            latitude: -23.563099,
            longitude: -46.656571,
        }
    }

    #[tokio::test]
    async fn stores_and_finds_accounts() {
        let store = MemoryStore::new();
        let account = account("john@doe.com");
        store.insert_account(&account).await.unwrap();

        let by_email = store.find_account_by_email("john@doe.com").await.unwrap();
        assert_eq!(by_email.as_ref(), Some(&account));
        let by_id = store.find_account_by_id(account.account_id).await.unwrap();
        assert_eq!(by_id, Some(account));
        assert!(store.find_account_by_email("x@y.z").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = MemoryStore::new();
        store.insert_account(&account("john@doe.com")).await.unwrap();
        let err = store
            .insert_account(&account("john@doe.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation {
                constraint: Constraint::AccountEmail
            }
        ));
    }

    #[tokio::test]
    async fn rejects_second_active_ride() {
        let store = MemoryStore::new();
        let passenger_id = Uuid::new_v4();
        let first = Ride::request(passenger_id, origin());
        store.insert_ride(&first).await.unwrap();

        let err = store
            .insert_ride(&Ride::request(passenger_id, origin()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation {
                constraint: Constraint::ActiveRidePerPassenger
            }
        ));
        assert_eq!(store.count_active_rides(passenger_id).await, 1);
        let active = store.find_active_ride_for_passenger(passenger_id).await.unwrap();
        assert_eq!(active.map(|r| r.ride_id), Some(first.ride_id));
    }

    #[tokio::test]
    async fn other_passengers_are_independent() {
        let store = MemoryStore::new();
        store
            .insert_ride(&Ride::request(Uuid::new_v4(), origin()))
            .await
            .unwrap();
        store
            .insert_ride(&Ride::request(Uuid::new_v4(), origin()))
            .await
            .unwrap();
    }
}
