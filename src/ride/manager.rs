use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use super::entity::{Coordinates, RequestRideInput, RequestRideOutput, Ride};
use crate::error::{Constraint, RideError, StoreError};
use crate::store::{DataStore, bounded};

/// Cria corridas respeitando o limite de uma corrida ativa por passageiro.
///
/// A consulta prévia evita uma escrita inútil no caso comum; quem garante o
/// invariante sob concorrência é a restrição de unicidade do armazenamento.
#[derive(Clone)]
pub struct RideLifecycleManager {
    store: Arc<dyn DataStore>,
    store_timeout: Duration,
}

impl RideLifecycleManager {
    pub fn new(store: Arc<dyn DataStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    /// Solicita uma corrida para o passageiro.
    ///
    /// Falha com [`RideError::DuplicateActiveRide`] se o passageiro já tiver
    /// uma corrida `REQUESTED`, inclusive quando a outra solicitação vence a
    /// corrida entre a consulta e a inserção. Uma falha na consulta é
    /// devolvida como erro de armazenamento.
    pub async fn create_request_ride(
        &self,
        input: RequestRideInput,
    ) -> Result<RequestRideOutput, RideError> {
        let ride = Ride::request(
            input.passenger_id,
            Coordinates {
                latitude: input.latitude,
                longitude: input.longitude,
            },
        );
        self.submit(&ride).await
    }

    /// Grava uma corrida já montada.
    ///
    /// Pode ser repetida com a mesma corrida: se a corrida ativa do passageiro
    /// já é esta (uma tentativa anterior gravou antes de estourar o timeout),
    /// o resultado é sucesso e nada é gravado de novo.
    pub async fn submit(&self, ride: &Ride) -> Result<RequestRideOutput, RideError> {
        let passenger_id = ride.passenger_id;
        let output = RequestRideOutput {
            ride_id: ride.ride_id,
        };

        match self.active_ride(passenger_id).await? {
            Some(active) if active.ride_id == ride.ride_id => {
                info!(ride_id = %ride.ride_id, %passenger_id, "ride request already stored");
                return Ok(output);
            }
            Some(active) => {
                warn!(%passenger_id, active_ride_id = %active.ride_id, "ride request rejected: ride in progress");
                return Err(RideError::DuplicateActiveRide { passenger_id });
            }
            None => {}
        }

        match bounded(self.store_timeout, self.store.insert_ride(ride)).await {
            Ok(()) => {}
            Err(StoreError::UniqueViolation {
                constraint: Constraint::ActiveRidePerPassenger,
            }) => {
                let active = self.active_ride(passenger_id).await?;
                if active.is_some_and(|active| active.ride_id == ride.ride_id) {
                    return Ok(output);
                }
                warn!(%passenger_id, "ride request lost a race on the active ride constraint");
                return Err(RideError::DuplicateActiveRide { passenger_id });
            }
            Err(err) => return Err(err.into()),
        }

        info!(ride_id = %ride.ride_id, %passenger_id, "ride requested");
        Ok(output)
    }

    async fn active_ride(&self, passenger_id: Uuid) -> Result<Option<Ride>, StoreError> {
        bounded(
            self.store_timeout,
            self.store.find_active_ride_for_passenger(passenger_id),
        )
        .await
    }

    /// Busca uma corrida. Identificadores que não são UUID não existem.
    pub async fn get_ride(&self, ride_id: &str) -> Result<Option<Ride>, RideError> {
        let Ok(ride_id) = Uuid::parse_str(ride_id.trim()) else {
            return Ok(None);
        };
        let ride = bounded(self.store_timeout, self.store.find_ride_by_id(ride_id)).await?;
        Ok(ride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::retry::RetryPolicy;
    use crate::ride::RideStatus;
    use crate::store::{MemoryStore, MockDataStore};

    fn request(passenger_id: Uuid) -> RequestRideInput {
        RequestRideInput {
            passenger_id,
            latitude: -23.563099,
            longitude: -46.656571,
        }
    }

    fn manager() -> RideLifecycleManager {
        RideLifecycleManager::new(Arc::new(MemoryStore::new()), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn requests_a_ride() {
        let manager = manager();
        let passenger_id = Uuid::new_v4();
        let output = manager.create_request_ride(request(passenger_id)).await.unwrap();

        let ride = manager
            .get_ride(&output.ride_id.to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ride.ride_id, output.ride_id);
        assert_eq!(ride.passenger_id, passenger_id);
        assert_eq!(ride.status, RideStatus::Requested);
        assert_eq!(ride.from.latitude, -23.563099);
    }

    #[tokio::test]
    async fn second_request_for_same_passenger_fails() {
        let manager = manager();
        let passenger_id = Uuid::new_v4();
        manager.create_request_ride(request(passenger_id)).await.unwrap();

        let err = manager
            .create_request_ride(request(passenger_id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RideError::DuplicateActiveRide { passenger_id: id } if id == passenger_id
        ));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn different_passengers_do_not_conflict() {
        let manager = manager();
        manager.create_request_ride(request(Uuid::new_v4())).await.unwrap();
        manager.create_request_ride(request(Uuid::new_v4())).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_ride_is_none() {
        let manager = manager();
        assert!(manager.get_ride("nope").await.unwrap().is_none());
        let unknown = Uuid::new_v4().to_string();
        assert!(manager.get_ride(&unknown).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn active_ride_found_means_no_write() {
        let passenger_id = Uuid::new_v4();
        let mut store = MockDataStore::new();
        store
            .expect_find_active_ride_for_passenger()
            .times(1)
            .returning(|id| {
                Ok(Some(Ride::request(
                    id,
                    Coordinates {
                        latitude: 0.0,
                        longitude: 0.0,
                    },
                )))
            });
        store.expect_insert_ride().never();
        let manager = RideLifecycleManager::new(Arc::new(store), Duration::from_secs(1));

        let err = manager
            .create_request_ride(request(passenger_id))
            .await
            .unwrap_err();
        assert!(matches!(err, RideError::DuplicateActiveRide { .. }));
    }

    #[tokio::test]
    async fn lost_race_is_reported_as_duplicate() {
        let mut store = MockDataStore::new();
        store
            .expect_find_active_ride_for_passenger()
            .returning(|_| Ok(None));
        store.expect_insert_ride().returning(|_| {
            Err(StoreError::UniqueViolation {
                constraint: Constraint::ActiveRidePerPassenger,
            })
        });
        let manager = RideLifecycleManager::new(Arc::new(store), Duration::from_secs(1));

        let err = manager
            .create_request_ride(request(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, RideError::DuplicateActiveRide { .. }));
    }

    #[tokio::test]
    async fn failed_active_ride_check_is_a_store_error() {
        let mut store = MockDataStore::new();
        store
            .expect_find_active_ride_for_passenger()
            .returning(|_| Err(StoreError::Io(std::io::Error::other("connection refused"))));
        store.expect_insert_ride().never();
        let manager = RideLifecycleManager::new(Arc::new(store), Duration::from_secs(1));

        let err = manager
            .create_request_ride(request(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
        assert!(err.is_retryable());
    }

    struct SlowStore;

    #[async_trait::async_trait]
    impl DataStore for SlowStore {
        async fn find_account_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<crate::account::Account>, StoreError> {
            Ok(None)
        }

        async fn insert_account(&self, _account: &crate::account::Account) -> Result<(), StoreError> {
            Ok(())
        }

        async fn find_account_by_id(
            &self,
            _account_id: Uuid,
        ) -> Result<Option<crate::account::Account>, StoreError> {
            Ok(None)
        }

        async fn find_active_ride_for_passenger(
            &self,
            _passenger_id: Uuid,
        ) -> Result<Option<Ride>, StoreError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn insert_ride(&self, _ride: &Ride) -> Result<(), StoreError> {
            Ok(())
        }

        async fn find_ride_by_id(&self, _ride_id: Uuid) -> Result<Option<Ride>, StoreError> {
            Ok(None)
        }
    }

    /// Grava de verdade, mas só responde bem depois do timeout.
    struct LateAckStore {
        inner: MemoryStore,
    }

    #[async_trait::async_trait]
    impl DataStore for LateAckStore {
        async fn find_account_by_email(
            &self,
            email: &str,
        ) -> Result<Option<crate::account::Account>, StoreError> {
            self.inner.find_account_by_email(email).await
        }

        async fn insert_account(&self, account: &crate::account::Account) -> Result<(), StoreError> {
            self.inner.insert_account(account).await
        }

        async fn find_account_by_id(
            &self,
            account_id: Uuid,
        ) -> Result<Option<crate::account::Account>, StoreError> {
            self.inner.find_account_by_id(account_id).await
        }

        async fn find_active_ride_for_passenger(
            &self,
            passenger_id: Uuid,
        ) -> Result<Option<Ride>, StoreError> {
            self.inner.find_active_ride_for_passenger(passenger_id).await
        }

        async fn insert_ride(&self, ride: &Ride) -> Result<(), StoreError> {
            self.inner.insert_ride(ride).await?;
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        }

        async fn find_ride_by_id(&self, ride_id: Uuid) -> Result<Option<Ride>, StoreError> {
            self.inner.find_ride_by_id(ride_id).await
        }
    }

    #[tokio::test]
    async fn retry_after_timed_out_insert_that_landed_succeeds() {
        let store = Arc::new(LateAckStore {
            inner: MemoryStore::new(),
        });
        let manager = RideLifecycleManager::new(store.clone(), Duration::from_millis(20));
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay_ms: 1,
        };
        let passenger_id = Uuid::new_v4();
        let ride = Ride::request(
            passenger_id,
            Coordinates {
                latitude: -23.563099,
                longitude: -46.656571,
            },
        );

        let output = policy
            .run("request ride", || manager.submit(&ride))
            .await
            .unwrap();

        assert_eq!(output.ride_id, ride.ride_id);
        assert_eq!(store.inner.count_active_rides(passenger_id).await, 1);
    }

    #[tokio::test]
    async fn submitting_the_same_ride_twice_is_idempotent() {
        let manager = manager();
        let ride = Ride::request(
            Uuid::new_v4(),
            Coordinates {
                latitude: 0.0,
                longitude: 0.0,
            },
        );
        let first = manager.submit(&ride).await.unwrap();
        let second = manager.submit(&ride).await.unwrap();
        assert_eq!(first.ride_id, second.ride_id);

        let other = Ride::request(ride.passenger_id, ride.from);
        let err = manager.submit(&other).await.unwrap_err();
        assert!(matches!(err, RideError::DuplicateActiveRide { .. }));
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let manager = RideLifecycleManager::new(Arc::new(SlowStore), Duration::from_millis(20));
        let err = manager
            .create_request_ride(request(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RideError::Store(StoreError::Timeout { timeout_ms: 20 })
        ));
    }
}
