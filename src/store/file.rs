//! Armazenamento em um documento JSON no disco.
//!
//! Cada operação carrega o documento, aplica a alteração e grava num arquivo
//! temporário exclusivo seguido de `persist` (rename atômico). Carga,
//! alteração e gravação rodam numa única tarefa bloqueante que segura o mutex
//! do início ao fim: se quem aguarda a operação desistir (timeout), a tarefa
//! termina com o lock e nenhuma outra operação intercala. Acessos de outros
//! processos ao mesmo arquivo não são coordenados.

use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

use super::DataStore;
use crate::account::Account;
use crate::error::{Constraint, StoreError};
use crate::ride::Ride;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    rides: Vec<Ride>,
}

impl Document {
    fn active_ride(&self, passenger_id: Uuid) -> Option<&Ride> {
        self.rides
            .iter()
            .find(|ride| ride.passenger_id == passenger_id && ride.status.is_active())
    }

    fn load(path: &Path) -> Result<Self, StoreError> {
        match std::fs::read(path) {
            Ok(bytes) if bytes.is_empty() => Ok(Self::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == IoErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, path: &Path) -> Result<(), StoreError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, self)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Executa `op` sobre o documento sob o lock, numa tarefa bloqueante.
    /// Com `save = true` o documento é gravado quando `op` tem sucesso.
    async fn with_document<T, F>(&self, save: bool, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Document) -> Result<T, StoreError> + Send + 'static,
    {
        let path = Arc::clone(&self.path);
        let lock = Arc::clone(&self.lock);
        tokio::task::spawn_blocking(move || {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            let mut document = Document::load(&path)?;
            let value = op(&mut document)?;
            if save {
                document.save(&path)?;
            }
            Ok(value)
        })
        .await
        .map_err(|join_error| StoreError::Io(std::io::Error::other(join_error)))?
    }
}

#[async_trait]
impl DataStore for JsonFileStore {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let email = email.to_owned();
        self.with_document(false, move |document| {
            Ok(document.accounts.iter().find(|a| a.email == email).cloned())
        })
        .await
    }

    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        let account = account.clone();
        let account_id = account.account_id;
        self.with_document(true, move |document| {
            if document.accounts.iter().any(|a| a.email == account.email) {
                return Err(StoreError::UniqueViolation {
                    constraint: Constraint::AccountEmail,
                });
            }
            document.accounts.push(account);
            Ok(())
        })
        .await?;
        debug!(%account_id, path = %self.path.display(), "account written");
        Ok(())
    }

    async fn find_account_by_id(&self, account_id: Uuid) -> Result<Option<Account>, StoreError> {
        self.with_document(false, move |document| {
            Ok(document
                .accounts
                .iter()
                .find(|a| a.account_id == account_id)
                .cloned())
        })
        .await
    }

    async fn find_active_ride_for_passenger(
        &self,
        passenger_id: Uuid,
    ) -> Result<Option<Ride>, StoreError> {
        self.with_document(false, move |document| {
            Ok(document.active_ride(passenger_id).cloned())
        })
        .await
    }

    async fn insert_ride(&self, ride: &Ride) -> Result<(), StoreError> {
        let ride = ride.clone();
        let ride_id = ride.ride_id;
        self.with_document(true, move |document| {
            if ride.status.is_active() && document.active_ride(ride.passenger_id).is_some() {
                return Err(StoreError::UniqueViolation {
                    constraint: Constraint::ActiveRidePerPassenger,
                });
            }
            document.rides.push(ride);
            Ok(())
        })
        .await?;
        debug!(%ride_id, path = %self.path.display(), "ride written");
        Ok(())
    }

    async fn find_ride_by_id(&self, ride_id: Uuid) -> Result<Option<Ride>, StoreError> {
        self.with_document(false, move |document| {
            Ok(document.rides.iter().find(|r| r.ride_id == ride_id).cloned())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::SignupInput;
    use crate::ride::Coordinates;
    use crate::store::bounded;
    use std::time::Duration;
    use tempfile::TempDir;

    fn origin() -> Coordinates {
        Coordinates {
            latitude: -23.563099,
            longitude: -46.656571,
        }
    }

    fn account(email: &str) -> Account {
        Account::new(SignupInput {
            name: "John Doe".into(),
            email: email.into(),
            cpf: Some("97456321558".into()),
            is_passenger: true,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        assert!(store.find_account_by_email("a@b").await.unwrap().is_none());
        assert!(store.find_ride_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn data_survives_a_new_store_instance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data.json");
        let account = account("john@doe.com");
        let ride = Ride::request(account.account_id, origin());
        {
            let store = JsonFileStore::new(&path);
            store.insert_account(&account).await.unwrap();
            store.insert_ride(&ride).await.unwrap();
        }

        let reopened = JsonFileStore::new(&path);
        let found = reopened.find_account_by_id(account.account_id).await.unwrap();
        assert_eq!(found, Some(account.clone()));
        let active = reopened
            .find_active_ride_for_passenger(account.account_id)
            .await
            .unwrap();
        assert_eq!(active, Some(ride));
    }

    #[tokio::test]
    async fn enforces_constraints() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        let passenger_id = Uuid::new_v4();
        store
            .insert_ride(&Ride::request(passenger_id, origin()))
            .await
            .unwrap();
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
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        let err = store.find_ride_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn abandoned_writes_do_not_lose_data() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        let accounts: Vec<Account> = (0..20)
            .map(|i| account(&format!("john.doe{i}@gmail.com")))
            .collect();

        // Um timeout zero abandona a escrita logo após submetê-la.
        for account in &accounts {
            let _ = bounded(Duration::ZERO, store.insert_account(account)).await;
        }

        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
        loop {
            let mut missing = 0;
            for account in &accounts {
                if store
                    .find_account_by_id(account.account_id)
                    .await
                    .unwrap()
                    .is_none()
                {
                    missing += 1;
                }
            }
            if missing == 0 {
                break;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "{missing} accounts lost"
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "only the document should remain");
    }

    #[tokio::test]
    async fn abandoned_ride_write_still_enforces_constraint() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        let passenger_id = Uuid::new_v4();
        let _ = bounded(
            Duration::ZERO,
            store.insert_ride(&Ride::request(passenger_id, origin())),
        )
        .await;
        let _ = store.insert_ride(&Ride::request(passenger_id, origin())).await;

        // A escrita abandonada pode terminar depois; espera ela sair da fila.
        tokio::time::sleep(Duration::from_millis(200)).await;
        let rides = store
            .with_document(false, |document| Ok(document.rides.len()))
            .await
            .unwrap();
        assert_eq!(rides, 1);
    }
}
