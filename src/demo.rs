//! Solicitações simultâneas para o mesmo passageiro, usadas pelo comando
//! `demo` para mostrar que só uma corrida fica ativa.

use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tracing::info;
use uuid::Uuid;

use crate::error::RideError;
use crate::ride::{RequestRideInput, RequestRideOutput, RideLifecycleManager};

#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Ride(#[from] RideError),

    #[error("ride request task failed: {0}")]
    Task(#[from] JoinError),
}

/// Contagem das solicitações concluídas.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub accepted: Vec<Uuid>,
    pub rejected: usize,
}

/// Dispara `concurrency` solicitações para `passenger_id`, cada uma numa tarefa.
pub fn spawn_requests(
    rides: &RideLifecycleManager,
    passenger_id: Uuid,
    concurrency: usize,
) -> JoinSet<Result<RequestRideOutput, RideError>> {
    info!(%passenger_id, concurrency, "starting concurrent ride requests");
    let mut tasks = JoinSet::new();
    for _ in 0..concurrency {
        let rides = rides.clone();
        tasks.spawn(async move {
            rides
                .create_request_ride(RequestRideInput {
                    passenger_id,
                    latitude: -23.563099,
                    longitude: -46.656571,
                })
                .await
        });
    }
    tasks
}

/// Espera todas as tarefas. Rejeições por corrida ativa são contadas; qualquer
/// outro erro, inclusive uma tarefa que entrou em pânico, encerra a contagem.
pub async fn tally(
    mut tasks: JoinSet<Result<RequestRideOutput, RideError>>,
) -> Result<Tally, DemoError> {
    let mut tally = Tally::default();
    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok(output) => tally.accepted.push(output.ride_id),
            Err(RideError::DuplicateActiveRide { .. }) => tally.rejected += 1,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(tally)
}
