use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::i18n::Locale;

/// Estados de uma corrida.
///
/// Só `Requested` é alcançável na criação; as transições para os demais
/// estados ficam a cargo do fluxo de despacho.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    Requested,
    Accepted,
    Started,
    Finished,
}

impl RideStatus {
    pub const ALL: [RideStatus; 4] = [
        RideStatus::Requested,
        RideStatus::Accepted,
        RideStatus::Started,
        RideStatus::Finished,
    ];

    /// Rótulo de exibição no idioma informado.
    pub fn label(self, locale: Locale) -> &'static str {
        let messages = locale.messages();
        match self {
            RideStatus::Requested => messages.requested,
            RideStatus::Accepted => messages.accepted,
            RideStatus::Started => messages.started,
            RideStatus::Finished => messages.finished,
        }
    }

    /// Uma corrida ativa ainda aguarda motorista.
    pub fn is_active(self) -> bool {
        self == RideStatus::Requested
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RideStatus::Requested => write!(f, "REQUESTED"),
            RideStatus::Accepted => write!(f, "ACCEPTED"),
            RideStatus::Started => write!(f, "STARTED"),
            RideStatus::Finished => write!(f, "FINISHED"),
        }
    }
}

/// Ponto de origem informado na solicitação.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    pub ride_id: Uuid,
    pub passenger_id: Uuid,
    pub status: RideStatus,
    pub from: Coordinates,
    pub requested_at: DateTime<Utc>,
}

impl Ride {
    /// Nova corrida no estado `Requested`.
    pub fn request(passenger_id: Uuid, from: Coordinates) -> Self {
        Self {
            ride_id: Uuid::new_v4(),
            passenger_id,
            status: RideStatus::Requested,
            from,
            requested_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRideInput {
    pub passenger_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRideOutput {
    pub ride_id: Uuid,
}
