//! Tipos de erro do domínio de contas e corridas.
//!
//! [`RideError`] é o resultado de falha de toda operação pública. Cada
//! variante pertence a um [`ErrorKind`], que é o que o chamador usa para
//! decidir entre corrigir a entrada, exibir o conflito ou retentar.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Erros das operações de cadastro e de solicitação de corrida.
#[derive(Debug, Error)]
pub enum RideError {
    #[error("invalid name")]
    InvalidName,

    #[error("invalid email")]
    InvalidEmail,

    #[error("invalid cpf")]
    InvalidCpf,

    #[error("invalid car plate")]
    InvalidCarPlate,

    #[error("duplicated account")]
    DuplicatedAccount,

    #[error("there is a ride in progress for passenger {passenger_id}")]
    DuplicateActiveRide { passenger_id: Uuid },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RideError {
    /// Classifica o erro para decisões de apresentação e retentativa.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RideError::InvalidName
            | RideError::InvalidEmail
            | RideError::InvalidCpf
            | RideError::InvalidCarPlate => ErrorKind::Validation,
            RideError::DuplicatedAccount | RideError::DuplicateActiveRide { .. } => {
                ErrorKind::Conflict
            }
            RideError::Store(_) => ErrorKind::Store,
        }
    }

    /// Verdadeiro apenas para falhas transitórias do armazenamento.
    pub fn is_retryable(&self) -> bool {
        match self {
            RideError::Store(err) => err.is_transient(),
            _ => false,
        }
    }
}

/// Falhas do armazenamento de dados.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("data store call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("data store I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("data store serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unique constraint `{constraint}` violated")]
    UniqueViolation { constraint: Constraint },
}

impl StoreError {
    /// Timeouts e falhas de I/O podem ter sucesso numa nova tentativa.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Timeout { .. } | StoreError::Io(_))
    }
}

/// Restrições de unicidade que todo armazenamento deve garantir.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Um email pertence a no máximo uma conta.
    AccountEmail,
    /// No máximo uma corrida REQUESTED por passageiro.
    ActiveRidePerPassenger,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::AccountEmail => write!(f, "account_email"),
            Constraint::ActiveRidePerPassenger => write!(f, "active_ride_per_passenger"),
        }
    }
}

/// Categoria de um [`RideError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Entrada sintaticamente inválida; o chamador corrige e reenvia.
    Validation,
    /// Uma regra de negócio bloqueia a operação.
    Conflict,
    /// Falha de infraestrutura no armazenamento.
    Store,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "Validation"),
            ErrorKind::Conflict => write!(f, "Conflict"),
            ErrorKind::Store => write!(f, "Store"),
        }
    }
}
