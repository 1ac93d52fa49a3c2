//! Tabelas de textos para apresentação em inglês e português do Brasil.
//!
//! O idioma é sempre passado explicitamente; não existe idioma global.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RideError;

/// Idiomas suportados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "en")]
    En,
    #[default]
    #[serde(rename = "pt-br")]
    PtBr,
}

/// Textos de um idioma.
#[derive(Debug)]
pub struct Messages {
    pub requested: &'static str,
    pub accepted: &'static str,
    pub started: &'static str,
    pub finished: &'static str,
    pub ride_in_progress: &'static str,
    pub duplicated_account: &'static str,
    pub invalid_name: &'static str,
    pub invalid_email: &'static str,
    pub invalid_cpf: &'static str,
    pub invalid_car_plate: &'static str,
    pub store_unavailable: &'static str,
    pub not_found: &'static str,
    pub account_created: &'static str,
    pub account_title: &'static str,
    pub ride_requested: &'static str,
    pub ride_title: &'static str,
    pub demo_accepted: &'static str,
    pub demo_rejected: &'static str,
    pub demo_stored: &'static str,
}

static EN: Messages = Messages {
    requested: "Requested",
    accepted: "Accepted",
    started: "Started",
    finished: "Finished",
    ride_in_progress: "There is a ride in progress",
    duplicated_account: "Duplicated account",
    invalid_name: "Invalid name",
    invalid_email: "Invalid email",
    invalid_cpf: "Invalid cpf",
    invalid_car_plate: "Invalid car plate",
    store_unavailable: "Data store unavailable, try again later",
    not_found: "Not found",
    account_created: "Account created",
    account_title: "Account",
    ride_requested: "Ride requested",
    ride_title: "Ride",
    demo_accepted: "accepted",
    demo_rejected: "rejected",
    demo_stored: "active ride(s) stored",
};

static PT_BR: Messages = Messages {
    requested: "Requisitada",
    accepted: "Aceita",
    started: "Iniciada",
    finished: "Finalizada",
    ride_in_progress: "Já existe uma corrida em andamento",
    duplicated_account: "Conta duplicada",
    invalid_name: "Nome inválido",
    invalid_email: "Email inválido",
    invalid_cpf: "CPF inválido",
    invalid_car_plate: "Placa inválida",
    store_unavailable: "Armazenamento indisponível, tente novamente mais tarde",
    not_found: "Não encontrado",
    account_created: "Conta criada",
    account_title: "Conta",
    ride_requested: "Corrida solicitada",
    ride_title: "Corrida",
    demo_accepted: "aceitas",
    demo_rejected: "rejeitadas",
    demo_stored: "corrida(s) ativa(s) gravada(s)",
};

impl Locale {
    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::PtBr => &PT_BR,
        }
    }

    /// Mensagem para o usuário final correspondente a um erro.
    ///
    /// Erros de armazenamento não expõem detalhes internos; esses vão para o log.
    pub fn error_message(self, err: &RideError) -> &'static str {
        let messages = self.messages();
        match err {
            RideError::InvalidName => messages.invalid_name,
            RideError::InvalidEmail => messages.invalid_email,
            RideError::InvalidCpf => messages.invalid_cpf,
            RideError::InvalidCarPlate => messages.invalid_car_plate,
            RideError::DuplicatedAccount => messages.duplicated_account,
            RideError::DuplicateActiveRide { .. } => messages.ride_in_progress,
            RideError::Store(_) => messages.store_unavailable,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::PtBr => write!(f, "pt-br"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" => Ok(Locale::En),
            "pt-br" | "ptbr" | "pt" => Ok(Locale::PtBr),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}
