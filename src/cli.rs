//! Interface de linha de comando baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (signup, account,
//! request-ride, ride, validate-cpf, statuses, demo) e flags globais
//! (--locale, --data-file, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use crate::i18n::Locale;

/// Cadastro de passageiros e motoristas e solicitação de corridas.
#[derive(Debug, Parser)]
#[command(name = "ride", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Idioma das mensagens.
    #[arg(long, global = true)]
    pub locale: Option<LocaleArg>,

    /// Arquivo JSON usado como armazenamento.
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Idioma aceito pela CLI, mapeado para [`Locale`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LocaleArg {
    /// Inglês.
    En,
    /// Português do Brasil.
    PtBr,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::En => Locale::En,
            LocaleArg::PtBr => Locale::PtBr,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cadastra uma conta de passageiro e/ou motorista.
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        cpf: String,

        /// Placa do carro, obrigatória para motoristas.
        #[arg(long)]
        car_plate: Option<String>,

        #[arg(long, default_value_t = false)]
        passenger: bool,

        #[arg(long, default_value_t = false)]
        driver: bool,
    },

    /// Mostra uma conta.
    Account {
        account_id: String,
    },

    /// Solicita uma corrida para um passageiro.
    RequestRide {
        #[arg(long)]
        passenger_id: Uuid,

        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,

        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
    },

    /// Mostra uma corrida.
    Ride {
        ride_id: String,
    },

    /// Verifica os dígitos de um CPF.
    ValidateCpf {
        cpf: String,
    },

    /// Lista os status de corrida no idioma escolhido.
    Statuses,

    /// Dispara solicitações concorrentes para um passageiro em memória.
    Demo {
        /// Número de solicitações simultâneas.
        #[arg(long, default_value_t = 16)]
        concurrency: usize,
    },
}
