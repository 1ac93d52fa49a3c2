//! Cadastro de passageiros e motoristas e solicitação de corridas.
//!
//! - [`validation`]: validação de CPF, nome, email e placa.
//! - [`account`]: cadastro e consulta de contas.
//! - [`ride`]: corridas, seus status e a regra de uma corrida ativa por
//!   passageiro.
//! - [`store`]: a porta [`DataStore`](store::DataStore) e suas implementações.

pub mod account;
pub mod cli;
pub mod config;
pub mod demo;
pub mod error;
pub mod i18n;
pub mod retry;
pub mod ride;
pub mod store;
pub mod ui;
pub mod validation;

pub use error::{ErrorKind, RideError, StoreError};
