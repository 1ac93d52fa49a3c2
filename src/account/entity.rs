use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conta de passageiro e/ou motorista.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: Uuid,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub car_plate: Option<String>,
    pub is_passenger: bool,
    pub is_driver: bool,
}

impl Account {
    /// Cria a conta com um identificador novo. Não valida os campos; isso é
    /// feito no cadastro antes da gravação.
    pub fn new(input: SignupInput) -> Self {
        Self {
            account_id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            cpf: input.cpf.unwrap_or_default(),
            car_plate: input.car_plate,
            is_passenger: input.is_passenger,
            is_driver: input.is_driver,
        }
    }
}

/// Dados de entrada do cadastro.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub car_plate: Option<String>,
    #[serde(default)]
    pub is_passenger: bool,
    #[serde(default)]
    pub is_driver: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupOutput {
    pub account_id: Uuid,
}
