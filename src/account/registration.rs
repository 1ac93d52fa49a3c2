use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use super::entity::{Account, SignupInput, SignupOutput};
use crate::error::{Constraint, RideError, StoreError};
use crate::store::{DataStore, bounded};
use crate::validation::{is_invalid_car_plate, is_invalid_email, is_invalid_name, validate_cpf};

/// Cadastro e consulta de contas.
///
/// Não guarda estado entre chamadas; todo o estado vive no armazenamento.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn DataStore>,
    store_timeout: Duration,
}

impl AccountService {
    pub fn new(store: Arc<dyn DataStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    /// Cadastra uma conta.
    ///
    /// As verificações seguem esta ordem e param na primeira falha: email
    /// já cadastrado, nome, formato do email, CPF e, para motoristas, placa.
    /// Nada é gravado antes de todas passarem.
    pub async fn signup(&self, input: SignupInput) -> Result<SignupOutput, RideError> {
        self.register(&Account::new(input)).await
    }

    /// Grava uma conta já montada, com as mesmas verificações de [`signup`].
    ///
    /// Pode ser repetida com a mesma conta: se o email já pertence a esta
    /// conta (uma tentativa anterior gravou antes de estourar o timeout), o
    /// resultado é sucesso.
    ///
    /// [`signup`]: AccountService::signup
    pub async fn register(&self, account: &Account) -> Result<SignupOutput, RideError> {
        let output = SignupOutput {
            account_id: account.account_id,
        };

        match self.owner_of(&account.email).await? {
            Some(owner) if owner == account.account_id => {
                info!(account_id = %account.account_id, "account already stored");
                return Ok(output);
            }
            Some(_) => {
                warn!("signup rejected: email already registered");
                return Err(RideError::DuplicatedAccount);
            }
            None => {}
        }
        check_fields(account)?;

        match bounded(self.store_timeout, self.store.insert_account(account)).await {
            Ok(()) => {}
            Err(StoreError::UniqueViolation {
                constraint: Constraint::AccountEmail,
            }) => {
                if self.owner_of(&account.email).await? == Some(account.account_id) {
                    return Ok(output);
                }
                warn!("signup lost a race on the email constraint");
                return Err(RideError::DuplicatedAccount);
            }
            Err(err) => return Err(err.into()),
        }

        info!(account_id = %account.account_id, is_driver = account.is_driver, "account created");
        Ok(output)
    }

    async fn owner_of(&self, email: &str) -> Result<Option<Uuid>, StoreError> {
        let existing = bounded(self.store_timeout, self.store.find_account_by_email(email)).await?;
        Ok(existing.map(|account| account.account_id))
    }

    /// Busca uma conta. Identificadores que não são UUID não existem.
    pub async fn get_account(&self, account_id: &str) -> Result<Option<Account>, RideError> {
        let Ok(account_id) = Uuid::parse_str(account_id.trim()) else {
            return Ok(None);
        };
        let account = bounded(self.store_timeout, self.store.find_account_by_id(account_id)).await?;
        Ok(account)
    }
}

fn check_fields(account: &Account) -> Result<(), RideError> {
    if is_invalid_name(&account.name) {
        return Err(RideError::InvalidName);
    }
    if is_invalid_email(&account.email) {
        return Err(RideError::InvalidEmail);
    }
    if !validate_cpf(Some(&account.cpf)) {
        return Err(RideError::InvalidCpf);
    }
    if account.is_driver
        && account
            .car_plate
            .as_deref()
            .is_none_or(is_invalid_car_plate)
    {
        return Err(RideError::InvalidCarPlate);
    }
    Ok(())
}
