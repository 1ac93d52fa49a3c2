//! Predicados puros de validação de identidade.

mod cpf;
mod fields;

pub use cpf::{is_valid_cpf, validate_cpf};
pub use fields::{is_invalid_car_plate, is_invalid_email, is_invalid_name};
