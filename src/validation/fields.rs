//! Verificações estruturais de nome, email e placa.
//!
//! Validam apenas a forma do texto, nunca a existência real (um email bem
//! formado pode não ser entregável).

use std::sync::OnceLock;

use regex::Regex;

static NAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static CAR_PLATE_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("pattern {pattern} failed to compile: {error}"))
    })
}

/// Nome e sobrenome(s): palavras de letras separadas por um espaço.
pub fn is_invalid_name(name: &str) -> bool {
    !compiled(&NAME_RE, r"^\p{L}+( \p{L}+)+$").is_match(name)
}

/// Exatamente um `@`, com partes local e de domínio não vazias e sem espaços.
pub fn is_invalid_email(email: &str) -> bool {
    !compiled(&EMAIL_RE, r"^[^@\s]+@[^@\s]+$").is_match(email)
}

/// Três letras maiúsculas seguidas de quatro dígitos (`AAA9999`).
pub fn is_invalid_car_plate(car_plate: &str) -> bool {
    !compiled(&CAR_PLATE_RE, r"^[A-Z]{3}[0-9]{4}$").is_match(car_plate)
}
