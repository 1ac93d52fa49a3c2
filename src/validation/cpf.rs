//! Validação do CPF pelo algoritmo de dígitos verificadores.
//!
//! A entrada pode vir formatada (`974.563.215-58`); tudo que não é dígito é
//! descartado antes da verificação.

const CPF_LENGTH: usize = 11;

/// Valida um CPF que pode estar ausente. Entrada ausente ou vazia é inválida.
pub fn validate_cpf(cpf: Option<&str>) -> bool {
    cpf.is_some_and(is_valid_cpf)
}

/// Valida um CPF: 11 dígitos, não todos iguais, com os dois dígitos
/// verificadores corretos.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits = clean(cpf);
    if digits.len() != CPF_LENGTH {
        return false;
    }
    if all_digits_are_the_same(&digits) {
        return false;
    }
    let first = calculate_digit(&digits, 10);
    let second = calculate_digit(&digits, 11);
    digits[9] == first && digits[10] == second
}

// Mantém apenas os dígitos ASCII, já convertidos para valor numérico.
fn clean(cpf: &str) -> Vec<u32> {
    cpf.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_digits_are_the_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

/// Soma ponderada com pesos decrescentes a partir de `factor` até 2.
///
/// Com `factor = 10` cobre os nove primeiros dígitos; com `factor = 11`
/// cobre os dez primeiros, incluindo o primeiro dígito verificador.
fn calculate_digit(digits: &[u32], factor: u32) -> u32 {
    let total: u32 = digits
        .iter()
        .zip((2..=factor).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();
    let rest = total % 11;
    if rest < 2 { 0 } else { 11 - rest }
}
