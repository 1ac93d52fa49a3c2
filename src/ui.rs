//! Saída de terminal com cores.
//!
//! Usa a crate `console` para estilização. O [`Presenter`] converte resultados
//! do domínio em texto no idioma escolhido.

use console::Style;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::account::{Account, SignupOutput};
use crate::error::{ErrorKind, RideError};
use crate::i18n::Locale;
use crate::ride::{RequestRideOutput, Ride, RideStatus};

/// JSON indentado de um registro.
pub fn render<T: Serialize>(record: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

pub struct Presenter {
    locale: Locale,
    // Verde para sucesso.
    green: Style,
    // Vermelho para falhas.
    red: Style,
    // Amarelo para conflitos e cabeçalhos.
    yellow: Style,
}

impl Presenter {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn success(&self, message: &str) {
        println!("  {} {message}", self.green.apply_to("✓"));
    }

    /// Imprime um registro em JSON sob um cabeçalho.
    pub fn record<T: Serialize>(&self, title: &str, record: &T) {
        match render(record) {
            Ok(json) => {
                println!("{}", self.yellow.apply_to(format!("─── {title} ───")));
                println!("{json}");
            }
            Err(err) => error!(%err, title, "record could not be rendered"),
        }
    }

    pub fn account_created(&self, output: &SignupOutput) {
        self.record(self.locale.messages().account_created, output);
    }

    pub fn account(&self, account: &Account) {
        self.record(self.locale.messages().account_title, account);
    }

    pub fn ride_requested(&self, output: &RequestRideOutput) {
        self.record(self.locale.messages().ride_requested, output);
    }

    /// Corrida com o rótulo do status no idioma atual.
    pub fn ride(&self, ride: &Ride) {
        self.record(
            self.locale.messages().ride_title,
            &json!({
                "rideId": ride.ride_id,
                "passengerId": ride.passenger_id,
                "status": ride.status,
                "statusLabel": ride.status.label(self.locale),
                "from": ride.from,
                "requestedAt": ride.requested_at,
            }),
        );
    }

    /// Resumo da demonstração de solicitações concorrentes.
    pub fn demo_summary(&self, accepted: usize, rejected: usize, active: usize) -> String {
        let messages = self.locale.messages();
        format!(
            "{accepted} {}, {rejected} {} ({}), {active} {}",
            messages.demo_accepted,
            messages.demo_rejected,
            messages.ride_in_progress,
            messages.demo_stored
        )
    }

    pub fn statuses(&self) {
        for status in RideStatus::ALL {
            println!("  {:<10} {}", status.to_string(), status.label(self.locale));
        }
    }

    pub fn cpf_check(&self, cpf: &str, valid: bool) {
        if valid {
            println!("  {} {cpf}", self.green.apply_to("✓"));
        } else {
            println!(
                "  {} {cpf}: {}",
                self.red.apply_to("✗"),
                self.locale.messages().invalid_cpf
            );
        }
    }

    pub fn not_found(&self, id: &str) {
        println!(
            "  {} {id}: {}",
            self.yellow.apply_to("?"),
            self.locale.messages().not_found
        );
    }

    /// Mensagem do erro no idioma atual; conflitos em amarelo, o resto em vermelho.
    pub fn error(&self, err: &RideError) {
        let style = match err.kind() {
            ErrorKind::Conflict => &self.yellow,
            ErrorKind::Validation | ErrorKind::Store => &self.red,
        };
        eprintln!(
            "  {} {}",
            style.apply_to("✗"),
            self.locale.error_message(err)
        );
    }
}
