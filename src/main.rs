use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use ride::account::{Account, AccountService, SignupInput};
use ride::cli::{Cli, Command};
use ride::config::RideConfig;
use ride::demo::{self, DemoError};
use ride::ride::{Coordinates, Ride, RideLifecycleManager};
use ride::store::{DataStore, JsonFileStore, MemoryStore};
use ride::ui::Presenter;
use ride::validation::validate_cpf;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "ride=debug" } else { "ride=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = RideConfig::load()?;
    if let Some(locale) = cli.locale {
        config.locale = locale.into();
    }
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }

    let ui = Presenter::new(config.locale);
    let retry = config.retry_policy();
    let store: Arc<dyn DataStore> = Arc::new(JsonFileStore::new(&config.data_file));
    let accounts = AccountService::new(store.clone(), config.store_timeout());
    let rides = RideLifecycleManager::new(store, config.store_timeout());

    let outcome = match cli.command {
        Command::Signup {
            name,
            email,
            cpf,
            car_plate,
            passenger,
            driver,
        } => {
            // Montada uma vez: toda tentativa grava a mesma conta.
            let account = Account::new(SignupInput {
                name,
                email,
                cpf: Some(cpf),
                car_plate,
                is_passenger: passenger,
                is_driver: driver,
            });
            retry
                .run("signup", || accounts.register(&account))
                .await
                .map(|output| ui.account_created(&output))
        }
        Command::Account { account_id } => retry
            .run("get_account", || accounts.get_account(&account_id))
            .await
            .map(|account| match account {
                Some(account) => ui.account(&account),
                None => ui.not_found(&account_id),
            }),
        Command::RequestRide {
            passenger_id,
            latitude,
            longitude,
        } => {
            let ride = Ride::request(
                passenger_id,
                Coordinates {
                    latitude,
                    longitude,
                },
            );
            retry
                .run("create_request_ride", || rides.submit(&ride))
                .await
                .map(|output| ui.ride_requested(&output))
        }
        Command::Ride { ride_id } => retry
            .run("get_ride", || rides.get_ride(&ride_id))
            .await
            .map(|ride| match ride {
                Some(ride) => ui.ride(&ride),
                None => ui.not_found(&ride_id),
            }),
        Command::ValidateCpf { cpf } => {
            let valid = validate_cpf(Some(&cpf));
            ui.cpf_check(&cpf, valid);
            return Ok(if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        Command::Statuses => {
            ui.statuses();
            Ok(())
        }
        Command::Demo { concurrency } => match run_demo(&ui, &config, concurrency).await {
            Err(DemoError::Task(join_error)) => {
                return Err(anyhow::Error::new(join_error).context("ride request task failed"));
            }
            Err(DemoError::Ride(err)) => Err(err),
            Ok(()) => Ok(()),
        },
    };

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            ui.error(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Dispara `concurrency` solicitações simultâneas para o mesmo passageiro
/// contra um armazenamento em memória e mostra que só uma é aceita.
async fn run_demo(ui: &Presenter, config: &RideConfig, concurrency: usize) -> Result<(), DemoError> {
    let store = Arc::new(MemoryStore::new());
    let rides = RideLifecycleManager::new(store.clone(), config.store_timeout());
    let passenger_id = Uuid::new_v4();

    let tally = demo::tally(demo::spawn_requests(&rides, passenger_id, concurrency)).await?;

    let active = store.count_active_rides(passenger_id).await;
    ui.success(&ui.demo_summary(tally.accepted.len(), tally.rejected, active));
    if let Some(ride_id) = tally.accepted.first()
        && let Some(ride) = rides.get_ride(&ride_id.to_string()).await?
    {
        ui.ride(&ride);
    }
    Ok(())
}
