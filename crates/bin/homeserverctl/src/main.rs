//! # homeserverctl: home server command-line client
//!
//! Composition root that wires a backend adapter into the application
//! services and runs one command.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars, CLI flags, in that order)
//! - Initialise `tracing` with the configured filter, logging to stderr
//! - Construct the backend adapter: the REST client or the in-memory simulation
//! - Build the request gateway shared by every service
//! - Dispatch the subcommand and map its outcome to the exit code
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer, no domain logic belongs here.

mod cli;
mod commands;
mod config;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use homeserver_adapter_http_reqwest::{HttpClient, HttpConfig};
use homeserver_adapter_virtual::VirtualBackend;
use homeserver_app::gateway::RequestGateway;
use homeserver_app::liveness::Liveness;
use homeserver_domain::error::HomeServerError;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::{BackendKind, Config};
use crate::output::ConsoleNotifier;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging.filter);

    let notifier = Arc::new(ConsoleNotifier::default());
    match run(&config, Arc::clone(&notifier), cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let notified =
                err.downcast_ref::<HomeServerError>().is_some() && notifier.reported_error();
            if !notified {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = Config::load(&cli.config, |config| {
        if let Some(url) = &cli.api_url {
            config.api.base_url.clone_from(url);
        }
        if let Some(secs) = cli.timeout {
            config.api.timeout_secs = secs;
        }
        if let Some(kind) = cli.backend {
            config.backend.kind = kind;
        }
    })
    .with_context(|| format!("loading {}", cli.config.display()))?;
    Ok(config)
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter '{filter}': {err}, falling back to 'warn'");
        EnvFilter::new("warn")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(
    config: &Config,
    notifier: Arc<ConsoleNotifier>,
    command: cli::Command,
) -> anyhow::Result<()> {
    let gateway = RequestGateway::new(Liveness::new(), config.timeout());
    let refresh = config.refresh_interval();

    match config.backend.kind {
        BackendKind::Http => {
            let client = HttpClient::new(&HttpConfig {
                base_url: config.api.base_url.clone(),
                timeout: config.timeout(),
            })?;
            tracing::info!(base_url = %client.base_url(), "using REST backend");
            commands::run(Arc::new(client), notifier, gateway, refresh, command).await
        }
        BackendKind::Virtual => {
            tracing::info!("using in-memory virtual backend");
            let backend = VirtualBackend::default();
            commands::run(Arc::new(backend), notifier, gateway, refresh, command).await
        }
    }
}
