mod app;
mod cli;
mod commands;
mod dashboard;
mod event;
mod runtime;
mod ui;

use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use hypr_api_env::Env;
use hypr_config_sync::{ConfigSyncClient, RetryConfig, SyncController};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::runtime::ConsoleNotifier;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let env = Env::from_env()?;

    init_tracing(&cli.command, &env)?;

    let client = build_client(&cli, &env)?;
    let retry = RetryConfig::with_retries(cli.retries);
    tracing::debug!(base_url = client.base_url(), retries = cli.retries, "client_ready");

    if let Command::Dashboard = cli.command {
        return dashboard::run(client, retry).await;
    }

    let controller =
        SyncController::new(client, Arc::new(ConsoleNotifier)).with_retry_config(retry);

    if let Some(submission) = cli.command.submission() {
        return commands::submit(submission, &controller, cli.refresh).await;
    }

    match cli.command {
        Command::State { json } => commands::show_state(&controller, json).await,
        Command::Panels => {
            commands::list_panels();
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

/// The dashboard owns the terminal, so it only logs when a log file is configured.
fn init_tracing(command: &Command, env: &Env) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match (command, env.cattrix.log_file.as_deref()) {
        (_, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            subscriber
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (Command::Dashboard, None) => {}
        (_, None) => subscriber.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn build_client(cli: &Cli, env: &Env) -> anyhow::Result<ConfigSyncClient> {
    let base_url = cli.api_base.clone().unwrap_or_else(|| env.api_base());
    let timeout = cli
        .timeout_ms
        .map(Duration::from_millis)
        .or_else(|| env.timeout())
        .unwrap_or(DEFAULT_TIMEOUT);

    let mut builder = ConfigSyncClient::builder(base_url).with_timeout(timeout);
    if let Some(token) = cli.token.as_ref().or(env.cattrix.api_token.as_ref()) {
        builder = builder.with_bearer_token(token);
    }
    Ok(builder.build()?)
}
