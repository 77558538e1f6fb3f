use anyhow::{Context, Result};
use chrono::Local;
use rawmix_cli::{protocol_listing, Cli};
use rawmix_core::Cidr;
use rawmix_engine::{RunSummary, SocketManager, WorkerPool};
use rawmix_protocols::ModuleRegistry;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const TIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    if cli.list_protocols {
        print!("{}", protocol_listing(&ModuleRegistry::builtin()));
        return ExitCode::SUCCESS;
    }

    match run(cli).await {
        Ok(summary) if summary.is_clean() => ExitCode::SUCCESS,
        Ok(summary) => {
            warn!(failures = summary.send_failures, "some packets were not sent");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunSummary> {
    let registry = ModuleRegistry::builtin();
    let config = cli.into_config().context("Invalid command line")?;
    config.validate(registry.count())?;
    let cidr = Cidr::new(config.target, config.bits)?;

    let socket = Arc::new(
        SocketManager::open().context("Cannot open raw socket (are you running as root?)")?,
    );

    // Set up signal handlers
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to set up SIGINT handler")?;
    let mut sigterm = signal(SignalKind::terminate()).context("Failed to set up SIGTERM handler")?;
    let mut sigquit = signal(SignalKind::quit()).context("Failed to set up SIGQUIT handler")?;

    println!(
        "{} {} successfully launched at {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        Local::now().format(TIME_FORMAT)
    );

    let pool = WorkerPool::spawn(Arc::new(config), cidr, registry, Arc::clone(&socket))?;
    let mut workers = tokio::task::spawn_blocking(move || pool.wait());

    let finished = tokio::select! {
        joined = &mut workers => Some(joined),
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down...");
            None
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
            None
        }
        _ = sigquit.recv() => {
            info!("Received SIGQUIT, shutting down...");
            None
        }
    };

    // Closing the socket stops every worker at its next send
    socket.close();
    let joined = match finished {
        Some(joined) => joined,
        None => workers.await,
    };

    let summary = joined.context("Worker pool task failed")??;
    report(&summary);
    Ok(summary)
}

fn report(summary: &RunSummary) {
    for (acronym, count) in &summary.per_module {
        info!(protocol = *acronym, packets = *count, "module total");
    }
    info!(
        packets = summary.packets_sent,
        bytes = summary.bytes_sent,
        failures = summary.send_failures,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        pps = summary.packets_per_second(),
        "run finished"
    );
    println!(
        "{} {} successfully finished at {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        Local::now().format(TIME_FORMAT)
    );
}
