use crate::{
    commands::{Commands, TargetArgs},
    env::EnvManager,
    error::CliError,
    output::{OutputFormat, RowWriter},
    shutdown::ShutdownCoordinator,
};
use clap::Parser;
use connectors::{
    fetcher::PageFetcher, file::fixture::FixtureSessionProvider, http::HttpSessionProvider,
    session::SessionProvider, settings::ClientSettings,
};
use engine_runtime::fanout::RegionFanout;
use model::{
    query::{Quals, RowCeiling},
    records::reserved_instance::ReservedInstance,
    table::Row,
};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "osri",
    version,
    about = "Query managed search service reserved instances as table rows"
)]
struct Cli {
    #[arg(long, global = true, help = "Load variables from this .env file")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    // Rows go to stdout; logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();

    let outcome = run(cli, &shutdown).await;
    if let Err(e) = &outcome {
        if !matches!(e, CliError::ShutdownRequested) {
            error!("{e}");
        }
    }
    std::process::exit(shutdown.exit_code(&outcome).as_i32());
}

async fn run(cli: Cli, shutdown: &ShutdownCoordinator) -> Result<(), CliError> {
    let Cli { env_file, command } = cli;

    match command {
        Commands::Columns { json } => output::write_columns(std::io::stdout().lock(), json),
        Commands::List { id, limit, target } => {
            let settings = load_settings(env_file, &target)?;
            let quals = id.map(Quals::with_id).unwrap_or_default();
            let ceiling = limit.map(RowCeiling::new);
            match &target.fixture {
                Some(path) => {
                    let provider = FixtureSessionProvider::load(path).await?;
                    list(provider, &settings, &target, &quals, ceiling, shutdown).await
                }
                None => {
                    let provider = HttpSessionProvider::new(settings.clone());
                    list(provider, &settings, &target, &quals, ceiling, shutdown).await
                }
            }
        }
        Commands::Get { id, target } => {
            let settings = load_settings(env_file, &target)?;
            match &target.fixture {
                Some(path) => {
                    let provider = FixtureSessionProvider::load(path).await?;
                    get(provider, &settings, &target, &id).await
                }
                None => {
                    let provider = HttpSessionProvider::new(settings.clone());
                    get(provider, &settings, &target, &id).await
                }
            }
        }
    }
}

/// Process env, then the .env file, then command-line overrides.
fn load_settings(env_file: Option<PathBuf>, target: &TargetArgs) -> Result<ClientSettings, CliError> {
    let mut env = EnvManager::new();
    match env_file {
        Some(path) => env.load_from_file(path)?,
        None => {
            if let Some(path) = EnvManager::default_env_file().filter(|p| p.is_file()) {
                env.load_from_file(path)?;
            }
        }
    }

    let mut settings = env.client_settings()?;
    if !target.regions.is_empty() {
        settings.regions = target.regions.clone();
    }
    if let Some(endpoint) = &target.endpoint {
        settings.endpoint = endpoint.clone();
    }

    info!(
        regions = ?settings.regions,
        endpoint = %settings.endpoint,
        timeout_secs = settings.timeout_secs,
        env = ?env.redacted(),
        "Loaded configuration."
    );
    Ok(settings)
}

fn output_format(target: &TargetArgs) -> OutputFormat {
    if target.json {
        OutputFormat::JsonLines
    } else {
        OutputFormat::Table
    }
}

async fn list<P>(
    provider: P,
    settings: &ClientSettings,
    target: &TargetArgs,
    quals: &Quals,
    ceiling: Option<RowCeiling>,
    shutdown: &ShutdownCoordinator,
) -> Result<(), CliError>
where
    P: SessionProvider,
    P::Fetcher: PageFetcher<Record = ReservedInstance>,
{
    let mut writer = RowWriter::new(std::io::stdout(), output_format(target));
    let summary = RegionFanout::new(provider)
        .query(
            &settings.regions,
            quals,
            ceiling,
            &mut writer,
            shutdown.cancel_token(),
        )
        .await?;

    if summary.cancelled {
        return Err(CliError::ShutdownRequested);
    }
    info!(rows = writer.rows(), termination = ?summary.termination, "Done.");
    Ok(())
}

async fn get<P>(
    provider: P,
    settings: &ClientSettings,
    target: &TargetArgs,
    id: &str,
) -> Result<(), CliError>
where
    P: SessionProvider,
    P::Fetcher: PageFetcher<Record = ReservedInstance>,
{
    let found = RegionFanout::new(provider).get(&settings.regions, id).await?;
    let Some(item) = found else {
        info!(id, "No reserved instance found.");
        return Ok(());
    };

    let mut writer = RowWriter::new(std::io::stdout(), output_format(target));
    writer.write_row(&Row::project(&item.record, &item.region))?;
    Ok(())
}
