use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use slugharvest_client::ReqwestFetcher;
use slugharvest_core::{
    AppError, Enumeration, FsContentStore, HarvestSummary, Harvester, HarvesterConfig,
    RandomHarvester, SequentialHarvester, TracingHarvestReporter,
};

#[derive(Parser)]
#[command(
    name = "slugharvest",
    version,
    about = "Walk short-URL slugs on screenshot hosts and save what they resolve to"
)]
struct Cli {
    /// Directory below which each harvester's output folder is created
    #[arg(long, env = "SLUGHARVEST_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Run only the given harvesters (repeatable; defaults to all)
    #[arg(long, value_enum)]
    only: Vec<Target>,

    /// Slug the prnt.sc walk starts from, read in base 36
    #[arg(long, env = "SLUGHARVEST_START_SLUG", default_value = "ta78nv")]
    start_slug: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "SLUGHARVEST_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Stop the CloudApp harvester after this many random slugs
    #[arg(long)]
    max_attempts: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Target {
    /// Sequential walk over prnt.sc screenshots
    Prntsc,
    /// Random probing of the CloudApp item API
    Cloudapp,
}

type HarvestResult = (String, Result<HarvestSummary, AppError>);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("slugharvest=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let targets = if cli.only.is_empty() {
        vec![Target::Cloudapp, Target::Prntsc]
    } else {
        cli.only.clone()
    };

    let store = FsContentStore::new(&cli.output_dir);
    let timeout = Duration::from_secs(cli.timeout_secs);
    let cancel = CancellationToken::new();
    let mut tasks = JoinSet::new();

    for target in targets {
        // One client per harvester so they never share a connection pool.
        let fetcher =
            ReqwestFetcher::with_timeout(timeout).context("Failed to create HTTP client")?;

        let name = match target {
            Target::Prntsc => {
                let harvester = SequentialHarvester::new(
                    HarvesterConfig::prntsc(),
                    Enumeration::new(cli.start_slug.clone(), 36),
                    fetcher,
                    store.clone(),
                );
                spawn_harvester(&mut tasks, harvester, cancel.clone())
            }
            Target::Cloudapp => {
                let mut harvester =
                    RandomHarvester::new(HarvesterConfig::cloudapp(), fetcher, store.clone());
                if let Some(max) = cli.max_attempts {
                    harvester = harvester.with_max_attempts(max);
                }
                spawn_harvester(&mut tasks, harvester, cancel.clone())
            }
        };
        tracing::info!(harvester = %name, "Harvester task spawned");
    }

    tracing::info!(
        output_dir = %store.root().display(),
        "Harvesters are working, press Ctrl+C to stop"
    );

    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let failures = join_harvesters(&mut tasks).await;
    if failures > 0 {
        anyhow::bail!("{failures} harvester(s) stopped on error");
    }
    Ok(())
}

/// Start `harvester` on the runtime and return its name.
fn spawn_harvester<H>(
    tasks: &mut JoinSet<HarvestResult>,
    harvester: H,
    cancel: CancellationToken,
) -> String
where
    H: Harvester + 'static,
{
    let name = harvester.name().to_string();
    let task_name = name.clone();
    tasks.spawn(async move {
        let reporter = TracingHarvestReporter;
        let result = harvester.run(cancel, &reporter).await;
        (task_name, result)
    });
    name
}

/// Wait for every harvester task and return how many stopped on an error.
async fn join_harvesters(tasks: &mut JoinSet<HarvestResult>) -> usize {
    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((name, Ok(summary))) => {
                tracing::info!(
                    harvester = %name,
                    attempts = summary.attempts,
                    saved = summary.saved,
                    "Harvester finished"
                );
            }
            Ok((name, Err(e))) => {
                failures += 1;
                tracing::error!(harvester = %name, error = %e, "Harvester stopped on error");
            }
            Err(e) => {
                failures += 1;
                tracing::error!(error = %e, "Harvester task panicked or was aborted");
            }
        }
    }
    failures
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Shutdown signal received, stopping after the current requests");
            cancel.cancel();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    }
}
