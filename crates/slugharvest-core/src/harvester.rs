use std::future::Future;
use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::models::HarvestSummary;

/// A long-running task that discovers slugs and stores what they resolve to.
pub trait Harvester: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Run until the slug source is exhausted or `cancel` is triggered.
    ///
    /// The token is checked between candidates, never in the middle of one.
    /// An `Err` means the harvester stopped on a fatal error.
    fn run<R: HarvestReporter>(
        &self,
        cancel: CancellationToken,
        reporter: &R,
    ) -> impl Future<Output = Result<HarvestSummary, AppError>> + Send;
}

/// Events emitted by harvesters for monitoring/logging.
#[derive(Debug, Clone)]
pub enum HarvestEvent<'a> {
    Started {
        harvester: &'a str,
    },
    Candidate {
        harvester: &'a str,
        url: &'a str,
    },
    /// The candidate resolved to nothing worth saving.
    Empty {
        harvester: &'a str,
        url: &'a str,
    },
    /// The candidate failed in a way that does not stop the harvester.
    Skipped {
        harvester: &'a str,
        url: &'a str,
        reason: &'a str,
    },
    Saved {
        harvester: &'a str,
        url: &'a str,
        path: &'a Path,
        bytes: usize,
    },
    Failed {
        harvester: &'a str,
        error: &'a str,
    },
    Stopped {
        harvester: &'a str,
        summary: HarvestSummary,
    },
}

/// Trait for receiving harvester events (decoupled logging).
pub trait HarvestReporter: Send + Sync {
    fn report(&self, event: HarvestEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl HarvestReporter for NullReporter {}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHarvestReporter;

impl HarvestReporter for TracingHarvestReporter {
    fn report(&self, event: HarvestEvent<'_>) {
        match event {
            HarvestEvent::Started { harvester } => {
                tracing::info!(%harvester, "Harvester started");
            }
            HarvestEvent::Candidate { harvester, url } => {
                tracing::debug!(%harvester, %url, "Trying candidate");
            }
            HarvestEvent::Empty { harvester, url } => {
                tracing::debug!(%harvester, %url, "Nothing to save");
            }
            HarvestEvent::Skipped {
                harvester,
                url,
                reason,
            } => {
                tracing::debug!(%harvester, %url, %reason, "Candidate skipped");
            }
            HarvestEvent::Saved {
                harvester,
                url,
                path,
                bytes,
            } => {
                tracing::info!(%harvester, %url, path = %path.display(), %bytes, "Saved");
            }
            HarvestEvent::Failed { harvester, error } => {
                tracing::error!(%harvester, %error, "Harvester failed");
            }
            HarvestEvent::Stopped { harvester, summary } => {
                tracing::info!(
                    %harvester,
                    attempts = summary.attempts,
                    saved = summary.saved,
                    empty = summary.empty,
                    "Harvester stopped"
                );
            }
        }
    }
}
