use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::extract::CloudItemEnvelope;
use crate::harvester::{HarvestEvent, HarvestReporter, Harvester};
use crate::models::{FetchedContent, HarvestSummary, HarvesterConfig};
use crate::slug;
use crate::traits::{ContentStore, Fetcher};

/// Probes random slugs against a JSON item API.
///
/// Every failure up to and including the resource download only skips the
/// slug. A failing store stops the run.
pub struct RandomHarvester<F, S>
where
    F: Fetcher,
    S: ContentStore,
{
    config: HarvesterConfig,
    fetcher: F,
    store: S,
    max_attempts: Option<u64>,
}

impl<F, S> RandomHarvester<F, S>
where
    F: Fetcher,
    S: ContentStore,
{
    pub fn new(config: HarvesterConfig, fetcher: F, store: S) -> Self {
        Self {
            config,
            fetcher,
            store,
            max_attempts: None,
        }
    }

    /// Stop after `max` slugs have been tried. Unbounded by default.
    pub fn with_max_attempts(mut self, max: u64) -> Self {
        self.max_attempts = Some(max);
        self
    }

    pub fn config(&self) -> &HarvesterConfig {
        &self.config
    }

    /// Resolve an item URL to the content it names.
    async fn lookup(&self, url: &str) -> Result<FetchedContent, AppError> {
        let body = self.fetcher.fetch(url).await?;
        let envelope: CloudItemEnvelope = serde_json::from_str(&body)?;
        let bytes = self.fetcher.fetch_bytes(&envelope.item.source_url).await?;
        Ok(FetchedContent::new(bytes, envelope.item.name))
    }

    fn exhausted(&self, attempts: u64) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

impl<F, S> Harvester for RandomHarvester<F, S>
where
    F: Fetcher,
    S: ContentStore,
{
    fn name(&self) -> &str {
        self.config.name()
    }

    async fn run<R: HarvestReporter>(
        &self,
        cancel: CancellationToken,
        reporter: &R,
    ) -> Result<HarvestSummary, AppError> {
        let harvester = self.config.name();
        reporter.report(HarvestEvent::Started { harvester });

        let mut summary = HarvestSummary::default();
        while !cancel.is_cancelled() && !self.exhausted(summary.attempts) {
            let url = self.config.url_for(&slug::random_slug(&self.config));
            summary.attempts += 1;
            reporter.report(HarvestEvent::Candidate {
                harvester,
                url: &url,
            });

            let content = match self.lookup(&url).await {
                Ok(content) if content.has_storable_name() => content,
                Ok(content) => {
                    summary.empty += 1;
                    let reason = format!("unusable file name '{}'", content.raw_name);
                    reporter.report(HarvestEvent::Skipped {
                        harvester,
                        url: &url,
                        reason: &reason,
                    });
                    continue;
                }
                Err(e) => {
                    summary.empty += 1;
                    let reason = e.to_string();
                    reporter.report(HarvestEvent::Skipped {
                        harvester,
                        url: &url,
                        reason: &reason,
                    });
                    continue;
                }
            };

            match self.store.save(&content, self.config.output_folder()).await {
                Ok(path) => {
                    summary.saved += 1;
                    reporter.report(HarvestEvent::Saved {
                        harvester,
                        url: &url,
                        path: &path,
                        bytes: content.bytes.len(),
                    });
                }
                Err(e) => {
                    let error = e.to_string();
                    reporter.report(HarvestEvent::Failed {
                        harvester,
                        error: &error,
                    });
                    return Err(e);
                }
            }
        }

        reporter.report(HarvestEvent::Stopped { harvester, summary });
        Ok(summary)
    }
}
