use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::extract::{MarkerLocator, resource_name};
use crate::harvester::{HarvestEvent, HarvestReporter, Harvester};
use crate::models::{Enumeration, FetchedContent, HarvestSummary, HarvesterConfig};
use crate::slug;
use crate::traits::{ContentStore, Fetcher, ResourceLocator};

/// Walks a keyspace downwards from a recent slug, scraping one page per slug.
///
/// For each candidate the page is fetched, the locator picks the embedded
/// resource URL, and the resource is downloaded and stored. A page request
/// that fails stops the run; so does a failing store.
pub struct SequentialHarvester<F, S, L = MarkerLocator>
where
    F: Fetcher,
    S: ContentStore,
    L: ResourceLocator,
{
    config: HarvesterConfig,
    enumeration: Enumeration,
    fetcher: F,
    store: S,
    locator: L,
}

enum Outcome {
    Saved { path: PathBuf, bytes: usize },
    Empty,
    Skipped(String),
}

impl<F, S> SequentialHarvester<F, S, MarkerLocator>
where
    F: Fetcher,
    S: ContentStore,
{
    pub fn new(config: HarvesterConfig, enumeration: Enumeration, fetcher: F, store: S) -> Self {
        Self::with_locator(config, enumeration, fetcher, store, MarkerLocator)
    }
}

impl<F, S, L> SequentialHarvester<F, S, L>
where
    F: Fetcher,
    S: ContentStore,
    L: ResourceLocator,
{
    /// Create a harvester that finds resources with a custom locator.
    pub fn with_locator(
        config: HarvesterConfig,
        enumeration: Enumeration,
        fetcher: F,
        store: S,
        locator: L,
    ) -> Self {
        Self {
            config,
            enumeration,
            fetcher,
            store,
            locator,
        }
    }

    pub fn config(&self) -> &HarvesterConfig {
        &self.config
    }

    async fn harvest(&self, url: &str) -> Result<Outcome, AppError> {
        let page = self.fetcher.fetch(url).await?;

        let Some(resource_url) = self.locator.locate(&page) else {
            return Ok(Outcome::Empty);
        };

        let bytes = match self.fetcher.fetch_bytes(&resource_url).await {
            Ok(bytes) => bytes,
            Err(e) => return Ok(Outcome::Skipped(format!("{resource_url}: {e}"))),
        };

        let Some(name) = resource_name(&resource_url) else {
            return Ok(Outcome::Skipped(format!(
                "{resource_url}: no file name in resource URL"
            )));
        };

        let content = FetchedContent::new(bytes, name);
        if !content.has_storable_name() {
            return Ok(Outcome::Skipped(format!(
                "{resource_url}: unusable file name '{}'",
                content.raw_name
            )));
        }

        let path = self
            .store
            .save(&content, self.config.output_folder())
            .await?;
        Ok(Outcome::Saved {
            path,
            bytes: content.bytes.len(),
        })
    }
}

impl<F, S, L> Harvester for SequentialHarvester<F, S, L>
where
    F: Fetcher,
    S: ContentStore,
    L: ResourceLocator,
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
        let slugs =
            slug::enumerate_descending(&self.enumeration.start_slug, self.enumeration.base)?;

        reporter.report(HarvestEvent::Started { harvester });
        tracing::debug!(
            %harvester,
            start = ?slugs.peek_value(),
            base = self.enumeration.base,
            "Enumerating slugs in descending order"
        );

        let mut summary = HarvestSummary::default();
        for slug in slugs {
            if cancel.is_cancelled() {
                break;
            }

            let url = self.config.url_for(&slug);
            summary.attempts += 1;
            reporter.report(HarvestEvent::Candidate {
                harvester,
                url: &url,
            });

            match self.harvest(&url).await {
                Ok(Outcome::Saved { path, bytes }) => {
                    summary.saved += 1;
                    reporter.report(HarvestEvent::Saved {
                        harvester,
                        url: &url,
                        path: &path,
                        bytes,
                    });
                }
                Ok(Outcome::Empty) => {
                    summary.empty += 1;
                    reporter.report(HarvestEvent::Empty {
                        harvester,
                        url: &url,
                    });
                }
                Ok(Outcome::Skipped(reason)) => {
                    summary.empty += 1;
                    reporter.report(HarvestEvent::Skipped {
                        harvester,
                        url: &url,
                        reason: &reason,
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
