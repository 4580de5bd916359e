use std::future::Future;
use std::path::PathBuf;

use crate::error::AppError;
use crate::models::FetchedContent;

/// Performs the GET requests a harvester needs.
///
/// Implementations must fail with an error on non-success status codes.
pub trait Fetcher: Send + Sync + Clone {
    /// Fetch a page or API response as text.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;

    /// Fetch a resource as raw bytes.
    fn fetch_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, AppError>> + Send;
}

/// Persists fetched content grouped by extension.
pub trait ContentStore: Send + Sync + Clone {
    /// Write `content` below `output_folder`, replacing any file of the same
    /// name. Returns the path written.
    fn save(
        &self,
        content: &FetchedContent,
        output_folder: &str,
    ) -> impl Future<Output = Result<PathBuf, AppError>> + Send;
}

/// Finds the URL of the downloadable resource embedded in a response body.
pub trait ResourceLocator: Send + Sync {
    fn locate(&self, body: &str) -> Option<String>;
}
