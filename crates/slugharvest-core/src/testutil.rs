//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::FetchedContent;
use crate::traits::{ContentStore, Fetcher};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that replays queued responses and records requested URLs.
///
/// `fetch` and `fetch_bytes` pop from the same queue, in call order. Once the
/// queue is drained every call fails with a 404.
#[derive(Clone)]
pub struct MockFetcher {
    responses: Arc<Mutex<Vec<Result<Vec<u8>, AppError>>>>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::with_responses(vec![])
    }

    pub fn with_responses(responses: Vec<Result<Vec<u8>, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Queue a text body.
    pub fn then_text(self, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(Ok(body.as_bytes().to_vec()));
        self
    }

    /// Queue a binary body.
    pub fn then_bytes(self, body: &[u8]) -> Self {
        self.responses.lock().unwrap().push(Ok(body.to_vec()));
        self
    }

    /// Queue a failure.
    pub fn then_error(self, error: AppError) -> Self {
        self.responses.lock().unwrap().push(Err(error));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next_response(&self, url: &str) -> Result<Vec<u8>, AppError> {
        self.requests.lock().unwrap().push(url.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(AppError::HttpError(format!("HTTP 404 for {url}")))
        } else {
            responses.remove(0)
        }
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.next_response(url)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        self.next_response(url)
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// Mock store that records saves and optionally fails.
#[derive(Clone)]
pub struct MockStore {
    pub saved: Arc<Mutex<Vec<(FetchedContent, String)>>>,
    save_error: Arc<Mutex<Option<AppError>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            saved: Arc::new(Mutex::new(vec![])),
            save_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Store whose first save fails with `error`.
    pub fn with_save_error(error: AppError) -> Self {
        Self {
            saved: Arc::new(Mutex::new(vec![])),
            save_error: Arc::new(Mutex::new(Some(error))),
        }
    }

    pub fn saved_names(&self) -> Vec<String> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .map(|(content, _)| content.raw_name.clone())
            .collect()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for MockStore {
    async fn save(
        &self,
        content: &FetchedContent,
        output_folder: &str,
    ) -> Result<PathBuf, AppError> {
        if let Some(e) = self.save_error.lock().unwrap().take() {
            return Err(e);
        }
        self.saved
            .lock()
            .unwrap()
            .push((content.clone(), output_folder.to_string()));
        Ok(PathBuf::from(output_folder)
            .join(content.extension())
            .join(content.sanitized_name()))
    }
}
