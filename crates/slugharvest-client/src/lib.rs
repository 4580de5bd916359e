pub mod fetcher;

pub use fetcher::{MOBILE_BROWSER_HEADERS, ReqwestFetcher};
