use std::net::IpAddr;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use slugharvest_core::error::AppError;
use slugharvest_core::traits::Fetcher;
use url::{Host, Url};

/// Headers of a mobile Chrome session; the hosts refuse bare clients.
pub const MOBILE_BROWSER_HEADERS: &[(&str, &str)] = &[
    ("authority", "prnt.sc"),
    ("sec-fetch-dest", "image"),
    (
        "user-agent",
        "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/80.0.3987.132 Mobile Safari/537.36",
    ),
    ("dnt", "1"),
    ("accept", "image/webp,image/apng,image/*,*/*;q=0.8"),
    ("sec-fetch-site", "same-origin"),
    ("sec-fetch-mode", "no-cors"),
    ("referer", "https://prnt.sc/"),
    ("accept-language", "ru,en;q=0.9,la;q=0.8"),
];

/// HTTP fetcher using reqwest.
///
/// Every request carries the same static header set. Each instance owns its
/// own connection pool, so harvesters should not share one.
///
/// Resource URLs are taken from remote responses, so by default requests to
/// private/reserved IP ranges are refused. Use
/// [`allow_private_urls`](Self::allow_private_urls) to lift this (e.g. for
/// tests against a local server).
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
    ssrf_protection: bool,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        Self::with_headers(MOBILE_BROWSER_HEADERS, timeout)
    }

    /// Build a fetcher sending `headers` on every request.
    pub fn with_headers(headers: &[(&str, &str)], timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(header_map(headers)?)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
            ssrf_protection: true,
        })
    }

    /// Allow requests to private/reserved addresses (local test servers).
    pub fn allow_private_urls(mut self) -> Self {
        self.ssrf_protection = false;
        self
    }

    async fn get(&self, url: &str) -> Result<Response, AppError> {
        if self.ssrf_protection {
            check_remote_url(url).await?;
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        Ok(response)
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))?;
        tracing::trace!(%url, len = bytes.len(), "Resource downloaded");
        Ok(bytes.to_vec())
    }
}

fn header_map(headers: &[(&str, &str)]) -> Result<HeaderMap, AppError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::try_from(*name)
            .map_err(|e| AppError::ConfigError(format!("Invalid header name '{name}': {e}")))?;
        let value = HeaderValue::try_from(*value).map_err(|e| {
            AppError::ConfigError(format!("Invalid value for header '{name}': {e}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Refuse URLs a remote response could use to reach the local network.
///
/// Resource URLs come straight out of item JSON, so the host is checked
/// against private/reserved ranges after DNS resolution.
async fn check_remote_url(url: &str) -> Result<(), AppError> {
    let parsed =
        Url::parse(url).map_err(|e| AppError::HttpError(format!("Invalid URL {url}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::HttpError(format!(
            "Refusing {url}: scheme '{}' is not http(s)",
            parsed.scheme()
        )));
    }

    let candidates = match parsed.host() {
        Some(Host::Ipv4(v4)) => vec![IpAddr::V4(v4)],
        Some(Host::Ipv6(v6)) => vec![IpAddr::V6(v6)],
        Some(Host::Domain(domain)) => {
            let port = parsed.port_or_known_default().unwrap_or(80);
            resolve(domain, port).await?
        }
        None => return Err(AppError::HttpError(format!("Refusing {url}: no host"))),
    };

    match candidates.into_iter().find(|ip| is_reserved(*ip)) {
        Some(ip) => Err(AppError::HttpError(format!(
            "Refusing {url}: host resolves to reserved address {ip}"
        ))),
        None => Ok(()),
    }
}

async fn resolve(domain: &str, port: u16) -> Result<Vec<IpAddr>, AppError> {
    let ips: Vec<IpAddr> = tokio::net::lookup_host((domain, port))
        .await
        .map_err(|e| AppError::NetworkError(format!("DNS lookup failed for {domain}: {e}")))?
        .map(|addr| addr.ip())
        .collect();

    if ips.is_empty() {
        return Err(AppError::NetworkError(format!(
            "DNS lookup for {domain} returned no addresses"
        )));
    }
    Ok(ips)
}

/// Loopback, private, link-local, CGN and other non-routable ranges.
fn is_reserved(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, ..] = v4.octets();
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || (a == 100 && (b & 0xC0) == 64)
        }
        IpAddr::V6(v6) => {
            let head = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                || (head & 0xFFC0) == 0xFE80
                || (head & 0xFE00) == 0xFC00
                || v6.to_ipv4_mapped().is_some_and(|v4| is_reserved(IpAddr::V4(v4)))
        }
    }
}
