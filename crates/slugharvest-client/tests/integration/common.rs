use std::path::Path;

use slugharvest_client::ReqwestFetcher;
use slugharvest_core::{Alphabet, HarvesterConfig};
use wiremock::MockServer;

/// Fetcher with the default header profile, allowed to reach the local mock server.
pub fn local_fetcher() -> ReqwestFetcher {
    ReqwestFetcher::new()
        .expect("build fetcher")
        .allow_private_urls()
}

/// Harvester config whose base URL points at `server` under `prefix`.
pub fn config_for(server: &MockServer, prefix: &str, slug_length: usize) -> HarvesterConfig {
    HarvesterConfig::new(
        "mock",
        format!("{}{prefix}", server.uri()),
        slug_length,
        Alphabet::DIGITS,
        "out",
    )
    .expect("valid config")
}

/// Every regular file below `dir`, as paths relative to it.
pub fn files_under(dir: &Path) -> Vec<String> {
    let mut found = Vec::new();
    collect(dir, dir, &mut found);
    found.sort();
    found
}

fn collect(root: &Path, dir: &Path, found: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, found);
        } else if let Ok(relative) = path.strip_prefix(root) {
            found.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
}
