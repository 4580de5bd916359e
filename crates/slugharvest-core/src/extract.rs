//! Locating downloadable resources inside host responses.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::traits::ResourceLocator;

/// Text that follows the image URL in a prnt.sc page (`" cro`ssorigin).
pub const IMAGE_MARKER_SUFFIX: &str = "\" cro";

static IMAGE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https://[\w./]*" cro"#).expect("marker pattern is valid"));

static RESOURCE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w*\.\w*\z").expect("name pattern is valid"));

/// Finds the screenshot URL in a prnt.sc page by its trailing attribute.
///
/// Only a page with exactly one marker counts; pages with none, or with
/// several competing candidates, yield nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkerLocator;

impl ResourceLocator for MarkerLocator {
    fn locate(&self, body: &str) -> Option<String> {
        let mut matches = IMAGE_MARKER_RE.find_iter(body);
        let only = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        only.as_str()
            .strip_suffix(IMAGE_MARKER_SUFFIX)
            .map(str::to_string)
    }
}

/// The trailing `name.ext` token of a resource URL.
pub fn resource_name(url: &str) -> Option<String> {
    RESOURCE_NAME_RE.find(url).map(|m| m.as_str().to_string())
}

/// Body of a CloudApp `v2/items/<slug>` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudItemEnvelope {
    pub item: CloudItem,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudItem {
    pub source_url: String,
    pub name: String,
}
