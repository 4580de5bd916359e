use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

/// Bucket used for files whose name carries no usable extension.
pub const UNKNOWN_EXTENSION: &str = "unknown";

static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\w*)\z").expect("extension pattern is valid"));

/// Character classes a slug may be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
}

impl Alphabet {
    pub const ALL: Alphabet = Alphabet {
        lowercase: true,
        uppercase: true,
        digits: true,
    };

    pub const DIGITS: Alphabet = Alphabet {
        lowercase: false,
        uppercase: false,
        digits: true,
    };

    /// Characters in draw order: lowercase, uppercase, then digits.
    pub fn chars(&self) -> Vec<char> {
        let mut chars = Vec::with_capacity(62);
        if self.lowercase {
            chars.extend('a'..='z');
        }
        if self.uppercase {
            chars.extend('A'..='Z');
        }
        if self.digits {
            chars.extend('0'..='9');
        }
        chars
    }

    pub fn is_empty(&self) -> bool {
        !(self.lowercase || self.uppercase || self.digits)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::ALL
    }
}

/// Immutable per-harvester configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvesterConfig {
    name: String,
    base_url: String,
    slug_length: usize,
    alphabet: Alphabet,
    output_folder: String,
}

impl HarvesterConfig {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        slug_length: usize,
        alphabet: Alphabet,
        output_folder: impl Into<String>,
    ) -> Result<Self, AppError> {
        let config = Self {
            name: name.into(),
            base_url: base_url.into(),
            slug_length,
            alphabet,
            output_folder: output_folder.into(),
        };

        if config.base_url.is_empty() {
            return Err(AppError::ConfigError(format!(
                "{}: base URL must not be empty",
                config.name
            )));
        }
        if config.slug_length == 0 {
            return Err(AppError::ConfigError(format!(
                "{}: slug length must be at least 1",
                config.name
            )));
        }
        if config.alphabet.is_empty() {
            return Err(AppError::ConfigError(format!(
                "{}: alphabet must enable at least one character class",
                config.name
            )));
        }
        if config.output_folder.is_empty() {
            return Err(AppError::ConfigError(format!(
                "{}: output folder must not be empty",
                config.name
            )));
        }

        Ok(config)
    }

    /// prnt.sc: six-character slugs, saved under `prntsc/`.
    pub fn prntsc() -> Self {
        Self {
            name: "prnt.sc".into(),
            base_url: "https://prnt.sc/".into(),
            slug_length: 6,
            alphabet: Alphabet::ALL,
            output_folder: "prntsc".into(),
        }
    }

    /// CloudApp item API: four-character slugs, saved under `myclly/`.
    pub fn cloudapp() -> Self {
        Self {
            name: "CloudApp".into(),
            base_url: "https://my.cl.ly/v2/items/".into(),
            slug_length: 4,
            alphabet: Alphabet::ALL,
            output_folder: "myclly".into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn slug_length(&self) -> usize {
        self.slug_length
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn output_folder(&self) -> &str {
        &self.output_folder
    }

    /// Candidate URL for a slug: the base URL with the slug appended.
    pub fn url_for(&self, slug: &str) -> String {
        format!("{}{}", self.base_url, slug)
    }
}

/// Where a sequential walk starts and in which base its slugs are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    pub start_slug: String,
    pub base: u32,
}

impl Enumeration {
    pub fn new(start_slug: impl Into<String>, base: u32) -> Self {
        Self {
            start_slug: start_slug.into(),
            base,
        }
    }
}

impl Default for Enumeration {
    /// A recent prnt.sc upload; the walk proceeds from newer to older.
    fn default() -> Self {
        Self::new("ta78nv", 36)
    }
}

/// Bytes retrieved for one slug, together with the name the host gave them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    pub bytes: Vec<u8>,
    pub raw_name: String,
}

impl FetchedContent {
    pub fn new(bytes: Vec<u8>, raw_name: impl Into<String>) -> Self {
        Self {
            bytes,
            raw_name: raw_name.into(),
        }
    }

    /// `raw_name` with path separators replaced by `-`.
    pub fn sanitized_name(&self) -> String {
        self.raw_name.replace('/', "-")
    }

    /// Lowercased suffix after the final dot, or [`UNKNOWN_EXTENSION`].
    pub fn extension(&self) -> String {
        EXTENSION_RE
            .captures(&self.raw_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| UNKNOWN_EXTENSION.to_string())
    }

    /// False for names that would resolve to a directory once joined.
    pub fn has_storable_name(&self) -> bool {
        !matches!(self.sanitized_name().as_str(), "" | "." | "..")
    }
}

/// Counters reported when a harvester stops without error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Candidate slugs requested.
    pub attempts: u64,
    /// Items written to the content store.
    pub saved: u64,
    /// Candidates that yielded nothing to save.
    pub empty: u64,
}
