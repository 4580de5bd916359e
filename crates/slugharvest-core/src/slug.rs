//! Slug generation and enumeration.
//!
//! Random slugs are drawn character by character from a [`HarvesterConfig`]'s
//! alphabet. Sequential slugs are read as integers in a base between 2 and 36
//! so a keyspace can be walked from a known recent upload down to `1`.

use rand::Rng;

use crate::error::AppError;
use crate::models::HarvesterConfig;

const MIN_BASE: u32 = 2;
const MAX_BASE: u32 = 36;

/// Draw a random slug using the thread-local RNG.
pub fn random_slug(config: &HarvesterConfig) -> String {
    random_slug_with(config, &mut rand::rng())
}

/// Draw a random slug using the given RNG.
///
/// Each character is picked independently and uniformly; repeats across calls
/// are expected and not tracked.
pub fn random_slug_with<R: Rng>(config: &HarvesterConfig, rng: &mut R) -> String {
    let chars = config.alphabet().chars();
    (0..config.slug_length())
        .map(|_| chars[rng.random_range(0..chars.len())])
        .collect()
}

/// Integer value of `slug` read in `base`. Case-insensitive.
pub fn decode(slug: &str, base: u32) -> Result<u64, AppError> {
    check_base(base)?;
    if slug.is_empty() {
        return Err(AppError::InvalidSlug("slug is empty".into()));
    }

    let mut value: u64 = 0;
    for c in slug.chars() {
        let digit = c.to_digit(base).ok_or_else(|| {
            AppError::InvalidSlug(format!("'{c}' in '{slug}' is not a base-{base} digit"))
        })?;
        value = value
            .checked_mul(u64::from(base))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or_else(|| AppError::InvalidSlug(format!("'{slug}' overflows a 64-bit value")))?;
    }
    Ok(value)
}

/// Lowercase representation of `value` in `base`.
pub fn encode(value: u64, base: u32) -> Result<String, AppError> {
    check_base(base)?;
    Ok(encode_unchecked(value, base))
}

fn encode_unchecked(mut value: u64, base: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let base = u64::from(base);
    let mut digits = Vec::new();
    while value > 0 {
        // remainder < base <= 36, so from_digit always succeeds
        let digit = (value % base) as u32;
        digits.extend(char::from_digit(digit, base as u32));
        value /= base;
    }
    digits.iter().rev().collect()
}

fn check_base(base: u32) -> Result<(), AppError> {
    if (MIN_BASE..=MAX_BASE).contains(&base) {
        Ok(())
    } else {
        Err(AppError::InvalidSlug(format!(
            "base {base} is outside {MIN_BASE}..={MAX_BASE}"
        )))
    }
}

/// Every slug from `start_slug` down to the slug for `1`, newest first.
pub fn enumerate_descending(start_slug: &str, base: u32) -> Result<DescendingSlugs, AppError> {
    let start = decode(start_slug, base)?;
    Ok(DescendingSlugs {
        next: start,
        base,
    })
}

/// Lazy, finite sequence produced by [`enumerate_descending`].
#[derive(Debug, Clone)]
pub struct DescendingSlugs {
    next: u64,
    base: u32,
}

impl DescendingSlugs {
    /// Integer value of the slug the next call to `next()` yields.
    pub fn peek_value(&self) -> Option<u64> {
        (self.next > 0).then_some(self.next)
    }
}

impl Iterator for DescendingSlugs {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next == 0 {
            return None;
        }
        let slug = encode_unchecked(self.next, self.base);
        self.next -= 1;
        Some(slug)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.next) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl ExactSizeIterator for DescendingSlugs {}
