//! Optional external category priors.
//!
//! The priors file lets planners feed curated category means into the
//! estimator ahead of (or instead of) register evidence. It is always
//! optional: a missing or unreadable file simply contributes nothing.

use std::path::Path;

use ahash::AHashMap;
use serde::Deserialize;

/// One priors-file entry. Either mean may be absent, in which case only
/// the other component is overridden. `n` is informational.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CategoryPrior {
    #[serde(default)]
    pub p_mean: Option<f64>,
    #[serde(default)]
    pub s_mean: Option<f64>,
    #[serde(default)]
    pub n: Option<u64>,
}

/// Parsed priors file keyed by category name.
pub type PriorsTable = AHashMap<String, CategoryPrior>;

/// Read and parse a priors file.
///
/// Any failure (absent file, unreadable file, malformed JSON) yields
/// `None`. Callers treat that as "no priors", never as an error.
#[must_use]
pub fn load_priors(path: &Path) -> Option<PriorsTable> {
    let raw = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}
