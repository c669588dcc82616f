//! Environment knobs shared across the workspace.
//!
//! Every knob has a pure `resolve_*`/`parse_*` form taking the raw value,
//! so callers and tests can bypass process environment entirely.

use std::env;
use std::path::{Path, PathBuf};

/// Directory holding the persisted index and auxiliary data files.
pub const ENV_DATA_DIR: &str = "AI_DATA_DIR";
/// Embedding model spec, e.g. `hash-384`.
pub const ENV_EMBED_MODEL: &str = "EMB_LOCAL_MODEL";
/// Selects the contiguous inner-product search backend when truthy.
pub const ENV_FLAT_BACKEND: &str = "USE_FAISS";
/// Overrides the default location of the category priors file.
pub const ENV_PRIORS_PATH: &str = "PS_PRIORS_PATH";

pub const DEFAULT_DATA_DIR: &str = "ai_data";
pub const DEFAULT_DIM: usize = 384;
pub const PRIORS_FILE: &str = "category_ps_priors.json";

#[must_use]
pub fn resolve_data_dir(value: Option<&str>) -> PathBuf {
    value
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Data directory from `AI_DATA_DIR`, defaulting to `ai_data`.
#[must_use]
pub fn data_dir() -> PathBuf {
    resolve_data_dir(env::var(ENV_DATA_DIR).ok().as_deref())
}

/// Accepts `1` and any casing of `true`; everything else is false.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[must_use]
pub fn flat_backend_requested() -> bool {
    env::var(ENV_FLAT_BACKEND)
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

/// Parse a model spec such as `hash-384` into its dimension.
///
/// Unrecognized or malformed specs fall back to [`DEFAULT_DIM`] so a stale
/// setting never blocks an index build.
#[must_use]
pub fn parse_model_dim(spec: Option<&str>) -> usize {
    let Some(spec) = spec else {
        return DEFAULT_DIM;
    };
    match spec.trim().strip_prefix("hash-") {
        Some(d) => d.parse().ok().filter(|&d| d > 0).unwrap_or(DEFAULT_DIM),
        None => DEFAULT_DIM,
    }
}

/// Embedding dimension from `EMB_LOCAL_MODEL`.
#[must_use]
pub fn model_dim() -> usize {
    parse_model_dim(env::var(ENV_EMBED_MODEL).ok().as_deref())
}

/// Priors file location: the override when set and non-empty, otherwise
/// `<data_dir>/category_ps_priors.json`.
#[must_use]
pub fn resolve_priors_path(overridden: Option<&str>, data_dir: &Path) -> PathBuf {
    match overridden {
        Some(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => data_dir.join(PRIORS_FILE),
    }
}

#[must_use]
pub fn priors_path(data_dir: &Path) -> PathBuf {
    resolve_priors_path(env::var(ENV_PRIORS_PATH).ok().as_deref(), data_dir)
}
