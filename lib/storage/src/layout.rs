//! On-disk index layout: file names, atomic writes, schema evolution.
//!
//! An index directory holds `embeddings.npy` (the matrix), a best-effort
//! legacy duplicate `emb.npy`, and `meta.json` mapping record ids to text
//! and label. Two meta schemas exist in the wild; the loader takes either,
//! the writer always emits the current one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use riskwise_core::encoder::HashEncoder;
use riskwise_core::env;
use riskwise_core::error::{Error, Result};
use riskwise_core::index::VectorIndex;
use riskwise_core::knn::Backend;
use riskwise_core::vector::Matrix;

use crate::npy;

pub const VECTORS_FILE: &str = "embeddings.npy";
pub const LEGACY_VECTORS_FILE: &str = "emb.npy";
pub const META_FILE: &str = "meta.json";

/// Current meta schema: one entry per record, keyed by stringified id.
/// Extra fields in an entry are tolerated, missing ones default to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MetaEntry {
    #[serde(default)]
    text: String,
    #[serde(default)]
    label: String,
}

/// Legacy meta schema: parallel arrays plus the build-time flags.
#[derive(Debug, Clone, Deserialize)]
struct LegacyMeta {
    ids: Vec<i64>,
    texts: Vec<String>,
    labels: Vec<String>,
    /// Zero when the writing side never recorded a dimension.
    #[serde(default)]
    dim: usize,
    #[serde(default)]
    use_faiss: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MetaSchema {
    Legacy(LegacyMeta),
    Current(BTreeMap<String, MetaEntry>),
}

/// Paths of one persisted index.
#[derive(Debug, Clone)]
pub struct IndexFiles {
    dir: PathBuf,
}

impl IndexFiles {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Rooted at `AI_DATA_DIR` (default `ai_data`).
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(env::data_dir())
    }

    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn vectors_path(&self) -> PathBuf {
        self.dir.join(VECTORS_FILE)
    }

    #[must_use]
    pub fn legacy_vectors_path(&self) -> PathBuf {
        self.dir.join(LEGACY_VECTORS_FILE)
    }

    #[must_use]
    pub fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }

    /// Persist an index.
    ///
    /// Rows are written in ascending-id order so the current-schema loader,
    /// which reads entries back sorted by id, maps them onto the same rows.
    /// Every file goes through a temp-file rename; the legacy vector copy
    /// is best-effort and never fails the save.
    pub fn save(&self, index: &VectorIndex) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let mut order: Vec<usize> = (0..index.len()).collect();
        order.sort_by_key(|&i| index.ids()[i]);

        let mut matrix = Matrix::new(index.dim());
        let mut entries = BTreeMap::new();
        for &i in &order {
            matrix.push_row(index.matrix().row(i));
            entries.insert(
                index.ids()[i].to_string(),
                MetaEntry {
                    text: index.texts()[i].clone(),
                    label: index.labels()[i].clone(),
                },
            );
        }

        let vectors = npy::encode_matrix(&matrix);
        write_atomic(&self.vectors_path(), &vectors)?;
        if let Err(e) = write_atomic(&self.legacy_vectors_path(), &vectors) {
            warn!("skipping legacy vector duplicate: {}", e);
        }

        let meta = serde_json::to_vec_pretty(&entries)?;
        write_atomic(&self.meta_path(), &meta)?;

        info!(
            "persisted {} records ({} dims) under {}",
            index.len(),
            index.dim(),
            self.dir.display()
        );
        Ok(())
    }

    /// Load the index with backend selection from the files/environment.
    pub fn load(&self) -> Result<VectorIndex> {
        self.load_with(None)
    }

    /// Load the index. `prefer_flat` forces the backend; `None` defers to
    /// the legacy file's `use_faiss` flag or, for current-schema files,
    /// the `USE_FAISS` environment setting.
    pub fn load_with(&self, prefer_flat: Option<bool>) -> Result<VectorIndex> {
        let vectors_path = self.resolve_vectors_path()?;
        let matrix = npy::decode_matrix(&std::fs::read(&vectors_path)?)?;

        let meta_path = self.meta_path();
        if !meta_path.exists() {
            return Err(Error::IndexNotFound(self.dir.display().to_string()));
        }
        let schema: MetaSchema = serde_json::from_slice(&std::fs::read(&meta_path)?)?;

        let dim = matrix.dim();
        let (ids, texts, labels, flat) = match schema {
            MetaSchema::Legacy(meta) => {
                if meta.dim != 0 && meta.dim != dim {
                    return Err(Error::DimensionMismatch {
                        expected: meta.dim,
                        actual: dim,
                    });
                }
                let flat = prefer_flat.unwrap_or(meta.use_faiss);
                (meta.ids, meta.texts, meta.labels, flat)
            }
            MetaSchema::Current(entries) => {
                let mut ids = Vec::with_capacity(entries.len());
                for key in entries.keys() {
                    let id: i64 = key.parse().map_err(|_| {
                        Error::Corrupt(format!("meta key {key:?} is not a record id"))
                    })?;
                    ids.push(id);
                }
                ids.sort_unstable();

                let by_id: BTreeMap<i64, MetaEntry> = entries
                    .into_iter()
                    .filter_map(|(k, v)| k.parse().ok().map(|id: i64| (id, v)))
                    .collect();
                let texts = by_id.values().map(|e| e.text.clone()).collect();
                let labels = by_id.values().map(|e| e.label.clone()).collect();
                let flat = prefer_flat.unwrap_or_else(env::flat_backend_requested);
                (ids, texts, labels, flat)
            }
        };

        if ids.len() != matrix.rows() {
            return Err(Error::Corrupt(format!(
                "meta has {} entries, matrix has {} rows",
                ids.len(),
                matrix.rows()
            )));
        }

        // A persisted matrix fixes the dimension; the encoder follows it
        // regardless of the current model spec.
        let encoder = Arc::new(HashEncoder::new(dim));
        VectorIndex::fit(
            encoder,
            Backend::from_flag(flat, dim),
            matrix,
            ids,
            texts,
            labels,
        )
    }

    fn resolve_vectors_path(&self) -> Result<PathBuf> {
        let current = self.vectors_path();
        if current.exists() {
            return Ok(current);
        }
        let legacy = self.legacy_vectors_path();
        if legacy.exists() {
            return Ok(legacy);
        }
        Err(Error::IndexNotFound(self.dir.display().to_string()))
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let temp_file = path.with_extension("tmp");
    std::fs::write(&temp_file, data)?;
    std::fs::rename(&temp_file, path)?;
    Ok(())
}
