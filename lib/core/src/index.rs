//! The searchable record index.
//!
//! A `VectorIndex` binds parallel `ids/texts/labels` lists to a row-major
//! embedding matrix, an exact search backend, and the encoder that
//! produced the rows. It is immutable once fitted; rebuilds produce a new
//! instance.

use std::sync::Arc;

use serde::Serialize;

use crate::encoder::TextEncoder;
use crate::error::{Error, Result};
use crate::knn::{Backend, NearestNeighbor};
use crate::vector::{l2_normalize, Matrix};

/// One ranked search result. `score` is cosine similarity in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub text: String,
    pub label: String,
    pub score: f32,
}

pub struct VectorIndex {
    ids: Vec<i64>,
    texts: Vec<String>,
    labels: Vec<String>,
    matrix: Matrix,
    backend: Backend,
    encoder: Arc<dyn TextEncoder>,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("ids", &self.ids)
            .field("texts", &self.texts)
            .field("labels", &self.labels)
            .field("matrix", &self.matrix)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl VectorIndex {
    /// Bind records to their embedding rows and build the backend.
    ///
    /// Rows are re-normalized here so persisted matrices and freshly
    /// encoded ones go through the same path. Fails when the encoder and
    /// matrix disagree on dimension, or when the parallel lists do not
    /// line up with the matrix rows.
    pub fn fit(
        encoder: Arc<dyn TextEncoder>,
        mut backend: Backend,
        mut matrix: Matrix,
        ids: Vec<i64>,
        texts: Vec<String>,
        labels: Vec<String>,
    ) -> Result<Self> {
        if encoder.dim() != matrix.dim() {
            return Err(Error::DimensionMismatch {
                expected: encoder.dim(),
                actual: matrix.dim(),
            });
        }
        let rows = matrix.rows();
        if ids.len() != rows || texts.len() != rows || labels.len() != rows {
            return Err(Error::Corrupt(format!(
                "record lists ({}/{}/{}) do not match {} matrix rows",
                ids.len(),
                texts.len(),
                labels.len(),
                rows
            )));
        }

        matrix.normalize_rows();
        backend.add(&matrix);

        Ok(Self {
            ids,
            texts,
            labels,
            matrix,
            backend,
            encoder,
        })
    }

    /// Encode the query and return the ranked top-k records.
    #[must_use]
    pub fn search(&self, query: &str, k: usize) -> Vec<SearchHit> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut q = self.encoder.encode(query);
        l2_normalize(&mut q);

        self.backend
            .search(&q, k)
            .into_iter()
            .map(|(row, score)| SearchHit {
                id: self.ids[row],
                text: self.texts[row].clone(),
                label: self.labels[row].clone(),
                score,
            })
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.matrix.dim()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    #[inline]
    #[must_use]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    #[inline]
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[inline]
    #[must_use]
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    #[inline]
    #[must_use]
    pub fn uses_flat_backend(&self) -> bool {
        self.backend.is_flat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::HashEncoder;

    fn build_index(texts: &[&str], backend: Backend) -> VectorIndex {
        let encoder = Arc::new(HashEncoder::new(128));
        let matrix = encoder.encode_batch(texts);
        let ids: Vec<i64> = (1..=texts.len() as i64).collect();
        let labels = vec!["Genel".to_string(); texts.len()];
        let texts: Vec<String> = texts.iter().map(|t| (*t).to_string()).collect();
        VectorIndex::fit(encoder, backend, matrix, ids, texts, labels).unwrap()
    }

    #[test]
    fn self_query_ranks_itself_first() {
        let texts = ["beton dökümü gecikmesi", "çelik montaj hatası", "hafriyat izin süreci"];
        let index = build_index(&texts, Backend::scan(128));

        for (i, text) in texts.iter().enumerate() {
            let hits = index.search(text, 1);
            assert_eq!(hits[0].id, i as i64 + 1);
            assert!(hits[0].score > 0.99);
        }
    }

    #[test]
    fn search_is_idempotent() {
        let index = build_index(
            &["tedarik zinciri", "hava muhalefeti", "vinç bakımı"],
            Backend::flat(128),
        );

        let first = index.search("tedarik gecikmesi", 3);
        let second = index.search("tedarik gecikmesi", 3);
        assert_eq!(first, second);
    }

    #[test]
    fn hits_carry_labels() {
        let index = build_index(&["beton kürü"], Backend::scan(128));
        let hits = index.search("beton kürü", 1);
        assert_eq!(hits[0].label, "Genel");
        assert_eq!(hits[0].text, "beton kürü");
    }

    #[test]
    fn encoder_matrix_dimension_must_agree() {
        let encoder = Arc::new(HashEncoder::new(64));
        let matrix = Matrix::new(32);
        let err = VectorIndex::fit(encoder, Backend::scan(32), matrix, vec![], vec![], vec![])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 64,
                actual: 32
            }
        ));
    }

    #[test]
    fn ragged_record_lists_are_rejected() {
        let encoder = Arc::new(HashEncoder::new(16));
        let matrix = encoder.encode_batch(&["tek kayıt"]);
        let err = VectorIndex::fit(
            encoder,
            Backend::scan(16),
            matrix,
            vec![1, 2],
            vec!["tek kayıt".to_string()],
            vec!["Genel".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Corrupt(_)));
    }

    #[test]
    fn empty_index_returns_no_hits() {
        let encoder = Arc::new(HashEncoder::new(16));
        let index = VectorIndex::fit(
            encoder,
            Backend::scan(16),
            Matrix::new(16),
            vec![],
            vec![],
            vec![],
        )
        .unwrap();
        assert!(index.search("her şey", 5).is_empty());
        assert!(index.is_empty());
    }
}
