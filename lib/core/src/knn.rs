//! Exact nearest-neighbor search backends.
//!
//! Both backends scan every row; over L2-normalized vectors they return
//! the same ranked top-k, so the choice is a deployment knob rather than a
//! semantic one. Ordering is by descending score with ascending row index
//! breaking exact ties, which keeps rankings stable across row
//! permutations such as a persist/load cycle.

use std::cmp::Ordering;

use crate::env;
use crate::vector::{cosine_similarity, dot, Matrix};

/// Capability shared by the search backends.
pub trait NearestNeighbor: Send + Sync {
    /// Append every row of the matrix to the searchable set.
    fn add(&mut self, matrix: &Matrix);

    /// Top-k `(row, score)` pairs for the query vector.
    fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)>;

    /// Number of indexed rows.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn rank(mut scored: Vec<(usize, f32)>, k: usize) -> Vec<(usize, f32)> {
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    scored.truncate(k);
    scored
}

/// Per-row cosine scan.
#[derive(Debug, Clone)]
pub struct CosineScan {
    rows: Matrix,
}

impl CosineScan {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            rows: Matrix::new(dim),
        }
    }
}

impl NearestNeighbor for CosineScan {
    fn add(&mut self, matrix: &Matrix) {
        for row in matrix.iter_rows() {
            self.rows.push_row(row);
        }
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        let scored = self
            .rows
            .iter_rows()
            .enumerate()
            .map(|(i, row)| (i, cosine_similarity(query, row)))
            .collect();
        rank(scored, k)
    }

    fn len(&self) -> usize {
        self.rows.rows()
    }
}

/// Contiguous flat inner-product scan, the moral equivalent of an
/// `IndexFlatIP` over normalized vectors.
#[derive(Debug, Clone)]
pub struct FlatIp {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIp {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }
}

impl NearestNeighbor for FlatIp {
    fn add(&mut self, matrix: &Matrix) {
        assert_eq!(matrix.dim(), self.dim);
        self.data.extend_from_slice(matrix.as_slice());
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        let scored = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(i, row)| (i, dot(query, row)))
            .collect();
        rank(scored, k)
    }

    fn len(&self) -> usize {
        self.data.len() / self.dim
    }
}

/// The backend selector. Selection never fails in-process: an unknown or
/// unusable preference just lands on the cosine scan.
#[derive(Debug, Clone)]
pub enum Backend {
    CosineScan(CosineScan),
    FlatIp(FlatIp),
}

impl Backend {
    #[must_use]
    pub fn scan(dim: usize) -> Self {
        Backend::CosineScan(CosineScan::new(dim))
    }

    #[must_use]
    pub fn flat(dim: usize) -> Self {
        Backend::FlatIp(FlatIp::new(dim))
    }

    /// Pick by explicit preference.
    #[must_use]
    pub fn from_flag(prefer_flat: bool, dim: usize) -> Self {
        if prefer_flat {
            Self::flat(dim)
        } else {
            Self::scan(dim)
        }
    }

    /// Pick from the `USE_FAISS` environment flag.
    #[must_use]
    pub fn from_env(dim: usize) -> Self {
        Self::from_flag(env::flat_backend_requested(), dim)
    }

    #[inline]
    #[must_use]
    pub fn is_flat(&self) -> bool {
        matches!(self, Backend::FlatIp(_))
    }
}

impl NearestNeighbor for Backend {
    fn add(&mut self, matrix: &Matrix) {
        match self {
            Backend::CosineScan(b) => b.add(matrix),
            Backend::FlatIp(b) => b.add(matrix),
        }
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        match self {
            Backend::CosineScan(b) => b.search(query, k),
            Backend::FlatIp(b) => b.search(query, k),
        }
    }

    fn len(&self) -> usize {
        match self {
            Backend::CosineScan(b) => b.len(),
            Backend::FlatIp(b) => b.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::l2_normalize;

    fn sample_matrix() -> Matrix {
        let mut m = Matrix::new(3);
        for row in [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.6, 0.8, 0.0],
            [0.0, 0.0, 1.0],
        ] {
            let mut v = row.to_vec();
            l2_normalize(&mut v);
            m.push_row(&v);
        }
        m
    }

    #[test]
    fn backends_agree_on_ranking() {
        let matrix = sample_matrix();
        let mut scan = Backend::scan(3);
        let mut flat = Backend::flat(3);
        scan.add(&matrix);
        flat.add(&matrix);

        // Unnormalized query: cosine rescales by the query norm, the flat
        // scan does not, but the ranking is identical. Rows 0 and 1 tie
        // exactly and resolve by row index.
        let query = [0.7, 0.7, 0.1];
        let a = scan.search(&query, 4);
        let b = flat.search(&query, 4);

        let order_a: Vec<usize> = a.iter().map(|(i, _)| *i).collect();
        let order_b: Vec<usize> = b.iter().map(|(i, _)| *i).collect();
        assert_eq!(order_a, vec![2, 0, 1, 3]);
        assert_eq!(order_a, order_b);
    }

    #[test]
    fn backends_agree_for_normalized_queries() {
        let matrix = sample_matrix();
        let mut scan = Backend::scan(3);
        let mut flat = Backend::flat(3);
        scan.add(&matrix);
        flat.add(&matrix);

        let mut query = vec![0.7, 0.7, 0.1];
        l2_normalize(&mut query);
        let a = scan.search(&query, 4);
        let b = flat.search(&query, 4);

        for ((ia, sa), (ib, sb)) in a.iter().zip(b.iter()) {
            assert_eq!(ia, ib);
            assert!((sa - sb).abs() < 1e-5);
        }
    }

    #[test]
    fn identical_rows_tie_break_by_row_index() {
        let mut m = Matrix::new(2);
        m.push_row(&[1.0, 0.0]);
        m.push_row(&[1.0, 0.0]);

        for mut backend in [Backend::scan(2), Backend::flat(2)] {
            backend.add(&m);
            let hits = backend.search(&[1.0, 0.0], 2);
            assert_eq!(hits[0].0, 0);
            assert_eq!(hits[1].0, 1);
        }
    }

    #[test]
    fn truncates_to_k() {
        let matrix = sample_matrix();
        let mut backend = Backend::scan(3);
        backend.add(&matrix);

        assert_eq!(backend.search(&[1.0, 0.0, 0.0], 2).len(), 2);
        assert_eq!(backend.search(&[1.0, 0.0, 0.0], 0).len(), 0);
        assert_eq!(backend.search(&[1.0, 0.0, 0.0], 10).len(), 4);
    }

    #[test]
    fn empty_backend_returns_nothing() {
        let backend = Backend::flat(5);
        assert!(backend.search(&[0.0; 5], 3).is_empty());
        assert!(backend.is_empty());
    }

    #[test]
    fn flag_selects_backend() {
        assert!(Backend::from_flag(true, 4).is_flat());
        assert!(!Backend::from_flag(false, 4).is_flat());
    }
}
