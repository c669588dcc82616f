//! Dense row-major matrix plus the float ops shared by the search backends.

/// Contiguous row-major `(rows, dim)` float32 matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    dim: usize,
    data: Vec<f32>,
}

impl Matrix {
    #[inline]
    #[must_use]
    pub fn new(dim: usize) -> Self {
        assert!(dim > 0);
        Self {
            dim,
            data: Vec::new(),
        }
    }

    /// Build from a contiguous row-major buffer.
    ///
    /// # Panics
    /// Panics when `data.len()` is not a multiple of `dim`.
    #[must_use]
    pub fn from_flat(dim: usize, data: Vec<f32>) -> Self {
        assert!(dim > 0);
        assert_eq!(data.len() % dim, 0);
        Self { dim, data }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.len() / self.dim
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> &[f32] {
        &self.data[index * self.dim..(index + 1) * self.dim]
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn push_row(&mut self, row: &[f32]) {
        assert_eq!(row.len(), self.dim);
        self.data.extend_from_slice(row);
    }

    #[inline]
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dim)
    }

    /// Normalize every row to unit length in place.
    pub fn normalize_rows(&mut self) {
        for row in self.data.chunks_exact_mut(self.dim) {
            l2_normalize(row);
        }
    }
}

#[inline]
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
#[must_use]
pub fn norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

/// Normalize to unit length in place; zero vectors are left untouched.
#[inline]
pub fn l2_normalize(v: &mut [f32]) {
    let n = norm(v);
    if n > f32::EPSILON {
        let inv_norm = 1.0 / n;
        for x in v {
            *x *= inv_norm;
        }
    }
}

/// Cosine similarity; zero vectors and dimension mismatches score 0.
#[inline]
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot(a, b) / (norm_a * norm_b)
}
