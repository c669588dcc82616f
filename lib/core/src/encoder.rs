//! Text encoding into fixed-dimension embedding vectors.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::env;
use crate::vector::{l2_normalize, Matrix};

/// Embeds free text into L2-normalized fixed-dimension vectors.
///
/// Implementations must be deterministic for the lifetime of an index:
/// a persisted matrix only answers queries encoded the same way it was
/// built.
pub trait TextEncoder: Send + Sync {
    fn dim(&self) -> usize;

    /// Encode one text into an L2-normalized vector of `dim()` floats.
    fn encode(&self, text: &str) -> Vec<f32>;

    /// Encode a batch into an `(N, dim)` matrix.
    fn encode_batch(&self, texts: &[&str]) -> Matrix {
        let mut matrix = Matrix::new(self.dim());
        for text in texts {
            matrix.push_row(&self.encode(text));
        }
        matrix
    }
}

/// Hash-based bag encoder.
///
/// Character trigrams over the two-space-padded lowercased text weight 1.0,
/// whole words weight 2.0; positions come from the std `DefaultHasher`
/// modulo the dimension. The std hasher uses fixed keys, so vectors are
/// stable across processes and a reloaded index scores queries identically.
#[derive(Debug, Clone)]
pub struct HashEncoder {
    dim: usize,
}

impl HashEncoder {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        assert!(dim > 0);
        Self { dim }
    }

    /// Encoder for an `EMB_LOCAL_MODEL` spec (`hash-<dim>`); unrecognized
    /// specs silently fall back to the default dimension.
    #[must_use]
    pub fn from_spec(spec: Option<&str>) -> Self {
        Self::new(env::parse_model_dim(spec))
    }

    /// Encoder configured from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(env::model_dim())
    }

    fn hash_position(&self, token: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        (hasher.finish() as usize) % self.dim
    }
}

impl Default for HashEncoder {
    fn default() -> Self {
        Self::new(env::DEFAULT_DIM)
    }
}

impl TextEncoder for HashEncoder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();

        for trigram in generate_trigrams(&normalized) {
            vector[self.hash_position(&trigram)] += 1.0;
        }

        // Whole words carry more signal than character trigrams.
        for word in normalized.split_whitespace() {
            vector[self.hash_position(word)] += 2.0;
        }

        l2_normalize(&mut vector);
        vector
    }
}

/// Character trigrams over a two-space-padded string. Set semantics:
/// repeated trigrams count once.
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {s}  ");
    let chars: Vec<char> = padded.chars().collect();

    chars
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}
