//! Corpus assembly and index builds.
//!
//! The builder pulls indexable text out of the register, optionally mixes in
//! the built-in literature cards and the operator-maintained sentence bank,
//! deduplicates, encodes, and persists a ready-to-search index.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashSet;
use serde::Deserialize;
use tracing::{info, warn};

use riskwise_core::domain::RISK_ID_OFFSET;
use riskwise_core::encoder::{HashEncoder, TextEncoder};
use riskwise_core::error::{Error, Result};
use riskwise_core::facts::{PAPER_FACTS, PAPER_RULE_LABEL};
use riskwise_core::index::VectorIndex;
use riskwise_core::knn::Backend;
use riskwise_core::store::DomainStore;

use crate::layout::IndexFiles;

pub const DEFAULT_MIN_LEN: usize = 5;
pub const SENTENCE_BANK_FILE: &str = "sentences.json";
const SENTENCE_BANK_BASE_ID: i64 = 910_000;

/// Which register tables feed the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusKind {
    Suggestions,
    Risks,
    Both,
}

impl CorpusKind {
    #[inline]
    fn wants_suggestions(self) -> bool {
        matches!(self, Self::Suggestions | Self::Both)
    }

    #[inline]
    fn wants_risks(self) -> bool {
        matches!(self, Self::Risks | Self::Both)
    }
}

/// Builds and persists a [`VectorIndex`] from the register.
///
/// Risk ids are offset by [`RISK_ID_OFFSET`] so they never collide with
/// suggestion ids; literature rows use their own disjoint ranges.
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    kind: CorpusKind,
    min_len: usize,
    include_paper_facts: bool,
    include_sentence_bank: bool,
}

impl IndexBuilder {
    #[must_use]
    pub fn new(kind: CorpusKind) -> Self {
        Self {
            kind,
            min_len: DEFAULT_MIN_LEN,
            include_paper_facts: false,
            include_sentence_bank: true,
        }
    }

    /// Rows shorter than this many characters are skipped.
    #[must_use]
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Mix the built-in literature cards into the corpus.
    #[must_use]
    pub fn with_paper_facts(mut self, include: bool) -> Self {
        self.include_paper_facts = include;
        self
    }

    /// Mix `sentences.json` from the data directory into the corpus.
    #[must_use]
    pub fn with_sentence_bank(mut self, include: bool) -> Self {
        self.include_sentence_bank = include;
        self
    }

    /// Assemble, encode, and persist. Returns the number of indexed records.
    pub fn build(&self, store: &dyn DomainStore, files: &IndexFiles) -> Result<usize> {
        let mut corpus: Vec<(i64, String, String)> = Vec::new();

        if self.kind.wants_suggestions() {
            for s in store.suggestions()? {
                let text = s.text.trim();
                if text.chars().count() >= self.min_len {
                    corpus.push((s.id, text.to_string(), s.category.unwrap_or_default()));
                }
            }
        }

        if self.kind.wants_risks() {
            for r in store.risks()? {
                // An empty description falls back to the title.
                let text = r
                    .description
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .or(r.title.as_deref())
                    .unwrap_or("")
                    .trim();
                if text.chars().count() >= self.min_len {
                    corpus.push((
                        RISK_ID_OFFSET + r.id,
                        text.to_string(),
                        r.category.unwrap_or_default(),
                    ));
                }
            }
        }

        if self.include_paper_facts {
            for fact in PAPER_FACTS {
                corpus.push((fact.id, fact.text.to_string(), PAPER_RULE_LABEL.to_string()));
            }
        }

        if self.include_sentence_bank {
            corpus.extend(load_sentence_bank(files.dir()));
        }

        let mut seen: AHashSet<(String, String)> = AHashSet::default();
        let mut ids = Vec::new();
        let mut texts = Vec::new();
        let mut labels = Vec::new();
        for (id, text, label) in corpus {
            if seen.insert((text.clone(), label.clone())) {
                ids.push(id);
                texts.push(text);
                labels.push(label);
            }
        }

        if ids.is_empty() {
            return Err(Error::CorpusEmpty);
        }

        let encoder = Arc::new(HashEncoder::from_env());
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let matrix = encoder.encode_batch(&refs);
        let dim = matrix.dim();

        let index = VectorIndex::fit(encoder, Backend::from_env(dim), matrix, ids, texts, labels)?;
        files.save(&index)?;
        info!(
            "built index: {} records, {} dims, kind {:?}",
            index.len(),
            dim,
            self.kind
        );
        Ok(index.len())
    }
}

/// Operator-maintained extra sentences, indexed as literature rows.
/// A missing or unreadable file contributes nothing.
fn load_sentence_bank(dir: &Path) -> Vec<(i64, String, String)> {
    #[derive(Deserialize)]
    struct SentenceBank {
        #[serde(default)]
        phrases: Option<BTreeMap<String, Option<Vec<String>>>>,
    }

    let path = dir.join(SENTENCE_BANK_FILE);
    let Ok(raw) = std::fs::read_to_string(&path) else {
        return Vec::new();
    };
    let bank: SentenceBank = match serde_json::from_str(&raw) {
        Ok(bank) => bank,
        Err(e) => {
            warn!("ignoring sentence bank at {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    let mut next_id = SENTENCE_BANK_BASE_ID;
    for sentences in bank.phrases.unwrap_or_default().values() {
        for sentence in sentences.iter().flatten() {
            rows.push((next_id, sentence.clone(), PAPER_RULE_LABEL.to_string()));
            next_id += 1;
        }
    }
    rows
}
