//! # riskwise
//!
//! A deterministic risk scoring and advisory engine for construction
//! project registers.
//!
//! riskwise reads a project register (risks, evaluations, mitigation
//! suggestions), estimates probability/severity scores with Bayesian
//! shrinkage, retrieves similar records and literature rules through a
//! local hashed-embedding index, and composes a reproducible Turkish
//! Markdown advisory per risk.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! riskwise build --db riskapp.db --kind both --paper-facts
//! riskwise advise --db riskapp.db --risk-id 42 --today 2025-03-01
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use riskwise::prelude::*;
//! use std::sync::Arc;
//!
//! let mut store = MemoryStore::new();
//! store.add_risk(
//!     Risk::new(1)
//!         .with_title("Beton dökümünde gecikme")
//!         .with_category("Beton İşleri"),
//! );
//! store.add_evaluation(1, Some(4), Some(5));
//!
//! // Estimate P/S for a category
//! let mut estimator = PsEstimator::default();
//! estimator.fit_with_priors(&store, None).unwrap();
//! let hint = estimator.suggest(Some("Beton İşleri"));
//! println!("P={:.1} S={:.1}", hint.p, hint.s);
//!
//! // Compose the advisory
//! let today = chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
//! let ctx = AdvisoryContext::new(Arc::new(store), None, today);
//! println!("{}", ctx.compose(1));
//! ```
//!
//! ## Crate Structure
//!
//! riskwise is composed of several crates:
//!
//! - `riskwise-core` - Estimator, rule book, hashed text encoder, vector index
//! - `riskwise-storage` - NPY/meta persistence, SQLite register adapter, index builder
//! - `riskwise-advisory` - Action plans, advisory composition, retrieval digests
//!
//! ## Features
//!
//! - **Bayesian P/S estimation**: per-category shrinkage toward the global mean
//! - **Literature rule book**: substring-keyed multipliers with a [1, 5] clamp
//! - **Deterministic embeddings**: hashed trigram/word encoder, no model downloads
//! - **Two search backends**: brute-force cosine scan and flat inner product
//! - **Schema-evolved persistence**: NPY vectors plus current/legacy JSON meta
//! - **Reproducible advisories**: fixed `today` makes output byte-identical

// Re-export core types
pub use riskwise_core::{
    apply_paper_rules, Backend, CosineScan, DomainStore, Error, EvalSample, FlatIp, HashEncoder,
    HintSource, Matrix, MemoryStore, NearestNeighbor, PaperFact, PsEstimator, PsHint, Result,
    Risk, SearchHit, Suggestion, TextEncoder, VectorIndex, PAPER_FACTS, PAPER_RULE_LABEL,
    RISK_ID_OFFSET,
};

// Re-export storage
pub use riskwise_storage::{CorpusKind, IndexBuilder, IndexFiles, SqliteStore};

// Re-export advisory
pub use riskwise_advisory::{
    compose, propose_actions, ActionItem, AdvisoryContext, AnswerStyle, NOT_FOUND_NOTICE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AdvisoryContext, AnswerStyle, Backend, CorpusKind, DomainStore, Error, EvalSample,
        HashEncoder, HintSource, IndexBuilder, IndexFiles, MemoryStore, PsEstimator, PsHint,
        Result, Risk, SearchHit, SqliteStore, Suggestion, TextEncoder, VectorIndex,
    };
}
