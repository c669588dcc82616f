//! # riskwise Core
//!
//! Core library for the riskwise risk scoring and advisory engine.
//!
//! This crate provides the scoring and retrieval building blocks:
//!
//! - [`PsEstimator`] - Bayes-blended probability/severity suggestions
//! - [`HashEncoder`] - deterministic trigram/word hash embeddings
//! - [`VectorIndex`] - exact nearest-neighbor search over register records
//! - [`Backend`] - cosine-scan vs flat inner-product search selection
//! - [`DomainStore`] - read-only seam to the project risk register
//!
//! ## Example
//!
//! ```rust
//! use riskwise_core::{MemoryStore, PsEstimator, Risk};
//!
//! let mut store = MemoryStore::new();
//! store.add_risk(Risk::new(1).with_category("Beton İşleri"));
//! store.add_evaluation(1, Some(4), Some(5));
//!
//! let mut estimator = PsEstimator::default();
//! estimator.fit_with_priors(&store, None).unwrap();
//!
//! let hint = estimator.suggest(Some("Beton İşleri"));
//! assert!(hint.p >= 1.0 && hint.p <= 5.0);
//! ```

pub mod domain;
pub mod encoder;
pub mod env;
pub mod error;
pub mod estimator;
pub mod facts;
pub mod index;
pub mod knn;
pub mod priors;
pub mod rules;
pub mod store;
pub mod vector;

pub use domain::{EvalSample, Risk, Suggestion, RISK_ID_OFFSET};
pub use encoder::{HashEncoder, TextEncoder};
pub use error::{Error, Result};
pub use estimator::{HintSource, PsEstimator, PsHint};
pub use facts::{PaperFact, PAPER_FACTS, PAPER_RULE_LABEL};
pub use index::{SearchHit, VectorIndex};
pub use knn::{Backend, CosineScan, FlatIp, NearestNeighbor};
pub use priors::{load_priors, CategoryPrior};
pub use rules::{apply_paper_rules, Rule, PAPER_RULES};
pub use store::{DomainStore, MemoryStore};
pub use vector::Matrix;
