//! Read-side access to the risk register.
//!
//! The estimator and the index builder only ever read, so the seam is a
//! small read-only trait. The SQLite adapter lives in the storage crate;
//! [`MemoryStore`] here backs tests and demos.

use crate::domain::{EvalSample, Risk, Suggestion};
use crate::error::Result;

/// Read-only view over the register tables.
pub trait DomainStore: Send + Sync {
    /// Look up a single risk by id.
    fn risk(&self, id: i64) -> Result<Option<Risk>>;

    /// All risks, register order.
    fn risks(&self) -> Result<Vec<Risk>>;

    /// All mitigation suggestions, register order.
    fn suggestions(&self) -> Result<Vec<Suggestion>>;

    /// Completed evaluations joined with their risk's category. Rows where
    /// either score is missing are excluded.
    fn evaluation_samples(&self) -> Result<Vec<EvalSample>>;
}

#[derive(Debug, Clone)]
struct StoredEvaluation {
    risk_id: i64,
    probability: Option<u8>,
    severity: Option<u8>,
}

/// Vec-backed register for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    risks: Vec<Risk>,
    suggestions: Vec<Suggestion>,
    evaluations: Vec<StoredEvaluation>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_risk(&mut self, risk: Risk) {
        self.risks.push(risk);
    }

    pub fn add_suggestion(&mut self, suggestion: Suggestion) {
        self.suggestions.push(suggestion);
    }

    /// Record an evaluation for a risk; partially scored rows are kept but
    /// never surface as samples.
    pub fn add_evaluation(&mut self, risk_id: i64, probability: Option<u8>, severity: Option<u8>) {
        self.evaluations.push(StoredEvaluation {
            risk_id,
            probability,
            severity,
        });
    }
}

impl DomainStore for MemoryStore {
    fn risk(&self, id: i64) -> Result<Option<Risk>> {
        Ok(self.risks.iter().find(|r| r.id == id).cloned())
    }

    fn risks(&self) -> Result<Vec<Risk>> {
        Ok(self.risks.clone())
    }

    fn suggestions(&self) -> Result<Vec<Suggestion>> {
        Ok(self.suggestions.clone())
    }

    fn evaluation_samples(&self) -> Result<Vec<EvalSample>> {
        let mut samples = Vec::new();
        for eval in &self.evaluations {
            let (Some(p), Some(s)) = (eval.probability, eval.severity) else {
                continue;
            };
            // Inner join: evaluations pointing at a missing risk are dropped.
            let Some(risk) = self.risks.iter().find(|r| r.id == eval.risk_id) else {
                continue;
            };
            samples.push(EvalSample::new(
                risk.category.clone(),
                f64::from(p),
                f64::from(s),
            ));
        }
        Ok(samples)
    }
}
