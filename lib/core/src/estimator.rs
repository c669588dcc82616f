//! Bayes-blended probability/severity estimation.
//!
//! `PsEstimator` aggregates completed evaluations into global and
//! per-category means, shrinks sparse categories toward the global mean
//! with a pseudo-count weight, optionally overrides categories from an
//! external priors file, and finishes with the literature rule book.

use std::fmt;
use std::path::Path;

use ahash::AHashMap;
use serde::Serialize;

use crate::env;
use crate::error::Result;
use crate::priors::load_priors;
use crate::rules::apply_paper_rules;
use crate::store::DomainStore;

/// Score used for both means until evidence arrives.
pub const DEFAULT_SCORE: f64 = 3.0;

/// Where the base values of a hint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HintSource {
    Global,
    Category,
}

impl fmt::Display for HintSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintSource::Global => f.write_str("global"),
            HintSource::Category => f.write_str("category"),
        }
    }
}

/// One scoring suggestion. `n_cat`/`n_all` are `(P, S)` observation counts;
/// `n_cat` reports raw register counts even when a prior overrode the value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PsHint {
    pub p: f64,
    pub s: f64,
    pub n_cat: (usize, usize),
    pub n_all: (usize, usize),
    pub applied_rules: Vec<String>,
    pub source: HintSource,
}

#[derive(Debug, Clone)]
pub struct PsEstimator {
    alpha: f64,
    round_to: i32,
    global_p: f64,
    global_s: f64,
    cat_p: AHashMap<String, f64>,
    cat_s: AHashMap<String, f64>,
    n_by_cat_p: AHashMap<String, usize>,
    n_by_cat_s: AHashMap<String, usize>,
    n_all_p: usize,
    n_all_s: usize,
}

impl Default for PsEstimator {
    fn default() -> Self {
        Self::new(5.0, 1)
    }
}

impl PsEstimator {
    /// `alpha` is the shrinkage pseudo-count: how many global-mean
    /// observations a category must outweigh before its own mean dominates.
    /// `round_to` is the decimal precision of every stored and returned value.
    #[must_use]
    pub fn new(alpha: f64, round_to: i32) -> Self {
        Self {
            alpha,
            round_to,
            global_p: DEFAULT_SCORE,
            global_s: DEFAULT_SCORE,
            cat_p: AHashMap::new(),
            cat_s: AHashMap::new(),
            n_by_cat_p: AHashMap::new(),
            n_by_cat_s: AHashMap::new(),
            n_all_p: 0,
            n_all_s: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn global_p(&self) -> f64 {
        self.global_p
    }

    #[inline]
    #[must_use]
    pub fn global_s(&self) -> f64 {
        self.global_s
    }

    #[inline]
    #[must_use]
    pub fn sample_counts(&self) -> (usize, usize) {
        (self.n_all_p, self.n_all_s)
    }

    /// Fit from the store, then apply priors from the environment-resolved
    /// path (`PS_PRIORS_PATH` else `<AI_DATA_DIR>/category_ps_priors.json`).
    pub fn fit(&mut self, store: &dyn DomainStore) -> Result<()> {
        let priors = env::priors_path(&env::data_dir());
        self.fit_with_priors(store, Some(&priors))
    }

    /// Fit from the store with an explicit priors location, or none at all.
    ///
    /// State is reset up front, so a failing store read leaves the estimator
    /// at its defaults rather than with a stale fit.
    pub fn fit_with_priors(
        &mut self,
        store: &dyn DomainStore,
        priors_path: Option<&Path>,
    ) -> Result<()> {
        self.reset();
        let samples = store.evaluation_samples()?;

        let mut p_all = Vec::with_capacity(samples.len());
        let mut s_all = Vec::with_capacity(samples.len());
        let mut by_cat_p: AHashMap<String, Vec<f64>> = AHashMap::new();
        let mut by_cat_s: AHashMap<String, Vec<f64>> = AHashMap::new();

        for sample in &samples {
            p_all.push(sample.probability);
            s_all.push(sample.severity);
            // Uncategorized rows still count toward the globals.
            if let Some(cat) = sample.category.as_deref().filter(|c| !c.is_empty()) {
                by_cat_p
                    .entry(cat.to_string())
                    .or_default()
                    .push(sample.probability);
                by_cat_s
                    .entry(cat.to_string())
                    .or_default()
                    .push(sample.severity);
            }
        }

        if let Some(m) = mean(&p_all) {
            self.global_p = round_to(m, self.round_to);
        }
        if let Some(m) = mean(&s_all) {
            self.global_s = round_to(m, self.round_to);
        }
        self.n_all_p = p_all.len();
        self.n_all_s = s_all.len();

        for (cat, values) in &by_cat_p {
            let local = values.iter().sum::<f64>() / values.len() as f64;
            let blended = self.bayes_blend(local, values.len(), self.global_p);
            self.cat_p.insert(cat.clone(), round_to(blended, self.round_to));
            self.n_by_cat_p.insert(cat.clone(), values.len());
        }
        for (cat, values) in &by_cat_s {
            let local = values.iter().sum::<f64>() / values.len() as f64;
            let blended = self.bayes_blend(local, values.len(), self.global_s);
            self.cat_s.insert(cat.clone(), round_to(blended, self.round_to));
            self.n_by_cat_s.insert(cat.clone(), values.len());
        }

        if let Some(path) = priors_path {
            self.apply_priors(path);
        }
        Ok(())
    }

    /// Suggest P/S for a category. The category name is matched exactly
    /// against the fitted tables; P and S fall back to the global means
    /// independently, and the rule book runs last.
    #[must_use]
    pub fn suggest(&self, category: Option<&str>) -> PsHint {
        let mut p = self.global_p;
        let mut s = self.global_s;
        let mut n_cat_p = 0;
        let mut n_cat_s = 0;
        let mut source = HintSource::Global;

        if let Some(cat) = category.filter(|c| !c.is_empty()) {
            if let Some(&v) = self.cat_p.get(cat) {
                p = v;
                n_cat_p = self.n_by_cat_p.get(cat).copied().unwrap_or(0);
                source = HintSource::Category;
            }
            if let Some(&v) = self.cat_s.get(cat) {
                s = v;
                n_cat_s = self.n_by_cat_s.get(cat).copied().unwrap_or(0);
                source = HintSource::Category;
            }
        }

        let (p, s, applied_rules) = apply_paper_rules(category, p, s);

        PsHint {
            p: round_to(p, self.round_to),
            s: round_to(s, self.round_to),
            n_cat: (n_cat_p, n_cat_s),
            n_all: (self.n_all_p, self.n_all_s),
            applied_rules,
            source,
        }
    }

    fn reset(&mut self) {
        self.global_p = DEFAULT_SCORE;
        self.global_s = DEFAULT_SCORE;
        self.cat_p.clear();
        self.cat_s.clear();
        self.n_by_cat_p.clear();
        self.n_by_cat_s.clear();
        self.n_all_p = 0;
        self.n_all_s = 0;
    }

    /// `(n·mean + α·global) / (n + α)`
    fn bayes_blend(&self, sample_mean: f64, sample_n: usize, global_mean: f64) -> f64 {
        (sample_n as f64 * sample_mean + self.alpha * global_mean) / (sample_n as f64 + self.alpha)
    }

    /// Priors are authoritative where provided: listed categories are
    /// overridden outright and the globals are re-derived from the prior
    /// means. Categories absent from the file keep their blended values.
    fn apply_priors(&mut self, path: &Path) {
        let Some(priors) = load_priors(path) else {
            return;
        };

        for (cat, prior) in &priors {
            if let Some(p_mean) = prior.p_mean {
                self.cat_p.insert(cat.clone(), round_to(p_mean, self.round_to));
            }
            if let Some(s_mean) = prior.s_mean {
                self.cat_s.insert(cat.clone(), round_to(s_mean, self.round_to));
            }
        }

        let vals_p: Vec<f64> = priors.values().filter_map(|pr| pr.p_mean).collect();
        let vals_s: Vec<f64> = priors.values().filter_map(|pr| pr.s_mean).collect();
        if let Some(m) = mean(&vals_p) {
            self.global_p = round_to(m, self.round_to);
        }
        if let Some(m) = mean(&vals_s) {
            self.global_s = round_to(m, self.round_to);
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Risk;
    use crate::store::MemoryStore;
    use std::fs;

    fn seed(store: &mut MemoryStore, id: i64, category: &str, scores: &[(u8, u8)]) {
        store.add_risk(Risk::new(id).with_category(category));
        for &(p, s) in scores {
            store.add_evaluation(id, Some(p), Some(s));
        }
    }

    #[test]
    fn empty_store_yields_global_defaults() {
        let store = MemoryStore::new();
        let mut est = PsEstimator::default();
        est.fit_with_priors(&store, None).unwrap();

        let hint = est.suggest(Some("Electrical"));
        assert_eq!(hint.p, 3.0);
        assert_eq!(hint.s, 3.0);
        assert_eq!(hint.source, HintSource::Global);
        assert!(hint.applied_rules.is_empty());
        assert_eq!(hint.n_cat, (0, 0));
        assert_eq!(hint.n_all, (0, 0));
    }

    #[test]
    fn supply_chain_delay_on_empty_store() {
        let store = MemoryStore::new();
        let mut est = PsEstimator::default();
        est.fit_with_priors(&store, None).unwrap();

        let hint = est.suggest(Some("Supply Chain Delay"));
        assert_eq!(hint.p, 3.2);
        assert_eq!(hint.s, 3.0);
        assert_eq!(hint.source, HintSource::Global);
        assert_eq!(hint.applied_rules, vec!["supply:p×1.08,s×1.00".to_string()]);
        assert_eq!(hint.n_cat, (0, 0));
        assert_eq!(hint.n_all, (0, 0));
    }

    #[test]
    fn beton_category_shrinks_toward_global() {
        let mut store = MemoryStore::new();
        // 10 beton evaluations averaging P=4 S=5, 40 rows overall
        // averaging P=3 S=3.
        seed(&mut store, 1, "beton", &[(4, 5); 10]);
        let mut filler = Vec::new();
        filler.extend_from_slice(&[(3, 3); 10]);
        filler.extend_from_slice(&[(3, 2); 10]);
        filler.extend_from_slice(&[(2, 2); 10]);
        seed(&mut store, 2, "Mekanik", &filler);

        let mut est = PsEstimator::default();
        est.fit_with_priors(&store, None).unwrap();
        assert_eq!(est.global_p(), 3.0);
        assert_eq!(est.global_s(), 3.0);

        let hint = est.suggest(Some("beton"));
        assert_eq!(hint.p, 3.7);
        assert_eq!(hint.s, 4.3);
        assert_eq!(hint.source, HintSource::Category);
        assert!(hint.applied_rules.is_empty());
        assert_eq!(hint.n_cat, (10, 10));
        assert_eq!(hint.n_all, (40, 40));
    }

    #[test]
    fn legal_regulatory_compounds_severity() {
        let store = MemoryStore::new();
        let mut est = PsEstimator::default();
        est.fit_with_priors(&store, None).unwrap();

        let hint = est.suggest(Some("Legal/Regulatory"));
        assert_eq!(hint.p, 3.0);
        assert_eq!(hint.s, 3.6);
        assert_eq!(hint.source, HintSource::Global);
        assert_eq!(hint.applied_rules.len(), 2);
    }

    #[test]
    fn shrinkage_stays_between_local_and_global() {
        let mut store = MemoryStore::new();
        seed(&mut store, 1, "Vinç", &[(5, 5)]);
        seed(&mut store, 2, "Mekanik", &[(3, 3); 9]);

        let mut est = PsEstimator::default();
        est.fit_with_priors(&store, None).unwrap();

        // global 3.2; one (5,5) sample shrinks to (1·5 + 5·3.2)/6 = 3.5
        assert_eq!(est.global_p(), 3.2);
        let hint = est.suggest(Some("Vinç"));
        assert_eq!(hint.p, 3.5);
        assert!(hint.p >= est.global_p() && hint.p <= 5.0);
        assert_eq!(hint.n_cat, (1, 1));
    }

    #[test]
    fn priors_override_categories_and_globals() {
        let mut store = MemoryStore::new();
        seed(&mut store, 1, "Beton", &[(2, 2); 2]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("priors.json");
        fs::write(&path, r#"{"Beton": {"p_mean": 4.5, "s_mean": 2.0, "n": 3}}"#).unwrap();

        let mut est = PsEstimator::default();
        est.fit_with_priors(&store, Some(&path)).unwrap();

        let hint = est.suggest(Some("Beton"));
        assert_eq!(hint.p, 4.5);
        assert_eq!(hint.s, 2.0);
        assert_eq!(hint.source, HintSource::Category);
        // Counts keep reporting the register evidence, not the prior's n.
        assert_eq!(hint.n_cat, (2, 2));

        // Globals are re-derived from the prior means, so unlisted
        // categories now fall back to them.
        let other = est.suggest(Some("Çevre"));
        assert_eq!(other.p, 4.5);
        assert_eq!(other.s, 2.0);
        assert_eq!(other.source, HintSource::Global);
    }

    #[test]
    fn prior_only_category_falls_back_per_component() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("priors.json");
        fs::write(&path, r#"{"Lojistik": {"p_mean": 4.0}}"#).unwrap();

        let mut est = PsEstimator::default();
        est.fit_with_priors(&store, Some(&path)).unwrap();

        let hint = est.suggest(Some("Lojistik"));
        assert_eq!(hint.p, 4.0);
        assert_eq!(hint.s, 3.0);
        assert_eq!(hint.source, HintSource::Category);
        assert_eq!(hint.n_cat, (0, 0));
    }

    #[test]
    fn extreme_prior_is_clamped_by_rules() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("priors.json");
        fs::write(
            &path,
            r#"{"Hava Koşulları": {"p_mean": 9.9, "s_mean": 0.2}}"#,
        )
        .unwrap();

        let mut est = PsEstimator::default();
        est.fit_with_priors(&store, Some(&path)).unwrap();

        let hint = est.suggest(Some("Hava Koşulları"));
        assert_eq!(hint.p, 5.0);
        assert_eq!(hint.s, 1.0);
        assert_eq!(hint.applied_rules, vec!["hava:p×1.08,s×1.00".to_string()]);
    }

    #[test]
    fn refit_resets_previous_state() {
        let mut seeded = MemoryStore::new();
        seed(&mut seeded, 1, "Beton", &[(5, 5); 4]);

        let mut est = PsEstimator::default();
        est.fit_with_priors(&seeded, None).unwrap();
        assert_eq!(est.global_p(), 5.0);

        let empty = MemoryStore::new();
        est.fit_with_priors(&empty, None).unwrap();
        assert_eq!(est.global_p(), 3.0);
        assert_eq!(est.sample_counts(), (0, 0));
        let hint = est.suggest(Some("Beton"));
        assert_eq!(hint.source, HintSource::Global);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_to(3.666, 1), 3.7);
        assert_eq!(round_to(4.333, 1), 4.3);
        assert_eq!(round_to(3.25, 1), 3.3);
        assert_eq!(round_to(3.0, 1), 3.0);
    }
}
