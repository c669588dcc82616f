//! Request-scoped dependencies for advisory composition.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;
use tracing::warn;

use riskwise_core::error::Result;
use riskwise_core::index::{SearchHit, VectorIndex};
use riskwise_core::store::DomainStore;
use riskwise_storage::layout::IndexFiles;

use crate::answer::{self, AnswerStyle};
use crate::composer;

/// Everything one advisory request needs: the register, the search index,
/// and a fixed `today` so output is reproducible.
///
/// The index handle is swappable; [`reload`](Self::reload) installs a fresh
/// `Arc` after a rebuild while readers of the previous one are unaffected.
pub struct AdvisoryContext {
    store: Arc<dyn DomainStore>,
    index: RwLock<Option<Arc<VectorIndex>>>,
    files: Option<IndexFiles>,
    today: NaiveDate,
}

impl AdvisoryContext {
    /// Open against on-disk index files. A missing or unreadable index is
    /// not an error; composition degrades to no literature context.
    pub fn open(store: Arc<dyn DomainStore>, files: IndexFiles, today: NaiveDate) -> Self {
        let index = match files.load() {
            Ok(index) => Some(Arc::new(index)),
            Err(e) => {
                warn!("advisory index unavailable: {}", e);
                None
            }
        };
        Self {
            store,
            index: RwLock::new(index),
            files: Some(files),
            today,
        }
    }

    /// Inject a pre-built index (or none) directly.
    #[must_use]
    pub fn new(
        store: Arc<dyn DomainStore>,
        index: Option<Arc<VectorIndex>>,
        today: NaiveDate,
    ) -> Self {
        Self {
            store,
            index: RwLock::new(index),
            files: None,
            today,
        }
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &dyn DomainStore {
        self.store.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Current index handle, if one is loaded.
    #[must_use]
    pub fn index(&self) -> Option<Arc<VectorIndex>> {
        self.index.read().clone()
    }

    /// Re-read the on-disk files and swap the index handle. Contexts built
    /// with [`new`](Self::new) have no backing files and keep their index.
    pub fn reload(&self) -> Result<()> {
        let Some(files) = &self.files else {
            return Ok(());
        };
        let index = files.load()?;
        *self.index.write() = Some(Arc::new(index));
        Ok(())
    }

    /// Search the index; an absent index yields no hits.
    #[must_use]
    pub fn search(&self, query: &str, k: usize) -> Vec<SearchHit> {
        match self.index() {
            Some(index) => index.search(query, k),
            None => Vec::new(),
        }
    }

    /// Render the advisory for a risk id. See [`composer::compose`].
    #[must_use]
    pub fn compose(&self, risk_id: i64) -> String {
        composer::compose(self, risk_id)
    }

    /// Render a grouped digest for a free-text prompt; an absent index
    /// yields an empty string.
    #[must_use]
    pub fn answer(&self, prompt: &str, k: usize, style: AnswerStyle) -> String {
        match self.index() {
            Some(index) => answer::answer(&index, prompt, k, style),
            None => String::new(),
        }
    }
}
