use crate::document::{DocumentStore, Post};
use crate::error::Result;
use crate::index::TextIndex;
use crate::pipeline::build_index;
use std::path::Path;
use std::sync::Arc;

/// Resolves index matches back to full posts.
///
/// Built once and never mutated afterward, so it can be shared across
/// request handlers behind an `Arc` without locking.
pub struct SearchService {
    store: DocumentStore,
    index: Arc<dyn TextIndex>,
}

impl SearchService {
    /// `store` and `index` must come from the same build.
    pub fn new(store: DocumentStore, index: Arc<dyn TextIndex>) -> Self {
        Self { store, index }
    }

    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let (store, index) = build_index(dir)?;
        Ok(Self::new(store, Arc::new(index)))
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Posts matching `query` in relevance order.
    pub fn search(&self, query: &str) -> Vec<Post> {
        self.index
            .query(query)
            .into_iter()
            .map(|doc_id| self.store[doc_id].clone())
            .collect()
    }
}
