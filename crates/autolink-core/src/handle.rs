use crate::candidate_index::{CandidateIndex, PathEntry};
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Shared, atomically replaceable reference to the current [`CandidateIndex`].
///
/// Readers `load()` an `Arc` snapshot and keep using it for the whole scan.
/// A rebuild constructs the new index off to the side and swaps it in, so an
/// in-flight scan never observes a half-built index.
pub struct IndexHandle {
    current: ArcSwap<CandidateIndex>,
}

impl Default for IndexHandle {
    fn default() -> Self {
        Self::empty()
    }
}

impl IndexHandle {
    pub fn new(index: CandidateIndex) -> Self {
        Self {
            current: ArcSwap::from_pointee(index),
        }
    }

    pub fn empty() -> Self {
        Self::new(CandidateIndex::default())
    }

    /// Snapshot of the index as of now.
    pub fn load(&self) -> Arc<CandidateIndex> {
        self.current.load_full()
    }

    /// Build a fresh index from `entries` and publish it.
    pub fn rebuild(&self, entries: &[PathEntry], base_dir: Option<&str>) -> Arc<CandidateIndex> {
        let index = Arc::new(CandidateIndex::build(entries, base_dir));
        self.current.store(Arc::clone(&index));
        tracing::info!("Candidate index rebuilt: {} keys", index.len());
        index
    }

    /// Publish an index built elsewhere.
    pub fn replace(&self, index: CandidateIndex) {
        self.current.store(Arc::new(index));
    }
}
